//! CLI parser, config loading and the `list` command.

use anyhow::{Context, Result};
use archive_telegram::ArchiveConfig;
use clap::{Parser, Subcommand};
use storage::{MessageQuery, MessageRepository};

#[derive(Parser)]
#[command(name = "archiver")]
#[command(about = "Telegram channel archiver: run, list", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the archiver (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Print archived records, newest first, one JSON object per line.
    List {
        #[arg(short, long, default_value = "20")]
        limit: i64,
        /// Only consolidated media groups.
        #[arg(long)]
        groups_only: bool,
        /// Database to read; defaults to DATABASE_URL.
        #[arg(long)]
        database_url: Option<String>,
    },
}

/// Load ArchiveConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<ArchiveConfig> {
    ArchiveConfig::load(token)
}

/// Reads the newest `limit` records and renders each as one JSON line.
pub async fn list_records(database_url: &str, limit: i64, groups_only: bool) -> Result<Vec<String>> {
    let repo = MessageRepository::new(database_url)
        .await
        .with_context(|| format!("Open message store at {}", database_url))?;

    let query = MessageQuery {
        groups_only,
        limit: Some(limit),
        ..Default::default()
    };
    let records = repo.get_messages(&query).await.context("Query archived messages")?;

    records
        .iter()
        .map(|record| serde_json::to_string(record).context("Serialize record"))
        .collect()
}
