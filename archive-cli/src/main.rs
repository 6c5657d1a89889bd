//! archiver CLI: run the Telegram archiver or list archived records. Config from env and
//! optional CLI args.

use anyhow::Result;
use archive_cli::{list_records, load_config, Cli, Commands};
use archive_telegram::run_archiver;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_archiver(config).await
        }
        Commands::List {
            limit,
            groups_only,
            database_url,
        } => {
            let database_url = database_url
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .unwrap_or_else(|| "./data/archive.db".to_string());
            let lines = list_records(&database_url, limit, groups_only).await?;
            if lines.is_empty() {
                println!("No records (database: {}).", database_url);
            }
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
    }
}
