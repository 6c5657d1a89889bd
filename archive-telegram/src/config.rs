//! Archiver configuration, loaded from environment variables.

use anyhow::{bail, Result};
use ingest::{MediaLayout, DEFAULT_QUIESCENCE_WINDOW};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub struct ArchiveConfig {
    pub bot_token: String,
    /// Custom Bot API base URL. `TELEGRAM_API_URL` or `TELOXIDE_API_URL`.
    pub telegram_api_url: Option<String>,
    /// Chat that receives the start-up notice.
    pub admin_chat_id: Option<i64>,
    pub database_url: String,
    pub log_file: String,
    pub media: MediaLayout,
    pub group_window: Duration,
    /// Upper bound on messages processed concurrently.
    pub worker_limit: usize,
    /// Seconds between store pings; 0 disables the check.
    pub db_health_interval_secs: u64,
}

impl ArchiveConfig {
    /// Loads from the environment. `token` overrides `BOT_TOKEN`.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let admin_chat_id = match env::var("ADMIN_CHAT_ID") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<i64>()
                    .map_err(|e| anyhow::anyhow!("Invalid ADMIN_CHAT_ID {:?}: {}", raw, e))?,
            ),
            Err(_) => None,
        };
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "./data/archive.db".to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/archiver.log".to_string());

        let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "./uploads".to_string());
        let url_prefix = env::var("MEDIA_URL_PREFIX").unwrap_or_else(|_| "uploads".to_string());
        let mut media = MediaLayout::under_root(&media_root, url_prefix);
        if let Ok(dir) = env::var("IMAGE_DIR") {
            media.image_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("VIDEO_DIR") {
            media.video_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("AUDIO_DIR") {
            media.audio_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("DOCUMENT_DIR") {
            media.document_dir = PathBuf::from(dir);
        }

        let group_window = match parse_var::<u64>("GROUP_WINDOW_MS")? {
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_QUIESCENCE_WINDOW,
        };
        let worker_limit = parse_var::<usize>("WORKER_LIMIT")?.unwrap_or(16);
        let db_health_interval_secs = parse_var::<u64>("DB_HEALTH_INTERVAL_SECS")?.unwrap_or(1800);

        Ok(Self {
            bot_token,
            telegram_api_url,
            admin_chat_id,
            database_url,
            log_file,
            media,
            group_window,
            worker_limit,
            db_health_interval_secs,
        })
    }

    /// Rejects values the runner cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            bail!("BOT_TOKEN is empty");
        }
        if let Some(url) = &self.telegram_api_url {
            reqwest::Url::parse(url)
                .map_err(|e| anyhow::anyhow!("Invalid TELEGRAM_API_URL {:?}: {}", url, e))?;
        }
        if self.group_window.is_zero() {
            bail!("GROUP_WINDOW_MS must be greater than 0");
        }
        if self.worker_limit == 0 {
            bail!("WORKER_LIMIT must be greater than 0");
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid {} {:?}: {}", name, raw, e)),
        Err(_) => Ok(None),
    }
}
