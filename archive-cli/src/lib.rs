//! # archive-cli
//!
//! Command-line entry: run the archiver, list archived records. Config comes from the
//! environment (and `.env`); `--token` overrides `BOT_TOKEN`.

pub mod cli;

pub use archive_telegram::ArchiveConfig;
pub use cli::{list_records, load_config, Cli, Commands};
