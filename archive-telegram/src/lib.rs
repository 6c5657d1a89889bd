//! # archive-telegram
//!
//! Telegram transport for the channel archiver: adapters from teloxide messages to
//! [`archive_core::InboundMessage`], the [`TelegramFetcher`] download boundary, the
//! [`archive_core::Notifier`] implementation, env config, and the dispatcher runner that feeds
//! the ingest pipeline.

mod adapters;
mod bot_adapter;
mod config;
mod runner;
mod telegram_fetcher;

pub use adapters::TelegramMessageWrapper;
pub use bot_adapter::TelegramBotAdapter;
pub use config::ArchiveConfig;
pub use runner::{announce_start, run_archiver};
pub use telegram_fetcher::TelegramFetcher;
