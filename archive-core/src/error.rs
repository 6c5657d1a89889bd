use thiserror::Error;

/// Errors surfaced by transport-facing traits such as [`crate::Notifier`].
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Bot error: {0}")]
    Bot(String),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
