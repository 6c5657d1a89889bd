//! Ingest error types.
//!
//! Fetch failures are absorbed by the processor (the message is persisted without media), so
//! [`FetchError`] never converts into [`IngestError`].

use storage::StorageError;
use thiserror::Error;

/// A media payload could not be retrieved or stored locally.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Persist failed: {0}")]
    PersistFailed(#[from] StorageError),

    #[error("Media group {0} has no parts")]
    EmptyGroup(String),
}
