//! Storage crate: persistence of archived messages and the store abstraction used by ingest.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – NewSingleMessage, NewGroupMessage, PersistedMessage, MessageQuery
//! - [`repository`] – MessageStore trait
//! - [`message_repo`] – MessageRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod message_repo;
mod models;
mod repository;
mod sqlite_pool;

#[cfg(test)]
mod message_repo_test;

pub use error::StorageError;
pub use message_repo::MessageRepository;
pub use models::{
    MessageQuery, NewGroupMessage, NewSingleMessage, PersistedMedia, PersistedMessage,
};
pub use repository::MessageStore;
pub use sqlite_pool::SqlitePoolManager;
