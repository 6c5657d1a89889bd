//! # ingest
//!
//! Turns inbound messages into persisted records. Standalone messages are written straight
//! through; album parts sharing a media group id are buffered and merged into one record once the
//! group has been quiet for the quiescence window.
//!
//! **Data flow:** [`MediaProcessor::process`] → [`classify`] → [`PayloadFetcher::fetch`]
//! (best effort) → either [`SinglePersister::persist_single`] or [`GroupBuffer::append`] → timer
//! expiry → [`GroupConsolidator::consolidate`] → [`storage::MessageStore`].

mod classifier;
mod consolidator;
mod error;
mod fetcher;
mod group_buffer;
mod persister;
mod processor;

pub use classifier::classify;
pub use consolidator::{merge_parts, GroupConsolidator};
pub use error::{FetchError, IngestError};
pub use fetcher::{storage_target, MediaDir, MediaLayout, PayloadFetcher, ResolvedTarget, StorageTarget};
pub use group_buffer::{GroupBuffer, DEFAULT_QUIESCENCE_WINDOW};
pub use persister::SinglePersister;
pub use processor::{MediaProcessor, ProcessOutcome};
