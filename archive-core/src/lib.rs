//! # archive-core
//!
//! Core types and traits for the channel archiver: [`InboundMessage`] and its [`Attachments`],
//! [`MediaKind`], buffered [`MediaPart`]s, the [`Notifier`] abstraction, and tracing initialization.
//! Transport-agnostic; used by storage, ingest and archive-telegram.

pub mod error;
pub mod logger;
pub mod notifier;
pub mod types;

pub use error::{ArchiveError, Result};
pub use logger::init_tracing;
pub use notifier::Notifier;
pub use types::{Attachments, InboundMessage, MediaKind, MediaPart, MediaRef, ToInboundMessage};
