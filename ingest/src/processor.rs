//! Media processor: per-message entry point of the ingest pipeline.
//!
//! classify → fetch (best effort) → standalone messages are persisted immediately, album parts
//! are snapshotted into the [`GroupBuffer`].

use archive_core::{InboundMessage, MediaPart, MediaRef};
use std::sync::Arc;
use storage::MessageStore;
use tracing::{info, instrument, warn};

use crate::classifier::classify;
use crate::consolidator::GroupConsolidator;
use crate::error::IngestError;
use crate::fetcher::PayloadFetcher;
use crate::group_buffer::GroupBuffer;
use crate::persister::SinglePersister;

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Standalone message written with this record id.
    Persisted { id: i64 },
    /// Album part buffered; `pending_parts` counts the group's parts so far.
    Buffered {
        media_group_id: String,
        pending_parts: usize,
    },
}

pub struct MediaProcessor {
    fetcher: Arc<dyn PayloadFetcher>,
    persister: SinglePersister,
    groups: GroupBuffer,
}

impl MediaProcessor {
    pub fn new(fetcher: Arc<dyn PayloadFetcher>, persister: SinglePersister, groups: GroupBuffer) -> Self {
        Self {
            fetcher,
            persister,
            groups,
        }
    }

    /// Wires persister, consolidator and buffer to one store.
    pub fn with_store(
        fetcher: Arc<dyn PayloadFetcher>,
        store: Arc<dyn MessageStore>,
        window: std::time::Duration,
    ) -> Self {
        let groups = GroupBuffer::new(GroupConsolidator::new(store.clone()), window);
        Self::new(fetcher, SinglePersister::new(store), groups)
    }

    pub fn groups(&self) -> &GroupBuffer {
        &self.groups
    }

    /// Processes one message. Fetch failures never fail the message: it is kept with its media
    /// kind and no url. Only store errors of standalone messages are returned; group persistence
    /// happens later, on the buffer's timer.
    #[instrument(skip(self, message), fields(message_id = message.message_id))]
    pub async fn process(&self, message: InboundMessage) -> Result<ProcessOutcome, IngestError> {
        let media = classify(&message);
        let media_kind = media.as_ref().map(|m| m.kind);
        let media_url = match &media {
            Some(media) => self.fetch_best_effort(media, message.message_id).await,
            None => None,
        };

        match message.media_group_id.as_deref() {
            Some(media_group_id) => {
                let part = MediaPart {
                    message_id: message.message_id,
                    text: message.content().to_string(),
                    media_kind,
                    media_url,
                };
                let pending_parts = self.groups.append(media_group_id, part);
                Ok(ProcessOutcome::Buffered {
                    media_group_id: media_group_id.to_string(),
                    pending_parts,
                })
            }
            None => {
                let id = self
                    .persister
                    .persist_single(
                        message.message_id,
                        message.content(),
                        media_kind,
                        media_url,
                        message.timestamp,
                    )
                    .await?;
                Ok(ProcessOutcome::Persisted { id })
            }
        }
    }

    async fn fetch_best_effort(&self, media: &MediaRef, message_id: i64) -> Option<String> {
        match self.fetcher.fetch(media, message_id).await {
            Ok(url) => {
                info!(message_id, kind = %media.kind, url = %url, "step: media stored");
                Some(url)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    message_id,
                    kind = %media.kind,
                    reference = %media.reference,
                    "Media fetch failed, keeping message without media"
                );
                None
            }
        }
    }
}
