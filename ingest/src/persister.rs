//! Single-message persister: straight insert for messages outside any media group.

use archive_core::MediaKind;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use storage::{MessageStore, NewSingleMessage};
use tracing::{info, instrument, warn};

use crate::error::IngestError;

#[derive(Clone)]
pub struct SinglePersister {
    store: Arc<dyn MessageStore>,
}

impl SinglePersister {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Inserts one record and returns its id. `timestamp` is epoch seconds; when absent (or not
    /// representable) the store assigns the current time.
    #[instrument(skip(self, text, media_url))]
    pub async fn persist_single(
        &self,
        message_id: i64,
        text: &str,
        media_kind: Option<MediaKind>,
        media_url: Option<String>,
        timestamp: Option<i64>,
    ) -> Result<i64, IngestError> {
        let record = NewSingleMessage {
            message_id,
            text: text.to_string(),
            media_type: media_kind.map(|k| k.as_str().to_string()),
            media_url,
            timestamp: timestamp.and_then(|secs| epoch_to_utc(message_id, secs)),
        };

        let id = self.store.insert_single(&record).await?;
        info!(message_id, id, "step: single message persisted");
        Ok(id)
    }
}

fn epoch_to_utc(message_id: i64, secs: i64) -> Option<DateTime<Utc>> {
    let instant = Utc.timestamp_opt(secs, 0).single();
    if instant.is_none() {
        warn!(message_id, secs, "Timestamp out of range, using store time");
    }
    instant
}
