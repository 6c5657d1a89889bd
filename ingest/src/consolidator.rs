//! Group consolidator: merges the buffered parts of one media group into a single record.

use archive_core::MediaPart;
use std::sync::Arc;
use storage::{MessageStore, NewGroupMessage};
use tracing::{error, info, instrument};

use crate::error::IngestError;

/// Builds the group record from parts in arrival order; `None` for an empty slice.
///
/// - `message_id` is the first part's id.
/// - Media kinds and urls are taken pairwise from the parts that have a url, so both sequences
///   always have the same length and order.
/// - Text is every non-empty part text joined by a single space, or the first part's text when
///   none is non-empty.
pub fn merge_parts(media_group_id: &str, parts: &[MediaPart]) -> Option<NewGroupMessage> {
    let first = parts.first()?;

    let (media_types, media_urls): (Vec<String>, Vec<String>) = parts
        .iter()
        .filter_map(|part| {
            part.media_url.as_ref().map(|url| {
                let kind = part
                    .media_kind
                    .map(|k| k.as_str().to_string())
                    .unwrap_or_default();
                (kind, url.clone())
            })
        })
        .unzip();

    let texts: Vec<&str> = parts
        .iter()
        .map(|part| part.text.as_str())
        .filter(|text| !text.is_empty())
        .collect();
    let text = if texts.is_empty() {
        first.text.clone()
    } else {
        texts.join(" ")
    };

    Some(NewGroupMessage {
        message_id: first.message_id,
        text,
        media_types,
        media_urls,
        media_group_id: media_group_id.to_string(),
        timestamp: None,
    })
}

#[derive(Clone)]
pub struct GroupConsolidator {
    store: Arc<dyn MessageStore>,
}

impl GroupConsolidator {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Merges and persists one flushed group, returning the record id. On failure the batch is
    /// lost: the buffer entry is already gone and nothing retries.
    #[instrument(skip(self, parts), fields(parts = parts.len()))]
    pub async fn consolidate(
        &self,
        media_group_id: &str,
        parts: Vec<MediaPart>,
    ) -> Result<i64, IngestError> {
        let record = merge_parts(media_group_id, &parts)
            .ok_or_else(|| IngestError::EmptyGroup(media_group_id.to_string()))?;

        let id = self.store.insert_group(&record).await.map_err(|e| {
            error!(
                error = %e,
                media_group_id = %media_group_id,
                parts = parts.len(),
                "Failed to persist media group, batch dropped"
            );
            IngestError::PersistFailed(e)
        })?;

        info!(
            media_group_id = %media_group_id,
            id,
            message_id = record.message_id,
            media = record.media_urls.len(),
            "step: media group consolidated"
        );
        Ok(id)
    }
}
