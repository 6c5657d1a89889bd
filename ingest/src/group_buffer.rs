//! Group buffer and debounce scheduler.
//!
//! Per media group id the buffer is either absent or accumulating (parts buffered, one timer
//! armed). Every [`GroupBuffer::append`] pushes the part and re-arms the timer; when a timer
//! survives a full quiescence window it removes the entry and hands the parts to the
//! [`GroupConsolidator`]. A part arriving after that removal starts a new cycle.
//!
//! All mutation of one key happens under that key's `DashMap` shard lock and never across an
//! `.await`; different keys proceed in parallel. Each append stamps the entry with a fresh
//! generation and a timer only flushes the generation it was armed for, so at most one flush
//! runs per cycle even when an abort races a timer that has already woken up.

use archive_core::MediaPart;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::consolidator::GroupConsolidator;
use crate::error::IngestError;

/// Quiet period after the latest part before a group is considered complete.
pub const DEFAULT_QUIESCENCE_WINDOW: Duration = Duration::from_secs(2);

#[derive(Default)]
struct PendingGroup {
    parts: Vec<MediaPart>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

struct Inner {
    groups: DashMap<String, PendingGroup>,
    consolidator: GroupConsolidator,
    window: Duration,
    generations: AtomicU64,
}

/// Shared handle to the buffer; clones refer to the same state.
#[derive(Clone)]
pub struct GroupBuffer {
    inner: Arc<Inner>,
}

impl GroupBuffer {
    pub fn new(consolidator: GroupConsolidator, window: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                groups: DashMap::new(),
                consolidator,
                window,
                generations: AtomicU64::new(0),
            }),
        }
    }

    /// Buffers `part` under `media_group_id` and restarts that group's quiescence timer.
    /// Returns the number of parts now pending for the group. Must be called from within a
    /// tokio runtime.
    pub fn append(&self, media_group_id: &str, part: MediaPart) -> usize {
        let generation = self.inner.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let message_id = part.message_id;

        let mut entry = self
            .inner
            .groups
            .entry(media_group_id.to_string())
            .or_insert_with(|| {
                debug!(media_group_id = %media_group_id, "step: new media group cycle");
                PendingGroup::default()
            });

        entry.parts.push(part);
        entry.generation = generation;
        if let Some(previous) = entry.timer.take() {
            previous.abort();
        }
        entry.timer = Some(self.arm_timer(media_group_id.to_string(), generation));

        let pending = entry.parts.len();
        debug!(
            media_group_id = %media_group_id,
            message_id,
            pending,
            "step: part buffered, timer reset"
        );
        pending
    }

    fn arm_timer(&self, media_group_id: String, generation: u64) -> JoinHandle<()> {
        let buffer = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(buffer.inner.window).await;
            match buffer.flush(&media_group_id, generation).await {
                Ok(Some(id)) => {
                    debug!(media_group_id = %media_group_id, id, "step: timer flush done");
                }
                Ok(None) => {
                    debug!(media_group_id = %media_group_id, "Superseded timer fired, ignored");
                }
                Err(e) => {
                    error!(error = %e, media_group_id = %media_group_id, "Media group flush failed");
                }
            }
        })
    }

    /// Removes the group if it is still at `generation` and consolidates the removed parts.
    /// `Ok(None)` when the group was already flushed or has been appended to since.
    #[instrument(skip(self))]
    async fn flush(&self, media_group_id: &str, generation: u64) -> Result<Option<i64>, IngestError> {
        let removed = self
            .inner
            .groups
            .remove_if(media_group_id, |_, pending| pending.generation == generation);

        let Some((media_group_id, pending)) = removed else {
            return Ok(None);
        };

        info!(
            media_group_id = %media_group_id,
            parts = pending.parts.len(),
            "step: media group quiet, flushing"
        );
        let id = self
            .inner
            .consolidator
            .consolidate(&media_group_id, pending.parts)
            .await?;
        Ok(Some(id))
    }

    /// Flushes every pending group immediately, cancelling their timers. Used on shutdown.
    /// Returns the number of groups persisted successfully.
    pub async fn drain(&self) -> usize {
        let keys: Vec<String> = self
            .inner
            .groups
            .iter()
            .map(|entry| entry.key().clone())
            .collect();

        let mut flushed = 0;
        for key in keys {
            let Some((media_group_id, pending)) = self.inner.groups.remove(&key) else {
                continue;
            };
            if let Some(timer) = pending.timer {
                timer.abort();
            }
            info!(
                media_group_id = %media_group_id,
                parts = pending.parts.len(),
                "step: draining media group"
            );
            match self
                .inner
                .consolidator
                .consolidate(&media_group_id, pending.parts)
                .await
            {
                Ok(_) => flushed += 1,
                Err(e) => {
                    error!(error = %e, media_group_id = %media_group_id, "Media group drain failed");
                }
            }
        }
        flushed
    }

    /// Number of groups currently accumulating.
    pub fn pending_groups(&self) -> usize {
        self.inner.groups.len()
    }

    /// Number of parts buffered for `media_group_id` (0 when absent).
    pub fn pending_parts(&self, media_group_id: &str) -> usize {
        self.inner
            .groups
            .get(media_group_id)
            .map(|entry| entry.parts.len())
            .unwrap_or(0)
    }
}
