//! Test doubles for the ingest pipeline: a recording store and a scripted fetcher.

#![allow(dead_code)]

use archive_core::{MediaKind, MediaPart, MediaRef};
use async_trait::async_trait;
use ingest::{FetchError, PayloadFetcher};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;
use storage::{MessageStore, NewGroupMessage, NewSingleMessage, StorageError};

/// Records every insert; can be switched to fail.
#[derive(Default)]
pub struct RecordingStore {
    singles: Mutex<Vec<NewSingleMessage>>,
    groups: Mutex<Vec<NewGroupMessage>>,
    next_id: AtomicI64,
    group_attempts: AtomicUsize,
    fail: AtomicBool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.fail.store(true, Ordering::SeqCst);
        store
    }

    pub fn singles(&self) -> Vec<NewSingleMessage> {
        self.singles.lock().unwrap().clone()
    }

    pub fn groups(&self) -> Vec<NewGroupMessage> {
        self.groups.lock().unwrap().clone()
    }

    pub fn group_attempts(&self) -> usize {
        self.group_attempts.load(Ordering::SeqCst)
    }

    fn next_id(&self) -> Result<i64, StorageError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::Database("disk I/O error".to_string()));
        }
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl MessageStore for RecordingStore {
    async fn insert_single(&self, message: &NewSingleMessage) -> Result<i64, StorageError> {
        let id = self.next_id()?;
        self.singles.lock().unwrap().push(message.clone());
        Ok(id)
    }

    async fn insert_group(&self, message: &NewGroupMessage) -> Result<i64, StorageError> {
        self.group_attempts.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id()?;
        self.groups.lock().unwrap().push(message.clone());
        Ok(id)
    }
}

/// Returns `stored/{kind}/{message_id}` for every reference except those marked as failing.
#[derive(Default)]
pub struct ScriptedFetcher {
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(references: &[&str]) -> Self {
        Self {
            failing: references.iter().map(|r| r.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PayloadFetcher for ScriptedFetcher {
    async fn fetch(&self, media: &MediaRef, message_id: i64) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&media.reference) {
            return Err(FetchError::Transport(format!(
                "file {} is unavailable",
                media.reference
            )));
        }
        Ok(format!("stored/{}/{}", media.kind, message_id))
    }
}

pub fn photo_part(message_id: i64, text: &str) -> MediaPart {
    MediaPart {
        message_id,
        text: text.to_string(),
        media_kind: Some(MediaKind::Photo),
        media_url: Some(format!("uploads/img/{}_photo.jpg", message_id)),
    }
}
