//! Core types: inbound message, attachments, media kind, and the per-part snapshot kept while a
//! media group is buffered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of downloadable attachment carried by a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
    Document,
    Audio,
    Voice,
    Animation,
}

impl MediaKind {
    /// Classification order. When a message carries several attachment types, the first one
    /// in this list wins.
    pub const PRIORITY: [MediaKind; 6] = [
        MediaKind::Photo,
        MediaKind::Video,
        MediaKind::Document,
        MediaKind::Audio,
        MediaKind::Voice,
        MediaKind::Animation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
            MediaKind::Audio => "audio",
            MediaKind::Voice => "voice",
            MediaKind::Animation => "animation",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fetchable attachment: its kind and the transport-specific reference (e.g. Telegram file id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub kind: MediaKind,
    pub reference: String,
}

/// Attachment references present on one inbound message, one slot per [`MediaKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachments {
    /// Photo variants, ordered from lowest to highest resolution.
    pub photo: Vec<String>,
    pub video: Option<String>,
    pub document: Option<String>,
    pub audio: Option<String>,
    pub voice: Option<String>,
    pub animation: Option<String>,
}

impl Attachments {
    /// Returns the reference for `kind`, if attached. For photos this is the highest-resolution
    /// variant (the last one).
    pub fn get(&self, kind: MediaKind) -> Option<&str> {
        match kind {
            MediaKind::Photo => self.photo.last(),
            MediaKind::Video => self.video.as_ref(),
            MediaKind::Document => self.document.as_ref(),
            MediaKind::Audio => self.audio.as_ref(),
            MediaKind::Voice => self.voice.as_ref(),
            MediaKind::Animation => self.animation.as_ref(),
        }
        .map(String::as_str)
        .filter(|r| !r.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        MediaKind::PRIORITY.iter().all(|k| self.get(*k).is_none())
    }
}

/// One message as delivered by the transport. Consumed once by the ingest pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub message_id: i64,
    /// Text or caption.
    pub text: Option<String>,
    pub attachments: Attachments,
    /// Present when the message is one part of an album.
    pub media_group_id: Option<String>,
    /// Epoch seconds. `None` lets the store assign the current time.
    pub timestamp: Option<i64>,
}

impl InboundMessage {
    pub fn new(message_id: i64) -> Self {
        Self {
            message_id,
            text: None,
            attachments: Attachments::default(),
            media_group_id: None,
            timestamp: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attachments(mut self, attachments: Attachments) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn with_media_group(mut self, media_group_id: impl Into<String>) -> Self {
        self.media_group_id = Some(media_group_id.into());
        self
    }

    pub fn with_timestamp(mut self, epoch_secs: i64) -> Self {
        self.timestamp = Some(epoch_secs);
        self
    }

    /// Text content, empty when the message has neither text nor caption.
    pub fn content(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Converts a transport-specific message type to [`InboundMessage`].
pub trait ToInboundMessage: Send + Sync {
    fn to_inbound(&self) -> InboundMessage;
}

/// Snapshot of one album part taken when it is appended to the group buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPart {
    pub message_id: i64,
    pub text: String,
    pub media_kind: Option<MediaKind>,
    pub media_url: Option<String>,
}
