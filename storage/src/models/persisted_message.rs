//! Read model for the `messages` table.
//!
//! Group rows keep their media columns as JSON arrays while standalone rows keep scalars; the
//! presence of `media_group_id` decides which shape a row is decoded into.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Raw row as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct MessageRow {
    pub id: i64,
    pub message_id: i64,
    pub text: Option<String>,
    pub media_type: Option<String>,
    pub media_url: Option<String>,
    pub media_group_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Media of a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PersistedMedia {
    Single {
        media_type: Option<String>,
        media_url: Option<String>,
    },
    Group {
        media_types: Vec<String>,
        media_urls: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistedMessage {
    pub id: i64,
    pub message_id: i64,
    pub text: String,
    pub media: PersistedMedia,
    pub media_group_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl PersistedMessage {
    pub fn is_group(&self) -> bool {
        matches!(self.media, PersistedMedia::Group { .. })
    }
}

/// Decodes a group media column: a JSON array, or a bare scalar left by older writers.
fn decode_sequence(column: Option<String>) -> Vec<String> {
    match column {
        None => Vec::new(),
        Some(raw) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|_| vec![raw]),
    }
}

impl From<MessageRow> for PersistedMessage {
    fn from(row: MessageRow) -> Self {
        let media = if row.media_group_id.is_some() {
            PersistedMedia::Group {
                media_types: decode_sequence(row.media_type),
                media_urls: decode_sequence(row.media_url),
            }
        } else {
            PersistedMedia::Single {
                media_type: row.media_type,
                media_url: row.media_url,
            }
        };
        Self {
            id: row.id,
            message_id: row.message_id,
            text: row.text.unwrap_or_default(),
            media,
            media_group_id: row.media_group_id,
            timestamp: row.created_at,
        }
    }
}
