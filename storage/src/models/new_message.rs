//! Insert payloads for the `messages` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A standalone message: scalar media fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSingleMessage {
    pub message_id: i64,
    pub text: String,
    pub media_type: Option<String>,
    pub media_url: Option<String>,
    /// `None` lets the database assign the current time.
    pub timestamp: Option<DateTime<Utc>>,
}

/// A consolidated media group: `media_types[i]` describes `media_urls[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroupMessage {
    /// Id of the first part that arrived.
    pub message_id: i64,
    pub text: String,
    pub media_types: Vec<String>,
    pub media_urls: Vec<String>,
    pub media_group_id: String,
    pub timestamp: Option<DateTime<Utc>>,
}
