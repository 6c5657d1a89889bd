//! Query parameters for listing archived messages.
//!
//! Used by MessageRepository::get_messages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageQuery {
    /// Only records whose representative message has this id.
    pub message_id: Option<i64>,
    /// Only consolidated media groups.
    pub groups_only: bool,
    pub limit: Option<i64>,
}
