//! Out-of-band notifications (start-up alerts and the like).
//!
//! [`Notifier`] is transport-agnostic; archive-telegram implements it via teloxide.

use crate::error::Result;
use async_trait::async_trait;

/// Sends plain-text notices to an operator chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `text` to the chat identified by `chat_id`.
    async fn notify(&self, chat_id: i64, text: &str) -> Result<()>;
}
