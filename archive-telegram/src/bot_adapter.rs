//! Wraps teloxide::Bot and implements [`archive_core::Notifier`] for operator alerts.

use archive_core::{ArchiveError, Notifier, Result};
use async_trait::async_trait;
use teloxide::{prelude::*, types::ChatId};

/// Thin wrapper around teloxide::Bot that implements archive-core's Notifier trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramBotAdapter {
    async fn notify(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text.to_string())
            .await
            .map_err(|e| ArchiveError::Bot(e.to_string()))?;
        Ok(())
    }
}
