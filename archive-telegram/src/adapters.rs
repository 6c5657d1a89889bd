//! Adapters from Telegram (teloxide) types to archive_core types.
//! Depends only on teloxide and archive_core type definitions.

use archive_core::{Attachments, InboundMessage, ToInboundMessage};

/// Wraps a teloxide Message for conversion to [`InboundMessage`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToInboundMessage for TelegramMessageWrapper<'a> {
    fn to_inbound(&self) -> InboundMessage {
        InboundMessage {
            message_id: i64::from(self.0.id.0),
            text: self
                .0
                .text()
                .or_else(|| self.0.caption())
                .map(str::to_string),
            attachments: self.attachments(),
            media_group_id: self.0.media_group_id().map(|id| id.to_string()),
            timestamp: Some(self.0.date.timestamp()),
        }
    }
}

impl<'a> TelegramMessageWrapper<'a> {
    /// Collects the file ids of every attachment slot. Telegram lists photo sizes smallest first.
    fn attachments(&self) -> Attachments {
        let msg = self.0;
        Attachments {
            photo: msg
                .photo()
                .map(|sizes| sizes.iter().map(|size| size.file.id.to_string()).collect())
                .unwrap_or_default(),
            video: msg.video().map(|v| v.file.id.to_string()),
            document: msg.document().map(|d| d.file.id.to_string()),
            audio: msg.audio().map(|a| a.file.id.to_string()),
            voice: msg.voice().map(|v| v.file.id.to_string()),
            animation: msg.animation().map(|a| a.file.id.to_string()),
        }
    }
}
