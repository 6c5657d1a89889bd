//! Media classifier: picks the one attachment of a message that will be fetched.

use archive_core::{InboundMessage, MediaKind, MediaRef};

/// Returns the first attachment present in [`MediaKind::PRIORITY`] order, or `None` when the
/// message carries no media. Photos resolve to their highest-resolution variant.
pub fn classify(message: &InboundMessage) -> Option<MediaRef> {
    MediaKind::PRIORITY.iter().find_map(|kind| {
        message.attachments.get(*kind).map(|reference| MediaRef {
            kind: *kind,
            reference: reference.to_string(),
        })
    })
}
