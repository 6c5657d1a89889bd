//! [`PayloadFetcher`] over the Bot API: `getFile` resolves the remote path, the payload is
//! streamed into the directory chosen by [`MediaLayout`].

use archive_core::MediaRef;
use async_trait::async_trait;
use ingest::{FetchError, MediaLayout, PayloadFetcher};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;
use tracing::{debug, instrument, warn};

pub struct TelegramFetcher {
    bot: teloxide::Bot,
    layout: MediaLayout,
}

impl TelegramFetcher {
    pub fn new(bot: teloxide::Bot, layout: MediaLayout) -> Self {
        Self { bot, layout }
    }
}

#[async_trait]
impl PayloadFetcher for TelegramFetcher {
    #[instrument(skip(self, media), fields(kind = %media.kind))]
    async fn fetch(&self, media: &MediaRef, message_id: i64) -> Result<String, FetchError> {
        let file = self
            .bot
            .get_file(FileId(media.reference.clone()))
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let target = self.layout.resolve(media.kind, &file.path, message_id);
        debug!(
            remote_path = %file.path,
            local_path = %target.path.display(),
            "step: downloading media"
        );

        let mut dst = tokio::fs::File::create(&target.path).await?;
        if let Err(e) = self.bot.download_file(&file.path, &mut dst).await {
            drop(dst);
            if let Err(remove_err) = tokio::fs::remove_file(&target.path).await {
                warn!(
                    error = %remove_err,
                    path = %target.path.display(),
                    "Failed to remove partial download"
                );
            }
            return Err(FetchError::Transport(e.to_string()));
        }

        Ok(target.relative_url)
    }
}
