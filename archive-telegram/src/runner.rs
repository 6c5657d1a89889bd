//! Long-polling runner: builds the store, the ingest pipeline and the teloxide dispatcher, then
//! feeds every group and channel message to [`MediaProcessor::process`].
//!
//! Each message runs on its own task, bounded by a semaphore of `worker_limit` permits. Ctrl-C
//! stops the dispatcher; the runner then waits for in-flight messages and drains buffered media
//! groups before returning.

use anyhow::Result;
use archive_core::{init_tracing, Notifier, ToInboundMessage};
use ingest::{MediaProcessor, PayloadFetcher, ProcessOutcome};
use std::sync::Arc;
use std::time::Duration;
use storage::{MessageRepository, MessageStore};
use teloxide::prelude::*;
use teloxide::types::Message;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::adapters::TelegramMessageWrapper;
use crate::bot_adapter::TelegramBotAdapter;
use crate::config::ArchiveConfig;
use crate::telegram_fetcher::TelegramFetcher;

/// Runs the archiver until Ctrl-C.
pub async fn run_archiver(config: ArchiveConfig) -> Result<()> {
    config.validate()?;
    init_tracing(Some(&config.log_file))?;

    info!(
        database_url = %config.database_url,
        window_ms = config.group_window.as_millis() as u64,
        worker_limit = config.worker_limit,
        "Starting archiver"
    );

    config.media.ensure_dirs().await.map_err(|e| {
        error!(error = %e, "Failed to create media directories");
        anyhow::anyhow!("Failed to create media directories: {}", e)
    })?;

    let repo = Arc::new(
        MessageRepository::new(&config.database_url)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    database_url = %config.database_url,
                    "Failed to initialize message storage"
                );
                anyhow::anyhow!("Failed to initialize message storage: {}", e)
            })?,
    );

    let bot = build_bot(&config);

    let fetcher: Arc<dyn PayloadFetcher> =
        Arc::new(TelegramFetcher::new(bot.clone(), config.media.clone()));
    let store: Arc<dyn MessageStore> = repo.clone();
    let processor = Arc::new(MediaProcessor::with_store(fetcher, store, config.group_window));
    let workers = Arc::new(Semaphore::new(config.worker_limit));

    let username = match bot.get_me().await {
        Ok(me) => me.user.username.clone(),
        Err(e) => {
            warn!(error = %e, "get_me failed");
            None
        }
    };
    let notifier = TelegramBotAdapter::new(bot.clone());
    announce_start(&notifier, config.admin_chat_id, username.as_deref()).await;

    let health = spawn_store_health_check(repo, config.db_health_interval_secs);

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter(|msg: Message| !msg.chat.is_private())
                .endpoint(on_message),
        )
        .branch(Update::filter_channel_post().endpoint(on_message));

    info!("step: dispatching updates (long polling)");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![processor.clone(), workers.clone()])
        .default_handler(|_upd| async move {
            debug!("Unhandled update ignored");
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("step: dispatcher stopped, waiting for in-flight messages");
    if let Some(health) = health {
        health.abort();
    }
    let permits = u32::try_from(config.worker_limit).unwrap_or(u32::MAX);
    if let Err(e) = workers.acquire_many(permits).await {
        warn!(error = %e, "Worker semaphore closed before drain");
    }

    let flushed = processor.groups().drain().await;
    info!(flushed, "Archiver stopped");
    Ok(())
}

fn build_bot(config: &ArchiveConfig) -> Bot {
    let bot = Bot::new(config.bot_token.clone());
    match &config.telegram_api_url {
        Some(url_str) => match reqwest::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        },
        None => bot,
    }
}

async fn on_message(
    msg: Message,
    processor: Arc<MediaProcessor>,
    workers: Arc<Semaphore>,
) -> ResponseResult<()> {
    let inbound = TelegramMessageWrapper(&msg).to_inbound();
    info!(
        chat_id = msg.chat.id.0,
        message_id = inbound.message_id,
        media_group_id = inbound.media_group_id.as_deref().unwrap_or(""),
        "Received message"
    );

    let permit = match workers.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            error!(error = %e, message_id = inbound.message_id, "Worker pool closed, message dropped");
            return Ok(());
        }
    };

    tokio::spawn(async move {
        let _permit = permit;
        let message_id = inbound.message_id;
        match processor.process(inbound).await {
            Ok(ProcessOutcome::Persisted { id }) => {
                debug!(message_id, id, "step: message archived");
            }
            Ok(ProcessOutcome::Buffered {
                media_group_id,
                pending_parts,
            }) => {
                debug!(message_id, media_group_id = %media_group_id, pending_parts, "step: album part buffered");
            }
            Err(e) => {
                error!(error = %e, message_id, "Failed to archive message");
            }
        }
    });

    Ok(())
}

/// Sends the start-up notice to the admin chat, if one is configured. Returns whether a notice
/// was delivered; delivery failures are logged and never stop the runner.
#[instrument(skip(notifier))]
pub async fn announce_start(
    notifier: &dyn Notifier,
    admin_chat_id: Option<i64>,
    username: Option<&str>,
) -> bool {
    let Some(chat_id) = admin_chat_id else {
        return false;
    };
    let text = match username {
        Some(name) => format!("Archiver @{} started", name),
        None => "Archiver started".to_string(),
    };
    match notifier.notify(chat_id, &text).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, chat_id, "Failed to send start-up notice");
            false
        }
    }
}

/// Pings the store every `interval_secs` and logs failures. `None` when disabled.
fn spawn_store_health_check(repo: Arc<MessageRepository>, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        return None;
    }
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match repo.ping().await {
                Ok(()) => debug!("step: store health check ok"),
                Err(e) => error!(error = %e, "Store health check failed"),
            }
        }
    }))
}
