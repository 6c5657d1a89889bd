//! Integration tests for [`ingest::MediaProcessor`]: standalone vs. grouped routing, best-effort
//! fetch, and end-to-end album consolidation.

mod common;

use archive_core::{Attachments, InboundMessage};
use common::{RecordingStore, ScriptedFetcher};
use ingest::{IngestError, MediaProcessor, ProcessOutcome};
use std::sync::Arc;
use std::time::Duration;

const WINDOW: Duration = Duration::from_secs(2);

fn processor(fetcher: &Arc<ScriptedFetcher>, store: &Arc<RecordingStore>) -> MediaProcessor {
    MediaProcessor::with_store(fetcher.clone(), store.clone(), WINDOW)
}

fn photo(reference: &str) -> Attachments {
    Attachments {
        photo: vec![format!("{}-small", reference), reference.to_string()],
        ..Default::default()
    }
}

/// **Test: A text-only standalone message is persisted at once, without a fetch.**
#[tokio::test]
async fn test_text_message_persisted_without_fetch() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let store = Arc::new(RecordingStore::new());
    let processor = processor(&fetcher, &store);

    let outcome = processor
        .process(InboundMessage::new(10).with_text("hello").with_timestamp(1_700_000_000))
        .await
        .unwrap();

    assert_eq!(outcome, ProcessOutcome::Persisted { id: 1 });
    assert_eq!(fetcher.calls(), 0);
    let singles = store.singles();
    assert_eq!(singles.len(), 1);
    assert_eq!(singles[0].text, "hello");
    assert_eq!(singles[0].media_type, None);
    assert_eq!(singles[0].timestamp.map(|t| t.timestamp()), Some(1_700_000_000));
}

/// **Test: Standalone photo is fetched (largest variant) and stored with its url.**
#[tokio::test]
async fn test_photo_message_persisted_with_url() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let store = Arc::new(RecordingStore::new());
    let processor = processor(&fetcher, &store);

    processor
        .process(InboundMessage::new(11).with_attachments(photo("big")))
        .await
        .unwrap();

    let singles = store.singles();
    assert_eq!(singles[0].media_type.as_deref(), Some("photo"));
    assert_eq!(singles[0].media_url.as_deref(), Some("stored/photo/11"));
    assert_eq!(singles[0].text, "");
    assert!(singles[0].timestamp.is_none());
}

/// **Test: A failed fetch still persists text and kind, with no url.**
#[tokio::test]
async fn test_fetch_failure_keeps_message() {
    let fetcher = Arc::new(ScriptedFetcher::failing_on(&["gone"]));
    let store = Arc::new(RecordingStore::new());
    let processor = processor(&fetcher, &store);

    let outcome = processor
        .process(
            InboundMessage::new(12)
                .with_text("caption survives")
                .with_attachments(photo("gone")),
        )
        .await
        .unwrap();

    assert!(matches!(outcome, ProcessOutcome::Persisted { .. }));
    assert_eq!(fetcher.calls(), 1);
    let singles = store.singles();
    assert_eq!(singles[0].text, "caption survives");
    assert_eq!(singles[0].media_type.as_deref(), Some("photo"));
    assert_eq!(singles[0].media_url, None);
}

/// **Test: Store failure of a standalone message is surfaced as PersistFailed.**
#[tokio::test]
async fn test_single_persist_failure_is_returned() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let store = Arc::new(RecordingStore::failing());
    let processor = processor(&fetcher, &store);

    let result = processor.process(InboundMessage::new(13).with_text("x")).await;

    assert!(matches!(result, Err(IngestError::PersistFailed(_))));
}

/// **Test: Album parts are buffered, then consolidated into one record.**
///
/// **Setup:** Three parts of one album: photo with caption, photo, document whose fetch fails.
/// **Action:** Process all three, wait past the window.
/// **Expected:** No single inserts; one group record with the two fetched urls, caption as text.
#[tokio::test(start_paused = true)]
async fn test_album_consolidated_end_to_end() {
    let fetcher = Arc::new(ScriptedFetcher::failing_on(&["broken-doc"]));
    let store = Arc::new(RecordingStore::new());
    let processor = processor(&fetcher, &store);

    let first = processor
        .process(
            InboundMessage::new(20)
                .with_text("holiday")
                .with_attachments(photo("p1"))
                .with_media_group("album-7"),
        )
        .await
        .unwrap();
    assert_eq!(
        first,
        ProcessOutcome::Buffered {
            media_group_id: "album-7".to_string(),
            pending_parts: 1
        }
    );

    processor
        .process(
            InboundMessage::new(21)
                .with_attachments(photo("p2"))
                .with_media_group("album-7"),
        )
        .await
        .unwrap();
    let third = processor
        .process(
            InboundMessage::new(22)
                .with_attachments(Attachments {
                    document: Some("broken-doc".to_string()),
                    ..Default::default()
                })
                .with_media_group("album-7"),
        )
        .await
        .unwrap();
    assert!(matches!(third, ProcessOutcome::Buffered { pending_parts: 3, .. }));
    assert!(store.groups().is_empty());

    tokio::time::sleep(WINDOW + Duration::from_millis(100)).await;
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }

    assert!(store.singles().is_empty());
    let groups = store.groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].message_id, 20);
    assert_eq!(groups[0].media_group_id, "album-7");
    assert_eq!(groups[0].text, "holiday");
    assert_eq!(groups[0].media_types, vec!["photo", "photo"]);
    assert_eq!(groups[0].media_urls, vec!["stored/photo/20", "stored/photo/21"]);
    assert_eq!(processor.groups().pending_groups(), 0);
}

/// **Test: Standalone messages bypass a pending album.**
#[tokio::test(start_paused = true)]
async fn test_standalone_bypasses_buffer() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let store = Arc::new(RecordingStore::new());
    let processor = processor(&fetcher, &store);

    processor
        .process(InboundMessage::new(30).with_attachments(photo("a")).with_media_group("g"))
        .await
        .unwrap();
    processor
        .process(InboundMessage::new(31).with_text("solo"))
        .await
        .unwrap();

    assert_eq!(store.singles().len(), 1);
    assert_eq!(processor.groups().pending_parts("g"), 1);
}
