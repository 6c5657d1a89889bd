//! Unit tests for MessageRepository.
//!
//! Covers insert_single / insert_group through the MessageStore trait and read-back shape.

use crate::message_repo::MessageRepository;
use crate::models::{NewGroupMessage, NewSingleMessage, PersistedMedia};
use crate::repository::MessageStore;
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

async fn create_repo() -> (TempDir, MessageRepository) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("archive.db");
    let repo = MessageRepository::new(path.to_str().unwrap())
        .await
        .expect("Failed to create repository");
    (dir, repo)
}

#[tokio::test]
async fn test_insert_single_assigns_increasing_ids() {
    let (_dir, repo) = create_repo().await;

    let message = NewSingleMessage {
        message_id: 1,
        text: "first".to_string(),
        media_type: None,
        media_url: None,
        timestamp: None,
    };
    let first = repo.insert_single(&message).await.expect("Failed to save message");
    let second = repo
        .insert_single(&NewSingleMessage {
            message_id: 2,
            ..message.clone()
        })
        .await
        .expect("Failed to save message");

    assert!(second > first);
}

#[tokio::test]
async fn test_insert_single_with_explicit_timestamp() {
    let (_dir, repo) = create_repo().await;
    let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

    let id = repo
        .insert_single(&NewSingleMessage {
            message_id: 42,
            text: "photo caption".to_string(),
            media_type: Some("photo".to_string()),
            media_url: Some("uploads/img/42_photo.jpg".to_string()),
            timestamp: Some(ts),
        })
        .await
        .expect("Failed to save message");

    let stored = repo
        .get_message_by_id(id)
        .await
        .expect("Failed to query")
        .expect("Message missing");

    assert_eq!(stored.message_id, 42);
    assert_eq!(stored.text, "photo caption");
    assert_eq!(stored.timestamp, ts);
    assert!(!stored.is_group());
    assert_eq!(
        stored.media,
        PersistedMedia::Single {
            media_type: Some("photo".to_string()),
            media_url: Some("uploads/img/42_photo.jpg".to_string()),
        }
    );
}

#[tokio::test]
async fn test_insert_single_without_timestamp_uses_current_time() {
    let (_dir, repo) = create_repo().await;
    let before = Utc::now() - chrono::Duration::seconds(2);

    let id = repo
        .insert_single(&NewSingleMessage {
            message_id: 5,
            text: String::new(),
            media_type: Some("photo".to_string()),
            media_url: None,
            timestamp: None,
        })
        .await
        .expect("Failed to save message");

    let stored = repo.get_message_by_id(id).await.unwrap().unwrap();
    assert!(stored.timestamp >= before);
    assert_eq!(
        stored.media,
        PersistedMedia::Single {
            media_type: Some("photo".to_string()),
            media_url: None,
        }
    );
}

#[tokio::test]
async fn test_insert_group_round_trips_sequences() {
    let (_dir, repo) = create_repo().await;

    let id = repo
        .insert_group(&NewGroupMessage {
            message_id: 100,
            text: "hi bye".to_string(),
            media_types: vec!["photo".to_string(), "video".to_string()],
            media_urls: vec![
                "uploads/img/100_photo.jpg".to_string(),
                "uploads/video/101_video.mp4".to_string(),
            ],
            media_group_id: "13579".to_string(),
            timestamp: None,
        })
        .await
        .expect("Failed to save group");

    let stored = repo.get_message_by_id(id).await.unwrap().unwrap();
    assert!(stored.is_group());
    assert_eq!(stored.media_group_id.as_deref(), Some("13579"));
    assert_eq!(stored.text, "hi bye");
    match stored.media {
        PersistedMedia::Group {
            media_types,
            media_urls,
        } => {
            assert_eq!(media_types, vec!["photo", "video"]);
            assert_eq!(media_urls.len(), media_types.len());
        }
        other => panic!("expected group media, got {:?}", other),
    }
}

#[tokio::test]
async fn test_insert_group_with_no_media_reads_back_empty() {
    let (_dir, repo) = create_repo().await;

    let id = repo
        .insert_group(&NewGroupMessage {
            message_id: 7,
            text: String::new(),
            media_types: vec![],
            media_urls: vec![],
            media_group_id: "empty".to_string(),
            timestamp: None,
        })
        .await
        .expect("Failed to save group");

    let stored = repo.get_message_by_id(id).await.unwrap().unwrap();
    assert_eq!(
        stored.media,
        PersistedMedia::Group {
            media_types: vec![],
            media_urls: vec![],
        }
    );
}

#[tokio::test]
async fn test_ping() {
    let (_dir, repo) = create_repo().await;
    assert!(repo.ping().await.is_ok());
}
