//! Payload fetch boundary and the on-disk filing policy fetchers share.
//!
//! [`PayloadFetcher`] is implemented by the transport (archive-telegram); [`storage_target`] and
//! [`MediaLayout`] decide where a payload of a given kind ends up and which relative path is
//! recorded for it.

use archive_core::{MediaKind, MediaRef};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::FetchError;

/// Retrieves a media payload and files it locally. Called at most once per message; the caller
/// does not retry.
#[async_trait]
pub trait PayloadFetcher: Send + Sync {
    /// Downloads `media` for message `message_id` and returns the stored relative path.
    async fn fetch(&self, media: &MediaRef, message_id: i64) -> Result<String, FetchError>;
}

/// Directory class a payload is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaDir {
    Image,
    Video,
    Audio,
    Document,
}

impl MediaDir {
    /// Directory name under the media root when none is configured explicitly.
    pub fn default_name(&self) -> &'static str {
        match self {
            MediaDir::Image => "img",
            MediaDir::Video => "video",
            MediaDir::Audio => "audio",
            MediaDir::Document => "documents",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageTarget {
    pub dir: MediaDir,
    pub extension: String,
}

/// Filing policy: photo → image/jpg, video and animation → video/mp4, audio and voice →
/// audio/mp3, document → document with the extension of the remote file name (`file` if none).
pub fn storage_target(kind: MediaKind, remote_path: &str) -> StorageTarget {
    let (dir, extension) = match kind {
        MediaKind::Photo => (MediaDir::Image, "jpg"),
        MediaKind::Video | MediaKind::Animation => (MediaDir::Video, "mp4"),
        MediaKind::Audio | MediaKind::Voice => (MediaDir::Audio, "mp3"),
        MediaKind::Document => (MediaDir::Document, document_extension(remote_path)),
    };
    StorageTarget {
        dir,
        extension: extension.to_string(),
    }
}

fn document_extension(remote_path: &str) -> &str {
    let file_name = remote_path.rsplit('/').next().unwrap_or(remote_path);
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => "file",
    }
}

/// Where a payload is written and the path recorded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub path: PathBuf,
    pub relative_url: String,
}

/// Local media directories plus the prefix of recorded relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLayout {
    pub image_dir: PathBuf,
    pub video_dir: PathBuf,
    pub audio_dir: PathBuf,
    pub document_dir: PathBuf,
    pub url_prefix: String,
}

impl MediaLayout {
    /// Layout with every directory at its default name under `root`.
    pub fn under_root(root: impl AsRef<Path>, url_prefix: impl Into<String>) -> Self {
        let root = root.as_ref();
        Self {
            image_dir: root.join(MediaDir::Image.default_name()),
            video_dir: root.join(MediaDir::Video.default_name()),
            audio_dir: root.join(MediaDir::Audio.default_name()),
            document_dir: root.join(MediaDir::Document.default_name()),
            url_prefix: url_prefix.into(),
        }
    }

    pub fn dir(&self, dir: MediaDir) -> &Path {
        match dir {
            MediaDir::Image => &self.image_dir,
            MediaDir::Video => &self.video_dir,
            MediaDir::Audio => &self.audio_dir,
            MediaDir::Document => &self.document_dir,
        }
    }

    /// Creates every media directory.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [
            &self.image_dir,
            &self.video_dir,
            &self.audio_dir,
            &self.document_dir,
        ] {
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(())
    }

    /// File name is `{message_id}_{kind}.{ext}`; the recorded path is
    /// `{url_prefix}/{dir name}/{file name}`.
    pub fn resolve(&self, kind: MediaKind, remote_path: &str, message_id: i64) -> ResolvedTarget {
        let target = storage_target(kind, remote_path);
        let dir = self.dir(target.dir);
        let file_name = format!("{}_{}.{}", message_id, kind, target.extension);
        let dir_name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_else(|| target.dir.default_name());
        let relative_url = if self.url_prefix.is_empty() {
            format!("{}/{}", dir_name, file_name)
        } else {
            format!("{}/{}/{}", self.url_prefix.trim_end_matches('/'), dir_name, file_name)
        };
        ResolvedTarget {
            path: dir.join(&file_name),
            relative_url,
        }
    }
}
