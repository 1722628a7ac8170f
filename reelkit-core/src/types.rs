use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReelId(pub i64);

static LAST_REEL_ID: AtomicI64 = AtomicI64::new(0);

impl ReelId {
    /// Creation-time-derived id, strictly increasing even when two reels
    /// are created within the same millisecond.
    pub fn next() -> Self {
        let now = unix_ms();
        // fetch_update returns the previous value; the stored (new) value
        // is what this call owns.
        let prev = LAST_REEL_ID
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(0);
        Self(now.max(prev + 1))
    }
}

pub fn unix_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().try_into().unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoId(pub String);

impl VideoId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobId(pub Uuid);

impl BlobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlobId {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolvable handle to a finalized recorded media blob.
///
/// The bytes themselves live in a blob registry; the reference is what gets
/// persisted. `len_bytes == 0` marks the empty artifact produced by stopping
/// a recording before any chunk arrived — callers must check before commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub blob: BlobId,
    pub len_bytes: usize,
    pub mime_type: String,
}

impl ArtifactRef {
    pub fn is_empty(&self) -> bool {
        self.len_bytes == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreviewRef(pub String);

impl PreviewRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Descriptive metadata returned by the remote lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: Option<String>,
    pub duration_seconds: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReelSource {
    LocalRecording {
        artifact: ArtifactRef,
    },
    ExternalLink {
        preview: PreviewRef,
        matched_topics: Vec<String>,
    },
}

/// The persisted unit of content produced by the capture pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reel {
    pub id: ReelId,
    pub source: ReelSource,
    pub created_at_unix_ms: i64,
}
