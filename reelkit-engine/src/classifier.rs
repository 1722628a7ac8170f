use reelkit_core::classify::Classification;
use reelkit_core::types::{PreviewRef, VideoId, VideoMetadata};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ClassifyError {
    #[error("not a recognized video link")]
    InvalidUrl,

    #[error("unable to fetch video details")]
    MetadataFetchFailed,
}

/// Everything learned about one externally linked video.
///
/// A fetch failure is a distinct outcome from a negative classification:
/// on failure `error` is set and `classification` stays absent; a genuine
/// "not educational" verdict has `classification` present with
/// `is_educational = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLinkQuery {
    pub raw_url: String,
    pub video_id: Option<VideoId>,
    pub metadata: Option<VideoMetadata>,
    pub classification: Option<Classification>,
    pub preview: Option<PreviewRef>,
    pub error: Option<ClassifyError>,
}

impl ExternalLinkQuery {
    pub(crate) fn empty(raw_url: impl Into<String>) -> Self {
        Self {
            raw_url: raw_url.into(),
            video_id: None,
            metadata: None,
            classification: None,
            preview: None,
            error: None,
        }
    }

    pub fn is_educational(&self) -> bool {
        self.classification
            .as_ref()
            .is_some_and(|c| c.is_educational)
    }
}
