use crate::classifier::{ClassifyError, ExternalLinkQuery};
use crate::traits::{MetadataLookup, ReelStore};
use reelkit_capture::recorder::{RecordingSession, RecordingState};
use reelkit_core::classify::classify;
use reelkit_core::link::{parse_video_id, thumbnail_url};
use reelkit_core::types::{Reel, ReelId, ReelSource, unix_ms};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("nothing to commit")]
    NothingToCommit,

    #[error("failed to save reel")]
    Store(#[source] anyhow::Error),
}

/// Orchestrates the external-link classification flow and the commit step.
/// Device acquisition and recording stay in `reelkit-capture`; the engine
/// only consumes their finished state.
pub struct ReelEngine {
    lookup: Arc<dyn MetadataLookup>,
    store: Arc<dyn ReelStore>,
}

impl ReelEngine {
    pub fn new(lookup: Arc<dyn MetadataLookup>, store: Arc<dyn ReelStore>) -> Self {
        Self { lookup, store }
    }

    /// Parses the link, fetches metadata and applies the keyword/duration
    /// heuristic. Invalid URLs and fetch failures are recoverable: the
    /// returned query carries the error and absent fields, nothing is
    /// thrown past this boundary and nothing is retried.
    pub async fn classify_link(&self, raw_url: &str) -> ExternalLinkQuery {
        let mut query = ExternalLinkQuery::empty(raw_url);

        let Some(video_id) = parse_video_id(raw_url) else {
            log::warn!("unrecognized video link: {raw_url}");
            query.error = Some(ClassifyError::InvalidUrl);
            return query;
        };
        query.video_id = Some(video_id.clone());

        let metadata = match self.lookup.fetch_metadata(&video_id).await {
            Ok(m) => m,
            Err(e) => {
                log::warn!("metadata fetch failed for {}: {e:#}", video_id.as_str());
                query.error = Some(ClassifyError::MetadataFetchFailed);
                return query;
            }
        };

        let classification = classify(&metadata);
        log::info!(
            "classified {}: educational={} topics={:?}",
            video_id.as_str(),
            classification.is_educational,
            classification.matched_topics
        );
        if classification.is_educational {
            query.preview = Some(thumbnail_url(&video_id));
        }
        query.metadata = Some(metadata);
        query.classification = Some(classification);
        query
    }

    /// Builds and persists a reel from whichever source is currently valid.
    /// The local recording wins when both are present, as local capture
    /// reflects more explicit user intent.
    pub fn commit(
        &self,
        recording: Option<&RecordingSession>,
        query: Option<&ExternalLinkQuery>,
    ) -> Result<Reel, CommitError> {
        let completed_artifact = recording
            .filter(|r| r.state() == RecordingState::Complete)
            .and_then(|r| r.artifact())
            .filter(|a| !a.is_empty());

        let source = if let Some(artifact) = completed_artifact {
            ReelSource::LocalRecording {
                artifact: artifact.clone(),
            }
        } else {
            let educational = query
                .filter(|q| q.is_educational())
                .and_then(|q| Some((q.preview.clone()?, q.classification.as_ref()?)));
            match educational {
                Some((preview, classification)) => ReelSource::ExternalLink {
                    preview,
                    matched_topics: classification.matched_topics.iter().cloned().collect(),
                },
                None => return Err(CommitError::NothingToCommit),
            }
        };

        let reel = Reel {
            id: ReelId::next(),
            source,
            created_at_unix_ms: unix_ms(),
        };
        self.store.append_record(&reel).map_err(CommitError::Store)?;
        log::info!("committed reel {:?}", reel.id);
        Ok(reel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reelkit_core::types::{VideoId, VideoMetadata};
    use std::sync::Mutex;

    struct FakeLookup {
        result: Mutex<Option<anyhow::Result<VideoMetadata>>>,
    }

    impl FakeLookup {
        fn returning(metadata: VideoMetadata) -> Self {
            Self {
                result: Mutex::new(Some(Ok(metadata))),
            }
        }

        fn failing() -> Self {
            Self {
                result: Mutex::new(Some(Err(anyhow::anyhow!("connection refused")))),
            }
        }
    }

    #[async_trait]
    impl MetadataLookup for FakeLookup {
        async fn fetch_metadata(&self, _video_id: &VideoId) -> anyhow::Result<VideoMetadata> {
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(anyhow::anyhow!("exhausted")))
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        reels: Mutex<Vec<Reel>>,
    }

    impl ReelStore for MemoryStore {
        fn append_record(&self, reel: &Reel) -> anyhow::Result<()> {
            self.reels.lock().unwrap().insert(0, reel.clone());
            Ok(())
        }
    }

    fn engine_with(lookup: FakeLookup) -> (ReelEngine, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let dyn_store: Arc<dyn ReelStore> = store.clone();
        (ReelEngine::new(Arc::new(lookup), dyn_store), store)
    }

    fn metadata(title: &str, duration_seconds: Option<u32>) -> VideoMetadata {
        VideoMetadata {
            title: title.into(),
            description: None,
            duration_seconds,
        }
    }

    #[tokio::test]
    async fn classifies_an_educational_link_with_preview() {
        let (engine, _) = engine_with(FakeLookup::returning(metadata(
            "Intro to Python Programming",
            Some(45),
        )));

        let query = engine
            .classify_link("https://www.youtube.com/watch?v=ABC123&t=5")
            .await;

        assert_eq!(query.video_id, Some(VideoId::new("ABC123")));
        assert!(query.is_educational());
        assert_eq!(
            query.preview.as_ref().map(|p| p.as_str()),
            Some("https://img.youtube.com/vi/ABC123/hqdefault.jpg")
        );
        assert!(query.error.is_none());
    }

    #[tokio::test]
    async fn negative_classification_has_no_preview_but_no_error() {
        let (engine, _) =
            engine_with(FakeLookup::returning(metadata("My Vacation", Some(30))));

        let query = engine
            .classify_link("https://youtu.be/shorts/XYZ789?feature=share")
            .await;

        assert!(!query.is_educational());
        assert!(query.classification.is_some());
        assert!(query.preview.is_none());
        assert!(query.error.is_none());
    }

    #[tokio::test]
    async fn invalid_url_is_recoverable() {
        let (engine, _) = engine_with(FakeLookup::failing());

        let query = engine
            .classify_link("https://example.com/not-a-video")
            .await;

        assert_eq!(query.error, Some(ClassifyError::InvalidUrl));
        assert!(query.video_id.is_none());
        assert!(query.metadata.is_none());
    }

    #[tokio::test]
    async fn fetch_failure_is_distinct_from_not_educational() {
        let (engine, _) = engine_with(FakeLookup::failing());

        let query = engine
            .classify_link("https://www.youtube.com/watch?v=ABC123")
            .await;

        assert_eq!(query.error, Some(ClassifyError::MetadataFetchFailed));
        assert!(query.classification.is_none());
        assert!(query.metadata.is_none());
        assert!(!query.is_educational());
    }

    #[tokio::test]
    async fn commit_with_nothing_valid_is_rejected() {
        let (engine, store) = engine_with(FakeLookup::failing());

        let err = engine.commit(None, None).err().expect("must be rejected");
        assert!(matches!(err, CommitError::NothingToCommit));
        assert!(store.reels.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn commit_rejects_a_non_educational_query() {
        let (engine, _) =
            engine_with(FakeLookup::returning(metadata("My Vacation", Some(30))));

        let query = engine
            .classify_link("https://www.youtube.com/watch?v=ABC123")
            .await;
        let result = engine.commit(None, Some(&query));
        assert!(matches!(result, Err(CommitError::NothingToCommit)));
    }

    #[tokio::test]
    async fn commit_persists_an_educational_external_link() {
        let (engine, store) = engine_with(FakeLookup::returning(metadata(
            "Learn Rust in 10 Minutes",
            Some(600),
        )));

        let query = engine
            .classify_link("https://www.youtube.com/watch?v=ABC123")
            .await;
        let reel = engine.commit(None, Some(&query)).unwrap();

        match &reel.source {
            ReelSource::ExternalLink { matched_topics, .. } => {
                assert!(matched_topics.contains(&"rust".to_string()));
            }
            other => panic!("expected an external link source, got {other:?}"),
        }
        assert_eq!(store.reels.lock().unwrap().len(), 1);
    }
}
