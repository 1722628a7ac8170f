use async_trait::async_trait;
use reelkit_core::types::{Reel, VideoId, VideoMetadata};

/// Remote metadata lookup, keyed by video id. A single request/response
/// collaborator; transport errors surface here and nowhere deeper.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn fetch_metadata(&self, video_id: &VideoId) -> anyhow::Result<VideoMetadata>;
}

/// Local persistence for finished reels. New records go to the front of an
/// ordered collection; nothing is read back within the pipeline.
pub trait ReelStore: Send + Sync {
    fn append_record(&self, reel: &Reel) -> anyhow::Result<()>;
}
