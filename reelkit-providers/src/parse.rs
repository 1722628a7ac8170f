use anyhow::Context;
use reelkit_core::types::VideoMetadata;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct VideoMetadataResponse {
    title: String,
    description: Option<String>,
    duration_seconds: Option<u32>,
}

pub fn parse_video_metadata(body: &[u8]) -> anyhow::Result<VideoMetadata> {
    let resp: VideoMetadataResponse =
        serde_json::from_slice(body).context("decode metadata JSON")?;
    Ok(VideoMetadata {
        title: resp.title,
        description: resp.description,
        duration_seconds: resp.duration_seconds,
    })
}
