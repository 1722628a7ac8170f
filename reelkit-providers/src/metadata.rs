use crate::parse::parse_video_metadata;
use crate::request::{Body, HttpRequest};
use crate::runtime;
use anyhow::{Context, anyhow};
use reelkit_core::types::{VideoId, VideoMetadata};
use url::Url;

#[derive(Clone, PartialEq, Eq)]
pub struct MetadataServiceConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for MetadataServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataServiceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

pub fn build_metadata_request(
    cfg: &MetadataServiceConfig,
    video_id: &VideoId,
) -> anyhow::Result<HttpRequest> {
    let base = Url::parse(&cfg.base_url)
        .with_context(|| format!("invalid lookup base url: {}", cfg.base_url))?;
    let url = base
        .join(&format!("videos/{}", video_id.as_str()))
        .context("join lookup path")?;

    let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
    if let Some(key) = &cfg.api_key {
        headers.push(("X-Api-Key".to_string(), key.clone()));
    }

    Ok(HttpRequest {
        method: "GET".into(),
        url: url.to_string(),
        headers,
        body: Body::Empty,
    })
}

/// One-shot lookup: build the request, execute it, decode the body.
pub async fn fetch_video_metadata(
    cfg: &MetadataServiceConfig,
    video_id: &VideoId,
) -> anyhow::Result<VideoMetadata> {
    let req = build_metadata_request(cfg, video_id)?;
    let resp = runtime::execute(&req).await?;
    if !(200..=299).contains(&resp.status) {
        return Err(anyhow!("metadata lookup failed: status={}", resp.status));
    }
    parse_video_metadata(&resp.body)
}
