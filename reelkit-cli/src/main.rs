use std::sync::Arc;

use reelkit_capture::blob::BlobRegistry;
use reelkit_capture::device::{
    CapabilityProvider, DeviceError, DeviceHandle, DeviceSessionManager, DeviceState, MediaKind,
    PermissionState, StreamConstraints,
};
use reelkit_capture::recorder::{CaptureEncoder, CaptureSession, RecordingController};
use reelkit_core::types::{VideoId, VideoMetadata};
use reelkit_engine::engine::ReelEngine;
use reelkit_engine::messages::{user_facing_classify_error, user_facing_device_error};
use reelkit_engine::traits::MetadataLookup;
use reelkit_providers::metadata::{MetadataServiceConfig, fetch_video_metadata};
use reelkit_runtime::JsonReelStore;

// Demo stand-ins for the browser device APIs so the pipeline can be driven
// end to end from a terminal.
struct DemoProvider;

struct DemoTracks {
    live: bool,
}

impl DeviceHandle for DemoTracks {
    fn live_tracks(&self) -> usize {
        if self.live { 2 } else { 0 }
    }

    fn stop_tracks(&mut self) {
        self.live = false;
    }
}

#[async_trait::async_trait]
impl CapabilityProvider for DemoProvider {
    async fn query_permission(&self, _kind: MediaKind) -> PermissionState {
        PermissionState::Granted
    }

    async fn acquire(
        &self,
        _constraints: &StreamConstraints,
    ) -> Result<Box<dyn DeviceHandle>, DeviceError> {
        Ok(Box::new(DemoTracks { live: true }))
    }
}

struct DemoEncoder;

struct DemoCapture;

impl CaptureSession for DemoCapture {
    fn request_stop(&mut self) {}
}

impl CaptureEncoder for DemoEncoder {
    fn supports_format(&self, mime_type: &str) -> bool {
        mime_type.starts_with("video/webm")
    }

    fn start_capture(
        &self,
        _handle: &dyn DeviceHandle,
        _mime_type: &str,
    ) -> Result<Box<dyn CaptureSession>, String> {
        Ok(Box::new(DemoCapture))
    }
}

struct HttpLookup {
    cfg: MetadataServiceConfig,
}

#[async_trait::async_trait]
impl MetadataLookup for HttpLookup {
    async fn fetch_metadata(&self, video_id: &VideoId) -> anyhow::Result<VideoMetadata> {
        fetch_video_metadata(&self.cfg, video_id).await
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args().nth(1);

    let store = JsonReelStore::at_path(std::env::temp_dir().join("reelkit-reels.json"));
    let lookup = HttpLookup {
        cfg: MetadataServiceConfig {
            base_url: std::env::var("REELKIT_LOOKUP_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8080/".into()),
            api_key: std::env::var("REELKIT_LOOKUP_API_KEY").ok(),
        },
    };
    let engine = ReelEngine::new(Arc::new(lookup), Arc::new(store.clone()));

    if let Some(url) = url {
        // External-link path: classify, then commit if educational.
        let query = engine.classify_link(&url).await;
        if let Some(e) = &query.error {
            println!("{}", user_facing_classify_error(e));
            return Ok(());
        }
        println!(
            "educational={} topics={:?}",
            query.is_educational(),
            query
                .classification
                .as_ref()
                .map(|c| c.matched_topics.clone())
                .unwrap_or_default()
        );
        match engine.commit(None, Some(&query)) {
            Ok(reel) => println!("saved reel {:?} to {}", reel.id, store.path().display()),
            Err(e) => println!("{e}"),
        }
        return Ok(());
    }

    // Local recording path, driven with synthetic chunks.
    let mut manager = DeviceSessionManager::new(Arc::new(DemoProvider));
    let session = manager.request_session().await;
    if session.state() != DeviceState::Active {
        if let Some(e) = session.error() {
            println!("{}", user_facing_device_error(e));
        }
        return Ok(());
    }

    let controller = RecordingController::new(Arc::new(DemoEncoder), BlobRegistry::new());
    let mut recording = controller.start(manager.session()).map_err(|e| {
        anyhow::anyhow!(reelkit_engine::messages::user_facing_recording_error(&e).to_string())
    })?;

    recording.on_chunk(vec![0xde, 0xad]);
    recording.on_chunk(vec![0xbe, 0xef]);
    recording.stop().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    recording.on_finalized();

    match engine.commit(Some(&recording), None) {
        Ok(reel) => println!("saved reel {:?} to {}", reel.id, store.path().display()),
        Err(e) => println!("{e}"),
    }

    manager.release_session();
    Ok(())
}
