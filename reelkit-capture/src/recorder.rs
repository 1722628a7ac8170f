//
// Recording controller.
//
// Drives the start/stop lifecycle against an Active device session. The
// controller only borrows the device (via its liveness token) and never
// touches tracks itself; stopping hardware belongs to the session manager.

use crate::blob::BlobRegistry;
use crate::device::{DeviceSession, DeviceState};
use reelkit_core::types::ArtifactRef;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Ordered encoding preference; the first format the encoder reports as
/// supported wins.
pub const FORMAT_PREFERENCE: &[&str] = &[
    "video/webm;codecs=vp9,opus",
    "video/webm;codecs=vp8,opus",
    "video/webm",
    "video/mp4",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordingError {
    #[error("invalid state for this operation: {0}")]
    InvalidState(&'static str),

    #[error("no supported recording format")]
    UnsupportedFormat,

    #[error("capture failed: {0}")]
    CaptureFailed(String),
}

/// Handle to an in-flight capture. Chunk and finalize events are delivered
/// back through `RecordingSession::on_chunk` / `on_finalized` by whoever
/// drives the encoder's event loop.
pub trait CaptureSession: Send {
    fn request_stop(&mut self);
}

pub trait CaptureEncoder: Send + Sync {
    fn supports_format(&self, mime_type: &str) -> bool;

    fn start_capture(
        &self,
        handle: &dyn crate::device::DeviceHandle,
        mime_type: &str,
    ) -> Result<Box<dyn CaptureSession>, String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
    Finalizing,
    Complete,
    Failed,
}

pub struct RecordingController {
    encoder: Arc<dyn CaptureEncoder>,
    blobs: BlobRegistry,
}

impl RecordingController {
    pub fn new(encoder: Arc<dyn CaptureEncoder>, blobs: BlobRegistry) -> Self {
        Self { encoder, blobs }
    }

    /// Starts capturing against an Active device session.
    ///
    /// Format selection and capture start both fail without producing any
    /// partial artifact.
    pub fn start(&self, device: &DeviceSession) -> Result<RecordingSession, RecordingError> {
        if device.state() != DeviceState::Active {
            return Err(RecordingError::InvalidState(
                "recording requires an active device session",
            ));
        }
        let handle = device
            .handle()
            .ok_or(RecordingError::InvalidState("device session has no handle"))?;

        let mime_type = FORMAT_PREFERENCE
            .iter()
            .find(|m| self.encoder.supports_format(m))
            .ok_or(RecordingError::UnsupportedFormat)?;

        let capture = self
            .encoder
            .start_capture(handle, mime_type)
            .map_err(RecordingError::CaptureFailed)?;

        log::info!("recording started ({mime_type})");
        Ok(RecordingSession {
            state: RecordingState::Recording,
            chunks: Vec::new(),
            mime_type: mime_type.to_string(),
            capture: Some(capture),
            device_liveness: device.liveness_token(),
            artifact: None,
            error: None,
            blobs: self.blobs.clone(),
        })
    }
}

pub struct RecordingSession {
    state: RecordingState,
    chunks: Vec<Vec<u8>>,
    mime_type: String,
    capture: Option<Box<dyn CaptureSession>>,
    device_liveness: Arc<AtomicBool>,
    artifact: Option<ArtifactRef>,
    error: Option<RecordingError>,
    blobs: BlobRegistry,
}

impl RecordingSession {
    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn error(&self) -> Option<&RecordingError> {
        self.error.as_ref()
    }

    pub fn artifact(&self) -> Option<&ArtifactRef> {
        self.artifact.as_ref()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    // A recording must never survive its device session's release: if the
    // token died while we were Recording or Finalizing, force Failed.
    fn check_device_liveness(&mut self) {
        let in_flight = matches!(
            self.state,
            RecordingState::Recording | RecordingState::Finalizing
        );
        if in_flight && !self.device_liveness.load(Ordering::SeqCst) {
            log::warn!("device session released mid-recording, failing recording");
            self.fail(RecordingError::CaptureFailed(
                "device session was released during recording".into(),
            ));
        }
    }

    fn fail(&mut self, error: RecordingError) {
        self.capture = None;
        self.chunks.clear();
        self.state = RecordingState::Failed;
        self.error = Some(error);
    }

    /// Chunk-arrival callback. Fragments are appended strictly in arrival
    /// order; empty fragments are dropped. Encoders flush a trailing
    /// fragment between the stop signal and the finalize event, so
    /// Finalizing still accepts chunks.
    pub fn on_chunk(&mut self, data: Vec<u8>) {
        self.check_device_liveness();
        let accepting = matches!(
            self.state,
            RecordingState::Recording | RecordingState::Finalizing
        );
        if !accepting || data.is_empty() {
            return;
        }
        self.chunks.push(data);
    }

    /// Signals the capture to finalize. The artifact is only materialized
    /// once the finalize callback arrives, even if no chunk ever did.
    pub fn stop(&mut self) -> Result<(), RecordingError> {
        self.check_device_liveness();
        if self.state != RecordingState::Recording {
            return Err(RecordingError::InvalidState(
                "stop is only valid while recording",
            ));
        }
        if let Some(capture) = self.capture.as_mut() {
            capture.request_stop();
        }
        self.state = RecordingState::Finalizing;
        Ok(())
    }

    /// Finalize callback: concatenates accumulated chunks, in arrival order,
    /// into one blob and registers it. Zero chunks still complete, with an
    /// empty artifact the caller must check.
    pub fn on_finalized(&mut self) {
        self.check_device_liveness();
        if self.state != RecordingState::Finalizing {
            return;
        }

        let total: usize = self.chunks.iter().map(Vec::len).sum();
        let mut bytes = Vec::with_capacity(total);
        for chunk in self.chunks.drain(..) {
            bytes.extend_from_slice(&chunk);
        }

        let artifact = self.blobs.create(bytes, &self.mime_type);
        log::info!(
            "recording finalized: {} bytes as {}",
            artifact.len_bytes,
            artifact.mime_type
        );
        self.artifact = Some(artifact);
        self.capture = None;
        self.state = RecordingState::Complete;
    }

    /// Revokes the materialized blob. Also runs on Drop so the artifact is
    /// released on every exit path.
    pub fn dispose(&mut self) {
        if let Some(artifact) = self.artifact.take() {
            self.blobs.revoke(&artifact);
        }
        self.capture = None;
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.dispose();
    }
}
