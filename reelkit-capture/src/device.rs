//
// Device session manager.
//
// Owns the exclusive camera+microphone handle. The browser-style two-step
// (permission query, then acquisition) sits behind `CapabilityProvider` so
// the state machine runs identically against a mocked provider in tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Camera,
    Microphone,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Camera => write!(f, "camera"),
            MediaKind::Microphone => write!(f, "microphone"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConstraints {
    pub width: u32,
    pub height: u32,
    pub audio: bool,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            audio: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("{0} access is denied")]
    PermissionDenied(MediaKind),

    #[error("no camera or microphone was found")]
    DeviceNotFound,

    #[error("device acquisition failed: {0}")]
    AcquisitionFailed(String),
}

/// Live binding to camera+microphone hardware, produced by the provider.
/// Stopping tracks is the exclusive privilege of the session manager.
pub trait DeviceHandle: Send {
    fn live_tracks(&self) -> usize;
    fn stop_tracks(&mut self);
}

#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    async fn query_permission(&self, kind: MediaKind) -> PermissionState;

    async fn acquire(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn DeviceHandle>, DeviceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Idle,
    Requesting,
    Active,
    Denied,
    Failed,
    Stopped,
}

pub struct DeviceSession {
    state: DeviceState,
    handle: Option<Box<dyn DeviceHandle>>,
    error: Option<DeviceError>,

    // Flipped to false on release so borrowers (recordings) observe it.
    liveness: Arc<AtomicBool>,
}

impl DeviceSession {
    fn new(state: DeviceState) -> Self {
        Self {
            state,
            handle: None,
            error: None,
            liveness: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn error(&self) -> Option<&DeviceError> {
        self.error.as_ref()
    }

    pub fn handle(&self) -> Option<&dyn DeviceHandle> {
        self.handle.as_deref()
    }

    pub fn live_tracks(&self) -> usize {
        self.handle.as_ref().map_or(0, |h| h.live_tracks())
    }

    pub(crate) fn liveness_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.liveness)
    }
}

pub struct DeviceSessionManager {
    provider: Arc<dyn CapabilityProvider>,
    constraints: StreamConstraints,
    session: DeviceSession,
}

impl DeviceSessionManager {
    pub fn new(provider: Arc<dyn CapabilityProvider>) -> Self {
        Self {
            provider,
            constraints: StreamConstraints::default(),
            session: DeviceSession::new(DeviceState::Idle),
        }
    }

    pub fn with_constraints(mut self, constraints: StreamConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn session(&self) -> &DeviceSession {
        &self.session
    }

    /// Acquires a fresh camera+microphone session.
    ///
    /// Any previously Active handle is released first so at most one
    /// hardware acquisition is ever live. Failures are terminal for the
    /// attempt; the caller may invoke this again explicitly.
    pub async fn request_session(&mut self) -> &DeviceSession {
        self.release_session();
        self.session = DeviceSession::new(DeviceState::Requesting);

        for kind in [MediaKind::Camera, MediaKind::Microphone] {
            if self.provider.query_permission(kind).await == PermissionState::Denied {
                log::warn!("{kind} permission denied, not touching hardware");
                self.session.state = DeviceState::Denied;
                self.session.error = Some(DeviceError::PermissionDenied(kind));
                return &self.session;
            }
        }

        match self.provider.acquire(&self.constraints).await {
            Ok(handle) if handle.live_tracks() == 0 => {
                // An Active session must never be observed with zero tracks.
                self.session.state = DeviceState::Failed;
                self.session.error = Some(DeviceError::AcquisitionFailed(
                    "acquired stream has no live tracks".into(),
                ));
            }
            Ok(handle) => {
                log::info!("device session active ({} tracks)", handle.live_tracks());
                self.session.state = DeviceState::Active;
                self.session.handle = Some(handle);
                self.session.liveness.store(true, Ordering::SeqCst);
            }
            Err(e) => {
                log::warn!("device acquisition failed: {e}");
                self.session.state = DeviceState::Failed;
                self.session.error = Some(e);
            }
        }

        &self.session
    }

    /// Stops every live track. Idempotent: releasing an already-Stopped or
    /// never-Active session changes nothing.
    pub fn release_session(&mut self) {
        self.session.liveness.store(false, Ordering::SeqCst);
        if let Some(mut handle) = self.session.handle.take() {
            handle.stop_tracks();
        }
        if self.session.state == DeviceState::Active {
            log::info!("device session released");
            self.session.state = DeviceState::Stopped;
        }
    }
}

impl Drop for DeviceSessionManager {
    fn drop(&mut self) {
        self.release_session();
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::FakeProvider;
    use super::*;

    #[tokio::test]
    async fn grants_lead_to_an_active_session_with_live_tracks() {
        let mut manager = DeviceSessionManager::new(Arc::new(FakeProvider::granting(2)));
        let session = manager.request_session().await;

        assert_eq!(session.state(), DeviceState::Active);
        assert_eq!(session.live_tracks(), 2);
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn denied_permission_never_touches_hardware() {
        let provider = Arc::new(FakeProvider {
            microphone: PermissionState::Denied,
            ..FakeProvider::granting(2)
        });
        let mut manager = DeviceSessionManager::new(provider.clone());
        let session = manager.request_session().await;

        assert_eq!(session.state(), DeviceState::Denied);
        assert_eq!(
            session.error(),
            Some(&DeviceError::PermissionDenied(MediaKind::Microphone))
        );
        assert_eq!(*provider.acquisitions.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn acquisition_failure_is_classified_and_terminal() {
        let mut manager = DeviceSessionManager::new(Arc::new(FakeProvider::failing(
            DeviceError::DeviceNotFound,
        )));
        let session = manager.request_session().await;

        assert_eq!(session.state(), DeviceState::Failed);
        assert_eq!(session.error(), Some(&DeviceError::DeviceNotFound));
        assert_eq!(session.live_tracks(), 0);
    }

    #[tokio::test]
    async fn live_tracks_are_zero_exactly_when_not_active() {
        let mut manager = DeviceSessionManager::new(Arc::new(FakeProvider::granting(2)));

        assert_eq!(manager.session().live_tracks(), 0);

        manager.request_session().await;
        assert_eq!(manager.session().state(), DeviceState::Active);
        assert!(manager.session().live_tracks() > 0);

        manager.release_session();
        assert_eq!(manager.session().state(), DeviceState::Stopped);
        assert_eq!(manager.session().live_tracks(), 0);
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let mut manager = DeviceSessionManager::new(Arc::new(FakeProvider::granting(2)));
        manager.request_session().await;

        manager.release_session();
        let state_after_first = manager.session().state();
        manager.release_session();

        assert_eq!(manager.session().state(), state_after_first);
        assert_eq!(manager.session().live_tracks(), 0);
    }

    #[tokio::test]
    async fn release_on_a_never_active_session_is_a_no_op() {
        let mut manager = DeviceSessionManager::new(Arc::new(FakeProvider::granting(2)));
        manager.release_session();
        assert_eq!(manager.session().state(), DeviceState::Idle);
    }

    #[tokio::test]
    async fn re_requesting_releases_the_previous_handle_first() {
        let provider = Arc::new(FakeProvider::granting(2));
        let mut manager = DeviceSessionManager::new(provider.clone());

        manager.request_session().await;
        let first_liveness = manager.session().liveness_token();

        manager.request_session().await;
        assert_eq!(manager.session().state(), DeviceState::Active);
        assert!(!first_liveness.load(Ordering::SeqCst));
        assert_eq!(*provider.acquisitions.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn zero_track_acquisition_fails_rather_than_going_active() {
        let mut manager = DeviceSessionManager::new(Arc::new(FakeProvider::granting(0)));
        let session = manager.request_session().await;
        assert_eq!(session.state(), DeviceState::Failed);
    }
}
