pub mod blob;
pub mod device;
pub mod recorder;

pub use blob::BlobRegistry;
pub use device::{
    CapabilityProvider, DeviceError, DeviceHandle, DeviceSession, DeviceSessionManager,
    DeviceState, MediaKind, PermissionState, StreamConstraints,
};
pub use recorder::{
    CaptureEncoder, CaptureSession, RecordingController, RecordingError, RecordingSession,
    RecordingState, FORMAT_PREFERENCE,
};
