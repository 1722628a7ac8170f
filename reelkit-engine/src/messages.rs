//
// Stable user-facing message categories.
//
// The presentation layer renders these verbatim; each error kind maps to
// exactly one category so guidance stays consistent without inspecting
// internal error detail. Details go to logs.

use crate::classifier::ClassifyError;
use crate::engine::CommitError;
use reelkit_capture::device::DeviceError;
use reelkit_capture::recorder::RecordingError;

pub fn user_facing_device_error(e: &DeviceError) -> String {
    match e {
        DeviceError::PermissionDenied(kind) => format!(
            "Your {kind} is blocked. Allow access in your browser or system settings and try again."
        ),
        DeviceError::DeviceNotFound => {
            "No camera or microphone detected. Plug one in and try again.".into()
        }
        DeviceError::AcquisitionFailed(_) => {
            "Could not start the camera. Close other apps using it and try again.".into()
        }
    }
}

pub fn user_facing_recording_error(e: &RecordingError) -> &'static str {
    match e {
        RecordingError::InvalidState(_) => "Recording is not available right now.",
        RecordingError::UnsupportedFormat => {
            "Recording is not supported on this device or browser."
        }
        RecordingError::CaptureFailed(_) => "Recording failed. Try again.",
    }
}

pub fn user_facing_classify_error(e: &ClassifyError) -> &'static str {
    match e {
        ClassifyError::InvalidUrl => "That does not look like a video link.",
        ClassifyError::MetadataFetchFailed => {
            "Unable to fetch video details. Check the link and try again."
        }
    }
}

pub fn user_facing_commit_error(e: &CommitError) -> &'static str {
    match e {
        CommitError::NothingToCommit => {
            "Record a video or add an educational link before saving."
        }
        CommitError::Store(_) => "Could not save your reel. Try again.",
    }
}
