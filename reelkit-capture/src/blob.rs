use reelkit_core::types::{ArtifactRef, BlobId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory registry of finalized media blobs.
///
/// References handed out are not counted; whoever last holds an
/// `ArtifactRef` is responsible for revoking it. Repeated record/discard
/// cycles would otherwise pin every finalized blob in memory.
#[derive(Clone, Default)]
pub struct BlobRegistry {
    inner: Arc<Mutex<HashMap<BlobId, Vec<u8>>>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, bytes: Vec<u8>, mime_type: &str) -> ArtifactRef {
        let blob = BlobId::new();
        let len_bytes = bytes.len();
        self.inner.lock().unwrap().insert(blob, bytes);
        ArtifactRef {
            blob,
            len_bytes,
            mime_type: mime_type.to_string(),
        }
    }

    pub fn resolve(&self, artifact: &ArtifactRef) -> Option<Vec<u8>> {
        self.inner.lock().unwrap().get(&artifact.blob).cloned()
    }

    /// Returns false if the blob was already revoked.
    pub fn revoke(&self, artifact: &ArtifactRef) -> bool {
        self.inner.lock().unwrap().remove(&artifact.blob).is_some()
    }

    pub fn blob_count(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_resolve_revoke_cycle() {
        let registry = BlobRegistry::new();
        let artifact = registry.create(vec![1, 2, 3], "video/webm");

        assert_eq!(artifact.len_bytes, 3);
        assert_eq!(registry.resolve(&artifact), Some(vec![1, 2, 3]));

        assert!(registry.revoke(&artifact));
        assert!(!registry.revoke(&artifact));
        assert_eq!(registry.resolve(&artifact), None);
        assert_eq!(registry.blob_count(), 0);
    }
}
