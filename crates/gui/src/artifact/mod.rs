//! Lifetime management for the generated mesh artifact.
//!
//! Each successful mesh generation yields raw bytes. The store turns them
//! into a handle with a process-local URL, and guarantees that the URL of the
//! previous handle is revoked exactly once when it is superseded or when the
//! store is torn down.

pub mod glb;

use std::collections::HashMap;
use std::sync::Arc;

/// Identity of a promoted artifact; strictly increasing per store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId(pub u64);

const URL_SCHEME: &str = "blob:nfinit/";

/// Process-local table of dereferenceable URLs for byte payloads
#[derive(Default)]
pub struct ObjectUrlRegistry {
    entries: HashMap<String, Arc<[u8]>>,
}

impl ObjectUrlRegistry {
    pub fn create(&mut self, bytes: Arc<[u8]>) -> String {
        let url = format!("{URL_SCHEME}{}", uuid::Uuid::new_v4());
        self.entries.insert(url.clone(), bytes);
        url
    }

    /// Returns false if the URL was already revoked or never existed.
    pub fn revoke(&mut self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        self.entries.get(url).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.entries.len()
    }
}

/// The current mesh artifact: bytes plus the URL they are reachable under
#[derive(Debug)]
pub struct ArtifactHandle {
    id: ArtifactId,
    url: String,
    bytes: Arc<[u8]>,
}

impl ArtifactHandle {
    pub fn id(&self) -> ArtifactId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Owns the single current artifact handle
pub struct ArtifactStore {
    registry: ObjectUrlRegistry,
    current: Option<ArtifactHandle>,
    next_id: u64,
    promoted: u64,
    released: u64,
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self {
            registry: ObjectUrlRegistry::default(),
            current: None,
            next_id: 1,
            promoted: 0,
            released: 0,
        }
    }

    /// Install `bytes` as the current artifact.
    ///
    /// The new URL is created before the previous one is revoked, so there is
    /// never a moment without a current artifact once one exists.
    pub fn promote(&mut self, bytes: Vec<u8>) -> &ArtifactHandle {
        let bytes: Arc<[u8]> = bytes.into();
        let url = self.registry.create(bytes.clone());
        let id = ArtifactId(self.next_id);
        self.next_id += 1;

        self.release_current();

        self.promoted += 1;
        tracing::info!(artifact = id.0, bytes = bytes.len(), "Promoted mesh artifact");
        self.current.insert(ArtifactHandle { id, url, bytes })
    }

    /// Revoke the current handle. No-op (returns false) when there is none.
    pub fn release_current(&mut self) -> bool {
        let Some(handle) = self.current.take() else {
            return false;
        };
        let revoked = self.registry.revoke(&handle.url);
        if revoked {
            self.released += 1;
            tracing::debug!(artifact = handle.id.0, "Released mesh artifact");
        }
        revoked
    }

    pub fn current(&self) -> Option<&ArtifactHandle> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<ArtifactId> {
        self.current.as_ref().map(|h| h.id)
    }

    /// Synchronous read of the current artifact's bytes (e.g. for export).
    /// The returned buffer is a transient copy of the reference, not a handle.
    pub fn read_current(&self) -> Option<Arc<[u8]>> {
        self.current
            .as_ref()
            .and_then(|h| self.registry.resolve(&h.url))
    }

    /// Dereference a URL; None once it has been revoked
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        self.registry.resolve(url)
    }

    pub fn live_count(&self) -> usize {
        self.registry.live_count()
    }

    pub fn promote_count(&self) -> u64 {
        self.promoted
    }

    pub fn release_count(&self) -> u64 {
        self.released
    }
}

impl Drop for ArtifactStore {
    fn drop(&mut self) {
        self.release_current();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let mut s = ArtifactStore::new();
        assert!(s.current().is_none());
        assert!(s.read_current().is_none());
        assert!(!s.release_current());
        assert_eq!(s.release_count(), 0);
    }

    #[test]
    fn test_promote_installs_handle() {
        let mut s = ArtifactStore::new();
        let url = s.promote(vec![1, 2, 3]).url().to_string();
        assert!(url.starts_with(URL_SCHEME));
        assert_eq!(s.resolve(&url).as_deref(), Some(&[1u8, 2, 3][..]));
        assert_eq!(s.live_count(), 1);
    }

    #[test]
    fn test_single_artifact_after_many_promotes() {
        let mut s = ArtifactStore::new();
        let mut urls = Vec::new();
        for i in 0..10u8 {
            urls.push(s.promote(vec![i]).url().to_string());
        }

        assert_eq!(s.live_count(), 1);
        assert_eq!(s.promote_count(), 10);
        assert_eq!(s.release_count(), 9);
        let (last, predecessors) = urls.split_last().unwrap();
        for url in predecessors {
            assert!(s.resolve(url).is_none());
        }
        assert_eq!(s.current().unwrap().url(), last);
        assert_eq!(s.read_current().as_deref(), Some(&[9u8][..]));
    }

    #[test]
    fn test_ids_increase() {
        let mut s = ArtifactStore::new();
        let a = s.promote(vec![0]).id();
        let b = s.promote(vec![0]).id();
        assert!(b > a);
        assert_eq!(s.current_id(), Some(b));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut s = ArtifactStore::new();
        let url = s.promote(vec![7]).url().to_string();
        assert!(s.release_current());
        assert!(!s.release_current());
        assert_eq!(s.release_count(), 1);
        assert!(s.resolve(&url).is_none());
        assert_eq!(s.live_count(), 0);
    }

    #[test]
    fn test_registry_double_revoke() {
        let mut r = ObjectUrlRegistry::default();
        let url = r.create(Arc::from(vec![1u8]));
        assert!(r.revoke(&url));
        assert!(!r.revoke(&url));
        assert!(!r.revoke("blob:nfinit/unknown"));
    }

    #[test]
    fn test_read_current_is_transient_copy() {
        let mut s = ArtifactStore::new();
        s.promote(vec![1, 2]);
        let bytes = s.read_current().unwrap();
        s.promote(vec![3]);
        // The transient copy stays readable but the old URL is gone
        assert_eq!(&bytes[..], &[1, 2]);
        assert_eq!(s.live_count(), 1);
    }
}
