//! In-memory blobs addressed by revocable object URLs.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

const URL_PREFIX: &str = "blob:filtergram/";

/// Handle to bytes held by a [`BlobStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Blob {
    pub bytes: Arc<[u8]>,
    pub mime: String,
    pub name: Option<String>,
}

impl Blob {
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime: impl Into<String>, name: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: mime.into(),
            name,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed file")
    }
}

#[derive(Debug, Default)]
pub struct BlobStore {
    next_id: u64,
    blobs: HashMap<ObjectUrl, Blob>,
}

impl BlobStore {
    pub fn create_object_url(&mut self, blob: Blob) -> ObjectUrl {
        self.next_id += 1;
        let url = ObjectUrl(format!("{URL_PREFIX}{}", self.next_id));
        log::debug!(
            "Created {url} for {} ({} bytes, {})",
            blob.display_name(),
            blob.bytes.len(),
            blob.mime
        );
        self.blobs.insert(url.clone(), blob);
        url
    }

    pub fn resolve(&self, url: &ObjectUrl) -> Option<&Blob> {
        self.blobs.get(url)
    }

    /// Free the blob behind `url`. Revoking twice is harmless.
    pub fn revoke(&mut self, url: &ObjectUrl) -> bool {
        let revoked = self.blobs.remove(url).is_some();
        if revoked {
            log::debug!("Revoked {url}");
        }
        revoked
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

/// Revocations waiting for their deadline.
#[derive(Debug, Default)]
pub struct RevokeQueue {
    pending: Vec<(ObjectUrl, Instant)>,
}

impl RevokeQueue {
    pub fn schedule(&mut self, url: ObjectUrl, at: Instant) {
        self.pending.push((url, at));
    }

    /// Revoke every URL whose deadline has passed; returns how many ran.
    pub fn run_due(&mut self, now: Instant, store: &mut BlobStore) -> usize {
        let before = self.pending.len();
        self.pending.retain(|(url, at)| {
            if *at <= now {
                store.revoke(url);
                false
            } else {
                true
            }
        });
        before - self.pending.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(_, at)| *at).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn jpeg_blob() -> Blob {
        Blob::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg", Some("a.jpg".into()))
    }

    #[test]
    fn urls_are_unique_and_resolve() {
        let mut store = BlobStore::default();
        let a = store.create_object_url(jpeg_blob());
        let b = store.create_object_url(jpeg_blob());
        assert_ne!(a, b);
        assert!(a.to_string().starts_with(URL_PREFIX));
        assert_eq!(store.resolve(&a).map(|blob| blob.bytes.len()), Some(3));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn revoke_frees_once() {
        let mut store = BlobStore::default();
        let url = store.create_object_url(jpeg_blob());
        assert!(store.revoke(&url));
        assert!(!store.revoke(&url));
        assert!(store.resolve(&url).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn queue_waits_for_deadline() {
        let mut store = BlobStore::default();
        let mut queue = RevokeQueue::default();
        let url = store.create_object_url(jpeg_blob());
        let start = Instant::now();
        let at = start + Duration::from_millis(150);
        queue.schedule(url.clone(), at);
        assert_eq!(queue.next_deadline(), Some(at));

        assert_eq!(queue.run_due(start, &mut store), 0);
        assert!(store.resolve(&url).is_some());

        assert_eq!(queue.run_due(at, &mut store), 1);
        assert!(store.resolve(&url).is_none());
        assert_eq!(queue.next_deadline(), None);
    }
}
