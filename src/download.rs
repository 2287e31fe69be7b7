use crate::blob::{BlobStore, ObjectUrl, RevokeQueue};
use anyhow::Context as _;
use std::path::Path;
use std::time::{Duration, Instant};

/// Save the bytes behind `url` to `path`.
///
/// Revocation of `url` is scheduled `delay` after `now` whether or not the
/// write succeeded, so the blob never outlives the save attempt by much.
pub fn download_url(
    store: &BlobStore,
    revocations: &mut RevokeQueue,
    url: &ObjectUrl,
    path: &Path,
    delay: Duration,
    now: Instant,
) -> anyhow::Result<()> {
    let result = store
        .resolve(url)
        .with_context(|| format!("{url} was revoked before it could be saved"))
        .and_then(|blob| {
            std::fs::write(path, &blob.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))
        });
    revocations.schedule(url.clone(), now + delay);
    if result.is_ok() {
        log::info!("Saved {url} to {}", path.display());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::Blob;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let dir = std::env::temp_dir().join(format!("filtergram_{label}_{nanos}"));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn writes_bytes_then_revokes_after_delay() {
        let dir = unique_temp_dir("download");
        let target = dir.join("image.jpeg");
        let mut store = BlobStore::default();
        let mut queue = RevokeQueue::default();
        let url = store.create_object_url(Blob::new(vec![1, 2, 3], "image/jpeg", None));
        let now = Instant::now();
        let delay = Duration::from_millis(150);

        download_url(&store, &mut queue, &url, &target, delay, now).expect("download");
        assert_eq!(fs::read(&target).expect("read back"), vec![1, 2, 3]);
        assert!(store.resolve(&url).is_some());

        queue.run_due(now + Duration::from_millis(149), &mut store);
        assert!(store.resolve(&url).is_some());
        queue.run_due(now + delay, &mut store);
        assert!(store.resolve(&url).is_none());
    }

    #[test]
    fn failed_write_still_schedules_revocation() {
        let dir = unique_temp_dir("download_fail");
        let target = dir.join("missing").join("image.jpeg");
        let mut store = BlobStore::default();
        let mut queue = RevokeQueue::default();
        let url = store.create_object_url(Blob::new(vec![9], "image/jpeg", None));
        let now = Instant::now();

        let err = download_url(&store, &mut queue, &url, &target, Duration::ZERO, now);
        assert!(err.is_err());
        assert_eq!(queue.run_due(now, &mut store), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn revoked_url_cannot_be_saved() {
        let dir = unique_temp_dir("download_revoked");
        let mut store = BlobStore::default();
        let mut queue = RevokeQueue::default();
        let url = store.create_object_url(Blob::new(vec![9], "image/jpeg", None));
        store.revoke(&url);
        let result = download_url(
            &store,
            &mut queue,
            &url,
            &dir.join("image.jpeg"),
            Duration::ZERO,
            Instant::now(),
        );
        assert!(result.is_err());
        assert!(!dir.join("image.jpeg").exists());
    }
}
