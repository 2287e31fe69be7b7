use crate::blob::Blob;
use crate::config::AppConfig;
use crate::image::{FilterKind, decode_jpeg_bytes, render_thumbnail};
use image::RgbaImage;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// A decoded photo plus one cover-fitted preview per filter.
pub struct DecodedPhoto {
    pub source: RgbaImage,
    pub thumbnails: Vec<(FilterKind, RgbaImage)>,
}

enum ImageLoadResult {
    Success(DecodedPhoto),
    Error(String),
}

pub enum LoadPoll {
    Pending,
    Ready(DecodedPhoto),
    Failed(String),
}

/// Decode running on a worker thread. Dropping it discards the result.
pub struct PendingImageTask {
    rx: Receiver<ImageLoadResult>,
    label: String,
}

impl PendingImageTask {
    pub fn spawn(cfg: &AppConfig, blob: &Blob) -> Self {
        let label = blob.display_name().to_string();
        let cfg = cfg.clone();
        let bytes = Arc::clone(&blob.bytes);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let msg = match decode_photo(&cfg, &bytes) {
                Ok(photo) => ImageLoadResult::Success(photo),
                Err(err) => ImageLoadResult::Error(format!("{err:#}")),
            };
            let _ = tx.send(msg);
        });
        log::info!("Loading {label}…");
        Self { rx, label }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn poll(&self) -> LoadPoll {
        match self.rx.try_recv() {
            Ok(ImageLoadResult::Success(photo)) => LoadPoll::Ready(photo),
            Ok(ImageLoadResult::Error(err)) => LoadPoll::Failed(err),
            Err(TryRecvError::Empty) => LoadPoll::Pending,
            Err(TryRecvError::Disconnected) => LoadPoll::Failed("worker disconnected".to_string()),
        }
    }
}

pub fn decode_photo(cfg: &AppConfig, bytes: &[u8]) -> anyhow::Result<DecodedPhoto> {
    let source = decode_jpeg_bytes(cfg, bytes)?;
    let size = cfg.thumbnail.size();
    let thumbnails = FilterKind::ALL
        .iter()
        .map(|&kind| {
            let effects = kind.effects(kind.default_strength());
            (kind, render_thumbnail(&source, size, &effects))
        })
        .collect();
    Ok(DecodedPhoto { source, thumbnails })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ExportFormat, encode_image};
    use image::Rgba;
    use std::time::{Duration, Instant};

    fn jpeg_blob(width: u32, height: u32) -> Blob {
        let img = RgbaImage::from_pixel(width, height, Rgba([180, 140, 90, 255]));
        let bytes = encode_image(&img, ExportFormat::Jpeg, 0.85).expect("encode");
        Blob::new(bytes, "image/jpeg", Some("photo.jpg".into()))
    }

    fn wait_for(task: &PendingImageTask) -> LoadPoll {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            match task.poll() {
                LoadPoll::Pending if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(5));
                }
                other => return other,
            }
        }
    }

    #[test]
    fn builds_one_thumbnail_per_filter() {
        let blob = jpeg_blob(120, 60);
        let photo = decode_photo(&AppConfig::default(), &blob.bytes).expect("decode");
        assert_eq!(photo.source.dimensions(), (120, 60));
        let kinds: Vec<_> = photo.thumbnails.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, FilterKind::ALL.to_vec());
        for (_, thumb) in &photo.thumbnails {
            assert_eq!(thumb.dimensions(), (96, 96));
        }
    }

    #[test]
    fn worker_delivers_result() {
        let task = PendingImageTask::spawn(&AppConfig::default(), &jpeg_blob(32, 32));
        assert_eq!(task.label(), "photo.jpg");
        assert!(matches!(wait_for(&task), LoadPoll::Ready(_)));
    }

    #[test]
    fn worker_reports_decode_failure() {
        let blob = Blob::new(b"nope".to_vec(), "image/jpeg", None);
        let task = PendingImageTask::spawn(&AppConfig::default(), &blob);
        assert!(matches!(wait_for(&task), LoadPoll::Failed(_)));
    }
}
