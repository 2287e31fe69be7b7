use crate::config::AppConfig;
use anyhow::Context as _;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{
    DynamicImage, GenericImageView, ImageDecoder, ImageFormat, ImageReader, Limits, RgbaImage,
};
use std::io::Cursor;
use std::path::Path;

/// The only MIME type the file chooser accepts.
pub const JPEG_MIME: &str = "image/jpeg";

pub fn is_jpeg_mime(mime: &str) -> bool {
    mime.trim().eq_ignore_ascii_case(JPEG_MIME)
}

/// MIME type of a picked or dropped file.
///
/// Prefers what the platform reported and falls back to the extension of the
/// path, then of the display name.
pub fn mime_type_of(reported: &str, path: Option<&Path>, name: &str) -> Option<String> {
    let reported = reported.trim();
    if !reported.is_empty() {
        return Some(reported.to_ascii_lowercase());
    }
    path.and_then(|p| ImageFormat::from_path(p).ok())
        .or_else(|| ImageFormat::from_path(Path::new(name)).ok())
        .map(|format| format.to_mime_type().to_string())
}

/// Decode JPEG bytes within the configured limits, turn them upright per the
/// EXIF orientation and shrink the result to the working size filters run on.
pub fn decode_jpeg_bytes(cfg: &AppConfig, bytes: &[u8]) -> anyhow::Result<RgbaImage> {
    let il = cfg.effective_image_limits();
    let mut reader = ImageReader::with_format(Cursor::new(bytes), ImageFormat::Jpeg);
    let mut limits = Limits::default();
    limits.max_image_width = Some(il.image_dim);
    limits.max_image_height = Some(il.image_dim);
    limits.max_alloc = Some(il.alloc_bytes);
    reader.limits(limits);
    let mut decoder = reader.into_decoder().context("Failed to read JPEG header")?;
    let orientation = decoder.orientation().unwrap_or_else(|err| {
        log::debug!("Ignoring unreadable EXIF orientation: {err}");
        Orientation::NoTransforms
    });
    let mut img = DynamicImage::from_decoder(decoder).context("Failed to decode JPEG data")?;
    img.apply_orientation(orientation);

    let (w, h) = img.dimensions();
    let total_pixels = u64::from(w) * u64::from(h);
    if total_pixels > il.total_pixels {
        anyhow::bail!(
            "Image too large: {}x{} (~{} MP) exceeds limit (~{} MP)",
            w,
            h,
            total_pixels / 1_000_000,
            il.total_pixels / 1_000_000
        );
    }

    let img = if w.max(h) > il.working_dim {
        log::debug!(
            "Downscaling {w}x{h} to fit {} for filtering",
            il.working_dim
        );
        img.resize(il.working_dim, il.working_dim, FilterType::Triangle)
    } else {
        img
    };
    Ok(img.to_rgba8())
}
