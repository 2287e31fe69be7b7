use crate::util::rounded_u8;
use anyhow::Context as _;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use serde::Deserialize;
use std::io::Cursor;

/// Encoding used when the canvas is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Jpeg,
    Png,
}

impl ExportFormat {
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    /// Colour of canvas areas the image does not cover. JPEG has no alpha,
    /// so uncovered areas end up black there.
    pub const fn background(self) -> Rgba<u8> {
        match self {
            Self::Jpeg => Rgba([0, 0, 0, 255]),
            Self::Png => Rgba([0, 0, 0, 0]),
        }
    }
}

/// Map a `0..=1` quality to the encoder's `1..=100` scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    let quality = if quality.is_nan() { 0.85 } else { quality };
    rounded_u8(quality.clamp(0.01, 1.0) * 100.0).max(1)
}

/// Encode canvas pixels; `quality` only affects JPEG.
pub fn encode_image(image: &RgbaImage, format: ExportFormat, quality: f32) -> anyhow::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut bytes, jpeg_quality(quality));
            encoder
                .encode_image(&rgb)
                .context("Failed to encode JPEG")?;
        }
        ExportFormat::Png => {
            image
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .context("Failed to encode PNG")?;
        }
    }
    Ok(bytes)
}
