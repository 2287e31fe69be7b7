//! Turns effect descriptors and placements into pixels via the `image` crate.

use super::filters::Effect;
use super::placement::{FitPolicy, Placement};
use crate::util::{rounded_len, rounded_offset, rounded_u8, u32_to_f32};
use egui::ColorImage;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rayon::prelude::*;

/// Blur radius at full strength, as a share of the image's longer side.
const BLUR_SPREAD: f32 = 0.12;
/// Sigmas below this leave the image untouched.
const MIN_BLUR_SIGMA: f32 = 0.3;
/// Larger sigmas blur a downsampled copy and scale it back up.
const DIRECT_BLUR_MAX_SIGMA: f32 = 4.0;
/// Minimum pixel count before colour matrices run in parallel.
const PARALLEL_PIXEL_THRESHOLD: usize = 262_144; // 512x512

/// Apply effects in order to a copy of `base`.
pub fn apply_effects(base: &RgbaImage, effects: &[Effect]) -> RgbaImage {
    let mut out = base.clone();
    for effect in effects {
        match effect {
            Effect::Blur { amount } => out = blur(&out, *amount),
            Effect::ColorMatrix(matrix) => apply_color_matrix(&mut out, matrix),
        }
    }
    out
}

fn blur_sigma(width: u32, height: u32, amount: f32) -> f32 {
    let longer = u32_to_f32(width.max(height));
    amount.clamp(0.0, 1.0) * BLUR_SPREAD * longer / 2.0
}

fn blur(image: &RgbaImage, amount: f32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let sigma = blur_sigma(width, height, amount);
    if sigma < MIN_BLUR_SIGMA || width == 0 || height == 0 {
        return image.clone();
    }
    let factor = sigma / DIRECT_BLUR_MAX_SIGMA;
    if factor <= 1.0 {
        return imageops::blur(image, sigma);
    }
    let small_w = rounded_len(f64::from(u32_to_f32(width) / factor));
    let small_h = rounded_len(f64::from(u32_to_f32(height) / factor));
    let small = imageops::resize(image, small_w, small_h, FilterType::Triangle);
    let blurred = imageops::blur(&small, sigma / factor);
    imageops::resize(&blurred, width, height, FilterType::Triangle)
}

fn apply_color_matrix(image: &mut RgbaImage, m: &[f32; 20]) {
    let transform = |px: &mut [u8]| {
        let r = f32::from(px[0]);
        let g = f32::from(px[1]);
        let b = f32::from(px[2]);
        // Alpha is left alone; only colour rows are applied.
        px[0] = rounded_u8(m[4].mul_add(255.0, b.mul_add(m[2], r.mul_add(m[0], g * m[1]))));
        px[1] = rounded_u8(m[9].mul_add(255.0, b.mul_add(m[7], r.mul_add(m[5], g * m[6]))));
        px[2] = rounded_u8(m[14].mul_add(255.0, b.mul_add(m[12], r.mul_add(m[10], g * m[11]))));
    };
    let pixel_count = image.as_raw().len() / 4;
    let raw: &mut [u8] = image;
    if pixel_count >= PARALLEL_PIXEL_THRESHOLD {
        raw.par_chunks_exact_mut(4).for_each(transform);
    } else {
        raw.chunks_exact_mut(4).for_each(transform);
    }
}

/// Draw `image` into a `canvas`-sized buffer at `placement`.
pub fn compose(
    canvas: [u32; 2],
    image: &RgbaImage,
    placement: Placement,
    background: Rgba<u8>,
) -> RgbaImage {
    let mut out = RgbaImage::from_pixel(canvas[0], canvas[1], background);
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return out;
    }
    let [scaled_w, scaled_h] = placement.scaled_size([f64::from(width), f64::from(height)]);
    let (scaled_w, scaled_h) = (rounded_len(scaled_w), rounded_len(scaled_h));
    let left = rounded_offset(placement.left);
    let top = rounded_offset(placement.top);
    if (scaled_w, scaled_h) == (width, height) {
        imageops::overlay(&mut out, image, left, top);
    } else {
        let scaled = imageops::resize(image, scaled_w, scaled_h, FilterType::Triangle);
        imageops::overlay(&mut out, &scaled, left, top);
    }
    out
}

/// Cover-fit `source` into a thumbnail and run `effects` on it.
pub fn render_thumbnail(source: &RgbaImage, size: [u32; 2], effects: &[Effect]) -> RgbaImage {
    let (width, height) = source.dimensions();
    let placement = Placement::fit(
        FitPolicy::Cover,
        [f64::from(width), f64::from(height)],
        [f64::from(size[0]), f64::from(size[1])],
    );
    let framed = compose(size, source, placement, Rgba([0, 0, 0, 0]));
    apply_effects(&framed, effects)
}

pub fn to_color_image(image: &RgbaImage) -> ColorImage {
    let (width, height) = image.dimensions();
    ColorImage::from_rgba_unmultiplied([width as usize, height as usize], image.as_raw())
}
