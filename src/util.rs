pub const fn u32_to_f32(value: u32) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    {
        value as f32
    }
}

pub const fn f64_to_f32(value: f64) -> f32 {
    #[allow(clippy::cast_possible_truncation)]
    {
        value as f32
    }
}

pub fn rounded_u8(value: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        value.round().clamp(0.0, f32::from(u8::MAX)) as u8
    }
}

/// Round a non-negative length to whole pixels, never below one.
pub fn rounded_len(value: f64) -> u32 {
    if !value.is_finite() {
        return 1;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        value.round().clamp(1.0, f64::from(u32::MAX)) as u32
    }
}

/// Round a signed offset to whole pixels.
pub fn rounded_offset(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    {
        value.round().clamp(i64::MIN as f64, i64::MAX as f64) as i64
    }
}

/// Convert a logical size in points to whole canvas pixels.
pub fn points_to_pixels(value: f32) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        value.floor().min(u32_to_f32(u32::MAX)) as u32
    }
}
