//! Scale and offset of an image drawn into a fixed-size canvas.

/// How an image is fitted into its canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitPolicy {
    /// Whole image visible, letterboxed when aspect ratios differ.
    Contain,
    /// Canvas fully covered, image cropped when aspect ratios differ.
    Cover,
}

/// Uniform scale plus the top-left corner of the scaled image, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub left: f64,
    pub top: f64,
}

impl Placement {
    pub fn fit(policy: FitPolicy, image: [f64; 2], canvas: [f64; 2]) -> Self {
        match policy {
            FitPolicy::Contain => Self::contain(image, canvas),
            FitPolicy::Cover => Self::cover(image, canvas),
        }
    }

    pub fn contain(image: [f64; 2], canvas: [f64; 2]) -> Self {
        let [canvas_width, canvas_height] = canvas;
        let [image_width, image_height] = image;
        if !has_area(image) {
            return Self::unscaled(image, canvas);
        }
        let scale = f64::min(canvas_height / image_height, canvas_width / image_width);
        Self::centered(scale, image, canvas)
    }

    pub fn cover(image: [f64; 2], canvas: [f64; 2]) -> Self {
        let [canvas_width, canvas_height] = canvas;
        let [image_width, image_height] = image;
        if !has_area(image) {
            return Self::unscaled(image, canvas);
        }
        let scale = f64::max(canvas_height / image_height, canvas_width / image_width);
        Self::centered(scale, image, canvas)
    }

    /// Size of the image after scaling.
    pub fn scaled_size(&self, image: [f64; 2]) -> [f64; 2] {
        [image[0] * self.scale, image[1] * self.scale]
    }

    // Multiply then subtract, no fused ops, so offsets stay bit-exact.
    #[allow(clippy::suboptimal_flops)]
    fn centered(scale: f64, image: [f64; 2], canvas: [f64; 2]) -> Self {
        let left = (canvas[0] - image[0] * scale) / 2.0;
        let top = (canvas[1] - image[1] * scale) / 2.0;
        Self { scale, left, top }
    }

    fn unscaled(image: [f64; 2], canvas: [f64; 2]) -> Self {
        Self::centered(1.0, image, canvas)
    }
}

fn has_area(size: [f64; 2]) -> bool {
    size.iter().all(|v| v.is_finite() && *v > 0.0)
}
