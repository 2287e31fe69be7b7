//! The editing surface: one main image, its effects and its placement.

use crate::image::{
    Effect, ExportFormat, FilterKind, Placement, apply_effects, compose, encode_image,
};
use image::RgbaImage;

/// Name given to the image the user edits.
pub const MAIN_IMAGE_KEY: &str = "main-image";

/// An image on the canvas together with its current effects.
#[derive(Debug, Clone)]
pub struct CanvasImage {
    name: &'static str,
    source: RgbaImage,
    effects: Vec<Effect>,
    rendered: RgbaImage,
    placement: Placement,
    revision: u64,
}

impl CanvasImage {
    fn new(name: &'static str, source: RgbaImage, placement: Placement) -> Self {
        Self {
            name,
            rendered: source.clone(),
            source,
            effects: Vec::new(),
            placement,
            revision: 0,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Source pixels with the current effects applied.
    pub const fn rendered(&self) -> &RgbaImage {
        &self.rendered
    }

    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// Bumped whenever `rendered` changes.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn size(&self) -> [f64; 2] {
        let (width, height) = self.source.dimensions();
        [f64::from(width), f64::from(height)]
    }

    fn replace_effects(&mut self, effects: Vec<Effect>) {
        self.effects.clear();
        self.effects.extend(effects);
        self.rendered = apply_effects(&self.source, &self.effects);
        self.revision += 1;
    }
}

/// Fixed-size drawing surface holding at most one main image.
///
/// Until the first [`EditorCanvas::resize`] the canvas is not ready and every
/// operation that needs it does nothing.
#[derive(Debug, Default)]
pub struct EditorCanvas {
    size: Option<[u32; 2]>,
    main_image: Option<CanvasImage>,
}

impl EditorCanvas {
    pub const fn is_ready(&self) -> bool {
        self.size.is_some()
    }

    pub const fn main_image(&self) -> Option<&CanvasImage> {
        self.main_image.as_ref()
    }

    /// Set the canvas size and refit the main image inside it.
    ///
    /// Zero-sized requests are ignored. Returns whether the size changed.
    pub fn resize(&mut self, size: [u32; 2]) -> bool {
        if size[0] == 0 || size[1] == 0 || self.size == Some(size) {
            return false;
        }
        self.size = Some(size);
        let canvas = Self::extent(size);
        if let Some(image) = self.main_image.as_mut() {
            image.placement = Placement::contain(image.size(), canvas);
        }
        true
    }

    /// Add the main image, contain-fitted. Refuses when the canvas is not
    /// ready or a main image is already present.
    pub fn add_main_image(&mut self, source: RgbaImage) -> bool {
        let Some(size) = self.size else {
            return false;
        };
        if self.main_image.is_some() {
            log::debug!("Ignoring duplicate {MAIN_IMAGE_KEY}");
            return false;
        }
        let (width, height) = source.dimensions();
        let placement =
            Placement::contain([f64::from(width), f64::from(height)], Self::extent(size));
        let image = CanvasImage::new(MAIN_IMAGE_KEY, source, placement);
        log::debug!("Added {} ({width}x{height}) at scale {:.3}", image.name(), placement.scale);
        self.main_image = Some(image);
        true
    }

    /// Replace the main image's effects with those of `kind` at `strength`.
    pub fn apply_filter(&mut self, kind: FilterKind, strength: f32) -> bool {
        if !self.is_ready() {
            return false;
        }
        let Some(image) = self.main_image.as_mut() else {
            return false;
        };
        image.replace_effects(kind.effects(strength));
        log::debug!("Applied {} at {strength:.2}", kind.name());
        true
    }

    /// Encode the whole canvas, `None` when it is not ready yet.
    pub fn export_image(
        &self,
        format: ExportFormat,
        quality: f32,
    ) -> anyhow::Result<Option<Vec<u8>>> {
        let Some(size) = self.size else {
            return Ok(None);
        };
        let pixels = self.flatten(size, format);
        encode_image(&pixels, format, quality).map(Some)
    }

    fn flatten(&self, size: [u32; 2], format: ExportFormat) -> RgbaImage {
        let background = format.background();
        match self.main_image.as_ref() {
            Some(image) => compose(size, image.rendered(), image.placement(), background),
            None => RgbaImage::from_pixel(size[0], size[1], background),
        }
    }

    fn extent(size: [u32; 2]) -> [f64; 2] {
        [f64::from(size[0]), f64::from(size[1])]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba};

    fn photo() -> RgbaImage {
        RgbaImage::from_fn(80, 40, |x, _| Rgba([u8::try_from(x * 3).unwrap_or(255), 90, 30, 255]))
    }

    fn ready_canvas() -> EditorCanvas {
        let mut canvas = EditorCanvas::default();
        assert!(canvas.resize([40, 40]));
        assert!(canvas.add_main_image(photo()));
        canvas
    }

    #[test]
    fn operations_wait_for_readiness() {
        let mut canvas = EditorCanvas::default();
        assert!(!canvas.is_ready());
        assert!(!canvas.add_main_image(photo()));
        assert!(!canvas.apply_filter(FilterKind::Blur, 0.5));
        assert!(
            canvas
                .export_image(ExportFormat::Jpeg, 0.85)
                .expect("export")
                .is_none()
        );
        assert!(!canvas.resize([0, 10]));
        assert!(!canvas.is_ready());
    }

    #[test]
    fn main_image_is_added_once_and_contain_fitted() {
        let mut canvas = ready_canvas();
        assert!(!canvas.add_main_image(photo()));
        let image = canvas.main_image().expect("main image");
        assert_eq!(image.name(), MAIN_IMAGE_KEY);
        let p = image.placement();
        assert!((p.scale - 0.5).abs() < f64::EPSILON);
        assert!(p.left.abs() < f64::EPSILON);
        assert!((p.top - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn resize_refits_main_image() {
        let mut canvas = ready_canvas();
        assert!(canvas.resize([160, 40]));
        assert!(!canvas.resize([160, 40]));
        let p = canvas.main_image().expect("main image").placement();
        assert!((p.scale - 1.0).abs() < f64::EPSILON);
        assert!((p.left - 40.0).abs() < f64::EPSILON);
        assert!(p.top.abs() < f64::EPSILON);
    }

    #[test]
    fn new_filter_replaces_previous_effects() {
        let mut canvas = ready_canvas();
        assert!(canvas.apply_filter(FilterKind::Sepia, 0.2));
        assert!(canvas.apply_filter(FilterKind::Blur, 0.1));
        let image = canvas.main_image().expect("main image");
        assert_eq!(image.effects(), FilterKind::Blur.effects(0.1).as_slice());

        let before = image.revision();
        assert!(canvas.apply_filter(FilterKind::Blur, 0.1));
        let image = canvas.main_image().expect("main image");
        assert_eq!(image.effects(), FilterKind::Blur.effects(0.1).as_slice());
        assert_eq!(image.revision(), before + 1);

        assert!(canvas.apply_filter(FilterKind::None, 0.0));
        let image = canvas.main_image().expect("main image");
        assert!(image.effects().is_empty());
        assert_eq!(image.rendered(), &photo());
    }

    #[test]
    fn export_encodes_canvas_sized_jpeg() {
        let mut canvas = ready_canvas();
        // 80x40 photo at scale 0.8 leaves a 16px band above, one full JPEG block row.
        canvas.resize([64, 64]);
        let bytes = canvas
            .export_image(ExportFormat::Jpeg, 0.85)
            .expect("export")
            .expect("canvas ready");
        let decoded = image::load_from_memory(&bytes).expect("decode export");
        assert_eq!(decoded.dimensions(), (64, 64));
        let pixels = decoded.to_rgba8();
        let band = pixels.get_pixel(20, 4);
        assert!(band.0[..3].iter().all(|c| *c < 16), "letterbox should be black");
    }

    #[test]
    fn export_without_image_is_blank_canvas() {
        let mut canvas = EditorCanvas::default();
        canvas.resize([12, 8]);
        let bytes = canvas
            .export_image(ExportFormat::Png, 0.85)
            .expect("export")
            .expect("canvas ready");
        let decoded = image::load_from_memory(&bytes).expect("decode").to_rgba8();
        assert_eq!(decoded.dimensions(), (12, 8));
        assert!(decoded.pixels().all(|p| p[3] == 0));
    }
}
