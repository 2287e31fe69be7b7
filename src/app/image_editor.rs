use super::filter_set::{FilterRequest, FilterSet};
use super::image_loader::{DecodedPhoto, LoadPoll, PendingImageTask};
use crate::blob::ObjectUrl;
use crate::canvas::EditorCanvas;
use crate::image::{ExportFormat, FilterKind};
use egui::TextureHandle;
use image::RgbaImage;

pub struct Thumbnail {
    pub kind: FilterKind,
    pub pixels: RgbaImage,
    pub texture: Option<TextureHandle>,
}

/// Editing view for one selected image: the canvas, the filter thumbnails
/// and the load that feeds them.
pub struct ImageEditor {
    url: ObjectUrl,
    pub(super) canvas: EditorCanvas,
    pub(super) filters: FilterSet,
    pub(super) thumbnails: Vec<Thumbnail>,
    task: Option<PendingImageTask>,
    loaded: Option<DecodedPhoto>,
    /// Uploaded main image and the canvas revision it mirrors.
    pub(super) main_texture: Option<(u64, TextureHandle)>,
}

impl ImageEditor {
    pub fn new(url: ObjectUrl, task: PendingImageTask) -> Self {
        Self {
            url,
            canvas: EditorCanvas::default(),
            filters: FilterSet::default(),
            thumbnails: Vec::new(),
            task: Some(task),
            loaded: None,
            main_texture: None,
        }
    }

    pub const fn url(&self) -> &ObjectUrl {
        &self.url
    }

    pub const fn is_loading(&self) -> bool {
        self.task.is_some() || self.loaded.is_some()
    }

    /// Collect a finished decode, then attach it once the canvas is ready.
    ///
    /// Returns the error message when decoding failed.
    pub fn poll_loader(&mut self) -> Result<(), String> {
        if let Some(task) = self.task.as_ref() {
            match task.poll() {
                LoadPoll::Pending => {}
                LoadPoll::Ready(photo) => {
                    log::info!("Loaded {}", task.label());
                    self.loaded = Some(photo);
                    self.task = None;
                }
                LoadPoll::Failed(err) => {
                    let err = format!("Failed to load {}: {err}", task.label());
                    self.task = None;
                    return Err(err);
                }
            }
        }
        self.attach_loaded_image();
        Ok(())
    }

    fn attach_loaded_image(&mut self) {
        if !self.canvas.is_ready() {
            return;
        }
        let Some(photo) = self.loaded.take() else {
            return;
        };
        self.thumbnails = photo
            .thumbnails
            .into_iter()
            .map(|(kind, pixels)| Thumbnail {
                kind,
                pixels,
                texture: None,
            })
            .collect();
        self.canvas.add_main_image(photo.source);
    }

    pub fn resize(&mut self, size: [u32; 2]) {
        self.canvas.resize(size);
        self.attach_loaded_image();
    }

    pub fn activate(&mut self, kind: FilterKind) {
        if let Some(request) = self.filters.activate(kind) {
            self.apply(request);
        }
    }

    pub fn close_adjustment(&mut self, kind: FilterKind) {
        self.filters.close_adjustment(kind);
    }

    pub fn set_strength(&mut self, kind: FilterKind, strength: f32) {
        if let Some(request) = self.filters.set_strength(kind, strength) {
            self.apply(request);
        }
    }

    fn apply(&mut self, request: FilterRequest) {
        self.canvas.apply_filter(request.kind, request.strength);
    }

    pub fn export_image(
        &self,
        format: ExportFormat,
        quality: f32,
    ) -> anyhow::Result<Option<Vec<u8>>> {
        self.canvas.export_image(format, quality)
    }
}
