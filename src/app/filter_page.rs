use super::image_editor::ImageEditor;
use super::image_loader::PendingImageTask;
use crate::blob::{Blob, BlobStore, ObjectUrl};
use crate::config::AppConfig;

/// Outcome of the page's close button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageClose {
    /// An image was selected; it was cleared and the page stays open.
    ClearedImage,
    /// Nothing was selected; the owner should close the page.
    ClosePage,
}

/// File chooser until a JPEG is picked, image editor afterwards.
#[derive(Default)]
pub struct FilterPage {
    pub(super) editor: Option<ImageEditor>,
    pub(super) drag_over: bool,
}

impl FilterPage {
    pub const fn has_image(&self) -> bool {
        self.editor.is_some()
    }

    pub fn selected_url(&self) -> Option<&ObjectUrl> {
        self.editor.as_ref().map(ImageEditor::url)
    }

    /// Take a JPEG blob from the chooser. Ignored while an image is selected.
    pub fn select(&mut self, blob: Blob, blobs: &mut BlobStore, cfg: &AppConfig) -> bool {
        if self.editor.is_some() {
            log::debug!("Ignoring {}: an image is already selected", blob.display_name());
            return false;
        }
        let task = PendingImageTask::spawn(cfg, &blob);
        let url = blobs.create_object_url(blob);
        self.editor = Some(ImageEditor::new(url, task));
        true
    }

    /// Advance the pending load. A file that fails to decode is dropped and
    /// the chooser comes back.
    pub fn poll(&mut self, blobs: &mut BlobStore) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        if let Err(err) = editor.poll_loader() {
            log::warn!("{err}");
            self.clear_image(blobs);
        }
    }

    pub fn close(&mut self, blobs: &mut BlobStore) -> PageClose {
        if self.editor.is_some() {
            self.clear_image(blobs);
            PageClose::ClearedImage
        } else {
            PageClose::ClosePage
        }
    }

    /// Free the selected image's bytes once it has been saved. The decoded
    /// copy on the canvas stays editable.
    pub fn release_selected(&mut self, blobs: &mut BlobStore) {
        if let Some(url) = self.selected_url() {
            blobs.revoke(url);
        }
    }

    fn clear_image(&mut self, blobs: &mut BlobStore) {
        if let Some(editor) = self.editor.take() {
            blobs.revoke(editor.url());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::filter_set::{ThumbnailMode, slider_to_strength};
    use crate::image::{ExportFormat, FilterKind, encode_image};
    use image::{Rgba, RgbaImage};
    use std::thread;
    use std::time::{Duration, Instant};

    fn jpeg_blob() -> Blob {
        let img = RgbaImage::from_pixel(200, 100, Rgba([180, 140, 90, 255]));
        let bytes = encode_image(&img, ExportFormat::Jpeg, 0.85).expect("encode");
        Blob::new(bytes, "image/jpeg", Some("photo.jpg".into()))
    }

    fn wait_until_loaded(page: &mut FilterPage, blobs: &mut BlobStore) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while page.editor.as_ref().is_some_and(ImageEditor::is_loading)
            && Instant::now() < deadline
        {
            page.poll(blobs);
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn loaded_page(blobs: &mut BlobStore) -> FilterPage {
        let mut page = FilterPage::default();
        assert!(page.select(jpeg_blob(), blobs, &AppConfig::default()));
        page.editor.as_mut().expect("editor").resize([400, 400]);
        wait_until_loaded(&mut page, blobs);
        page
    }

    #[test]
    fn selected_image_is_contain_fitted() {
        let mut blobs = BlobStore::default();
        let page = loaded_page(&mut blobs);
        let editor = page.editor.as_ref().expect("editor");
        let image = editor.canvas.main_image().expect("main image");
        let p = image.placement();
        assert!((p.scale - 2.0).abs() < f64::EPSILON);
        assert!((p.top - 100.0).abs() < f64::EPSILON);
        assert_eq!(editor.thumbnails.len(), FilterKind::ALL.len());
        assert!(blobs.resolve(editor.url()).is_some());
    }

    #[test]
    fn blur_then_adjust_updates_live() {
        let mut blobs = BlobStore::default();
        let mut page = loaded_page(&mut blobs);
        let editor = page.editor.as_mut().expect("editor");

        editor.activate(FilterKind::Blur);
        let effects = editor.canvas.main_image().expect("main").effects().to_vec();
        assert_eq!(effects, FilterKind::Blur.effects(0.1));

        editor.activate(FilterKind::Blur);
        assert_eq!(editor.filters.mode(FilterKind::Blur), ThumbnailMode::Adjusting);
        editor.set_strength(FilterKind::Blur, slider_to_strength(60));
        let effects = editor.canvas.main_image().expect("main").effects().to_vec();
        assert_eq!(effects, FilterKind::Blur.effects(0.6));

        editor.activate(FilterKind::Sepia);
        let effects = editor.canvas.main_image().expect("main").effects().to_vec();
        assert_eq!(effects, FilterKind::Sepia.effects(0.2));
    }

    #[test]
    fn second_selection_is_ignored_while_editing() {
        let mut blobs = BlobStore::default();
        let mut page = loaded_page(&mut blobs);
        let url = page.selected_url().cloned();
        assert!(!page.select(jpeg_blob(), &mut blobs, &AppConfig::default()));
        assert_eq!(page.selected_url().cloned(), url);
        assert_eq!(blobs.len(), 1);
    }

    #[test]
    fn close_clears_image_before_closing_page() {
        let mut blobs = BlobStore::default();
        let mut page = loaded_page(&mut blobs);
        assert_eq!(page.close(&mut blobs), PageClose::ClearedImage);
        assert!(!page.has_image());
        assert!(blobs.is_empty());
        assert_eq!(page.close(&mut blobs), PageClose::ClosePage);
    }

    #[test]
    fn undecodable_jpeg_returns_to_chooser() {
        let mut blobs = BlobStore::default();
        let mut page = FilterPage::default();
        let broken = Blob::new(b"not really".to_vec(), "image/jpeg", Some("x.jpg".into()));
        assert!(page.select(broken, &mut blobs, &AppConfig::default()));
        wait_until_loaded(&mut page, &mut blobs);
        assert!(!page.has_image());
        assert!(blobs.is_empty());
    }

    #[test]
    fn release_after_download_keeps_canvas() {
        let mut blobs = BlobStore::default();
        let mut page = loaded_page(&mut blobs);
        page.release_selected(&mut blobs);
        assert!(blobs.is_empty());
        let editor = page.editor.as_ref().expect("editor");
        assert!(editor.canvas.main_image().is_some());
        let bytes = editor
            .export_image(ExportFormat::Jpeg, 0.85)
            .expect("export")
            .expect("ready");
        assert!(!bytes.is_empty());
    }
}
