//! Main egui/eframe application state: screens, native dialogs and the
//! lifetime of every object URL handed out while editing.

use crate::blob::{Blob, BlobStore, ObjectUrl, RevokeQueue};
use crate::config::AppConfig;
use crate::download::download_url;
use egui::Context;
use egui_file_dialog::{DialogState, FileDialog};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

mod file_input;
mod filter_page;
mod filter_set;
mod image_editor;
mod image_loader;
mod ui;

use filter_page::{FilterPage, PageClose};
use image_editor::ImageEditor;

enum Screen {
    Home,
    Filter(FilterPage),
    /// Terminal: nothing but the error message is drawn from here on.
    Failed,
}

enum NativeDialog {
    Open(FileDialog),
    Download { dialog: FileDialog, url: ObjectUrl },
}

/// Requests raised by the UI during a frame, handled after drawing.
pub(crate) enum UiAction {
    Start,
    OpenFilePicker,
    Select(Blob),
    Download,
    Close,
}

pub struct FiltergramApp {
    config: AppConfig,
    screen: Screen,
    blobs: BlobStore,
    revocations: RevokeQueue,
    active_dialog: Option<NativeDialog>,
    last_image_dir: Option<PathBuf>,
    last_download_dir: Option<PathBuf>,
}

impl FiltergramApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            screen: Screen::Home,
            blobs: BlobStore::default(),
            revocations: RevokeQueue::default(),
            active_dialog: None,
            last_image_dir: None,
            last_download_dir: None,
        }
    }

    fn update_screen(&mut self, ctx: &Context) -> anyhow::Result<()> {
        if let Screen::Filter(page) = &mut self.screen {
            page.poll(&mut self.blobs);
            if page.editor.as_ref().is_some_and(ImageEditor::is_loading) {
                ctx.request_repaint_after(Duration::from_millis(16));
            }
        }

        let action = egui::CentralPanel::default()
            .show(ctx, |ui| self.ui_screen(ui))
            .inner;
        if let Some(action) = action {
            self.handle_action(action)?;
        }
        self.update_dialogs(ctx);
        Ok(())
    }

    fn ui_screen(&mut self, ui: &mut egui::Ui) -> Option<UiAction> {
        match &mut self.screen {
            Screen::Home => Self::ui_home(ui),
            Screen::Filter(page) => page.ui(ui),
            Screen::Failed => {
                Self::ui_error_message(ui);
                None
            }
        }
    }

    fn handle_action(&mut self, action: UiAction) -> anyhow::Result<()> {
        match action {
            UiAction::Start => {
                log::debug!("Opening filter page");
                self.screen = Screen::Filter(FilterPage::default());
            }
            UiAction::OpenFilePicker => {
                if self.active_dialog.is_none() {
                    self.open_image_dialog();
                }
            }
            UiAction::Select(blob) => {
                if let Screen::Filter(page) = &mut self.screen {
                    page.select(blob, &mut self.blobs, &self.config);
                }
            }
            UiAction::Download => {
                if self.active_dialog.is_none() {
                    self.start_download()?;
                }
            }
            UiAction::Close => {
                if let Screen::Filter(page) = &mut self.screen
                    && page.close(&mut self.blobs) == PageClose::ClosePage
                {
                    log::debug!("Closing filter page");
                    self.screen = Screen::Home;
                }
            }
        }
        Ok(())
    }

    /// Render the canvas, publish it as an object URL and ask where to save it.
    fn start_download(&mut self) -> anyhow::Result<()> {
        let Screen::Filter(page) = &self.screen else {
            return Ok(());
        };
        let Some(editor) = page.editor.as_ref() else {
            return Ok(());
        };
        let export = &self.config.export;
        let Some(bytes) = editor.export_image(export.format, export.quality())? else {
            log::warn!("Canvas is not ready yet; nothing to download");
            return Ok(());
        };
        let file_name = export.file_name();
        let blob = Blob::new(bytes, export.format.mime_type(), Some(file_name.clone()));
        let url = self.blobs.create_object_url(blob);
        let mut dialog = Self::make_save_dialog(
            "Download image",
            &file_name,
            &[export.format.extension()],
            self.last_download_dir.as_deref(),
        );
        dialog.save_file();
        self.active_dialog = Some(NativeDialog::Download { dialog, url });
        Ok(())
    }

    fn update_dialogs(&mut self, ctx: &Context) {
        let mut close_dialog = false;
        let mut picked_image: Option<PathBuf> = None;
        let mut downloaded = false;

        if let Some(dialog_state) = self.active_dialog.as_mut() {
            match dialog_state {
                NativeDialog::Open(dialog) => {
                    dialog.update(ctx);
                    if let Some(path) = dialog.take_picked() {
                        picked_image = Some(path);
                        close_dialog = true;
                    } else {
                        match dialog.state() {
                            DialogState::Cancelled => {
                                log::debug!("Open canceled.");
                                close_dialog = true;
                            }
                            DialogState::Closed => close_dialog = true,
                            _ => {}
                        }
                    }
                }
                NativeDialog::Download { dialog, url } => {
                    dialog.update(ctx);
                    if let Some(path) = dialog.take_picked() {
                        self.last_download_dir = parent_dir(&path);
                        match download_url(
                            &self.blobs,
                            &mut self.revocations,
                            url,
                            &path,
                            self.config.export.revoke_delay(),
                            Instant::now(),
                        ) {
                            Ok(()) => downloaded = true,
                            Err(err) => log::error!("Download failed: {err:#}"),
                        }
                        close_dialog = true;
                    } else {
                        match dialog.state() {
                            DialogState::Cancelled | DialogState::Closed => {
                                log::debug!("Download canceled.");
                                self.blobs.revoke(url);
                                close_dialog = true;
                            }
                            _ => {}
                        }
                    }
                }
            }
        }

        if let Some(path) = picked_image {
            self.last_image_dir = parent_dir(&path);
            self.select_path(&path);
        }

        if downloaded && let Screen::Filter(page) = &mut self.screen {
            page.release_selected(&mut self.blobs);
        }

        if close_dialog {
            self.active_dialog = None;
        }
    }

    fn select_path(&mut self, path: &Path) {
        let Screen::Filter(page) = &mut self.screen else {
            return;
        };
        match file_input::blob_from_path(path) {
            Ok(Some(blob)) => {
                page.select(blob, &mut self.blobs, &self.config);
            }
            Ok(None) => {}
            Err(err) => log::warn!("{err:#}"),
        }
    }

    fn fail(&mut self, reason: &str) {
        log::error!("Unrecoverable UI error: {reason}");
        if let Some(NativeDialog::Download { url, .. }) = self.active_dialog.take() {
            self.blobs.revoke(&url);
        }
        self.screen = Screen::Failed;
    }
}

fn parent_dir(path: &Path) -> Option<PathBuf> {
    path.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic with a non-string payload".to_string())
}

impl eframe::App for FiltergramApp {
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let revoked = self.revocations.run_due(now, &mut self.blobs);
        if revoked > 0 {
            log::debug!("Revoked {revoked} object URL(s); {} live", self.blobs.len());
        }
        if let Some(deadline) = self.revocations.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }

        if matches!(self.screen, Screen::Failed) {
            egui::CentralPanel::default().show(ctx, |ui| Self::ui_error_message(ui));
            return;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.update_screen(ctx)));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => self.fail(&format!("{err:#}")),
            Err(payload) => self.fail(&panic_message(payload.as_ref())),
        }
        if matches!(self.screen, Screen::Failed) {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ExportFormat, encode_image};
    use image::{Rgba, RgbaImage};
    use std::fs;
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

    fn write_image(path: &Path, format: ExportFormat) {
        let img = RgbaImage::from_pixel(64, 48, Rgba([90, 160, 210, 255]));
        let bytes = encode_image(&img, format, 0.85).expect("encode");
        fs::write(path, bytes).expect("write image");
    }

    fn filter_page(app: &FiltergramApp) -> &FilterPage {
        match &app.screen {
            Screen::Filter(page) => page,
            _ => panic!("filter page is not open"),
        }
    }

    fn payload_of(f: impl FnOnce() + panic::UnwindSafe) -> Box<dyn Any + Send> {
        match panic::catch_unwind(f) {
            Ok(()) => panic!("expected a panic"),
            Err(payload) => payload,
        }
    }

    #[test]
    fn panic_payloads_become_messages() {
        let payload = payload_of(|| panic!("boom"));
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let code = 7;
        let payload = payload_of(move || panic!("code {code}"));
        assert_eq!(panic_message(payload.as_ref()), "code 7");
    }

    #[test]
    fn start_and_close_move_between_screens() {
        let mut app = FiltergramApp::new(AppConfig::default());
        app.handle_action(UiAction::Start).expect("start");
        assert!(matches!(app.screen, Screen::Filter(_)));
        app.handle_action(UiAction::Close).expect("close");
        assert!(matches!(app.screen, Screen::Home));
    }

    #[test]
    fn non_jpeg_pick_keeps_selected_image() {
        let dir = unique_temp_dir("pick_keep");
        let jpg = dir.join("photo.jpg");
        let png = dir.join("scan.png");
        write_image(&jpg, ExportFormat::Jpeg);
        write_image(&png, ExportFormat::Png);

        let mut app = FiltergramApp::new(AppConfig::default());
        app.handle_action(UiAction::Start).expect("start");
        app.select_path(&jpg);
        let selected = filter_page(&app).selected_url().cloned();
        assert!(selected.is_some());
        assert_eq!(app.blobs.len(), 1);

        app.select_path(&png);
        app.select_path(&dir.join("missing.png"));
        assert_eq!(filter_page(&app).selected_url().cloned(), selected);
        assert_eq!(app.blobs.len(), 1);
        assert!(filter_page(&app).has_image());
    }

    #[test]
    fn non_jpeg_pick_leaves_chooser_open() {
        let dir = unique_temp_dir("pick_empty");
        let png = dir.join("scan.png");
        write_image(&png, ExportFormat::Png);

        let mut app = FiltergramApp::new(AppConfig::default());
        app.handle_action(UiAction::Start).expect("start");
        app.select_path(&png);
        app.select_path(&dir.join("missing.png"));
        assert!(!filter_page(&app).has_image());
        assert!(app.blobs.is_empty());
    }

    #[test]
    fn failure_is_terminal_and_frees_pending_download() {
        let mut app = FiltergramApp::new(AppConfig::default());
        let url = app
            .blobs
            .create_object_url(Blob::new(vec![1, 2], "image/jpeg", None));
        app.active_dialog = Some(NativeDialog::Download {
            dialog: FileDialog::new(),
            url,
        });
        app.fail("broken");
        assert!(matches!(app.screen, Screen::Failed));
        assert!(app.active_dialog.is_none());
        assert!(app.blobs.is_empty());
    }

    #[test]
    fn parent_dir_skips_bare_file_names() {
        assert_eq!(parent_dir(Path::new("image.jpeg")), None);
        assert_eq!(
            parent_dir(Path::new("/tmp/image.jpeg")),
            Some(PathBuf::from("/tmp"))
        );
    }
}
