use super::super::UiAction;
use super::super::file_input::blob_from_dropped;
use super::super::filter_page::FilterPage;
use egui::{Align2, Color32, CornerRadius, FontId, Sense, Stroke, StrokeKind};

const PROMPT: &str = "Click to select a photo\nor\ndrop it here";

impl FilterPage {
    /// Drop zone that doubles as the button opening the file picker.
    pub(crate) fn ui_file_chooser(&mut self, ui: &mut egui::Ui) -> Option<UiAction> {
        let (hovered, dropped) =
            ui.input(|i| (i.raw.hovered_files.clone(), i.raw.dropped_files.clone()));
        for (idx, h) in hovered.iter().enumerate() {
            log::trace!("[DnD] hover[{idx}] path={:?} mime={}", h.path, h.mime);
        }
        self.drag_over = !hovered.is_empty();

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let visuals = ui.style().interact_selectable(&response, self.drag_over);
        let painter = ui.painter_at(rect);
        let zone = rect.shrink(16.0);
        let fill = if self.drag_over {
            ui.visuals().selection.bg_fill.gamma_multiply(0.3)
        } else {
            Color32::TRANSPARENT
        };
        painter.rect_filled(zone, CornerRadius::same(12), fill);
        let stroke_color = if self.drag_over || response.has_focus() {
            ui.visuals().selection.stroke.color
        } else {
            visuals.fg_stroke.color
        };
        painter.rect_stroke(
            zone,
            CornerRadius::same(12),
            Stroke::new(2.0, stroke_color),
            StrokeKind::Inside,
        );
        painter.text(
            zone.center(),
            Align2::CENTER_CENTER,
            PROMPT,
            FontId::proportional(20.0),
            visuals.text_color(),
        );

        let mut action = None;
        if response.clicked() {
            action = Some(UiAction::OpenFilePicker);
        }
        // Only the first dropped file is considered.
        if let Some(file) = dropped.first() {
            self.drag_over = false;
            log::debug!(
                "[DnD] drop name='{}' mime={} path={:?} bytes={}",
                file.name,
                file.mime,
                file.path,
                file.bytes.as_ref().map_or(0, |b| b.len())
            );
            match blob_from_dropped(file) {
                Ok(Some(blob)) => action = Some(UiAction::Select(blob)),
                Ok(None) => {}
                Err(err) => log::warn!("Drop failed: {err:#}"),
            }
        }
        action
    }
}
