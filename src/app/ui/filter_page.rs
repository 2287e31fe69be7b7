use super::super::UiAction;
use super::super::filter_page::FilterPage;
use super::icons;

impl FilterPage {
    /// Header plus either the file chooser or the editor.
    pub(crate) fn ui(&mut self, ui: &mut egui::Ui) -> Option<UiAction> {
        let header = Self::ui_header(ui, self.has_image());
        ui.separator();
        let body = match self.editor.as_mut() {
            Some(editor) => {
                editor.ui(ui);
                None
            }
            None => self.ui_file_chooser(ui),
        };
        header.or(body)
    }

    fn ui_header(ui: &mut egui::Ui, has_image: bool) -> Option<UiAction> {
        let mut action = None;
        ui.horizontal(|ui| {
            if has_image
                && ui
                    .add(icons::icon_button(ui, icons::download()))
                    .on_hover_text("Download image")
                    .clicked()
            {
                action = Some(UiAction::Download);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let hint = if has_image { "Clear photo" } else { "Close" };
                if ui
                    .add(icons::icon_button(ui, icons::close()))
                    .on_hover_text(hint)
                    .clicked()
                {
                    action = Some(UiAction::Close);
                }
            });
        });
        action
    }
}
