use super::super::{FiltergramApp, UiAction};
use egui::RichText;

const AUTHOR_CREDIT: &str = "By Kayvan Arianpour";

impl FiltergramApp {
    pub(crate) fn ui_home(ui: &mut egui::Ui) -> Option<UiAction> {
        let mut action = None;
        ui.vertical_centered(|ui| {
            ui.add_space(32.0);
            ui.heading(RichText::new("Instagram like photo editor.").size(28.0).strong());
            ui.add_space(24.0);
            ui.label("It lets you select a photo, apply a filter to it and save it.");
            ui.label("Blur, vintage and sepia are available; each has a strength slider.");
            ui.add_space(24.0);
            let start = egui::Button::new(RichText::new("Start").size(18.0))
                .min_size(egui::vec2(140.0, 40.0));
            if ui.add(start).clicked() {
                action = Some(UiAction::Start);
            }
        });
        ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("Version: {}", env!("CARGO_PKG_VERSION")))
                    .small()
                    .weak(),
            );
            ui.label(RichText::new(AUTHOR_CREDIT).small());
        });
        action
    }
}
