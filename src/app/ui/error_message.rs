use super::super::FiltergramApp;
use egui::RichText;

const TESTED_PLATFORMS: [&str; 4] = [
    "Linux, X11",
    "Linux, Wayland",
    "Windows 11",
    "macOS 14",
];

impl FiltergramApp {
    pub(crate) fn ui_error_message(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(32.0);
            ui.heading(RichText::new("Something went wrong.").size(28.0).strong());
            ui.add_space(16.0);
            ui.label("Please restart the editor. Running it with RUST_LOG=debug shows the cause.");
            ui.add_space(16.0);
            ui.label("Tested platforms are:");
            for platform in TESTED_PLATFORMS {
                ui.label(format!("• {platform}"));
            }
        });
    }
}
