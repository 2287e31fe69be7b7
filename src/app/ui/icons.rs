//! Toolbar icons, rasterized by the `egui_extras` SVG loader.

use egui::{ImageSource, include_image};

pub fn close() -> ImageSource<'static> {
    include_image!("../../../assets/close.svg")
}

pub fn download() -> ImageSource<'static> {
    include_image!("../../../assets/download.svg")
}

/// Edge length of an icon button's image, in points.
pub const ICON_SIZE: f32 = 20.0;

/// A frameless button showing `icon` tinted with the current text colour.
pub fn icon_button(ui: &egui::Ui, icon: ImageSource<'static>) -> egui::Button<'static> {
    let image = egui::Image::new(icon)
        .fit_to_exact_size(egui::vec2(ICON_SIZE, ICON_SIZE))
        .tint(ui.visuals().text_color());
    egui::Button::image(image).frame(false)
}
