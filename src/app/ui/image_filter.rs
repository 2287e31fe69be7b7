use super::super::filter_set::{
    SLIDER_MAX, SLIDER_MIN, SLIDER_STEP, ThumbnailMode, slider_to_strength, strength_to_slider,
};
use super::super::image_editor::ImageEditor;
use super::icons;
use crate::canvas::MAIN_IMAGE_KEY;
use crate::image::{FilterKind, to_color_image};
use crate::util::{f64_to_f32, points_to_pixels, u32_to_f32};
use egui::{CornerRadius, Rect, Sense, Stroke, StrokeKind, TextureOptions, pos2, vec2};

/// Room below the canvas for labels, thumbnails and the slider.
const STRIP_EXTRA_HEIGHT: f32 = 72.0;

#[derive(Debug, Clone, Copy)]
enum ThumbnailEvent {
    Activate(FilterKind),
    CloseSlider(FilterKind),
    Strength(FilterKind, f32),
}

impl ImageEditor {
    pub(crate) fn ui(&mut self, ui: &mut egui::Ui) {
        let thumb_height = self
            .thumbnails
            .first()
            .map_or(0.0, |t| u32_to_f32(t.pixels.height()));
        let available = ui.available_size();
        let canvas_height = (available.y - thumb_height - STRIP_EXTRA_HEIGHT).max(64.0);
        let (rect, _) = ui.allocate_exact_size(vec2(available.x, canvas_height), Sense::hover());
        self.resize([points_to_pixels(rect.width()), points_to_pixels(rect.height())]);
        self.paint_canvas(ui, rect);
        if self.is_loading() {
            ui.put(rect, egui::Spinner::new().size(32.0));
        }
        ui.add_space(8.0);
        for event in self.ui_thumbnails(ui) {
            match event {
                ThumbnailEvent::Activate(kind) => self.activate(kind),
                ThumbnailEvent::CloseSlider(kind) => self.close_adjustment(kind),
                ThumbnailEvent::Strength(kind, strength) => self.set_strength(kind, strength),
            }
        }
    }

    /// Mirror the canvas onto the screen, uploading pixels only when the
    /// rendered image changed.
    fn paint_canvas(&mut self, ui: &egui::Ui, rect: Rect) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, CornerRadius::ZERO, ui.visuals().extreme_bg_color);
        let Some(image) = self.canvas.main_image() else {
            return;
        };
        let revision = image.revision();
        let stale = self
            .main_texture
            .as_ref()
            .is_none_or(|(uploaded, _)| *uploaded != revision);
        if stale {
            let pixels = to_color_image(image.rendered());
            match self.main_texture.as_mut() {
                Some((uploaded, texture)) => {
                    texture.set(pixels, TextureOptions::LINEAR);
                    *uploaded = revision;
                }
                None => {
                    let texture = ui
                        .ctx()
                        .load_texture(MAIN_IMAGE_KEY, pixels, TextureOptions::LINEAR);
                    self.main_texture = Some((revision, texture));
                }
            }
        }
        let Some((_, texture)) = self.main_texture.as_ref() else {
            return;
        };
        let placement = image.placement();
        let [width, height] = placement.scaled_size(image.size());
        let image_rect = Rect::from_min_size(
            rect.min + vec2(f64_to_f32(placement.left), f64_to_f32(placement.top)),
            vec2(f64_to_f32(width), f64_to_f32(height)),
        );
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        painter.image(texture.id(), image_rect, uv, egui::Color32::WHITE);
    }

    fn ui_thumbnails(&mut self, ui: &mut egui::Ui) -> Vec<ThumbnailEvent> {
        let mut events = Vec::new();
        let filters = &self.filters;
        let thumbnails = &mut self.thumbnails;
        egui::ScrollArea::horizontal().show(ui, |ui| {
            ui.horizontal_top(|ui| {
                for thumb in thumbnails.iter_mut() {
                    let kind = thumb.kind;
                    let mode = filters.mode(kind);
                    ui.vertical_centered(|ui| {
                        ui.label(kind.name());
                        let texture = thumb.texture.get_or_insert_with(|| {
                            ui.ctx().load_texture(
                                format!("thumbnail-{}", kind.name()),
                                to_color_image(&thumb.pixels),
                                TextureOptions::LINEAR,
                            )
                        });
                        let size = vec2(
                            u32_to_f32(thumb.pixels.width()),
                            u32_to_f32(thumb.pixels.height()),
                        );
                        let response = ui
                            .add(egui::Image::new((texture.id(), size)).sense(Sense::click()))
                            .on_hover_cursor(egui::CursorIcon::PointingHand);
                        if mode != ThumbnailMode::Unselected || response.has_focus() {
                            ui.painter().rect_stroke(
                                response.rect.expand(2.0),
                                CornerRadius::same(4),
                                Stroke::new(2.0, ui.visuals().selection.stroke.color),
                                StrokeKind::Outside,
                            );
                        }
                        // Space/Enter on a focused thumbnail also reports a click.
                        if response.clicked() {
                            events.push(ThumbnailEvent::Activate(kind));
                        }
                        if mode == ThumbnailMode::Adjusting {
                            ui.horizontal(|ui| {
                                if ui
                                    .add(icons::icon_button(ui, icons::close()))
                                    .on_hover_text("Close")
                                    .clicked()
                                {
                                    events.push(ThumbnailEvent::CloseSlider(kind));
                                }
                                let mut value = strength_to_slider(filters.strength(kind));
                                let slider = egui::Slider::new(&mut value, SLIDER_MIN..=SLIDER_MAX)
                                    .step_by(SLIDER_STEP)
                                    .show_value(false);
                                if ui.add(slider).changed() {
                                    events.push(ThumbnailEvent::Strength(
                                        kind,
                                        slider_to_strength(value),
                                    ));
                                }
                            });
                        }
                    });
                    ui.add_space(8.0);
                }
            });
        });
        events
    }
}
