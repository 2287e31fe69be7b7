use crate::image::{FilterKind, clamp_strength};

/// How a filter thumbnail is currently presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailMode {
    Unselected,
    /// Applied to the main image.
    Selected,
    /// Applied, with its strength slider open.
    Adjusting,
}

/// Filter application the owner must forward to the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterRequest {
    pub kind: FilterKind,
    pub strength: f32,
}

#[derive(Debug, Clone, Copy)]
struct FilterChoice {
    kind: FilterKind,
    strength: f32,
    adjusting: bool,
}

/// Selection state across all filter thumbnails. At most one is selected.
#[derive(Debug, Clone)]
pub struct FilterSet {
    choices: Vec<FilterChoice>,
    selected: Option<FilterKind>,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            choices: FilterKind::ALL
                .iter()
                .map(|&kind| FilterChoice {
                    kind,
                    strength: kind.default_strength(),
                    adjusting: false,
                })
                .collect(),
            selected: None,
        }
    }
}

impl FilterSet {
    pub fn mode(&self, kind: FilterKind) -> ThumbnailMode {
        if self.selected != Some(kind) {
            ThumbnailMode::Unselected
        } else if self.choice(kind).is_some_and(|c| c.adjusting) {
            ThumbnailMode::Adjusting
        } else {
            ThumbnailMode::Selected
        }
    }

    pub fn strength(&self, kind: FilterKind) -> f32 {
        self.choice(kind)
            .map_or_else(|| kind.default_strength(), |c| c.strength)
    }

    /// Click or key activation of a thumbnail.
    ///
    /// Activating an unselected filter selects it and asks for it to be
    /// applied at its remembered strength. Activating the selected filter
    /// opens its slider when it has a strength to adjust.
    pub fn activate(&mut self, kind: FilterKind) -> Option<FilterRequest> {
        if self.selected == Some(kind) {
            if kind.is_adjustable()
                && let Some(choice) = self.choice_mut(kind)
            {
                choice.adjusting = true;
            }
            return None;
        }
        for choice in &mut self.choices {
            choice.adjusting = false;
        }
        self.selected = Some(kind);
        Some(FilterRequest {
            kind,
            strength: self.strength(kind),
        })
    }

    pub fn close_adjustment(&mut self, kind: FilterKind) {
        if let Some(choice) = self.choice_mut(kind) {
            choice.adjusting = false;
        }
    }

    /// Slider input; only honoured while `kind` is being adjusted.
    pub fn set_strength(&mut self, kind: FilterKind, strength: f32) -> Option<FilterRequest> {
        if self.mode(kind) != ThumbnailMode::Adjusting {
            return None;
        }
        let strength = clamp_strength(strength);
        let choice = self.choice_mut(kind)?;
        choice.strength = strength;
        Some(FilterRequest { kind, strength })
    }

    fn choice(&self, kind: FilterKind) -> Option<&FilterChoice> {
        self.choices.iter().find(|c| c.kind == kind)
    }

    fn choice_mut(&mut self, kind: FilterKind) -> Option<&mut FilterChoice> {
        self.choices.iter_mut().find(|c| c.kind == kind)
    }
}

/// Slider position for a strength; the slider runs from 1 to 100.
pub fn strength_to_slider(strength: f32) -> u32 {
    let percent = (clamp_strength(strength) * 100.0).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (percent as u32).clamp(SLIDER_MIN, SLIDER_MAX)
    }
}

pub fn slider_to_strength(value: u32) -> f32 {
    crate::util::u32_to_f32(value.clamp(SLIDER_MIN, SLIDER_MAX)) / 100.0
}

pub const SLIDER_MIN: u32 = 1;
pub const SLIDER_MAX: u32 = 100;
/// Steps count from `SLIDER_MIN`, so the stops are 1, 6, ..., 96 and 100.
pub const SLIDER_STEP: f64 = 5.0;
