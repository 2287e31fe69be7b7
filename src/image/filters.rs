/// One pixel operation handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Gaussian blur; `amount` is relative to the image's longer side.
    Blur { amount: f32 },
    /// Row-major 4x5 colour matrix; the fifth column is an offset in 0..=1.
    ColorMatrix([f32; 20]),
}

#[rustfmt::skip]
pub const SEPIA_MATRIX: [f32; 20] = [
    0.393, 0.769, 0.189, 0.0, 0.0,
    0.349, 0.686, 0.168, 0.0, 0.0,
    0.272, 0.534, 0.131, 0.0, 0.0,
    0.0,   0.0,   0.0,   1.0, 0.0,
];

#[rustfmt::skip]
pub const VINTAGE_MATRIX: [f32; 20] = [
    0.627_93,  0.320_21, -0.039_65, 0.0, 0.037_84,
    0.025_78,  0.644_11,  0.032_59, 0.0, 0.029_26,
    0.046_60, -0.085_12,  0.524_16, 0.0, 0.020_23,
    0.0,       0.0,       0.0,      1.0, 0.0,
];

/// Produces the effects of a filter for a given strength.
pub type EffectFactory = fn(f32) -> Vec<Effect>;

/// The fixed set of filters offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    None,
    Blur,
    Vintage,
    Sepia,
}

impl FilterKind {
    /// Display order of the filter thumbnails.
    pub const ALL: [Self; 4] = [Self::None, Self::Blur, Self::Vintage, Self::Sepia];

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "No filter",
            Self::Blur => "Blur",
            Self::Vintage => "Vintage",
            Self::Sepia => "Sepia",
        }
    }

    pub const fn default_strength(self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Blur => 0.1,
            Self::Vintage | Self::Sepia => 0.2,
        }
    }

    /// `None` for the pass-through filter, which has no strength to adjust.
    pub fn factory(self) -> Option<EffectFactory> {
        let factory: EffectFactory = match self {
            Self::None => return None,
            Self::Blur => blur_effects,
            Self::Vintage => vintage_effects,
            Self::Sepia => sepia_effects,
        };
        Some(factory)
    }

    pub fn is_adjustable(self) -> bool {
        self.factory().is_some()
    }

    pub fn effects(self, strength: f32) -> Vec<Effect> {
        self.factory()
            .map_or_else(Vec::new, |factory| factory(clamp_strength(strength)))
    }
}

fn blur_effects(strength: f32) -> Vec<Effect> {
    vec![Effect::Blur { amount: strength }]
}

// Colour matrices are fixed; strength only drives the slider.
fn vintage_effects(_strength: f32) -> Vec<Effect> {
    vec![Effect::ColorMatrix(VINTAGE_MATRIX)]
}

fn sepia_effects(_strength: f32) -> Vec<Effect> {
    vec![Effect::ColorMatrix(SEPIA_MATRIX)]
}

/// Clamp a strength into `[0, 1]`, mapping NaN to zero.
pub const fn clamp_strength(strength: f32) -> f32 {
    if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, 1.0)
    }
}
