use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

use crate::data::model::Indicator;

// ---------------------------------------------------------------------------
// Indicator colours
// ---------------------------------------------------------------------------

/// Fixed chart colour of each indicator.
pub fn indicator_color(indicator: Indicator) -> Color32 {
    match indicator {
        Indicator::Pollution => Color32::from_rgb(214, 39, 40),
        Indicator::Traffic => Color32::from_rgb(255, 140, 0),
        Indicator::GreenArea => Color32::from_rgb(44, 160, 44),
    }
}

// ---------------------------------------------------------------------------
// Diverging ramp for the correlation heatmap (blue → white → red)
// ---------------------------------------------------------------------------

const NEGATIVE: (u8, u8, u8) = (33, 102, 172);
const NEUTRAL: (u8, u8, u8) = (247, 247, 247);
const POSITIVE: (u8, u8, u8) = (178, 24, 43);

fn linear(rgb: (u8, u8, u8)) -> LinSrgb {
    Srgb::new(rgb.0, rgb.1, rgb.2).into_format::<f32>().into_linear()
}

/// Heatmap cell colour for a coefficient in `[-1, 1]`; NaN is grey.
pub fn correlation_color(r: f64) -> Color32 {
    if r.is_nan() {
        return Color32::GRAY;
    }
    let r = r.clamp(-1.0, 1.0) as f32;
    let end = if r < 0.0 { NEGATIVE } else { POSITIVE };
    let mixed = linear(NEUTRAL).mix(linear(end), r.abs());
    let srgb: Srgb<f32> = Srgb::from_linear(mixed);
    let srgb: Srgb<u8> = srgb.into_format();
    Color32::from_rgb(srgb.red, srgb.green, srgb.blue)
}

/// Readable text colour on top of [`correlation_color`].
pub fn correlation_text_color(r: f64) -> Color32 {
    if r.abs() > 0.6 {
        Color32::WHITE
    } else {
        Color32::BLACK
    }
}
