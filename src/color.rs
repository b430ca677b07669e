use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
/// Used for the per-crime-type legend swatches in the controls panel.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Continuous color scale: value in [min, max] → Color32
// ---------------------------------------------------------------------------

/// Viridis-like anchor stops, dark → bright.
const SCALE_STOPS: [(f32, f32, f32); 5] = [
    (0.267, 0.005, 0.329),
    (0.229, 0.322, 0.545),
    (0.127, 0.566, 0.551),
    (0.369, 0.788, 0.383),
    (0.993, 0.906, 0.144),
];

/// Maps a numeric domain onto a continuous gradient; the map view uses this
/// to shade each state by its `total_crimes`.
#[derive(Debug, Clone)]
pub struct ColorScale {
    min: f64,
    max: f64,
}

impl ColorScale {
    /// Build a scale over the value domain of `values`. An empty or
    /// degenerate domain maps everything to the low end of the gradient.
    pub fn from_values(values: &[f64]) -> Self {
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let min = finite.clone().fold(f64::INFINITY, f64::min);
        let max = finite.fold(f64::NEG_INFINITY, f64::max);
        if min.is_finite() && max.is_finite() {
            ColorScale { min, max }
        } else {
            ColorScale { min: 0.0, max: 0.0 }
        }
    }

    /// Colour for a value, clamped to the domain.
    pub fn color_for(&self, value: f64) -> Color32 {
        let t = if self.max > self.min {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0) as f32
        } else {
            0.0
        };

        let scaled = t * (SCALE_STOPS.len() - 1) as f32;
        let i = (scaled.floor() as usize).min(SCALE_STOPS.len() - 2);
        let frac = scaled - i as f32;

        let (r0, g0, b0) = SCALE_STOPS[i];
        let (r1, g1, b1) = SCALE_STOPS[i + 1];
        Color32::from_rgb(
            ((r0 + (r1 - r0) * frac) * 255.0) as u8,
            ((g0 + (g1 - g0) * frac) * 255.0) as u8,
            ((b0 + (b1 - b0) * frac) * 255.0) as u8,
        )
    }
}
