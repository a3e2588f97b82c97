use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Number of reusable categorical color slots.
pub const PALETTE_SIZE: usize = 10;

/// Generates `n` visually distinct colours using evenly spaced hues.
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
// Color mapping: grouping key → Color32
// ---------------------------------------------------------------------------

/// Assigns each distinct grouping key (state or incident type) one of
/// [`PALETTE_SIZE`] reusable colours.  Assignment is first-seen-key →
/// next-slot, wrapping after the palette is exhausted, and the mapping is
/// append-only: a key keeps its colour across renders and chart-kind
/// switches.
#[derive(Debug, Clone)]
pub struct ColorMap {
    slots: Vec<Color32>,
    assigned: HashMap<String, usize>,
}

impl Default for ColorMap {
    fn default() -> Self {
        ColorMap {
            slots: generate_palette(PALETTE_SIZE),
            assigned: HashMap::new(),
        }
    }
}

impl ColorMap {
    /// Colour for a key, assigning the next palette slot on first sight.
    pub fn color_for(&mut self, key: &str) -> Color32 {
        let next = self.assigned.len() % self.slots.len();
        let slot = *self
            .assigned
            .entry(key.to_string())
            .or_insert(next);
        self.slots[slot % self.slots.len()]
    }
}
