//! Image-derived UI theme.
//!
//! The theme is a plain value handed back to the caller; nothing in this
//! crate applies it.

use crate::api::Overlay;
use crate::color::{Lab, Srgb};
use crate::region::{reduce_region, PixelBuffer, ReducerOptions};

/// L* above which the accent counts as light and gets dark text.
const LIGHT_ACCENT_L: f64 = 50.0;

/// Accent color and a readable foreground for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeRecord {
    /// Representative color of the overlay area.
    pub accent: Srgb,
    /// Black on light accents, white on dark ones.
    pub foreground: Srgb,
}

impl ThemeRecord {
    /// Build a theme around an accent color.
    pub fn from_accent(accent: Srgb) -> Self {
        let foreground = if Lab::from(accent).l > LIGHT_ACCENT_L {
            Srgb::new(0, 0, 0)
        } else {
            Srgb::new(255, 255, 255)
        };
        Self { accent, foreground }
    }
}

/// Reduce the overlay area of `canvas` to an accent color and derive a
/// theme from it.
pub fn derive_theme(
    canvas: &PixelBuffer<'_>,
    overlay: &Overlay,
    options: &ReducerOptions,
) -> ThemeRecord {
    let accent = reduce_region(
        Some(canvas),
        overlay.x,
        overlay.y,
        overlay.width,
        overlay.height,
        options,
    );
    ThemeRecord::from_accent(accent)
}
