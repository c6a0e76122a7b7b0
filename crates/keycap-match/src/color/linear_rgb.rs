//! Linear RGB color type
//!
//! Linear RGB is the color space where light addition is physically accurate.
//! It is the intermediate step between gamma-encoded sRGB and CIE XYZ.

use super::lut::srgb8_to_linear;
use super::srgb::Srgb;

/// A color in linear RGB color space.
///
/// Values represent light intensity proportional to physical light power,
/// in the range 0.0..=1.0 for colors decoded from 8-bit sRGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    /// Red channel (linear light intensity)
    pub r: f64,
    /// Green channel (linear light intensity)
    pub g: f64,
    /// Blue channel (linear light intensity)
    pub b: f64,
}

impl LinearRgb {
    /// Create a new LinearRgb color from linear RGB values.
    #[inline]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

impl From<Srgb> for LinearRgb {
    /// Convert from sRGB to linear RGB using the gamma lookup table.
    fn from(srgb: Srgb) -> Self {
        Self {
            r: srgb8_to_linear(srgb.r),
            g: srgb8_to_linear(srgb.g),
            b: srgb8_to_linear(srgb.b),
        }
    }
}
