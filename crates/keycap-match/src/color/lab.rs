//! CIE XYZ and CIE L*a*b* color spaces
//!
//! L*a*b* is the perceptual space used for palette matching. Euclidean
//! distance between two L*a*b* colors is the CIE 1976 color difference
//! (ΔE*ab), a standard proxy for perceived difference.
//!
//! # Conversion chain
//!
//! ```text
//! Srgb (8-bit) -> LinearRgb (gamma decode) -> Xyz (D65, 0..100) -> Lab
//! ```

use super::linear_rgb::LinearRgb;
use super::srgb::Srgb;

/// D65 reference white in CIE XYZ, scaled so that Y = 100.
pub const D65_WHITE: Xyz = Xyz {
    x: 95.047,
    y: 100.000,
    z: 108.883,
};

/// CIE constant ε = 216 / 24389; below it the L*a*b* function is linear.
const EPSILON: f64 = 216.0 / 24389.0;

/// CIE constant κ = 24389 / 27.
const KAPPA: f64 = 24389.0 / 27.0;

/// A color in CIE XYZ tristimulus space (D65, Y scaled to 0..=100).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<LinearRgb> for Xyz {
    /// Linear sRGB to XYZ using the sRGB/D65 primaries matrix
    /// (IEC 61966-2-1, Lindbloom precision).
    fn from(rgb: LinearRgb) -> Self {
        let r = rgb.r * 100.0;
        let g = rgb.g * 100.0;
        let b = rgb.b * 100.0;
        Xyz {
            x: 0.4124564 * r + 0.3575761 * g + 0.1804375 * b,
            y: 0.2126729 * r + 0.7151522 * g + 0.0721750 * b,
            z: 0.0193339 * r + 0.1191920 * g + 0.9503041 * b,
        }
    }
}

/// A color in CIE L*a*b* space relative to the D65 white point.
///
/// # Components
///
/// - `l`: Lightness (0.0 = black, 100.0 = reference white)
/// - `a`: Green-red axis (negative = green, positive = red)
/// - `b`: Blue-yellow axis (negative = blue, positive = yellow)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    /// Create a new L*a*b* color.
    #[inline]
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// CIE 1976 color difference: unweighted Euclidean distance.
    ///
    /// # Example
    ///
    /// ```
    /// use keycap_match::Lab;
    ///
    /// let a = Lab::new(50.0, 0.0, 0.0);
    /// let b = Lab::new(53.0, 4.0, 0.0);
    /// assert!((a.delta_e(b) - 5.0).abs() < 1e-12);
    /// ```
    #[inline]
    pub fn delta_e(self, other: Lab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }

    /// Chroma magnitude `sqrt(a² + b²)`.
    #[inline]
    pub fn chroma(self) -> f64 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

/// Cube-root / linear piecewise function of the L*a*b* definition.
#[inline]
fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

impl From<Xyz> for Lab {
    fn from(xyz: Xyz) -> Self {
        let fx = lab_f(xyz.x / D65_WHITE.x);
        let fy = lab_f(xyz.y / D65_WHITE.y);
        let fz = lab_f(xyz.z / D65_WHITE.z);
        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

impl From<LinearRgb> for Lab {
    #[inline]
    fn from(rgb: LinearRgb) -> Self {
        Lab::from(Xyz::from(rgb))
    }
}

impl From<Srgb> for Lab {
    #[inline]
    fn from(srgb: Srgb) -> Self {
        Lab::from(LinearRgb::from(srgb))
    }
}

/// Convert an 8-bit sRGB color to CIE L*a*b*.
///
/// ```
/// use keycap_match::{to_perceptual_space, Srgb};
///
/// let white = to_perceptual_space(Srgb::new(255, 255, 255));
/// assert!((white.l - 100.0).abs() < 1e-3);
/// ```
#[inline]
pub fn to_perceptual_space(rgb: Srgb) -> Lab {
    Lab::from(rgb)
}
