//! Color types and conversion utilities
//!
//! This module provides type-safe color handling with compile-time distinction
//! between gamma-encoded sRGB, linear RGB and the perceptual CIE L*a*b* space.
//!
//! # Color Spaces
//!
//! - **Srgb**: 8-bit storage/display space. Use for I/O.
//! - **LinearRgb**: Linear light intensity, intermediate for XYZ.
//! - **Lab**: Perceptually uniform space. Use for all color comparisons.
//!
//! # Example
//!
//! ```
//! use keycap_match::{Lab, Srgb};
//!
//! let orange = Lab::from(Srgb::new(255, 128, 0));
//! let red = Lab::from(Srgb::new(255, 0, 0));
//! assert!(orange.delta_e(red) > 10.0);
//! ```

mod lab;
mod linear_rgb;
mod lut;
mod srgb;

pub use lab::{to_perceptual_space, Lab, Xyz, D65_WHITE};
pub use linear_rgb::LinearRgb;
pub use srgb::Srgb;
