#![allow(clippy::excessive_precision, clippy::module_inception)]

//! keycap-match: perceptual matching of image regions to keycap colors
//!
//! This library maps a photograph onto a keyboard layout and picks, for
//! every key, the manufacturable keycap color that best represents the
//! image area under that key.
//!
//! # Quick Start
//!
//! The [`KeycapMapper`] is the primary entry point:
//!
//! ```
//! use keycap_match::{
//!     KeyLayout, KeycapMapper, Overlay, PixelBuffer, RawKeyPosition, ReducerMode,
//!     ReferencePalette, Srgb,
//! };
//!
//! let layout = KeyLayout::from_positions(vec![RawKeyPosition {
//!     id: "Esc".to_string(),
//!     x_u: 0.0,
//!     y_u: 0.0,
//!     width_u: 1.0,
//!     height_u: 1.0,
//!     label: None,
//! }])
//! .unwrap();
//! let palette = ReferencePalette::from_hex(&[("WH", "#F4F4F0"), ("BK", "#1A1A1A")]).unwrap();
//!
//! let pixels = [250, 250, 245, 255].repeat(8 * 8);
//! let canvas = PixelBuffer::new(&pixels, 8, 8).unwrap();
//!
//! let mapper = KeycapMapper::new(&layout, &palette)
//!     .unwrap()
//!     .mode(ReducerMode::Quantize);
//! let assignment = mapper.process_region(&canvas, Overlay::covering(&canvas)).unwrap();
//! assert_eq!(assignment.code("Esc"), Some("WH"));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! KeyLayout (units) --build_bounding_boxes--> pixel boxes per key
//!     |
//!     v  translate by overlay offset, clip to canvas
//! PixelBuffer region --reduce_region--> representative Srgb
//!     |
//!     v  to_perceptual_space
//! Lab --ReferencePalette::nearest (min ΔE*ab)--> palette code
//! ```
//!
//! # Color Science
//!
//! Matching happens in CIE L*a*b* (D65) with the CIE 1976 difference,
//! plain Euclidean distance. Naive RGB distance badly over-weights
//! differences in dark tones and under-weights hue shifts; L*a*b* is close
//! enough to perceptually uniform for picking between a few hundred
//! physical reference colors.
//!
//! The conversion chain is:
//!
//! 1. sRGB 8-bit to linear light through a 256-entry table generated at
//!    build time from the IEC 61966-2-1 transfer function
//! 2. Linear RGB to XYZ with the sRGB/D65 primaries matrix, Y scaled to 100
//! 3. XYZ to L*a*b* against white (95.047, 100.000, 108.883) with the
//!    exact CIE constants ε = 216/24389 and κ = 24389/27
//!
//! # Region Reduction
//!
//! Two interchangeable reducers ([`ReducerMode`]) pick one color per key:
//!
//! - **Simple**: frequency histogram over coarse buckets, average of the
//!   most populous bucket. Robust to noise and fast on large regions.
//! - **Quantize**: median cut into a few clusters, average of the largest.
//!   Better at finding the dominant color of a busy region.
//!
//! Both ignore translucent pixels and return neutral gray for regions that
//! cannot be sampled; see [`reduce_region()`].
//!
//! # Determinism
//!
//! Palette entries and layout keys are stored in lexicographic order.
//! Ties in nearest-color matching go to the smallest code, and the default
//! color for unsampleable keys is the first valid entry.

pub mod api;
pub mod color;
pub mod layout;
pub mod output;
pub mod palette;
pub mod region;


pub use api::{KeycapMapper, MapError, Overlay};
pub use color::{to_perceptual_space, Lab, LinearRgb, Srgb, Xyz, D65_WHITE};
pub use layout::{
    build_bounding_boxes, KeyLayout, KeyRect, LayoutError, PixelBox, RawKeyPosition, RectDefect,
};
pub use output::{derive_theme, AssignmentSource, KeyAssignment, KeyColor, ThemeRecord};
pub use palette::{
    nearest_code, FallbackReason, PaletteEntry, PaletteError, PaletteMatch, ParseColorError,
    ReferencePalette, NO_MATCH_CODE,
};
pub use region::{
    reduce_region, try_reduce_region, FrequencyHistogram, MedianCut, ParseModeError, PixelBuffer,
    Reduce, ReducerMode, ReducerOptions, Region, RegionError,
};
