//! Unified error type for the keycap-match public API.
//!
//! [`MapError`] wraps every fatal error of a mapping run into a single
//! enum for convenient `?` propagation in application code. Per-key
//! problems are never reported here; they are recorded on the
//! [`KeyAssignment`](crate::KeyAssignment) instead.

use std::fmt;

use crate::layout::LayoutError;
use crate::palette::PaletteError;
use crate::region::RegionError;

/// Unified error type for the keycap-match public API.
///
/// # Example
///
/// ```
/// use keycap_match::{KeycapMapper, KeyLayout, MapError, PaletteError, ReferencePalette};
///
/// fn check(layout: &KeyLayout) -> Result<(), MapError> {
///     let empty = ReferencePalette::default();
///     KeycapMapper::new(layout, &empty)?;
///     Ok(())
/// }
/// # let layout = KeyLayout::from_positions(vec![keycap_match::RawKeyPosition {
/// #     id: "A".into(), x_u: 0.0, y_u: 0.0, width_u: 1.0, height_u: 1.0, label: None,
/// # }]).unwrap();
/// assert!(matches!(check(&layout), Err(MapError::Palette(PaletteError::EmptyPalette))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    /// Palette unusable (empty, duplicate code, unparsable color)
    Palette(PaletteError),
    /// Layout unusable or overlay geometry invalid
    Layout(LayoutError),
    /// Canvas pixel buffer unusable
    Canvas(RegionError),
    /// Overlay rectangle has a non-positive or non-finite dimension
    InvalidOverlay {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Palette(err) => write!(f, "palette error: {}", err),
            MapError::Layout(err) => write!(f, "layout error: {}", err),
            MapError::Canvas(err) => write!(f, "canvas error: {}", err),
            MapError::InvalidOverlay {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "invalid overlay {}x{} at ({}, {})",
                width, height, x, y
            ),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Palette(err) => Some(err),
            MapError::Layout(err) => Some(err),
            MapError::Canvas(err) => Some(err),
            MapError::InvalidOverlay { .. } => None,
        }
    }
}

impl From<PaletteError> for MapError {
    fn from(err: PaletteError) -> Self {
        MapError::Palette(err)
    }
}

impl From<LayoutError> for MapError {
    fn from(err: LayoutError) -> Self {
        MapError::Layout(err)
    }
}

impl From<RegionError> for MapError {
    fn from(err: RegionError) -> Self {
        MapError::Canvas(err)
    }
}
