//! Key layout registry: per-key rectangles in keyboard units.

use std::collections::BTreeMap;
use std::fmt;

/// What is wrong with one key rectangle.
#[derive(Debug, Clone, PartialEq)]
pub enum RectDefect {
    /// A coordinate is NaN or infinite
    NonFinite { field: &'static str },
    /// `left_u` or `top_u` is negative
    NegativeOrigin,
    /// `left_u >= right_u` or `top_u >= bottom_u`
    EmptyExtent,
    /// A raw width or height is not positive
    NonPositiveSize,
}

impl fmt::Display for RectDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RectDefect::NonFinite { field } => write!(f, "{} is not a finite number", field),
            RectDefect::NegativeOrigin => write!(f, "left_u/top_u must not be negative"),
            RectDefect::EmptyExtent => {
                write!(f, "left_u must be below right_u and top_u below bottom_u")
            }
            RectDefect::NonPositiveSize => write!(f, "width_u/height_u must be positive"),
        }
    }
}

/// Error type for layout registry validation and geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Registry has no keys
    EmptyLayout,
    /// A key identifier appears more than once
    DuplicateKey { key: String },
    /// A key rectangle is malformed
    InvalidKey { key: String, defect: RectDefect },
    /// Target canvas has a non-positive or non-finite size
    InvalidCanvas { width: f64, height: f64 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::EmptyLayout => write!(f, "layout registry cannot be empty"),
            LayoutError::DuplicateKey { key } => write!(f, "duplicate key id {:?}", key),
            LayoutError::InvalidKey { key, defect } => {
                write!(f, "key {:?}: {}", key, defect)
            }
            LayoutError::InvalidCanvas { width, height } => {
                write!(f, "invalid canvas size {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// One key's rectangle in keyboard units (1u = one standard key pitch).
///
/// `x_u`/`y_u`/`width_u`/`height_u` are the raw position and size as
/// published by the layout source; `left_u..bottom_u` is the same box
/// shifted so that the board's top-left corner is the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyRect {
    pub x_u: f64,
    pub y_u: f64,
    pub width_u: f64,
    pub height_u: f64,
    pub left_u: f64,
    pub top_u: f64,
    pub right_u: f64,
    pub bottom_u: f64,
    /// Human-readable legend, if known.
    pub label: Option<String>,
}

impl KeyRect {
    /// Check the rectangle invariants.
    pub fn validate(&self) -> Result<(), RectDefect> {
        let fields = [
            ("x_u", self.x_u),
            ("y_u", self.y_u),
            ("width_u", self.width_u),
            ("height_u", self.height_u),
            ("left_u", self.left_u),
            ("top_u", self.top_u),
            ("right_u", self.right_u),
            ("bottom_u", self.bottom_u),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(RectDefect::NonFinite { field: *field });
        }
        if self.left_u < 0.0 || self.top_u < 0.0 {
            return Err(RectDefect::NegativeOrigin);
        }
        if self.left_u >= self.right_u || self.top_u >= self.bottom_u {
            return Err(RectDefect::EmptyExtent);
        }
        Ok(())
    }
}

/// A key position before normalization: raw unit coordinates as read off
/// the keyboard drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawKeyPosition {
    pub id: String,
    pub x_u: f64,
    pub y_u: f64,
    pub width_u: f64,
    pub height_u: f64,
    pub label: Option<String>,
}

/// Round to four decimal places, the precision of published registries.
fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Validated, immutable key layout registry.
///
/// Keys are held in lexicographic id order. The board extent
/// ([`max_right()`](Self::max_right), [`max_bottom()`](Self::max_bottom))
/// is always positive.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyLayout {
    keys: BTreeMap<String, KeyRect>,
    max_right: f64,
    max_bottom: f64,
}

impl KeyLayout {
    /// Create a layout from validated rectangles.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::EmptyLayout`] if `keys` is empty
    /// - [`LayoutError::InvalidKey`] naming the first malformed key
    pub fn new(keys: BTreeMap<String, KeyRect>) -> Result<Self, LayoutError> {
        if keys.is_empty() {
            return Err(LayoutError::EmptyLayout);
        }
        for (key, rect) in &keys {
            rect.validate().map_err(|defect| LayoutError::InvalidKey {
                key: key.clone(),
                defect,
            })?;
        }
        let max_right = keys.values().map(|r| r.right_u).fold(0.0, f64::max);
        let max_bottom = keys.values().map(|r| r.bottom_u).fold(0.0, f64::max);
        Ok(Self {
            keys,
            max_right,
            max_bottom,
        })
    }

    /// Build a registry from raw key positions.
    ///
    /// The smallest `x_u`/`y_u` across all keys becomes the origin; the
    /// derived `left_u..bottom_u` values are rounded to four decimals.
    ///
    /// ```
    /// use keycap_match::{KeyLayout, RawKeyPosition};
    ///
    /// let raw = |id: &str, x| RawKeyPosition {
    ///     id: id.to_string(),
    ///     x_u: x,
    ///     y_u: -2.0,
    ///     width_u: 1.0,
    ///     height_u: 1.0,
    ///     label: None,
    /// };
    /// let layout = KeyLayout::from_positions(vec![raw("Esc", -0.5), raw("F1", 1.5)]).unwrap();
    /// assert_eq!(layout.get("F1").unwrap().left_u, 2.0);
    /// assert_eq!(layout.max_right(), 3.0);
    /// ```
    ///
    /// # Errors
    ///
    /// - [`LayoutError::EmptyLayout`] if no positions are given
    /// - [`LayoutError::DuplicateKey`] if an id repeats
    /// - [`LayoutError::InvalidKey`] for non-finite or non-positive values
    pub fn from_positions(positions: Vec<RawKeyPosition>) -> Result<Self, LayoutError> {
        for pos in &positions {
            let fields = [
                ("x_u", pos.x_u),
                ("y_u", pos.y_u),
                ("width_u", pos.width_u),
                ("height_u", pos.height_u),
            ];
            if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
                return Err(LayoutError::InvalidKey {
                    key: pos.id.clone(),
                    defect: RectDefect::NonFinite { field: *field },
                });
            }
            if pos.width_u <= 0.0 || pos.height_u <= 0.0 {
                return Err(LayoutError::InvalidKey {
                    key: pos.id.clone(),
                    defect: RectDefect::NonPositiveSize,
                });
            }
        }

        let min_x = positions.iter().map(|p| p.x_u).fold(f64::INFINITY, f64::min);
        let min_y = positions.iter().map(|p| p.y_u).fold(f64::INFINITY, f64::min);

        let mut keys = BTreeMap::new();
        for pos in positions {
            let left = pos.x_u - min_x;
            let top = pos.y_u - min_y;
            let rect = KeyRect {
                x_u: pos.x_u,
                y_u: pos.y_u,
                width_u: pos.width_u,
                height_u: pos.height_u,
                left_u: round4(left),
                top_u: round4(top),
                right_u: round4(left + pos.width_u),
                bottom_u: round4(top + pos.height_u),
                label: pos.label,
            };
            if keys.insert(pos.id.clone(), rect).is_some() {
                return Err(LayoutError::DuplicateKey { key: pos.id });
            }
        }

        Self::new(keys)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&KeyRect> {
        self.keys.get(key)
    }

    /// Keys and rectangles in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyRect)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Key ids in order.
    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Board width in units.
    #[inline]
    pub fn max_right(&self) -> f64 {
        self.max_right
    }

    /// Board height in units.
    #[inline]
    pub fn max_bottom(&self) -> f64 {
        self.max_bottom
    }
}
