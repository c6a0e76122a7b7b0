//! Unit-space to pixel-space mapping of key rectangles.

use std::collections::BTreeMap;

use super::registry::{KeyLayout, LayoutError};

/// A key's pixel box, half-open: `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelBox {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl PixelBox {
    #[inline]
    pub const fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.x1.saturating_sub(self.x0)
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.y1.saturating_sub(self.y0)
    }

    /// True when the box covers no pixel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Shift the box by `(dx, dy)`, saturating at the `i64` range.
    #[inline]
    pub fn translate(self, dx: i64, dy: i64) -> Self {
        Self::new(
            self.x0.saturating_add(dx),
            self.y0.saturating_add(dy),
            self.x1.saturating_add(dx),
            self.y1.saturating_add(dy),
        )
    }

    /// Clamp the box to `[0, width] x [0, height]`. A box lying fully
    /// outside becomes empty.
    pub fn clip(self, width: i64, height: i64) -> Self {
        Self::new(
            self.x0.clamp(0, width),
            self.y0.clamp(0, height),
            self.x1.clamp(0, width),
            self.y1.clamp(0, height),
        )
    }

    pub fn to_array(self) -> [i64; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }
}

/// Map every key of `layout` onto a `canvas_width x canvas_height` canvas.
///
/// Horizontal and vertical scales are independent
/// (`canvas_width / max_right`, `canvas_height / max_bottom`) and every
/// coordinate is floored, so the right-most and bottom-most boxes never
/// extend past the canvas. Key aspect ratios are not preserved when the
/// canvas aspect differs from the board's.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidCanvas`] if either dimension is not a
/// positive finite number.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use keycap_match::{build_bounding_boxes, KeyLayout, KeyRect, PixelBox};
///
/// let key = |l: f64, r: f64| KeyRect {
///     x_u: l, y_u: 0.0, width_u: r - l, height_u: 1.0,
///     left_u: l, top_u: 0.0, right_u: r, bottom_u: 1.0, label: None,
/// };
/// let layout = KeyLayout::new(BTreeMap::from([
///     ("A".to_string(), key(0.0, 1.0)),
///     ("B".to_string(), key(1.0, 2.0)),
/// ])).unwrap();
///
/// let boxes = build_bounding_boxes(200.0, 100.0, &layout).unwrap();
/// assert_eq!(boxes["B"], PixelBox::new(100, 0, 200, 100));
/// ```
pub fn build_bounding_boxes(
    canvas_width: f64,
    canvas_height: f64,
    layout: &KeyLayout,
) -> Result<BTreeMap<String, PixelBox>, LayoutError> {
    if !(canvas_width.is_finite()
        && canvas_height.is_finite()
        && canvas_width > 0.0
        && canvas_height > 0.0)
    {
        return Err(LayoutError::InvalidCanvas {
            width: canvas_width,
            height: canvas_height,
        });
    }

    let px_per_unit_x = canvas_width / layout.max_right();
    let px_per_unit_y = canvas_height / layout.max_bottom();

    Ok(layout
        .iter()
        .map(|(key, rect)| {
            let bbox = PixelBox::new(
                (rect.left_u * px_per_unit_x).floor() as i64,
                (rect.top_u * px_per_unit_y).floor() as i64,
                (rect.right_u * px_per_unit_x).floor() as i64,
                (rect.bottom_u * px_per_unit_y).floor() as i64,
            );
            (key.to_string(), bbox)
        })
        .collect())
}
