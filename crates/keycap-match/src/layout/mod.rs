//! Keyboard layouts and their pixel-space bounding boxes.

mod bbox;
mod registry;

pub use bbox::{build_bounding_boxes, PixelBox};
pub use registry::{KeyLayout, KeyRect, LayoutError, RawKeyPosition, RectDefect};
