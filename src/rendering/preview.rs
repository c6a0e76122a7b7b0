//! Keyboard preview rendering.
//!
//! Paints each key's bounding box with its assigned reference color and
//! encodes the result as an RGBA PNG.

use std::io::Cursor;

use keycap_match::{build_bounding_boxes, KeyAssignment, KeyLayout, PixelBox, Srgb};

use crate::error::RenderError;

/// Canvas color between keys.
const BACKGROUND: [u8; 4] = [64, 64, 64, 255];

/// Pixels left unpainted on each side of a key so neighbours stay apart.
const KEY_GAP: i64 = 1;

/// Longest side of a preview image, in pixels.
pub const MAX_PREVIEW_SIDE: u32 = 2048;

/// Preview dimensions for an overlay of `width` x `height` pixels.
///
/// Keeps the overlay's aspect ratio, scaled down so neither side exceeds
/// [`MAX_PREVIEW_SIDE`]. Each side is at least 1.
pub fn preview_size(width: f64, height: f64) -> (u32, u32) {
    let max = MAX_PREVIEW_SIDE as f64;
    let longest = width.max(height);
    let side = |v: f64| {
        let scaled = if longest > max { v / longest * max } else { v };
        scaled.floor().clamp(1.0, max) as u32
    };
    (side(width), side(height))
}

/// Render the assignment onto a `width` x `height` board preview.
///
/// Both sides must lie in `1..=MAX_PREVIEW_SIDE`; see [`preview_size`].
pub fn render_preview(
    layout: &KeyLayout,
    assignment: &KeyAssignment,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, RenderError> {
    if width == 0 || height == 0 || width > MAX_PREVIEW_SIDE || height > MAX_PREVIEW_SIDE {
        return Err(RenderError::UnsupportedDimensions { width, height });
    }

    let boxes = build_bounding_boxes(width as f64, height as f64, layout)?;
    let mut pixels = BACKGROUND.repeat(width as usize * height as usize);

    for (key, bbox) in &boxes {
        let Some(color) = assignment.get(key) else {
            continue;
        };
        let bbox = inset(bbox.clip(width as i64, height as i64));
        fill(&mut pixels, width as usize, bbox, color.rgb);
    }

    let png_bytes = encode_rgba(&pixels, width, height)?;

    // Re-compress with oxipng
    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes);

    tracing::debug!(width, height, keys = boxes.len(), bytes = optimized.len(), "Rendered preview");
    Ok(optimized)
}

/// Shrink by [`KEY_GAP`] when the box is large enough to keep a body.
fn inset(bbox: PixelBox) -> PixelBox {
    if bbox.width() > 2 * KEY_GAP && bbox.height() > 2 * KEY_GAP {
        PixelBox::new(
            bbox.x0 + KEY_GAP,
            bbox.y0 + KEY_GAP,
            bbox.x1 - KEY_GAP,
            bbox.y1 - KEY_GAP,
        )
    } else {
        bbox
    }
}

fn fill(pixels: &mut [u8], width: usize, bbox: PixelBox, color: Srgb) {
    if bbox.is_empty() {
        return;
    }
    let rgba = [color.r, color.g, color.b, 255];
    for row in bbox.y0 as usize..bbox.y1 as usize {
        let start = (row * width + bbox.x0 as usize) * 4;
        let end = (row * width + bbox.x1 as usize) * 4;
        for px in pixels[start..end].chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }
}

/// Encode PNG (fast settings, oxipng re-compresses afterwards)
fn encode_rgba(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(pixels)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::image_loader::decode_image;
    use keycap_match::{AssignmentSource, KeyColor, RawKeyPosition};

    fn layout() -> KeyLayout {
        let key = |id: &str, x: f64| RawKeyPosition {
            id: id.to_string(),
            x_u: x,
            y_u: 0.0,
            width_u: 1.0,
            height_u: 1.0,
            label: None,
        };
        KeyLayout::from_positions(vec![key("A", 0.0), key("B", 1.0)]).unwrap()
    }

    fn color(code: &str, rgb: Srgb) -> KeyColor {
        KeyColor {
            code: code.to_string(),
            rgb,
            source: AssignmentSource::OffCanvas,
        }
    }

    #[test]
    fn test_preview_paints_key_centers() {
        let mut assignment = KeyAssignment::new();
        assignment.insert("A", color("R", Srgb::new(255, 0, 0)));
        assignment.insert("B", color("G", Srgb::new(0, 255, 0)));

        let png = render_preview(&layout(), &assignment, 40, 20).unwrap();
        let image = decode_image(&png).unwrap();
        let buffer = image.buffer().unwrap();

        assert_eq!((image.width, image.height), (40, 20));
        assert_eq!(buffer.pixel(10, 10), [255, 0, 0, 255]);
        assert_eq!(buffer.pixel(30, 10), [0, 255, 0, 255]);
        assert_eq!(buffer.pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn test_unassigned_key_left_as_background() {
        let mut assignment = KeyAssignment::new();
        assignment.insert("A", color("R", Srgb::new(255, 0, 0)));

        let png = render_preview(&layout(), &assignment, 40, 20).unwrap();
        let image = decode_image(&png).unwrap();
        assert_eq!(image.buffer().unwrap().pixel(30, 10), BACKGROUND);
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = render_preview(&layout(), &KeyAssignment::new(), 0, 10).unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnsupportedDimensions {
                width: 0,
                height: 10
            }
        ));
    }

    #[test]
    fn test_oversized_preview_rejected() {
        let err = render_preview(&layout(), &KeyAssignment::new(), MAX_PREVIEW_SIDE + 1, 10)
            .unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedDimensions { .. }));
    }

    #[test]
    fn test_preview_size_keeps_small_overlays() {
        assert_eq!(preview_size(400.0, 150.9), (400, 150));
        assert_eq!(preview_size(0.2, 0.5), (1, 1));
    }

    #[test]
    fn test_preview_size_scales_large_overlays() {
        assert_eq!(preview_size(8192.0, 2048.0), (2048, 512));
        assert_eq!(preview_size(100.0, 1e9), (1, 2048));
        assert_eq!(preview_size(1e19, 1e19), (2048, 2048));
    }
}
