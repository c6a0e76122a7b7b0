//! KeycapMapper -- the orchestration entry point of the crate.
//!
//! [`KeycapMapper`] ties a layout and a palette together and turns a canvas
//! plus an overlay rectangle into a [`KeyAssignment`].

use crate::color::Srgb;
use crate::layout::{build_bounding_boxes, KeyLayout, PixelBox};
use crate::output::{AssignmentSource, KeyAssignment, KeyColor};
use crate::palette::{PaletteError, PaletteMatch, ReferencePalette, NO_MATCH_CODE};
use crate::region::{try_reduce_region, PixelBuffer, ReducerMode, ReducerOptions};

use super::MapError;

/// The rectangle on the canvas that the keyboard layout is stretched over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Overlay {
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Overlay covering the whole canvas.
    pub fn covering(canvas: &PixelBuffer<'_>) -> Self {
        Self::new(0.0, 0.0, canvas.width() as f64, canvas.height() as f64)
    }

    /// Check that the overlay has a finite origin and positive finite size.
    pub fn validate(&self) -> Result<(), MapError> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.width <= 0.0 || self.height <= 0.0 {
            return Err(MapError::InvalidOverlay {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Maps image regions under a keyboard layout to palette codes.
///
/// # Design
///
/// - Borrows the process-wide layout and palette; holds no per-run state
/// - [`process_region()`](Self::process_region) takes `&self`, so one
///   mapper serves any number of runs
/// - Fatal problems return [`MapError`] before any key is processed;
///   per-key problems are recorded on the assignment and logged
///
/// # Example
///
/// ```
/// use keycap_match::{
///     KeyLayout, KeycapMapper, Overlay, PixelBuffer, RawKeyPosition, ReferencePalette, Srgb,
/// };
///
/// let key = |id: &str, x| RawKeyPosition {
///     id: id.to_string(), x_u: x, y_u: 0.0, width_u: 1.0, height_u: 1.0, label: None,
/// };
/// let layout = KeyLayout::from_positions(vec![key("A", 0.0), key("B", 1.0)]).unwrap();
/// let palette = ReferencePalette::from_colors([
///     ("R", Srgb::new(255, 0, 0)),
///     ("K", Srgb::new(0, 0, 0)),
/// ]).unwrap();
///
/// // 4x2 canvas: left half red, right half black.
/// let mut data = Vec::new();
/// for _ in 0..2 {
///     data.extend([255, 0, 0, 255].repeat(2));
///     data.extend([0, 0, 0, 255].repeat(2));
/// }
/// let canvas = PixelBuffer::new(&data, 4, 2).unwrap();
///
/// let mapper = KeycapMapper::new(&layout, &palette).unwrap();
/// let assignment = mapper.process_region(&canvas, Overlay::covering(&canvas)).unwrap();
/// assert_eq!(assignment.code("A"), Some("R"));
/// assert_eq!(assignment.code("B"), Some("K"));
/// ```
#[derive(Debug, Clone)]
pub struct KeycapMapper<'a> {
    layout: &'a KeyLayout,
    palette: &'a ReferencePalette,
    options: ReducerOptions,
}

impl<'a> KeycapMapper<'a> {
    /// Create a mapper with default reducer options.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Palette`] with [`PaletteError::EmptyPalette`] if
    /// the palette has no entries at all.
    pub fn new(layout: &'a KeyLayout, palette: &'a ReferencePalette) -> Result<Self, MapError> {
        if palette.is_empty() {
            return Err(PaletteError::EmptyPalette.into());
        }
        if palette.valid_len() == 0 {
            tracing::warn!(
                entries = palette.len(),
                "palette has no valid entries; every key will get {}",
                NO_MATCH_CODE
            );
        }
        Ok(Self {
            layout,
            palette,
            options: ReducerOptions::default(),
        })
    }

    /// Select the reducer algorithm.
    #[inline]
    pub fn mode(mut self, mode: ReducerMode) -> Self {
        self.options.mode = mode;
        self
    }

    /// Replace all reducer options.
    #[inline]
    pub fn options(mut self, options: ReducerOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn reducer_options(&self) -> &ReducerOptions {
        &self.options
    }

    #[inline]
    pub fn layout(&self) -> &'a KeyLayout {
        self.layout
    }

    #[inline]
    pub fn palette(&self) -> &'a ReferencePalette {
        self.palette
    }

    /// Assign a palette code to every key of the layout.
    ///
    /// Key boxes are computed for the overlay's size, shifted by its
    /// (floored) offset and clipped to the canvas. Keys whose clipped box is
    /// empty, or whose pixels cannot be read, receive the palette's default
    /// code and a warning. All other keys get the code nearest to their
    /// region's representative color.
    ///
    /// # Errors
    ///
    /// - [`MapError::InvalidOverlay`] for a non-positive or non-finite overlay
    /// - [`MapError::Layout`] if the boxes cannot be built
    ///
    /// No partial assignment is returned on error.
    pub fn process_region(
        &self,
        canvas: &PixelBuffer<'_>,
        overlay: Overlay,
    ) -> Result<KeyAssignment, MapError> {
        overlay.validate()?;
        let boxes = build_bounding_boxes(overlay.width, overlay.height, self.layout)?;

        let dx = overlay.x.floor() as i64;
        let dy = overlay.y.floor() as i64;
        let canvas_w = canvas.width() as i64;
        let canvas_h = canvas.height() as i64;

        tracing::debug!(
            keys = boxes.len(),
            mode = %self.options.mode,
            canvas_w,
            canvas_h,
            "mapping keys"
        );

        let mut assignment = KeyAssignment::new();
        for (key, bbox) in boxes {
            let clipped = bbox.translate(dx, dy).clip(canvas_w, canvas_h);
            let color = self.assign_key(&key, canvas, clipped);
            assignment.insert(key, color);
        }

        Ok(assignment)
    }

    fn assign_key(&self, key: &str, canvas: &PixelBuffer<'_>, bbox: PixelBox) -> KeyColor {
        if bbox.is_empty() {
            tracing::warn!(key, "key lies outside the canvas; using default color");
            return self.default_color(AssignmentSource::OffCanvas);
        }

        let sample = match try_reduce_region(
            canvas,
            bbox.x0 as f64,
            bbox.y0 as f64,
            bbox.width() as f64,
            bbox.height() as f64,
            &self.options,
        ) {
            Ok(sample) => sample.unwrap_or(Srgb::NEUTRAL_GRAY),
            Err(reason) => {
                tracing::warn!(key, error = %reason, "cannot sample key; using default color");
                return self.default_color(AssignmentSource::SamplingFailed { reason });
            }
        };

        let matched = self.palette.nearest(sample);
        let source = match matched {
            PaletteMatch::Nearest { distance, .. } => AssignmentSource::Sampled {
                sample,
                delta_e: distance,
            },
            PaletteMatch::Fallback { reason, .. } | PaletteMatch::NoMatch { reason } => {
                tracing::warn!(key, code = matched.code(), "no palette match for key");
                AssignmentSource::MatchFallback { sample, reason }
            }
        };
        KeyColor {
            code: matched.code().to_string(),
            rgb: matched.srgb(),
            source,
        }
    }

    /// Default entry of the palette, or the no-match sentinel.
    fn default_color(&self, source: AssignmentSource) -> KeyColor {
        match self.palette.default_entry() {
            Some(entry) => KeyColor {
                code: entry.code().to_string(),
                rgb: entry.srgb().unwrap_or(Srgb::NEUTRAL_GRAY),
                source,
            },
            None => KeyColor {
                code: NO_MATCH_CODE.to_string(),
                rgb: Srgb::NEUTRAL_GRAY,
                source,
            },
        }
    }
}
