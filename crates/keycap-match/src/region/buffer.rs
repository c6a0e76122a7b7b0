//! RGBA pixel buffers and clipped sub-regions.

use std::fmt;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Error type for pixel buffer construction and region clipping.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionError {
    /// Buffer width or height is zero
    EmptyBuffer { width: usize, height: usize },
    /// Byte slice length does not equal `width * height * 4`
    BufferSize { expected: usize, actual: usize },
    /// Requested region has a non-positive or non-finite size
    InvalidExtent { width: f64, height: f64 },
    /// Requested region origin is not a finite number
    InvalidOrigin { x: f64, y: f64 },
    /// Region origin lies at or beyond the buffer edge
    OutsideBuffer { x: usize, y: usize },
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionError::EmptyBuffer { width, height } => {
                write!(f, "pixel buffer has zero size ({}x{})", width, height)
            }
            RegionError::BufferSize { expected, actual } => {
                write!(
                    f,
                    "pixel buffer holds {} bytes, expected {}",
                    actual, expected
                )
            }
            RegionError::InvalidExtent { width, height } => {
                write!(f, "invalid region size {}x{}", width, height)
            }
            RegionError::InvalidOrigin { x, y } => {
                write!(f, "invalid region origin ({}, {})", x, y)
            }
            RegionError::OutsideBuffer { x, y } => {
                write!(f, "region origin ({}, {}) lies outside the buffer", x, y)
            }
        }
    }
}

impl std::error::Error for RegionError {}

/// A borrowed row-major RGBA8 image.
///
/// The pixel at `(col, row)` starts at byte `(row * width + col) * 4`.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap an RGBA8 byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::EmptyBuffer`] for a zero dimension and
    /// [`RegionError::BufferSize`] when the slice length does not match.
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Result<Self, RegionError> {
        if width == 0 || height == 0 {
            return Err(RegionError::EmptyBuffer { width, height });
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .unwrap_or(usize::MAX);
        if data.len() != expected {
            return Err(RegionError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// RGBA value at `(col, row)`. Caller guarantees the coordinate is in
    /// bounds.
    #[inline]
    pub fn pixel(&self, col: usize, row: usize) -> [u8; 4] {
        let offset = (row * self.width + col) * CHANNELS;
        let px = &self.data[offset..offset + CHANNELS];
        [px[0], px[1], px[2], px[3]]
    }

    /// Clip a requested rectangle to the buffer.
    ///
    /// The origin is floored and clamped to be non-negative; the size is
    /// floored, raised to at least one pixel and truncated at the buffer
    /// edge. The result therefore never reads outside the buffer.
    ///
    /// # Errors
    ///
    /// - [`RegionError::InvalidExtent`] if `width` or `height` is not a
    ///   positive finite number
    /// - [`RegionError::InvalidOrigin`] if `x` or `y` is NaN or infinite
    /// - [`RegionError::OutsideBuffer`] if the clamped origin lies past the
    ///   right or bottom edge
    pub fn clip(&self, x: f64, y: f64, width: f64, height: f64) -> Result<Region, RegionError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RegionError::InvalidExtent { width, height });
        }
        if !(x.is_finite() && y.is_finite()) {
            return Err(RegionError::InvalidOrigin { x, y });
        }

        let x0 = x.floor().max(0.0) as usize;
        let y0 = y.floor().max(0.0) as usize;
        if x0 >= self.width || y0 >= self.height {
            return Err(RegionError::OutsideBuffer { x: x0, y: y0 });
        }

        let w = (width.floor().max(1.0) as usize).min(self.width - x0);
        let h = (height.floor().max(1.0) as usize).min(self.height - y0);

        Ok(Region {
            x: x0,
            y: y0,
            width: w,
            height: h,
        })
    }
}

/// A non-empty rectangle known to lie inside its [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// RGBA value of the `index`-th pixel in row-major region order.
    #[inline]
    pub fn nth(&self, buffer: &PixelBuffer<'_>, index: usize) -> [u8; 4] {
        buffer.pixel(self.x + index % self.width, self.y + index / self.width)
    }

    /// All pixels of the region in row-major order.
    pub fn pixels<'b>(&self, buffer: &'b PixelBuffer<'_>) -> impl Iterator<Item = [u8; 4]> + 'b {
        let region = *self;
        (region.y..region.y + region.height).flat_map(move |row| {
            (region.x..region.x + region.width).map(move |col| buffer.pixel(col, row))
        })
    }
}
