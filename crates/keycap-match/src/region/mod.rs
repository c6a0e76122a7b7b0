//! Region color reduction.
//!
//! Turns a rectangular block of RGBA pixels into one representative sRGB
//! color. Two interchangeable algorithms are available through
//! [`ReducerMode`]:
//!
//! - **Simple** ([`FrequencyHistogram`]): most frequent coarse color bucket
//! - **Quantize** ([`MedianCut`]): largest median-cut cluster
//!
//! # Architecture
//!
//! Both algorithms implement the [`Reduce`] trait and only ever see a
//! [`Region`] already clipped to its [`PixelBuffer`]. [`reduce_region()`]
//! does the clipping and maps every failure to [`Srgb::NEUTRAL_GRAY`], so a
//! bad region never aborts a batch.

mod buffer;
mod histogram;
mod median_cut;
mod options;

pub use buffer::{PixelBuffer, Region, RegionError, CHANNELS};
pub use histogram::FrequencyHistogram;
pub use median_cut::MedianCut;
pub use options::{ParseModeError, ReducerMode, ReducerOptions};

use crate::color::Srgb;

/// Trait for region color reducers.
pub trait Reduce {
    /// Reduce a clipped region to one color.
    ///
    /// Returns `None` when no pixel passes the alpha filter.
    fn reduce(
        &self,
        buffer: &PixelBuffer<'_>,
        region: Region,
        options: &ReducerOptions,
    ) -> Option<Srgb>;
}

/// Reduce a region to its representative color, reporting why it could
/// not be sampled instead of substituting gray.
///
/// # Errors
///
/// Returns the clipping error from [`PixelBuffer::clip()`]. `Ok(None)`
/// means the region was valid but fully transparent.
pub fn try_reduce_region(
    buffer: &PixelBuffer<'_>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    options: &ReducerOptions,
) -> Result<Option<Srgb>, RegionError> {
    let region = buffer.clip(x, y, width, height)?;
    let color = match options.mode {
        ReducerMode::Simple => FrequencyHistogram.reduce(buffer, region, options),
        ReducerMode::Quantize => MedianCut.reduce(buffer, region, options),
    };
    Ok(color)
}

/// Reduce a sub-rectangle of `buffer` to one representative color.
///
/// Never fails: a missing buffer, a non-positive size, a region entirely
/// outside the buffer, or a region without opaque pixels all yield
/// [`Srgb::NEUTRAL_GRAY`].
///
/// # Example
///
/// ```
/// use keycap_match::{reduce_region, PixelBuffer, ReducerMode, ReducerOptions, Srgb};
///
/// let data = [200, 10, 10, 255].repeat(16);
/// let buffer = PixelBuffer::new(&data, 4, 4).unwrap();
///
/// for mode in [ReducerMode::Simple, ReducerMode::Quantize] {
///     let options = ReducerOptions::new().mode(mode);
///     let color = reduce_region(Some(&buffer), 0.0, 0.0, 4.0, 4.0, &options);
///     assert_eq!(color, Srgb::new(200, 10, 10));
/// }
///
/// let gray = reduce_region(None, 0.0, 0.0, 4.0, 4.0, &ReducerOptions::new());
/// assert_eq!(gray, Srgb::NEUTRAL_GRAY);
/// ```
pub fn reduce_region(
    buffer: Option<&PixelBuffer<'_>>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    options: &ReducerOptions,
) -> Srgb {
    let Some(buffer) = buffer else {
        tracing::debug!("no pixel buffer, using neutral gray");
        return Srgb::NEUTRAL_GRAY;
    };
    match try_reduce_region(buffer, x, y, width, height, options) {
        Ok(Some(color)) => color,
        Ok(None) => {
            tracing::debug!(x, y, width, height, "no opaque pixels in region");
            Srgb::NEUTRAL_GRAY
        }
        Err(err) => {
            tracing::debug!(error = %err, "region not sampled");
            Srgb::NEUTRAL_GRAY
        }
    }
}
