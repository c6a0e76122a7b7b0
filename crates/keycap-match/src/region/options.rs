//! Region reducer options.
//!
//! This module provides [`ReducerMode`] and [`ReducerOptions`], the tuning
//! knobs of [`reduce_region()`](super::reduce_region).

use std::fmt;
use std::str::FromStr;

/// Which algorithm turns a pixel region into one representative color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReducerMode {
    /// Frequency histogram over coarse color buckets; returns the average
    /// color of the most populated bucket.
    #[default]
    Simple,
    /// Median-cut quantization into a handful of clusters; returns the
    /// average color of the largest cluster.
    Quantize,
}

impl ReducerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReducerMode::Simple => "simple",
            ReducerMode::Quantize => "quantize",
        }
    }
}

impl fmt::Display for ReducerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown reducer mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(pub String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown reducer mode {:?} (expected \"simple\" or \"quantize\")",
            self.0
        )
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for ReducerMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(ReducerMode::Simple),
            "quantize" => Ok(ReducerMode::Quantize),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Configuration for region color reduction.
///
/// # Defaults
///
/// - mode: [`ReducerMode::Simple`]
/// - bucket size: 8 (channels collapse to multiples of 8)
/// - sample limit: 1000 pixels per region in simple mode
/// - alpha thresholds: 128 (simple), 125 (quantize)
/// - clusters: 4 requested, clamped to 2..=4
///
/// # Example
///
/// ```
/// use keycap_match::{ReducerMode, ReducerOptions};
///
/// let options = ReducerOptions::new()
///     .mode(ReducerMode::Quantize)
///     .clusters(3);
/// assert_eq!(options.mode, ReducerMode::Quantize);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReducerOptions {
    /// Algorithm selection.
    pub mode: ReducerMode,

    /// Width of a histogram bucket per channel (simple mode).
    ///
    /// A value of 0 is treated as 1.
    pub bucket_size: u8,

    /// Upper bound on evenly spaced samples taken per region (simple mode).
    pub sample_limit: usize,

    /// Pixels with alpha below this are ignored in simple mode.
    pub simple_alpha_threshold: u8,

    /// Pixels with alpha below this are ignored in quantize mode.
    pub quantize_alpha_threshold: u8,

    /// Requested cluster count (quantize mode).
    pub clusters: usize,

    /// Lower clamp for the cluster count.
    pub min_clusters: usize,

    /// Upper clamp for the cluster count.
    pub max_clusters: usize,
}

impl Default for ReducerOptions {
    fn default() -> Self {
        Self {
            mode: ReducerMode::Simple,
            bucket_size: 8,
            sample_limit: 1000,
            simple_alpha_threshold: 128,
            quantize_alpha_threshold: 125,
            clusters: 4,
            min_clusters: 2,
            max_clusters: 4,
        }
    }
}

impl ReducerOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mode(mut self, mode: ReducerMode) -> Self {
        self.mode = mode;
        self
    }

    #[inline]
    pub fn bucket_size(mut self, size: u8) -> Self {
        self.bucket_size = size;
        self
    }

    #[inline]
    pub fn sample_limit(mut self, limit: usize) -> Self {
        self.sample_limit = limit;
        self
    }

    #[inline]
    pub fn simple_alpha_threshold(mut self, threshold: u8) -> Self {
        self.simple_alpha_threshold = threshold;
        self
    }

    #[inline]
    pub fn quantize_alpha_threshold(mut self, threshold: u8) -> Self {
        self.quantize_alpha_threshold = threshold;
        self
    }

    #[inline]
    pub fn clusters(mut self, clusters: usize) -> Self {
        self.clusters = clusters;
        self
    }

    /// Set the clamp range for the cluster count.
    #[inline]
    pub fn cluster_range(mut self, min: usize, max: usize) -> Self {
        self.min_clusters = min;
        self.max_clusters = max;
        self
    }

    /// Cluster count actually used for `samples` opaque pixels: the
    /// requested count clamped to the configured range, never more than
    /// the number of samples and never less than one.
    pub fn effective_clusters(&self, samples: usize) -> usize {
        let lo = self.min_clusters.max(1);
        let hi = self.max_clusters.max(lo);
        self.clusters.clamp(lo, hi).min(samples).max(1)
    }
}
