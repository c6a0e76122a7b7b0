use std::path::PathBuf;

use keycap_match::{LayoutError, MapError, PaletteError};
use thiserror::Error;

/// Failure to read or validate one of the input files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{what} must be a JSON object")]
    NotAnObject { what: &'static str },

    #[error("Palette has no entries")]
    EmptyPalette,

    #[error("Invalid palette: {0}")]
    Palette(#[from] PaletteError),

    #[error("Layout entry {key:?}: {reason}")]
    LayoutEntry { key: String, reason: String },

    #[error("Invalid layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure to encode an output image.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Fatal failure of a whole `generate` run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Configuration error: {0}")]
    Load(#[from] LoadError),

    #[error("Mapping error: {0}")]
    Map(#[from] MapError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Output error for {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
