//! Source image decoding to 8-bit RGBA.
//!
//! Any format the `image` crate recognises is accepted (PNG, JPEG, BMP,
//! GIF, TIFF, WebP, ...). The format is guessed from the file contents, so
//! a misnamed extension still decodes.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageReader};
use keycap_match::{PixelBuffer, RegionError};

use crate::error::LoadError;

/// Decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaImage {
    /// Borrow as a validated pixel buffer.
    pub fn buffer(&self) -> Result<PixelBuffer<'_>, RegionError> {
        PixelBuffer::new(&self.data, self.width as usize, self.height as usize)
    }
}

impl From<DynamicImage> for RgbaImage {
    fn from(image: DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            data: rgba.into_raw(),
        }
    }
}

pub fn load_image(path: &Path) -> Result<RgbaImage, LoadError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| LoadError::io(path, e))?;
    let format = reader.format();
    let image = RgbaImage::from(reader.decode()?);
    tracing::info!(
        path = %path.display(),
        format = ?format,
        width = image.width,
        height = image.height,
        "Decoded image"
    );
    Ok(image)
}

/// Decode an in-memory image of any supported format.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, LoadError> {
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| LoadError::ImageDecode(e.into()))?
        .decode()?;
    Ok(RgbaImage::from(image))
}
