//! Keycap reference palettes and nearest-code matching.

mod error;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use palette::{
    nearest_code, FallbackReason, PaletteEntry, PaletteMatch, ReferencePalette, NO_MATCH_CODE,
};
