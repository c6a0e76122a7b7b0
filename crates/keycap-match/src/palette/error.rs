//! Error types for palette operations
//!
//! This module provides error types for color parsing and palette validation.

use std::fmt;
use std::num::ParseIntError;

/// Error type for parsing colors from hex strings or raw channel lists.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    InvalidLength,
    /// Invalid hexadecimal character encountered
    InvalidHex(ParseIntError),
    /// Channel list does not hold exactly three values
    WrongArity {
        /// Number of channels provided
        len: usize,
    },
    /// Channel is not an integer
    NotAnInteger {
        /// Channel position (0 = red, 1 = green, 2 = blue)
        index: usize,
    },
    /// Channel value outside 0..=255
    OutOfRange {
        /// Channel position (0 = red, 1 = green, 2 = blue)
        index: usize,
        /// Offending value
        value: i64,
    },
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3 or 6 characters)")
            }
            ParseColorError::InvalidHex(err) => {
                write!(f, "invalid hex character: {}", err)
            }
            ParseColorError::WrongArity { len } => {
                write!(f, "expected 3 color channels, got {}", len)
            }
            ParseColorError::NotAnInteger { index } => {
                write!(f, "channel {} is not an integer", index)
            }
            ParseColorError::OutOfRange { index, value } => {
                write!(f, "channel {} value {} outside 0..=255", index, value)
            }
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

/// Error type for palette validation.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// No entries provided where a usable palette is required
    EmptyPalette,
    /// The same code appears more than once
    DuplicateCode {
        /// The repeated palette code
        code: String,
    },
    /// Invalid color in a palette definition
    ParseColor(ParseColorError),
}

impl From<ParseColorError> for PaletteError {
    fn from(err: ParseColorError) -> Self {
        PaletteError::ParseColor(err)
    }
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::EmptyPalette => {
                write!(f, "palette cannot be empty")
            }
            PaletteError::DuplicateCode { code } => {
                write!(f, "duplicate palette code {:?}", code)
            }
            PaletteError::ParseColor(err) => {
                write!(f, "invalid color: {}", err)
            }
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PaletteError::ParseColor(err) => Some(err),
            _ => None,
        }
    }
}
