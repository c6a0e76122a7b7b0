//! sRGB color type
//!
//! sRGB is the standard color space for display and storage of images.
//! Every color entering or leaving the crate (image pixels, palette
//! references, preview hex strings) is an 8-bit sRGB triplet.

use std::fmt;
use std::str::FromStr;

use crate::palette::ParseColorError;

/// A color in sRGB color space with 8-bit channels.
///
/// Use this type for input/output (image pixels, palette files, previews).
/// Convert to [`Lab`](super::Lab) for perceptual comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Srgb {
    /// Red channel (gamma-corrected, 0..=255)
    pub r: u8,
    /// Green channel (gamma-corrected, 0..=255)
    pub g: u8,
    /// Blue channel (gamma-corrected, 0..=255)
    pub b: u8,
}

impl Srgb {
    /// Neutral mid-gray returned whenever a region cannot be sampled.
    pub const NEUTRAL_GRAY: Srgb = Srgb::new(128, 128, 128);

    /// Create an Srgb color from 8-bit channel values.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an Srgb color from a byte array [R, G, B].
    ///
    /// # Example
    /// ```
    /// use keycap_match::Srgb;
    /// let white = Srgb::from_bytes([255, 255, 255]);
    /// assert_eq!(white.r, 255);
    /// ```
    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Build a color from loosely typed channel values, as found in JSON
    /// palette files.
    ///
    /// # Errors
    ///
    /// - [`ParseColorError::WrongArity`] unless exactly three channels are given
    /// - [`ParseColorError::OutOfRange`] if a channel lies outside 0..=255
    ///
    /// # Example
    /// ```
    /// use keycap_match::{ParseColorError, Srgb};
    ///
    /// assert_eq!(Srgb::try_from_channels(&[12, 34, 56]), Ok(Srgb::new(12, 34, 56)));
    /// assert_eq!(
    ///     Srgb::try_from_channels(&[12, 34]),
    ///     Err(ParseColorError::WrongArity { len: 2 })
    /// );
    /// ```
    pub fn try_from_channels(channels: &[i64]) -> Result<Self, ParseColorError> {
        let [r, g, b] = channels else {
            return Err(ParseColorError::WrongArity {
                len: channels.len(),
            });
        };
        let channel = |index: usize, value: i64| {
            u8::try_from(value).map_err(|_| ParseColorError::OutOfRange { index, value })
        };
        Ok(Self::new(channel(0, *r)?, channel(1, *g)?, channel(2, *b)?))
    }

    /// Format as an uppercase `#RRGGBB` hex string.
    ///
    /// ```
    /// use keycap_match::Srgb;
    /// assert_eq!(Srgb::new(255, 0, 171).to_hex(), "#FF00AB");
    /// ```
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Srgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Srgb {
    type Err = ParseColorError;

    /// Parse an sRGB color from a hex string.
    ///
    /// Supports the following formats:
    /// - `#RRGGBB` - standard 6-digit hex with hash
    /// - `RRGGBB` - standard 6-digit hex without hash
    /// - `#RGB` - shorthand 3-digit hex with hash (expands to RRGGBB)
    /// - `RGB` - shorthand 3-digit hex without hash
    ///
    /// Parsing is case-insensitive. Leading and trailing whitespace is trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use keycap_match::Srgb;
    ///
    /// let white: Srgb = "#FFFFFF".parse().unwrap();
    /// assert_eq!(white, Srgb::new(255, 255, 255));
    ///
    /// let red: Srgb = "#F00".parse().unwrap();
    /// assert_eq!(red, Srgb::new(255, 0, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                // Shorthand: expand each digit by multiplying by 17 (0xF -> 0xFF)
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}
