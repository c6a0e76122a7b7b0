//! Reference palette of manufacturable keycap colors and nearest-code
//! matching.
//!
//! A [`ReferencePalette`] maps short color codes (e.g. `"BL31"`) to measured
//! reference colors. Matching converts the query color to CIE L*a*b* once,
//! scans every valid entry and keeps the entry with the smallest ΔE*ab.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::str::FromStr;

use super::error::{PaletteError, ParseColorError};
use crate::color::{Lab, Srgb};

/// Code reported when no palette entry could be matched at all.
pub const NO_MATCH_CODE: &str = "NO_MATCH";

/// One palette entry: a code plus its reference color.
///
/// Entries whose color failed validation are kept (with the defect
/// recorded) so that palette order and "first valid entry" stay meaningful;
/// matching skips them.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    code: String,
    reference: Result<Reference, ParseColorError>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Reference {
    srgb: Srgb,
    lab: Lab,
}

impl PaletteEntry {
    /// Create a valid entry. The L*a*b* form is precomputed here.
    pub fn new(code: impl Into<String>, srgb: Srgb) -> Self {
        Self {
            code: code.into(),
            reference: Ok(Reference {
                srgb,
                lab: Lab::from(srgb),
            }),
        }
    }

    /// Create an entry from raw channel values; invalid channels yield a
    /// malformed entry instead of an error.
    pub fn from_channels(code: impl Into<String>, channels: &[i64]) -> Self {
        let code = code.into();
        match Srgb::try_from_channels(channels) {
            Ok(srgb) => Self::new(code, srgb),
            Err(err) => Self::malformed(code, err),
        }
    }

    /// Create an entry whose reference color is unusable.
    pub fn malformed(code: impl Into<String>, defect: ParseColorError) -> Self {
        Self {
            code: code.into(),
            reference: Err(defect),
        }
    }

    /// The palette code.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Reference color, if the entry is valid.
    #[inline]
    pub fn srgb(&self) -> Option<Srgb> {
        self.reference.as_ref().ok().map(|r| r.srgb)
    }

    /// Reference color in L*a*b*, if the entry is valid.
    #[inline]
    pub fn lab(&self) -> Option<Lab> {
        self.reference.as_ref().ok().map(|r| r.lab)
    }

    /// Why the entry is unusable, if it is.
    #[inline]
    pub fn defect(&self) -> Option<&ParseColorError> {
        self.reference.as_ref().err()
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.reference.is_ok()
    }
}

/// Why a match did not come from a distance scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The query color did not have exactly three channels.
    MalformedQuery {
        /// Number of channels supplied
        channels: usize,
    },
    /// The palette holds no entry with a usable reference color.
    NoValidEntries,
}

/// Result of a nearest-code lookup.
///
/// Only [`PaletteMatch::Nearest`] is a normal result; the other variants
/// must be surfaced to the user as warnings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaletteMatch<'a> {
    /// Entry with the smallest ΔE*ab to the query.
    Nearest {
        entry: &'a PaletteEntry,
        distance: f64,
    },
    /// First valid entry, substituted because the query was unusable.
    Fallback {
        entry: &'a PaletteEntry,
        reason: FallbackReason,
    },
    /// Nothing usable in the palette; reports [`NO_MATCH_CODE`].
    NoMatch { reason: FallbackReason },
}

impl<'a> PaletteMatch<'a> {
    /// The matched code, or [`NO_MATCH_CODE`].
    pub fn code(&self) -> &'a str {
        match *self {
            PaletteMatch::Nearest { entry, .. } | PaletteMatch::Fallback { entry, .. } => {
                entry.code()
            }
            PaletteMatch::NoMatch { .. } => NO_MATCH_CODE,
        }
    }

    /// Reference color of the matched code, or neutral gray for
    /// [`PaletteMatch::NoMatch`].
    pub fn srgb(&self) -> Srgb {
        match self {
            PaletteMatch::Nearest { entry, .. } | PaletteMatch::Fallback { entry, .. } => {
                entry.srgb().unwrap_or(Srgb::NEUTRAL_GRAY)
            }
            PaletteMatch::NoMatch { .. } => Srgb::NEUTRAL_GRAY,
        }
    }

    /// ΔE*ab of a regular match.
    pub fn distance(&self) -> Option<f64> {
        match self {
            PaletteMatch::Nearest { distance, .. } => Some(*distance),
            _ => None,
        }
    }

    /// True for the sentinel outcomes that callers must warn about.
    pub fn is_degenerate(&self) -> bool {
        !matches!(self, PaletteMatch::Nearest { .. })
    }
}

/// An immutable keycap reference palette.
///
/// Entries are held in lexicographic code order. That order pins both the
/// tie-break of [`find_nearest()`](Self::find_nearest) (smallest code wins
/// among equal distances) and the default entry used for keys that cannot
/// be sampled.
///
/// # Example
///
/// ```
/// use keycap_match::{ReferencePalette, Srgb};
///
/// let palette = ReferencePalette::from_colors([
///     ("R", Srgb::new(255, 0, 0)),
///     ("K", Srgb::new(0, 0, 0)),
/// ])
/// .unwrap();
///
/// assert_eq!(palette.nearest(Srgb::new(200, 20, 10)).code(), "R");
/// assert_eq!(palette.default_entry().unwrap().code(), "K");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReferencePalette {
    entries: Vec<PaletteEntry>,
}

impl ReferencePalette {
    /// Create a palette from entries.
    ///
    /// An empty palette is allowed here; callers that need a usable palette
    /// check [`is_empty()`](Self::is_empty) and treat it as a configuration
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::DuplicateCode`] if a code appears twice.
    pub fn new(mut entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.code.as_str()) {
                return Err(PaletteError::DuplicateCode {
                    code: entry.code.clone(),
                });
            }
        }
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(Self { entries })
    }

    /// Create a palette from `(code, color)` pairs.
    pub fn from_colors<I, S>(colors: I) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = (S, Srgb)>,
        S: Into<String>,
    {
        Self::new(
            colors
                .into_iter()
                .map(|(code, srgb)| PaletteEntry::new(code, srgb))
                .collect(),
        )
    }

    /// Create a palette from `(code, hex)` pairs such as `("R", "#FF0000")`.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ParseColor`] if any hex string is invalid.
    pub fn from_hex(pairs: &[(&str, &str)]) -> Result<Self, PaletteError> {
        let colors = pairs
            .iter()
            .map(|(code, hex)| Srgb::from_str(hex).map(|srgb| (*code, srgb)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_colors(colors)
    }

    /// Number of entries, including malformed ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries with a usable reference color.
    pub fn valid_len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_valid()).count()
    }

    /// All entries in code order.
    #[inline]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Look up an entry by code.
    pub fn get(&self, code: &str) -> Option<&PaletteEntry> {
        self.entries
            .binary_search_by(|e| e.code.as_str().cmp(code))
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// The default entry: the first valid entry in code order.
    pub fn default_entry(&self) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| e.is_valid())
    }

    /// Find the entry nearest to the given L*a*b* color.
    ///
    /// Returns `(index, distance)` where `distance` is ΔE*ab. Malformed
    /// entries are skipped. Ties keep the first entry encountered. Returns
    /// `None` when no entry is valid.
    pub fn find_nearest(&self, color: Lab) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;

        for (i, entry) in self.entries.iter().enumerate() {
            let Some(reference) = entry.lab() else {
                continue;
            };
            let dist = color.delta_e(reference);
            if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                best = Some((i, dist));
            }
        }

        best
    }

    /// Match an sRGB color to the nearest palette code.
    pub fn nearest(&self, color: Srgb) -> PaletteMatch<'_> {
        match self.find_nearest(Lab::from(color)) {
            Some((idx, distance)) => PaletteMatch::Nearest {
                entry: &self.entries[idx],
                distance,
            },
            None => PaletteMatch::NoMatch {
                reason: FallbackReason::NoValidEntries,
            },
        }
    }

    /// The documented fallback: the default entry if any, else the
    /// [`NO_MATCH_CODE`] sentinel.
    pub fn fallback(&self, reason: FallbackReason) -> PaletteMatch<'_> {
        match self.default_entry() {
            Some(entry) => PaletteMatch::Fallback { entry, reason },
            None => PaletteMatch::NoMatch {
                reason: FallbackReason::NoValidEntries,
            },
        }
    }

    /// Map each valid reference color, as lowercase `#rrggbb`, to its code.
    ///
    /// When two codes share a color, the first in code order is kept.
    pub fn hex_index(&self) -> BTreeMap<String, String> {
        let mut index = BTreeMap::new();
        for entry in &self.entries {
            if let Some(srgb) = entry.srgb() {
                index
                    .entry(srgb.to_hex().to_ascii_lowercase())
                    .or_insert_with(|| entry.code.clone());
            }
        }
        index
    }
}

/// Find the palette code nearest to a raw RGB triplet.
///
/// Never panics: a query without exactly three channels falls back to the
/// palette's default entry, and a palette without valid entries yields
/// [`PaletteMatch::NoMatch`].
///
/// ```
/// use keycap_match::{nearest_code, ReferencePalette, Srgb, NO_MATCH_CODE};
///
/// let empty = ReferencePalette::default();
/// assert_eq!(nearest_code(&[10, 20, 30], &empty).code(), NO_MATCH_CODE);
/// ```
pub fn nearest_code<'a>(rgb: &[u8], palette: &'a ReferencePalette) -> PaletteMatch<'a> {
    match rgb {
        [r, g, b] => palette.nearest(Srgb::new(*r, *g, *b)),
        _ => palette.fallback(FallbackReason::MalformedQuery {
            channels: rgb.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_black() -> ReferencePalette {
        ReferencePalette::from_colors([("R", Srgb::new(255, 0, 0)), ("K", Srgb::new(0, 0, 0))])
            .unwrap()
    }

    // Construction tests
    #[test]
    fn test_palette_basic_construction() {
        let palette = red_black();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.valid_len(), 2);
        assert!(!palette.is_empty());
    }

    #[test]
    fn test_entries_sorted_by_code() {
        let palette = ReferencePalette::from_colors([
            ("WH1", Srgb::new(250, 250, 250)),
            ("BL31", Srgb::new(10, 20, 120)),
            ("GR2", Srgb::new(20, 160, 40)),
        ])
        .unwrap();
        let codes: Vec<&str> = palette.entries().iter().map(|e| e.code()).collect();
        assert_eq!(codes, ["BL31", "GR2", "WH1"]);
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let result = ReferencePalette::new(vec![
            PaletteEntry::new("A", Srgb::new(1, 2, 3)),
            PaletteEntry::new("A", Srgb::new(4, 5, 6)),
        ]);
        assert_eq!(
            result.unwrap_err(),
            PaletteError::DuplicateCode {
                code: "A".to_string()
            }
        );
    }

    #[test]
    fn test_get_by_code() {
        let palette = red_black();
        assert_eq!(palette.get("R").unwrap().srgb(), Some(Srgb::new(255, 0, 0)));
        assert!(palette.get("X").is_none());
    }

    // find_nearest tests
    #[test]
    fn test_exact_match_has_zero_distance() {
        let palette = red_black();
        let m = palette.nearest(Srgb::new(255, 0, 0));
        assert_eq!(m.code(), "R");
        assert_eq!(m.distance(), Some(0.0));
        assert!(!m.is_degenerate());
    }

    #[test]
    fn test_nearest_is_perceptual() {
        let palette = ReferencePalette::from_colors([
            ("K", Srgb::new(0, 0, 0)),
            ("W", Srgb::new(255, 255, 255)),
        ])
        .unwrap();

        // sRGB 100 is L* ~42, closer to black (0) than to white (100).
        assert_eq!(palette.nearest(Srgb::new(100, 100, 100)).code(), "K");
        // sRGB 120 is L* ~50.4, closer to white, although RGB distance
        // would pick black.
        assert_eq!(palette.nearest(Srgb::new(120, 120, 120)).code(), "W");
    }

    #[test]
    fn test_tie_keeps_first_code() {
        // Two codes with identical reference colors: the lexicographically
        // smaller one wins.
        let palette = ReferencePalette::from_colors([
            ("B2", Srgb::new(40, 40, 200)),
            ("B1", Srgb::new(40, 40, 200)),
        ])
        .unwrap();
        assert_eq!(palette.nearest(Srgb::new(0, 0, 255)).code(), "B1");
    }

    #[test]
    fn test_nearest_is_deterministic() {
        let palette = red_black();
        let query = Srgb::new(90, 30, 20);
        assert_eq!(palette.nearest(query), palette.nearest(query));
    }

    // Degenerate inputs
    #[test]
    fn test_malformed_entry_is_skipped() {
        let palette = ReferencePalette::new(vec![
            PaletteEntry::from_channels("A", &[255, 0]),
            PaletteEntry::from_channels("B", &[0, 0, 255]),
            PaletteEntry::from_channels("C", &[0, 255, 0]),
        ])
        .unwrap();

        assert_eq!(palette.len(), 3);
        assert_eq!(palette.valid_len(), 2);
        assert_eq!(
            palette.get("A").unwrap().defect(),
            Some(&ParseColorError::WrongArity { len: 2 })
        );
        // "A" was meant to be red; it must never be chosen.
        assert_ne!(palette.nearest(Srgb::new(255, 0, 0)).code(), "A");
        assert_eq!(palette.nearest(Srgb::new(0, 250, 10)).code(), "C");
        assert_eq!(palette.default_entry().unwrap().code(), "B");
    }

    #[test]
    fn test_empty_palette_returns_sentinel() {
        let palette = ReferencePalette::default();
        let m = nearest_code(&[1, 2, 3], &palette);
        assert_eq!(m.code(), NO_MATCH_CODE);
        assert_eq!(m.srgb(), Srgb::NEUTRAL_GRAY);
        assert!(m.is_degenerate());
    }

    #[test]
    fn test_all_malformed_returns_sentinel() {
        let palette =
            ReferencePalette::new(vec![PaletteEntry::from_channels("A", &[1, 2, 300])]).unwrap();
        let m = palette.nearest(Srgb::new(1, 2, 3));
        assert_eq!(
            m,
            PaletteMatch::NoMatch {
                reason: FallbackReason::NoValidEntries
            }
        );
    }

    #[test]
    fn test_wrong_arity_query_falls_back_to_default() {
        let palette = red_black();
        let m = nearest_code(&[255, 0], &palette);
        assert_eq!(m.code(), "K");
        assert_eq!(
            m,
            PaletteMatch::Fallback {
                entry: palette.get("K").unwrap(),
                reason: FallbackReason::MalformedQuery { channels: 2 }
            }
        );
    }

    // from_hex / hex_index tests
    #[test]
    fn test_from_hex() {
        let palette = ReferencePalette::from_hex(&[("R", "#FF0000"), ("W", "#fff")]).unwrap();
        assert_eq!(palette.get("W").unwrap().srgb(), Some(Srgb::new(255, 255, 255)));
    }

    #[test]
    fn test_from_hex_invalid_hex() {
        let result = ReferencePalette::from_hex(&[("R", "#ZZZZZZ")]);
        assert!(matches!(result, Err(PaletteError::ParseColor(_))));
    }

    #[test]
    fn test_hex_index_keeps_first_code_per_color() {
        let palette = ReferencePalette::new(vec![
            PaletteEntry::new("R2", Srgb::new(255, 0, 0)),
            PaletteEntry::new("R1", Srgb::new(255, 0, 0)),
            PaletteEntry::new("K", Srgb::new(0, 0, 0)),
            PaletteEntry::from_channels("BAD", &[1]),
        ])
        .unwrap();
        let index = palette.hex_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index["#ff0000"], "R1");
        assert_eq!(index["#000000"], "K");
    }
}
