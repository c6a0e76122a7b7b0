//! Per-key color assignment, the result of one mapping run.

use std::collections::BTreeMap;

use crate::color::Srgb;
use crate::palette::FallbackReason;
use crate::region::RegionError;

/// How a key's code was obtained.
///
/// Everything except [`AssignmentSource::Sampled`] is a recovered failure
/// that callers should surface as a warning.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentSource {
    /// Region reduced to `sample`, matched at distance `delta_e`.
    Sampled { sample: Srgb, delta_e: f64 },
    /// The key's box lies outside the canvas; default code used.
    OffCanvas,
    /// The key's pixels could not be read; default code used.
    SamplingFailed { reason: RegionError },
    /// The sample could not be matched; sentinel or default code used.
    MatchFallback {
        sample: Srgb,
        reason: FallbackReason,
    },
}

impl AssignmentSource {
    /// True for every recovered failure.
    #[inline]
    pub fn is_warning(&self) -> bool {
        !matches!(self, AssignmentSource::Sampled { .. })
    }
}

/// The code chosen for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyColor {
    /// Palette code, or [`NO_MATCH_CODE`](crate::NO_MATCH_CODE).
    pub code: String,
    /// Reference color of `code` (neutral gray for the no-match sentinel).
    pub rgb: Srgb,
    pub source: AssignmentSource,
}

/// Mapping from key id to chosen palette code.
///
/// Built fresh by every
/// [`process_region()`](crate::KeycapMapper::process_region) call and
/// never merged with an earlier assignment. Keys iterate in id order.
///
/// # Example
///
/// ```
/// use keycap_match::{AssignmentSource, KeyAssignment, KeyColor, Srgb};
///
/// let mut assignment = KeyAssignment::new();
/// assignment.insert("Esc", KeyColor {
///     code: "K".to_string(),
///     rgb: Srgb::new(0, 0, 0),
///     source: AssignmentSource::OffCanvas,
/// });
///
/// assert_eq!(assignment.codes()["Esc"], "K");
/// assert_eq!(assignment.warnings().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyAssignment {
    keys: BTreeMap<String, KeyColor>,
}

impl KeyAssignment {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the color for `key`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, color: KeyColor) {
        self.keys.insert(key.into(), color);
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&KeyColor> {
        self.keys.get(key)
    }

    /// Code assigned to `key`.
    pub fn code(&self, key: &str) -> Option<&str> {
        self.keys.get(key).map(|c| c.code.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyColor)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Key id to code, the shape of the color-code document.
    pub fn codes(&self) -> BTreeMap<String, String> {
        self.keys
            .iter()
            .map(|(k, v)| (k.clone(), v.code.clone()))
            .collect()
    }

    /// Keys whose code came from a recovered failure.
    pub fn warnings(&self) -> impl Iterator<Item = (&str, &KeyColor)> {
        self.iter().filter(|(_, c)| c.source.is_warning())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampled(code: &str) -> KeyColor {
        KeyColor {
            code: code.to_string(),
            rgb: Srgb::new(1, 2, 3),
            source: AssignmentSource::Sampled {
                sample: Srgb::new(1, 2, 3),
                delta_e: 0.0,
            },
        }
    }

    #[test]
    fn test_codes_are_ordered_by_key() {
        let mut assignment = KeyAssignment::new();
        assignment.insert("Z", sampled("A1"));
        assignment.insert("B", sampled("A2"));
        let codes: Vec<_> = assignment.codes().into_iter().collect();
        assert_eq!(
            codes,
            [
                ("B".to_string(), "A2".to_string()),
                ("Z".to_string(), "A1".to_string())
            ]
        );
    }

    #[test]
    fn test_warnings_filter() {
        let mut assignment = KeyAssignment::new();
        assignment.insert("ok", sampled("R"));
        assignment.insert(
            "off",
            KeyColor {
                code: "K".to_string(),
                rgb: Srgb::new(0, 0, 0),
                source: AssignmentSource::OffCanvas,
            },
        );
        let warned: Vec<&str> = assignment.warnings().map(|(k, _)| k).collect();
        assert_eq!(warned, ["off"]);
        assert_eq!(assignment.code("ok"), Some("R"));
        assert_eq!(assignment.len(), 2);
    }
}
