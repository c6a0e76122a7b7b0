//! JSON input loading with validation at the boundary.
//!
//! Palette entries with a bad `rgb` survive as malformed entries so the
//! matcher can skip them. Layout defects are fatal and name the key.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use keycap_match::{
    KeyLayout, KeyRect, LayoutError, PaletteEntry, ParseColorError, RawKeyPosition,
    ReferencePalette,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LoadError;

fn read_json(path: &Path, what: &'static str) -> Result<Value, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| LoadError::Json { what, source })
}

fn into_object(value: Value, what: &'static str) -> Result<Map<String, Value>, LoadError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(LoadError::NotAnObject { what }),
    }
}

/// One palette file entry. Fields other than `rgb` (e.g. `file`) are ignored.
#[derive(Debug, Deserialize)]
struct PaletteRecord {
    #[serde(default)]
    rgb: Option<Vec<serde_json::Number>>,
}

impl PaletteRecord {
    fn channels(&self) -> Result<Vec<i64>, ParseColorError> {
        let Some(channels) = &self.rgb else {
            return Err(ParseColorError::WrongArity { len: 0 });
        };
        channels
            .iter()
            .enumerate()
            .map(|(index, c)| c.as_i64().ok_or(ParseColorError::NotAnInteger { index }))
            .collect()
    }
}

fn parse_palette_entry(code: String, value: Value) -> PaletteEntry {
    let record = match PaletteRecord::deserialize(value) {
        Ok(record) => record,
        Err(error) => {
            tracing::warn!(code = %code, %error, "Malformed palette entry");
            return PaletteEntry::malformed(code, ParseColorError::WrongArity { len: 0 });
        }
    };
    match record.channels() {
        Ok(channels) => {
            let entry = PaletteEntry::from_channels(code, &channels);
            if let Some(defect) = entry.defect() {
                tracing::warn!(code = entry.code(), %defect, "Malformed palette entry");
            }
            entry
        }
        Err(defect) => {
            tracing::warn!(code = %code, %defect, "Malformed palette entry");
            PaletteEntry::malformed(code, defect)
        }
    }
}

/// Build a palette from `{ "<code>": { "rgb": [r, g, b], ... }, ... }`.
pub fn parse_palette(value: Value) -> Result<ReferencePalette, LoadError> {
    let map = into_object(value, "palette")?;
    if map.is_empty() {
        return Err(LoadError::EmptyPalette);
    }

    let entries = map
        .into_iter()
        .map(|(code, entry)| parse_palette_entry(code, entry))
        .collect();

    let palette = ReferencePalette::new(entries)?;
    if palette.valid_len() == 0 {
        tracing::warn!(entries = palette.len(), "Palette has no usable colors");
    }
    Ok(palette)
}

pub fn load_palette(path: &Path) -> Result<ReferencePalette, LoadError> {
    let palette = parse_palette(read_json(path, "palette")?)?;
    tracing::info!(
        path = %path.display(),
        entries = palette.len(),
        valid = palette.valid_len(),
        "Loaded palette"
    );
    Ok(palette)
}

/// One entry of the layout registry file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub x_u: f64,
    pub y_u: f64,
    pub width_u: f64,
    pub height_u: f64,
    pub left_u: f64,
    pub top_u: f64,
    pub right_u: f64,
    pub bottom_u: f64,
}

impl From<RegistryEntry> for KeyRect {
    fn from(e: RegistryEntry) -> Self {
        KeyRect {
            x_u: e.x_u,
            y_u: e.y_u,
            width_u: e.width_u,
            height_u: e.height_u,
            left_u: e.left_u,
            top_u: e.top_u,
            right_u: e.right_u,
            bottom_u: e.bottom_u,
            label: e.label,
        }
    }
}

impl From<&KeyRect> for RegistryEntry {
    fn from(r: &KeyRect) -> Self {
        RegistryEntry {
            label: r.label.clone(),
            x_u: r.x_u,
            y_u: r.y_u,
            width_u: r.width_u,
            height_u: r.height_u,
            left_u: r.left_u,
            top_u: r.top_u,
            right_u: r.right_u,
            bottom_u: r.bottom_u,
        }
    }
}

/// Build a layout from `{ "<key id>": { "x_u": .., ..., "bottom_u": .. }, ... }`.
pub fn parse_layout(value: Value) -> Result<KeyLayout, LoadError> {
    let map = into_object(value, "layout")?;
    if map.is_empty() {
        return Err(LayoutError::EmptyLayout.into());
    }

    let mut keys = BTreeMap::new();
    for (key, entry) in map {
        let entry: RegistryEntry =
            serde_json::from_value(entry).map_err(|e| LoadError::LayoutEntry {
                key: key.clone(),
                reason: e.to_string(),
            })?;
        keys.insert(key, KeyRect::from(entry));
    }
    Ok(KeyLayout::new(keys)?)
}

pub fn load_layout(path: &Path) -> Result<KeyLayout, LoadError> {
    let layout = parse_layout(read_json(path, "layout")?)?;
    tracing::info!(
        path = %path.display(),
        keys = layout.len(),
        max_right = layout.max_right(),
        max_bottom = layout.max_bottom(),
        "Loaded layout"
    );
    Ok(layout)
}

/// Base design document. Must be a JSON object.
pub fn load_template(path: &Path) -> Result<Map<String, Value>, LoadError> {
    into_object(read_json(path, "template")?, "template")
}

/// One raw key position as read off a keyboard drawing.
#[derive(Debug, Clone, Deserialize)]
struct RawPositionRecord {
    id: String,
    x_u: f64,
    y_u: f64,
    width_u: f64,
    height_u: f64,
    #[serde(default)]
    label: Option<String>,
}

/// Read raw key positions: `[ { "id": .., "x_u": .., "y_u": .., "width_u": ..,
/// "height_u": .., "label": .. }, ... ]`.
pub fn load_raw_positions(path: &Path) -> Result<Vec<RawKeyPosition>, LoadError> {
    let value = read_json(path, "raw layout")?;
    let records: Vec<RawPositionRecord> = serde_json::from_value(value)
        .map_err(|source| LoadError::Json {
            what: "raw layout",
            source,
        })?;
    Ok(records
        .into_iter()
        .map(|r| RawKeyPosition {
            id: r.id,
            x_u: r.x_u,
            y_u: r.y_u,
            width_u: r.width_u,
            height_u: r.height_u,
            label: r.label,
        })
        .collect())
}
