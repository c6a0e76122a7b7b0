//! Output JSON documents.

use std::collections::BTreeMap;

use keycap_match::{KeyAssignment, KeyLayout, ReferencePalette, ThemeRecord};
use serde::Serialize;
use serde_json::{Map, Value};

use super::loader::RegistryEntry;

/// Template with the key -> code mapping stored under `field`.
///
/// Every other template field is kept as is.
pub fn color_code_document(
    template: &Map<String, Value>,
    field: &str,
    assignment: &KeyAssignment,
) -> Value {
    let mut document = template.clone();
    let codes: Map<String, Value> = assignment
        .iter()
        .map(|(key, color)| (key.to_string(), Value::String(color.code.clone())))
        .collect();
    document.insert(field.to_string(), Value::Object(codes));
    Value::Object(document)
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PreviewEntry {
    pub code: String,
    pub rgb: String,
}

/// key -> `{ "code": .., "rgb": "#RRGGBB" }`, for rendering swatches.
pub fn preview_document(assignment: &KeyAssignment) -> BTreeMap<String, PreviewEntry> {
    assignment
        .iter()
        .map(|(key, color)| {
            (
                key.to_string(),
                PreviewEntry {
                    code: color.code.clone(),
                    rgb: color.rgb.to_hex(),
                },
            )
        })
        .collect()
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ThemeDocument {
    pub accent: String,
    pub foreground: String,
}

impl From<ThemeRecord> for ThemeDocument {
    fn from(theme: ThemeRecord) -> Self {
        Self {
            accent: theme.accent.to_hex(),
            foreground: theme.foreground.to_hex(),
        }
    }
}

/// Layout registry file contents, sorted by key id.
pub fn layout_document(layout: &KeyLayout) -> BTreeMap<String, RegistryEntry> {
    layout
        .iter()
        .map(|(key, rect)| (key.to_string(), RegistryEntry::from(rect)))
        .collect()
}

/// `"#rrggbb" -> code` for every usable palette color.
pub fn hex_index_document(palette: &ReferencePalette) -> BTreeMap<String, String> {
    palette.hex_index()
}

/// Pretty JSON with a trailing newline.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}
