//! Registry maintenance commands.

use std::fs;
use std::path::Path;

use keycap_match::KeyLayout;

use super::coverage::{coverage, CoverageReport};
use super::documents::{hex_index_document, layout_document, to_pretty_json};
use super::loader::{load_layout, load_palette, load_raw_positions, load_template};
use crate::error::GenerateError;

fn write_file(path: &Path, content: String) -> Result<(), GenerateError> {
    fs::write(path, content).map_err(|source| GenerateError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Wrote output");
    Ok(())
}

/// Build a normalized layout registry from raw key positions.
pub fn normalize_layout(raw: &Path, output: &Path) -> Result<KeyLayout, GenerateError> {
    let positions = load_raw_positions(raw)?;
    let layout = KeyLayout::from_positions(positions).map_err(crate::error::LoadError::from)?;
    write_file(output, to_pretty_json(&layout_document(&layout))?)?;
    Ok(layout)
}

/// Compare a template's key references against a layout.
pub fn check_template(layout: &Path, template: &Path) -> Result<CoverageReport, GenerateError> {
    let layout = load_layout(layout)?;
    let template = load_template(template)?;
    Ok(coverage(&layout, &template))
}

/// Write the `"#rrggbb" -> code` index of a palette. Returns the entry count.
pub fn write_hex_index(palette: &Path, output: &Path) -> Result<usize, GenerateError> {
    let palette = load_palette(palette)?;
    let index = hex_index_document(&palette);
    write_file(output, to_pretty_json(&index)?)?;
    Ok(index.len())
}
