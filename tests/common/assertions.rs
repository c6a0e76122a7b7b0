//! Assertion helpers for tests.

use std::path::Path;

use pretty_assertions::assert_eq;
use serde_json::Value;

/// Assert the file starts with the PNG signature
pub fn assert_png_file(path: &Path) {
    let bytes = std::fs::read(path).unwrap();
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']),
        "Expected PNG image at {}, got {} bytes starting with {:?}",
        path.display(),
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Assert `field` of the document maps every key to the expected code
pub fn assert_codes(document: &Value, field: &str, expected: &[(&str, &str)]) {
    let codes = document[field]
        .as_object()
        .unwrap_or_else(|| panic!("Expected object under {field:?}, got {}", document[field]));
    let actual: Vec<(&str, &str)> = codes
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str().unwrap_or("<not a string>")))
        .collect();
    assert_eq!(actual, expected.to_vec());
}

/// Assert that no file exists at `path`
pub fn assert_not_written(path: &Path) {
    assert!(!path.exists(), "Expected no file at {}", path.display());
}
