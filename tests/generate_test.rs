//! End-to-end tests of the `generate` run.

mod common;

use common::{assert_codes, assert_not_written, assert_png_file, fixtures, Workspace};
use keycap_mapper::error::{GenerateError, LoadError};
use keycap_mapper::rendering::MAX_PREVIEW_SIDE;
use keycap_mapper::services::{decode_image, generate};
use keycap_match::{AssignmentSource, MapError, Overlay, ReducerMode};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_generate_two_key_board() {
    let ws = Workspace::new();

    for mode in [ReducerMode::Simple, ReducerMode::Quantize] {
        let mut request = ws.request();
        request.options.mode = mode;
        let summary = generate(&request).unwrap();

        assert_eq!(summary.assignment.len(), 2);
        assert_eq!(summary.warning_count(), 0);

        let document = ws.read_json("out.json");
        assert_codes(&document, "customizedColor", &[("KC_A", "RD"), ("KC_B", "BK")]);
        // Other template fields survive untouched.
        assert_eq!(document["name"], json!("base design"));
        assert_eq!(document["customizedTemplate"], json!({ "KC_A": "T1" }));
    }
}

#[test]
fn test_generate_writes_all_optional_outputs() {
    let ws = Workspace::new();
    let mut request = ws.request();
    request.preview = Some(ws.path("preview.json"));
    request.preview_png = Some(ws.path("preview.png"));
    request.theme = Some(ws.path("theme.json"));

    let summary = generate(&request).unwrap();
    assert_eq!(summary.written.len(), 4);

    assert_eq!(
        ws.read_json("preview.json"),
        json!({
            "KC_A": { "code": "RD", "rgb": "#FF0000" },
            "KC_B": { "code": "BK", "rgb": "#000000" },
        })
    );
    assert_png_file(&ws.path("preview.png"));

    let theme = ws.read_json("theme.json");
    assert!(theme["accent"].as_str().unwrap().starts_with('#'));
    assert!(["#000000", "#FFFFFF"].contains(&theme["foreground"].as_str().unwrap()));
}

#[test]
fn test_generate_from_jpeg() {
    let ws = Workspace::new();
    let image = ws.write_bytes(
        "photo.jpg",
        &fixtures::encode_rgba_jpeg(200, 100, &fixtures::red_black_pixels(200, 100)),
    );

    for mode in [ReducerMode::Simple, ReducerMode::Quantize] {
        let mut request = ws.request();
        request.image = image.clone();
        request.options.mode = mode;
        generate(&request).unwrap();
        assert_codes(
            &ws.read_json("out.json"),
            "customizedColor",
            &[("KC_A", "RD"), ("KC_B", "BK")],
        );
    }
}

#[test]
fn test_huge_overlay_preview_is_scaled_down() {
    let ws = Workspace::new();
    let mut request = ws.request();
    request.overlay = Some(Overlay::new(0.0, 0.0, 1e12, 1e11));
    request.preview_png = Some(ws.path("preview.png"));

    generate(&request).unwrap();
    let preview = decode_image(&std::fs::read(ws.path("preview.png")).unwrap()).unwrap();
    assert_eq!((preview.width, preview.height), (MAX_PREVIEW_SIDE, MAX_PREVIEW_SIDE / 10));
}

#[test]
fn test_unwritable_output_leaves_other_outputs() {
    let ws = Workspace::new();
    let out = ws.write_bytes("out.json", b"previous");

    let mut request = ws.request();
    request.preview = Some(ws.path("missing/preview.json"));
    let err = generate(&request).unwrap_err();

    assert!(matches!(err, GenerateError::Output { .. }), "{err}");
    assert_eq!(std::fs::read(&out).unwrap(), b"previous");
}

#[test]
fn test_generate_custom_output_field() {
    let ws = Workspace::new();
    let mut request = ws.request();
    request.output_field = "colors".to_string();

    generate(&request).unwrap();
    let document = ws.read_json("out.json");
    assert_codes(&document, "colors", &[("KC_A", "RD"), ("KC_B", "BK")]);
    assert_eq!(document["customizedColor"], json!({}));
}

#[test]
fn test_overlay_outside_image_uses_default() {
    let ws = Workspace::new();
    let mut request = ws.request();
    // Key A lands on the black half, key B past the right edge.
    request.overlay = Some(Overlay::new(150.0, 0.0, 100.0, 100.0));

    let summary = generate(&request).unwrap();
    assert_eq!(summary.assignment.code("KC_A"), Some("BK"));

    // First code in lexicographic order is the default.
    let b = summary.assignment.get("KC_B").unwrap();
    assert_eq!(b.code, "BK");
    assert_eq!(b.source, AssignmentSource::OffCanvas);
    assert_eq!(summary.warning_count(), 1);
}

#[test]
fn test_malformed_palette_entry_is_skipped() {
    let ws = Workspace::new();
    ws.write_json(
        "palette.json",
        &json!({
            "AA": { "rgb": [255, 0] },
            "BK": { "rgb": [0, 0, 0] },
            "RD": { "rgb": [255, 0, 0] },
        }),
    );

    let summary = generate(&ws.request()).unwrap();
    assert_eq!(summary.assignment.code("KC_A"), Some("RD"));
    assert_eq!(summary.assignment.code("KC_B"), Some("BK"));
}

#[test]
fn test_fatal_error_leaves_previous_output() {
    let ws = Workspace::new();
    let out = ws.write_bytes("out.json", b"previous");
    ws.write_json("layout.json", &json!({}));

    let mut request = ws.request();
    request.preview = Some(ws.path("preview.json"));
    let err = generate(&request).unwrap_err();

    assert!(matches!(err, GenerateError::Load(LoadError::Layout(_))), "{err}");
    assert_eq!(std::fs::read(&out).unwrap(), b"previous");
    assert_not_written(&ws.path("preview.json"));
}

#[test]
fn test_empty_palette_is_fatal() {
    let ws = Workspace::new();
    ws.write_json("palette.json", &json!({}));

    let err = generate(&ws.request()).unwrap_err();
    assert!(matches!(err, GenerateError::Load(LoadError::EmptyPalette)));
    assert_not_written(&ws.path("out.json"));
}

#[test]
fn test_invalid_layout_entry_names_key() {
    let ws = Workspace::new();
    ws.write_json(
        "layout.json",
        &json!({
            "KC_A": fixtures::registry_entry(0.0, 1.0),
            "KC_BROKEN": { "x_u": 1.0, "y_u": 0.0 },
        }),
    );

    let err = generate(&ws.request()).unwrap_err();
    assert!(err.to_string().contains("KC_BROKEN"), "{err}");
}

#[test]
fn test_template_must_be_object() {
    let ws = Workspace::new();
    ws.write_json("template.json", &json!(["not", "an", "object"]));

    let err = generate(&ws.request()).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Load(LoadError::NotAnObject { what: "template" })
    ));
}

#[test]
fn test_invalid_overlay_is_fatal() {
    let ws = Workspace::new();
    let mut request = ws.request();
    request.overlay = Some(Overlay::new(0.0, 0.0, -5.0, 100.0));

    let err = generate(&request).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Map(MapError::InvalidOverlay { .. })
    ));
    assert_not_written(&ws.path("out.json"));
}

#[test]
fn test_missing_image_is_fatal() {
    let ws = Workspace::new();
    let mut request = ws.request();
    request.image = ws.path("missing.png");

    let err = generate(&request).unwrap_err();
    assert!(matches!(err, GenerateError::Load(LoadError::Io { .. })));
}
