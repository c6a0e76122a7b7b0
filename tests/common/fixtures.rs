//! Test fixtures: a scratch directory with input files.

use std::path::{Path, PathBuf};

use keycap_mapper::services::GenerateRequest;
use keycap_match::ReducerOptions;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Pure red, pure black and white.
pub fn palette_json() -> Value {
    json!({
        "BK": { "rgb": [0, 0, 0], "file": "bk.svg" },
        "RD": { "rgb": [255, 0, 0], "file": "rd.svg" },
        "WH": { "rgb": [255, 255, 255], "file": "wh.svg" },
    })
}

/// One key row registry entry.
pub fn registry_entry(left: f64, width: f64) -> Value {
    json!({
        "x_u": left, "y_u": 0.0, "width_u": width, "height_u": 1.0,
        "left_u": left, "top_u": 0.0, "right_u": left + width, "bottom_u": 1.0,
    })
}

/// Two 1u keys side by side.
pub fn two_key_layout_json() -> Value {
    json!({
        "KC_A": registry_entry(0.0, 1.0),
        "KC_B": registry_entry(1.0, 1.0),
    })
}

pub fn template_json() -> Value {
    json!({
        "name": "base design",
        "customizedColor": {},
        "customizedTemplate": { "KC_A": "T1" },
        "customizedContent": { "KC_B": { "text": "B" } },
    })
}

/// `width x height` RGBA pixels, left half red, right half black.
pub fn red_black_pixels(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..height {
        for col in 0..width {
            if col < width / 2 {
                data.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                data.extend_from_slice(&[0, 0, 0, 255]);
            }
        }
    }
    data
}

pub fn encode_rgba_png(width: u32, height: u32, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }
    out
}

/// Encode RGBA pixels as a JPEG, dropping alpha.
pub fn encode_rgba_jpeg(width: u32, height: u32, data: &[u8]) -> Vec<u8> {
    let rgba = image::RgbaImage::from_raw(width, height, data.to_vec()).unwrap();
    let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();
    let mut out = std::io::Cursor::new(Vec::new());
    rgb.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

/// Scratch directory holding a complete set of inputs.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Palette, two-key layout, template and a 200x100 red|black image.
    pub fn new() -> Self {
        let ws = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        ws.write_json("palette.json", &palette_json());
        ws.write_json("layout.json", &two_key_layout_json());
        ws.write_json("template.json", &template_json());
        ws.write_bytes(
            "image.png",
            &encode_rgba_png(200, 100, &red_black_pixels(200, 100)),
        );
        ws
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        self.write_bytes(name, serde_json::to_string_pretty(value).unwrap().as_bytes())
    }

    pub fn write_bytes(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    pub fn read_json(&self, name: &str) -> Value {
        serde_json::from_str(&std::fs::read_to_string(self.path(name)).unwrap()).unwrap()
    }

    /// A request over the workspace inputs writing `out.json` only.
    pub fn request(&self) -> GenerateRequest {
        GenerateRequest {
            image: self.path("image.png"),
            overlay: None,
            palette: self.path("palette.json"),
            layout: self.path("layout.json"),
            template: self.path("template.json"),
            output_field: "customizedColor".to_string(),
            options: ReducerOptions::default(),
            output: self.path("out.json"),
            preview: None,
            preview_png: None,
            theme: None,
        }
    }
}
