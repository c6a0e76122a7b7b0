pub mod coverage;
pub mod documents;
pub mod generator;
pub mod image_loader;
pub mod loader;
pub mod tools;

pub use coverage::{coverage, CoverageReport};
pub use generator::{generate, parse_overlay, GenerateRequest, GenerateSummary};
pub use image_loader::{decode_image, load_image, RgbaImage};
pub use loader::{
    load_layout, load_palette, load_raw_positions, load_template, parse_layout, parse_palette,
    RegistryEntry,
};
pub use tools::{check_template, normalize_layout, write_hex_index};
