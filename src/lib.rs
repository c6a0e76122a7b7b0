//! Keycap Mapper
//!
//! Turns a photograph into a keycap color design: every key of a layout is
//! sampled from the image and assigned the nearest manufacturable color.
//! The color science lives in the `keycap-match` crate; this crate loads
//! the JSON registries, decodes images and writes the output documents.

pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
