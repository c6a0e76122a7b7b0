//! Output types of a mapping run.
//!
//! - [`KeyAssignment`]: key id to palette code, with per-key provenance
//! - [`ThemeRecord`]: accent/foreground pair derived from the image

mod assignment;
mod theme;

pub use assignment::{AssignmentSource, KeyAssignment, KeyColor};
pub use theme::{derive_theme, ThemeRecord};
