pub mod preview;

pub use preview::{preview_size, render_preview, MAX_PREVIEW_SIDE};
