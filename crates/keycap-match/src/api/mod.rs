//! Public API for the keycap-match crate.
//!
//! This module provides the high-level API: [`KeycapMapper`] orchestration,
//! the [`Overlay`] rectangle and the [`MapError`] unified error type.

mod error;
mod mapper;

pub use error::MapError;
pub use mapper::{KeycapMapper, Overlay};
