pub mod config;

pub use config::{AppConfig, ReducerConfig};
