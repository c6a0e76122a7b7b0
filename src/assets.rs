//! Embedded default configuration
//!
//! - If `CONFIG_FILE` is NOT set: use the embedded `config.yaml`
//! - If `CONFIG_FILE` IS set and the file exists: use it
//! - If `CONFIG_FILE` IS set and the file is missing: fall back to the embedded copy

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

const CONFIG_NAME: &str = "config.yaml";

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Config loader with optional filesystem override
pub struct AssetLoader {
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// `config_file` should be `Some` only if `CONFIG_FILE` was set.
    pub fn new(config_file: Option<PathBuf>) -> Self {
        Self { config_file }
    }

    /// Build a loader from the process environment.
    pub fn from_env() -> Self {
        Self::new(std::env::var("CONFIG_FILE").ok().map(PathBuf::from))
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Whether the external config file is the one being read.
    pub fn uses_external_config(&self) -> bool {
        self.config_file.as_ref().is_some_and(|p| p.exists())
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedConfig::get(CONFIG_NAME)
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
            })
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write the embedded config to `CONFIG_FILE` (or `./config.yaml`).
    ///
    /// An existing file is left alone unless `force` is set.
    pub fn init(&self, force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();
        let path = self
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(".").join(CONFIG_NAME));

        if !force && path.exists() {
            report.skipped.push(path.display().to_string());
            return Ok(report);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Some(data) = EmbeddedConfig::get(CONFIG_NAME) {
            fs::write(&path, &*data.data)?;
            report.written.push(path.display().to_string());
        }

        Ok(report)
    }
}
