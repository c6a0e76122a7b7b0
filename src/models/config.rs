use crate::assets::AssetLoader;
use keycap_match::{ParseModeError, ReducerMode, ReducerOptions};
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Reference palette JSON
    #[serde(default = "default_palette")]
    pub palette: PathBuf,

    /// Key layout registry JSON
    #[serde(default = "default_layout")]
    pub layout: PathBuf,

    /// Base design document
    #[serde(default = "default_template")]
    pub template: PathBuf,

    /// Template field that receives the key -> code mapping
    #[serde(default = "default_output_field")]
    pub output_field: String,

    #[serde(default)]
    pub reducer: ReducerConfig,
}

fn default_palette() -> PathBuf {
    PathBuf::from("data/color_registry.json")
}

fn default_layout() -> PathBuf {
    PathBuf::from("data/key_position_registry.json")
}

fn default_template() -> PathBuf {
    PathBuf::from("data/template.json")
}

fn default_output_field() -> String {
    "customizedColor".to_string()
}

/// Region reducer tuning
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReducerConfig {
    /// `simple` or `quantize`
    pub mode: String,
    pub bucket_size: u8,
    pub sample_limit: usize,
    pub simple_alpha_threshold: u8,
    pub quantize_alpha_threshold: u8,
    pub clusters: usize,
    pub min_clusters: usize,
    pub max_clusters: usize,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        let options = ReducerOptions::default();
        Self {
            mode: options.mode.to_string(),
            bucket_size: options.bucket_size,
            sample_limit: options.sample_limit,
            simple_alpha_threshold: options.simple_alpha_threshold,
            quantize_alpha_threshold: options.quantize_alpha_threshold,
            clusters: options.clusters,
            min_clusters: options.min_clusters,
            max_clusters: options.max_clusters,
        }
    }
}

impl ReducerConfig {
    /// Convert to core reducer options, validating the mode name.
    pub fn to_options(&self) -> Result<ReducerOptions, ParseModeError> {
        let mode: ReducerMode = self.mode.parse()?;
        Ok(ReducerOptions {
            mode,
            bucket_size: self.bucket_size,
            sample_limit: self.sample_limit,
            simple_alpha_threshold: self.simple_alpha_threshold,
            quantize_alpha_threshold: self.quantize_alpha_threshold,
            clusters: self.clusters,
            min_clusters: self.min_clusters,
            max_clusters: self.max_clusters,
        })
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => Self::from_yaml(&content),
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse YAML, falling back to defaults on error.
    pub fn from_yaml(content: &str) -> Self {
        match serde_yaml::from_str::<Self>(content) {
            Ok(config) => {
                tracing::info!(
                    palette = %config.palette.display(),
                    layout = %config.layout.display(),
                    mode = %config.reducer.mode,
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to parse config, using defaults");
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            layout: default_layout(),
            template: default_template(),
            output_field: default_output_field(),
            reducer: ReducerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = AppConfig::load_from_assets(&AssetLoader::new(None));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_yaml_uses_field_defaults() {
        let config = AppConfig::from_yaml("reducer:\n  mode: quantize\n  clusters: 3\n");
        assert_eq!(config.output_field, "customizedColor");
        assert_eq!(config.reducer.clusters, 3);
        assert_eq!(config.reducer.bucket_size, 8);

        let options = config.reducer.to_options().unwrap();
        assert_eq!(options.mode, ReducerMode::Quantize);
        assert_eq!(options.clusters, 3);
    }

    #[test]
    fn test_invalid_yaml_falls_back_to_defaults() {
        let config = AppConfig::from_yaml("palette: [unterminated");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let reducer = ReducerConfig {
            mode: "kmeans".to_string(),
            ..ReducerConfig::default()
        };
        assert!(reducer.to_options().is_err());
    }
}
