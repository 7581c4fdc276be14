//! # Asset Configuration
//!
//! The only setting the loaders need is the base resource location. Source
//! files are fetched relative to it and `map_Kd` texture paths are resolved
//! against it.

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// Asset loading configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Base location (directory or URL prefix) for models and textures
    pub base_resource_location: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            base_resource_location: "resources/models".to_string(),
        }
    }
}

impl Config for AssetConfig {}

impl AssetConfig {
    /// Create a configuration rooted at `base`
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base_resource_location: base.into(),
        }
    }

    /// Resolve a relative resource path against the base location
    ///
    /// Joins with exactly one `/` between the two parts. An empty base leaves
    /// the path untouched.
    pub fn resolve(&self, relative: &str) -> String {
        let base = self.base_resource_location.trim_end_matches('/');
        let relative = relative.trim_start_matches("./");
        if base.is_empty() {
            relative.to_string()
        } else {
            format!("{}/{}", base, relative.trim_start_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_joins_with_single_separator() {
        let with_slash = AssetConfig::new("https://example.org/project3/");
        let without_slash = AssetConfig::new("https://example.org/project3");

        assert_eq!(with_slash.resolve("stop.png"), "https://example.org/project3/stop.png");
        assert_eq!(without_slash.resolve("stop.png"), "https://example.org/project3/stop.png");
        assert_eq!(without_slash.resolve("./tex/stop.png"), "https://example.org/project3/tex/stop.png");
    }

    #[test]
    fn test_resolve_with_empty_base() {
        let config = AssetConfig::new("");
        assert_eq!(config.resolve("textures/a.png"), "textures/a.png");
    }

    #[test]
    fn test_toml_and_ron_round_trip_through_files() {
        let dir = std::env::temp_dir().join(format!("scene_core_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = AssetConfig::new("assets/scene");

        let toml_path = dir.join("assets.toml");
        config.save_to_file(&toml_path).unwrap();
        assert_eq!(AssetConfig::load_from_file(&toml_path).unwrap(), config);

        let ron_path = dir.join("assets.ron");
        config.save_to_file(&ron_path).unwrap();
        assert_eq!(AssetConfig::load_from_file(&ron_path).unwrap(), config);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let result = AssetConfig::default().save_to_file("assets.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = AssetConfig::load_or_default("definitely/not/here.toml").unwrap();
        assert_eq!(config, AssetConfig::default());
    }
}
