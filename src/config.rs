//! Spectra YAML configuration
//!
//! Defines the serde schema for `config/spectra.yaml`. Every key is optional;
//! missing keys take the built-in defaults.

use serde::{Deserialize, Serialize};
use spectra_layout::{LayoutConfig, ZoomTier, DEFAULT_CACHE_CAPACITY};
use spectra_view::ViewStyle;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectraConfig {
    pub layout: LayoutConfig,
    pub view: ViewStyle,

    /// Tier a new canvas starts at.
    pub initial_tier: ZoomTier,

    /// Layouts kept by the canvas (0 disables caching).
    pub layout_cache: usize,
}

impl Default for SpectraConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            view: ViewStyle::default(),
            initial_tier: ZoomTier::default(),
            layout_cache: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl SpectraConfig {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Load configuration from YAML string
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        // An empty document means "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SpectraConfig = serde_yaml::from_str(yaml)?;
        config
            .layout
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid layout config [{}]: {e}", e.code()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config() {
        let yaml = r##"
initial_tier: full
layout:
  y_gap: 80
  zoom:
    dot_below: 0.3
view:
  active_edge:
    color: "#ff0000"
    width: 3
"##;
        let config = SpectraConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.initial_tier, ZoomTier::Full);
        assert_eq!(config.layout.y_gap, 80.0);
        assert_eq!(config.layout.x_gap, 60.0);
        assert_eq!(config.layout.zoom.dot_below, 0.3);
        assert_eq!(config.layout.zoom.label_below, 0.5);
        assert_eq!(config.view.active_edge.color, "#ff0000");
        assert_eq!(config.view.node_dimmed_opacity, 0.3);
        assert_eq!(config.layout_cache, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(SpectraConfig::from_yaml("").unwrap(), SpectraConfig::default());
        assert_eq!(SpectraConfig::from_yaml("{}").unwrap(), SpectraConfig::default());
    }

    #[test]
    fn test_bad_tier_is_an_error() {
        assert!(SpectraConfig::from_yaml("initial_tier: huge").is_err());
    }

    #[test]
    fn test_non_finite_height_is_rejected() {
        let yaml = "initial_tier: full\nlayout:\n  height:\n    min: .nan\n";
        let err = SpectraConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("E_CONFIG_NON_FINITE"));
    }

    #[test]
    fn test_full_box_must_fit_layout_width() {
        let yaml = "layout:\n  tiers:\n    full:\n      width: 1000\n      height: 500\n";
        assert!(SpectraConfig::from_yaml(yaml).is_err());

        let widened = format!("{yaml}  layout_width: 1000\n");
        let config = SpectraConfig::from_yaml(&widened).unwrap();
        assert_eq!(config.layout.leaf_stride(), 1060.0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "layout_cache: 2\ninitial_tier: dot").unwrap();
        let config = SpectraConfig::load(file.path()).unwrap();
        assert_eq!(config.layout_cache, 2);
        assert_eq!(config.initial_tier, ZoomTier::Dot);
    }

    #[test]
    fn test_shipped_config_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/spectra.yaml");
        let config = SpectraConfig::load(path).unwrap();
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.view, ViewStyle::default());
    }
}
