use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    assets::DEFAULT_ASSET_PATH, timeline::ROTATION_RATE, Color, Result, ScaleRange, Selection,
    Variant,
};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub asset: AssetConfig,
    pub render: RenderConfig,
    pub defaults: SelectionDefaults,
}

impl AppConfig {
    /// Reads a JSON configuration file. Fields left out keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.defaults.scale_range.validate()
    }
}

/// Where the product model lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory that site-absolute asset paths are resolved against.
    pub root: String,
    pub path: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: "public".to_string(),
            path: DEFAULT_ASSET_PATH.to_string(),
        }
    }
}

/// Configuration specific to the render loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Turntable speed in radians per second.
    pub rotation_rate: f32,
    pub frames_per_second: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rotation_rate: ROTATION_RATE,
            frames_per_second: 60,
        }
    }
}

/// Selection shown when the configurator first opens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionDefaults {
    pub color: Color,
    pub scale: f32,
    pub variant: Variant,
    pub scale_range: ScaleRange,
}

impl Default for SelectionDefaults {
    fn default() -> Self {
        let selection = Selection::default();
        Self {
            color: selection.color,
            scale: selection.scale,
            variant: selection.variant,
            scale_range: ScaleRange::SLIDER,
        }
    }
}

impl SelectionDefaults {
    pub fn selection(&self) -> Selection {
        Selection {
            color: self.color.clone(),
            scale: self.scale_range.clamp(self.scale),
            variant: self.variant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let config = AppConfig::from_json_str(
            r#"{ "render": { "frames_per_second": 30 }, "defaults": { "variant": "premium" } }"#,
        )
        .unwrap();

        assert_eq!(config.render.frames_per_second, 30);
        assert_eq!(config.render.rotation_rate, ROTATION_RATE);
        assert_eq!(config.defaults.variant, Variant::Premium);
        assert_eq!(config.defaults.color.as_str(), "#6366f1");
        assert_eq!(config.asset.path, "/assets/3d/duck.glb");
    }

    #[test]
    fn initial_scale_goes_through_the_slider() {
        let defaults = SelectionDefaults {
            scale: 9.0,
            ..SelectionDefaults::default()
        };
        assert_eq!(defaults.selection().scale, 1.5);
    }

    #[test]
    fn reads_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configurator.json");
        std::fs::write(&path, r##"{ "defaults": { "color": "#14b8a6" } }"##).unwrap();

        let config = AppConfig::from_json_file(&path).unwrap();
        assert_eq!(config.defaults.color.as_str(), "#14b8a6");
    }

    #[test]
    fn inverted_scale_range_is_rejected_on_load() {
        let err = AppConfig::from_json_str(
            r#"{ "defaults": { "scale_range": { "min": 1.5, "max": 0.5, "step": 0.1 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::ConfiguratorError::InvalidScaleRange { min, max, .. } if min == 1.5 && max == 0.5
        ));
    }

    #[test]
    fn non_positive_scale_range_is_rejected_on_load() {
        let err = AppConfig::from_json_str(
            r#"{ "defaults": { "scale_range": { "min": 0.0, "max": 1.0, "step": 0.1 } } }"#,
        )
        .unwrap_err();
        assert!(format!("{err}").contains("invalid scale range"));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = AppConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, crate::ConfiguratorError::Config(_)));
    }
}
