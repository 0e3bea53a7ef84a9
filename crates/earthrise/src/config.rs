//! Configuration system
//!
//! [`RenderConfig`] gathers every tunable the renderer reads. It is plain
//! data: parsed once (defaults, then an optional TOML/RON file, then
//! command-line overrides), validated once, then fixed for the process
//! lifetime.

pub use serde::{Deserialize, Serialize};

use crate::render::lighting::ShadingParameters;
use crate::render::ocean::WaterParameters;
use crate::view::Calibration;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything the renderer is configured with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output frame width in pixels
    pub width: u32,
    /// Output frame height in pixels
    pub height: u32,
    /// Texture longitude calibration, degrees
    pub texture_lon_offset_deg: f64,
    /// Colour pixels from their view-space normal instead of the texture
    pub test_pattern: bool,
    /// Draw the rotation axis, sun arrow and terminator over the frame
    pub debug_overlay: bool,
    /// Sun shading tunables
    pub shading: ShadingParameters,
    /// Ocean classifier tunables
    pub water: WaterParameters,
    /// Fixed visual calibration rotations
    pub calibration: Calibration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 720,
            height: 720,
            texture_lon_offset_deg: 0.0,
            test_pattern: false,
            debug_overlay: false,
            shading: ShadingParameters::default(),
            water: WaterParameters::default(),
            calibration: Calibration::default(),
        }
    }
}

impl Config for RenderConfig {}

impl RenderConfig {
    /// Set the output frame size
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Enable or disable the synthetic test pattern
    pub const fn with_test_pattern(mut self, enabled: bool) -> Self {
        self.test_pattern = enabled;
        self
    }

    /// Enable or disable the debug overlay
    pub const fn with_debug_overlay(mut self, enabled: bool) -> Self {
        self.debug_overlay = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "Frame size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        self.shading.validate().map_err(ConfigError::Invalid)?;
        self.water.validate().map_err(ConfigError::Invalid)?;

        let finite = [
            self.texture_lon_offset_deg,
            self.calibration.fudge_lon_deg,
            self.calibration.roll_deg,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid(
                "Longitude offset and calibration angles must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.calibration.fudge_lon_deg, -200.0);
        assert_eq!(config.calibration.roll_deg, 225.0);
        assert_eq!(config.water.hue_lo_deg, 180.0);
        assert_eq!(config.water.hue_hi_deg, 250.0);
        assert_eq!(config.water.sat_min, 0.2);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RenderConfig = toml::from_str(
            r#"
            width = 320
            debug_overlay = true

            [shading]
            gamma = 1.8
            "#,
        )
        .unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 720);
        assert!(config.debug_overlay);
        assert_eq!(config.shading.gamma, 1.8);
        assert_eq!(config.shading.exposure, 1.0);
        assert_eq!(config.calibration, Calibration::default());
    }

    #[test]
    fn test_ron_parses() {
        let config: RenderConfig = ron::from_str("(height: 100, calibration: (roll_deg: 10.0))").unwrap();
        assert_eq!(config.height, 100);
        assert_eq!(config.calibration.roll_deg, 10.0);
        assert_eq!(config.calibration.fudge_lon_deg, -200.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            RenderConfig::default().with_size(0, 10).validate(),
            Err(ConfigError::Invalid(_))
        ));

        let mut config = RenderConfig::default();
        config.shading.exposure = 0.0;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.calibration.roll_deg = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = RenderConfig::default().save_to_file("render.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_toml_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("earthrise_config_{}.toml", std::process::id()));
        let path = path.to_str().unwrap();

        let config = RenderConfig::default().with_size(64, 48).with_test_pattern(true);
        config.save_to_file(path).unwrap();
        let loaded = RenderConfig::load_from_file(path).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(loaded, config);
    }
}
