//! Editor configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Canvas margin in CSS pixels.
pub const DEFAULT_CANVAS_MARGIN: f64 = 36.0;
/// Hit tolerance in CSS pixels.
pub const DEFAULT_HIT_TOLERANCE_PX: f64 = 6.0;
/// Smallest allowed logical-to-canvas scale.
pub const DEFAULT_MIN_SCALE: f64 = 1.0;
/// Distance in CSS pixels within which a pen click closes the path.
pub const DEFAULT_CLOSE_PATH_TOLERANCE_PX: f64 = 8.0;
/// Floor applied to any scale so conversions never divide by zero.
pub const MIN_SCALE_EPSILON: f64 = 1e-6;

/// Tunables recognized by the editing core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Inset between the container edge and the drawable canvas (CSS px).
    pub canvas_margin: f64,
    /// On-screen hit radius (CSS px), converted to logical units per zoom.
    pub hit_tolerance_px: f64,
    /// Lower clamp for the combined scale.
    pub min_scale: f64,
    /// On-screen radius for closing a path while drawing (CSS px).
    pub close_path_tolerance_px: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_margin: DEFAULT_CANVAS_MARGIN,
            hit_tolerance_px: DEFAULT_HIT_TOLERANCE_PX,
            min_scale: DEFAULT_MIN_SCALE,
            close_path_tolerance_px: DEFAULT_CLOSE_PATH_TOLERANCE_PX,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("canvas_margin", self.canvas_margin)?;
        non_negative("hit_tolerance_px", self.hit_tolerance_px)?;
        non_negative("close_path_tolerance_px", self.close_path_tolerance_px)?;
        if !self.min_scale.is_finite() || self.min_scale <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "min_scale",
                reason: format!("must be a positive number, got {}", self.min_scale),
            });
        }
        Ok(())
    }

    /// The scale floor actually applied by transforms.
    pub fn scale_floor(&self) -> f64 {
        if self.min_scale.is_finite() {
            self.min_scale.max(MIN_SCALE_EPSILON)
        } else {
            DEFAULT_MIN_SCALE
        }
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a finite, non-negative number, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert!((config.canvas_margin - 36.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{ "hit_tolerance_px": 10 }"#).unwrap();
        assert!((config.hit_tolerance_px - 10.0).abs() < f64::EPSILON);
        assert!((config.canvas_margin - DEFAULT_CANVAS_MARGIN).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EditorConfig::from_json(r#"{ "min_scale": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "min_scale", .. }));

        let err = EditorConfig::from_json(r#"{ "canvas_margin": -1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "canvas_margin", .. }));

        let err = EditorConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_scale_floor_is_positive() {
        let config = EditorConfig {
            min_scale: 0.0,
            ..EditorConfig::default()
        };
        assert!(config.scale_floor() > 0.0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "canvas_margin": 12.5 }}"#).unwrap();

        let config = EditorConfig::load(file.path()).unwrap();
        assert!((config.canvas_margin - 12.5).abs() < f64::EPSILON);

        let missing = EditorConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EditorConfig {
            hit_tolerance_px: 4.0,
            ..EditorConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(EditorConfig::from_json(&json).unwrap(), config);
    }
}
