//! Simulation config (JSON)
//!
//! Все поля опциональны: отсутствующие берутся из `Default`.
//! Компоненты получают копии констант при spawn.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::PursuitConfig;
use crate::combat::WeaponConfig;
use crate::vehicle::MotionConstants;

/// Tick rate FixedUpdate по умолчанию
pub const DEFAULT_FIXED_HZ: f64 = 50.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub fixed_hz: f64,
    pub aircraft: MotionConstants,
    pub tank: MotionConstants,
    pub weapon: WeaponConfig,
    pub pursuit: PursuitConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_hz: DEFAULT_FIXED_HZ,
            aircraft: MotionConstants::aircraft(),
            tank: MotionConstants::tank(),
            weapon: WeaponConfig::default(),
            pursuit: PursuitConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_hz.is_finite() && self.fixed_hz > 0.0) {
            return Err(invalid("fixed_hz", self.fixed_hz as f32, "must be positive"));
        }

        validate_motion("aircraft", &self.aircraft)?;
        validate_motion("tank", &self.tank)?;

        let weapon = &self.weapon;
        positive("weapon.cooldown_duration", weapon.cooldown_duration)?;
        positive("weapon.trace_speed", weapon.trace_speed)?;
        positive("weapon.fallback_range", weapon.fallback_range)?;
        non_negative("weapon.trace_lifetime", weapon.trace_lifetime)?;

        non_negative("pursuit.stopping_distance", self.pursuit.stopping_distance)?;

        Ok(())
    }
}

fn validate_motion(kind: &str, constants: &MotionConstants) -> Result<(), ConfigError> {
    let field = |name: &str| format!("{kind}.{name}");

    positive(&field("move_speed"), constants.move_speed)?;
    positive(&field("rotate_speed"), constants.rotate_speed)?;
    // Tank без lift — 0 допустим
    non_negative(&field("lift_speed"), constants.lift_speed)?;
    positive(&field("max_altitude"), constants.max_altitude)?;
    Ok(())
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be non-negative"))
    }
}

fn invalid(field: &str, value: f32, rule: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: format!("{rule} and finite, got {value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = SimulationConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.fixed_hz, DEFAULT_FIXED_HZ);
    }

    #[test]
    fn test_partial_override() {
        let config = SimulationConfig::from_json_str(
            r#"{
                "fixed_hz": 60.0,
                "weapon": {
                    "cooldown_duration": 0.5,
                    "trace_speed": 40.0,
                    "fallback_range": 100.0,
                    "trace_lifetime": 0.2
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.fixed_hz, 60.0);
        assert_eq!(config.weapon.cooldown_duration, 0.5);
        assert_eq!(config.aircraft, MotionConstants::aircraft());
    }

    #[test]
    fn test_default_round_trips_through_json() {
        let json = SimulationConfig::default().to_json_pretty().unwrap();
        let parsed = SimulationConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, SimulationConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let err = SimulationConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SimulationConfig::from_json_str(r#"{ "fixed_hz": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "fixed_hz"));

        let mut config = SimulationConfig::default();
        config.tank.move_speed = -1.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "tank.move_speed"));

        let mut config = SimulationConfig::default();
        config.weapon.trace_speed = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimulationConfig::from_path("/nonexistent/hangar.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
