//! Engine configuration, deserializable from JSON.

use serde::Deserialize;
use thiserror::Error;

/// Radii are measured in 64-block terrain zones around the player's zone.
const DEFAULT_CREATE_RADIUS: u32 = 2;
const DEFAULT_DRAW_RADIUS: u32 = 2;
const DEFAULT_NUM_WORKERS: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse world config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunable engine settings. Every field has a default, so a config file
/// only needs to name what it overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Terrain generation seed.
    pub seed: u32,
    /// Zones around the player to keep generated and meshed.
    pub create_radius: u32,
    /// Zones around the player to submit for drawing.
    pub draw_radius: u32,
    /// Worker threads for the task pool.
    pub num_workers: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 0,
            create_radius: DEFAULT_CREATE_RADIUS,
            draw_radius: DEFAULT_DRAW_RADIUS,
            num_workers: DEFAULT_NUM_WORKERS,
        }
    }
}

impl WorldConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = WorldConfig::from_json_str("{}").unwrap();
        assert_eq!(config.create_radius, 2);
        assert_eq!(config.draw_radius, 2);
        assert_eq!(config.num_workers, 4);
        assert_eq!(config.seed, 0);
    }

    #[test]
    fn overrides_apply_per_field() {
        let config =
            WorldConfig::from_json_str(r#"{"seed": 99, "create_radius": 1}"#).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.create_radius, 1);
        assert_eq!(config.draw_radius, 2);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(WorldConfig::from_json_str("not json").is_err());
    }
}
