//! # World Configuration
//!
//! Tunables that are read once at startup. Grid geometry (`CHUNK_SIZE`,
//! `SCALE`) is fixed at compile time in `wildlands_procedural` and is not
//! configurable here.
//!
//! ```toml
//! render_distance = 4
//! sea_level = -1.0
//! spawn_entities = true
//! fixed_delta = 0.01
//! rng_seed = 7
//! player_spawn = [0.0, 0.0]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use wildlands_procedural::DEFAULT_SEA_LEVEL;

use crate::error::{WorldError, WorldResult};

/// Largest accepted render distance (in chunks).
pub const MAX_RENDER_DISTANCE: u32 = 16;

/// World configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunks loaded outward from the player's chunk in each direction.
    pub render_distance: u32,
    /// World Y of the water surface.
    pub sea_level: f32,
    /// Spawn resources/NPCs when chunks load.
    pub spawn_entities: bool,
    /// Simulation step in seconds.
    pub fixed_delta: f32,
    /// Seed for combat rolls.
    pub rng_seed: u64,
    /// Player spawn point (world x, z).
    pub player_spawn: [f32; 2],
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            render_distance: 3,
            sea_level: DEFAULT_SEA_LEVEL,
            spawn_entities: true,
            fixed_delta: 0.01,
            rng_seed: 0x5EED_0F_11FE,
            player_spawn: [0.0, 0.0],
        }
    }
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ConfigParse`] on malformed TOML and
    /// [`WorldError::InvalidConfig`] if validation fails.
    pub fn from_toml_str(source: &str) -> WorldResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ConfigRead`] if the file cannot be read, plus
    /// everything [`WorldConfig::from_toml_str`] can return.
    pub fn from_toml_file(path: impl AsRef<Path>) -> WorldResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| WorldError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> WorldResult<()> {
        if self.render_distance == 0 || self.render_distance > MAX_RENDER_DISTANCE {
            return Err(WorldError::InvalidConfig(format!(
                "render_distance must be in 1..={MAX_RENDER_DISTANCE}, got {}",
                self.render_distance
            )));
        }
        if !self.fixed_delta.is_finite() || self.fixed_delta <= 0.0 {
            return Err(WorldError::InvalidConfig(format!(
                "fixed_delta must be a positive number of seconds, got {}",
                self.fixed_delta
            )));
        }
        if !self.sea_level.is_finite() {
            return Err(WorldError::InvalidConfig("sea_level must be finite".into()));
        }
        if !self.player_spawn.iter().all(|v| v.is_finite()) {
            return Err(WorldError::InvalidConfig("player_spawn must be finite".into()));
        }
        Ok(())
    }

    /// Render distance as a signed chunk count.
    #[inline]
    #[must_use]
    pub fn render_distance_chunks(&self) -> i32 {
        self.render_distance.min(MAX_RENDER_DISTANCE) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.render_distance, 3);
        assert_eq!(config.sea_level, -1.0);
        assert_eq!(config.fixed_delta, 0.01);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = WorldConfig::from_toml_str("render_distance = 5\nspawn_entities = false\n")
            .expect("valid config");
        assert_eq!(config.render_distance, 5);
        assert!(!config.spawn_entities);
        assert_eq!(config.sea_level, DEFAULT_SEA_LEVEL);
    }

    #[test]
    fn test_rejects_zero_render_distance() {
        let err = WorldConfig::from_toml_str("render_distance = 0").unwrap_err();
        assert!(matches!(err, WorldError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_bad_delta() {
        let config = WorldConfig {
            fixed_delta: -0.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(WorldError::InvalidConfig(_))));
    }

    #[test]
    fn test_parse_error() {
        let err = WorldConfig::from_toml_str("render_distance = \"far\"").unwrap_err();
        assert!(matches!(err, WorldError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = WorldConfig::from_toml_file("/definitely/not/here/world.toml").unwrap_err();
        assert!(matches!(err, WorldError::ConfigRead { .. }));
    }
}
