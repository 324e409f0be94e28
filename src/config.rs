//! Physics tuning, loadable from a TOML file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Every tunable of the simulation. Missing TOML keys fall back to [`Default`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity added to vertical velocity per tick. The sign picks the floor.
    pub gravity: f32,
    /// Fixed tick period in milliseconds.
    pub tick_interval_ms: u64,
    /// Edge length of the square player body.
    pub player_size: f32,
    /// Minimum horizontal speed while a direction is held.
    pub walk_speed: f32,
    /// Horizontal velocity multiplier applied every tick.
    pub damping: f32,
    /// Player horizontal speed at or below which velocity snaps to zero.
    pub drift_cutoff: f32,
    /// Player speed above which a breakable block shatters on contact.
    pub break_speed: f32,
    pub dash_speed: f32,
    /// Horizontal speed at or below which a grounded player regains the dash.
    pub dash_recharge_speed: f32,
    pub jump_speed: f32,
    pub particle_count: usize,
    /// Half-width of the uniform velocity jitter added to each particle.
    pub particle_jitter: f32,
    pub particle_size: f32,
    pub particle_lifetime_ms: u64,
    /// Longest push chain a single displacement may travel through.
    pub max_push_chain: usize,
    /// Seed for particle jitter.
    pub seed: u64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.2,
            tick_interval_ms: 10,
            player_size: 40.0,
            walk_speed: 3.0,
            damping: 0.9,
            drift_cutoff: 0.1,
            break_speed: 5.0,
            dash_speed: 30.0,
            dash_recharge_speed: 3.0,
            jump_speed: 10.0,
            particle_count: 10,
            particle_jitter: 10.0,
            particle_size: 8.0,
            particle_lifetime_ms: 200,
            max_push_chain: 32,
            seed: 0x5eed,
        }
    }
}

impl PhysicsConfig {
    /// Load and validate a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        if self.player_size <= 0.0 {
            return Err(ConfigError::Invalid("player_size must be positive".into()));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfigError::Invalid("damping must lie in (0, 1]".into()));
        }
        if self.max_push_chain == 0 {
            return Err(ConfigError::Invalid("max_push_chain must be at least 1".into()));
        }
        if self.particle_jitter < 0.0 {
            return Err(ConfigError::Invalid("particle_jitter must not be negative".into()));
        }
        Ok(())
    }
}

/// Errors that can occur when loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
