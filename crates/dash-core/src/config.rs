//! Game configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "seed": 42, "physics": { "scroll_speed": 300.0 } }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::game::PhysicsConfig;
use crate::game_loop::TimingConfig;
use crate::generate::GeneratorConfig;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}

/// Where level archives are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory under which the `levels` archive is created.
    pub base_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed for level generation. `None` picks one from the OS.
    pub seed: Option<u64>,
    pub physics: PhysicsConfig,
    pub timing: TimingConfig,
    pub generator: GeneratorConfig,
    pub storage: StorageConfig,
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.timing.fixed_dt > 0.0) {
            return Err(ConfigError::Invalid("timing.fixed_dt must be positive"));
        }
        if !(self.timing.max_frame_dt >= 0.0) {
            return Err(ConfigError::Invalid("timing.max_frame_dt must not be negative"));
        }
        if self.timing.max_steps == 0 {
            return Err(ConfigError::Invalid("timing.max_steps must be at least 1"));
        }
        if !(self.physics.cell_size > 0.0) {
            return Err(ConfigError::Invalid("physics.cell_size must be positive"));
        }
        let probabilities = [
            self.generator.spike_probability,
            self.generator.solid_probability,
            self.generator.fallback_spike_probability,
        ];
        if probabilities.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err(ConfigError::Invalid("generator probabilities must be within 0..=1"));
        }
        Ok(())
    }
}
