//! TOML-based application configuration.
//!
//! Stored at `data_dir()/config.toml`. Covers the learner's blending
//! behavior and cook-session preferences.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::learner::DecayLaw;

/// Learner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerConfig {
    /// Blending factor for the first observation of a step kind.
    #[serde(default = "default_initial_learn_rate")]
    pub initial_learn_rate: f64,
    /// How the rate changes as observations accumulate.
    #[serde(default)]
    pub decay: DecayLaw,
}

/// Cook-session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookConfig {
    /// Advance to the next step automatically after a time report.
    #[serde(default = "default_true")]
    pub auto_advance: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `data_dir()/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub learner: LearnerConfig,
    #[serde(default)]
    pub cook: CookConfig,
}

fn default_initial_learn_rate() -> f64 {
    1.0
}
fn default_true() -> bool {
    true
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            initial_learn_rate: default_initial_learn_rate(),
            decay: DecayLaw::Harmonic,
        }
    }
}

impl Default for CookConfig {
    fn default() -> Self {
        Self { auto_advance: true }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("."),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or return (and persist) the default.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }
}
