//! Configuration loading for Anveshak
//!
//! Every numeric constant used by the grid, detector, planner, follower and
//! exploration loop lives in [`AnveshakConfig`]. Each section can be omitted
//! from the TOML file, in which case its defaults apply.
//!
//! ```toml
//! [grid]
//! x_min = -5.0
//! x_max = 5.0
//! y_min = -5.0
//! y_max = 5.0
//! cell_size = 0.25
//!
//! [frontier]
//! representative = "median"
//! ```

mod grid;
mod navigation;

pub use grid::{GridConfig, HimmConfig, SensorConfig};
pub use navigation::{
    ExplorationConfig, FollowerConfig, FrontierConfig, RecoveryConfig, Representative,
};

use crate::error::{AnveshakError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnveshakConfig {
    /// Grid extent and cell size
    #[serde(default)]
    pub grid: GridConfig,
    /// HIMM counter constants
    #[serde(default)]
    pub himm: HimmConfig,
    /// Range sensor and update gating
    #[serde(default)]
    pub sensor: SensorConfig,
    /// Frontier detection
    #[serde(default)]
    pub frontier: FrontierConfig,
    /// Pure-pursuit path following
    #[serde(default)]
    pub follower: FollowerConfig,
    /// Exploration loop limits
    #[serde(default)]
    pub exploration: ExplorationConfig,
    /// Randomized recovery behavior
    #[serde(default)]
    pub recovery: RecoveryConfig,
}

impl AnveshakConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnveshakError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AnveshakConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check all sections
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.himm.validate()?;
        self.sensor.validate()?;
        navigation::validate(
            &self.frontier,
            &self.follower,
            &self.exploration,
            &self.recovery,
        )
    }
}
