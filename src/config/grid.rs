//! Grid, HIMM counter and sensor configuration.

use serde::{Deserialize, Serialize};

use crate::error::{AnveshakError, Result};

/// World bounds and cell size.
///
/// The grid covers `[x_min, x_max) × [y_min, y_max)` and is sized once at
/// construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridConfig {
    /// Left edge of the mapped area (meters)
    #[serde(default = "default_x_min")]
    pub x_min: f32,

    /// Right edge of the mapped area (meters)
    #[serde(default = "default_x_max")]
    pub x_max: f32,

    /// Bottom edge of the mapped area (meters)
    #[serde(default = "default_y_min")]
    pub y_min: f32,

    /// Top edge of the mapped area (meters)
    #[serde(default = "default_y_max")]
    pub y_max: f32,

    /// Edge length of one square cell (meters)
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            x_min: default_x_min(),
            x_max: default_x_max(),
            y_min: default_y_min(),
            y_max: default_y_max(),
            cell_size: default_cell_size(),
        }
    }
}

impl GridConfig {
    /// Config for explicit bounds with the default cell size.
    pub fn with_bounds(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
            ..Self::default()
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        ((self.x_max - self.x_min) / self.cell_size).floor().max(0.0) as usize
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        ((self.y_max - self.y_min) / self.cell_size).floor().max(0.0) as usize
    }

    /// Reject bounds that cannot hold a single cell.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.x_min, self.x_max, self.y_min, self.y_max, self.cell_size]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(AnveshakError::InvalidBounds(
                "bounds and cell size must be finite".to_string(),
            ));
        }
        if self.cell_size <= 0.0 {
            return Err(AnveshakError::InvalidBounds(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if self.width() == 0 || self.height() == 0 {
            return Err(AnveshakError::InvalidBounds(format!(
                "x [{}, {}) y [{}, {}) holds no {} m cell",
                self.x_min, self.x_max, self.y_min, self.y_max, self.cell_size
            )));
        }
        Ok(())
    }
}

/// HIMM bounded counter parameters.
///
/// A cell is EMPTY below `empty_threshold`, OCCUPIED above
/// `occupied_threshold`, UNKNOWN otherwise. `initial` must sit inside the
/// unknown band so untouched cells classify as UNKNOWN.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HimmConfig {
    /// Lowest counter value
    #[serde(default = "default_himm_min")]
    pub min: u8,

    /// Highest counter value
    #[serde(default = "default_himm_max")]
    pub max: u8,

    /// Counter value of a never-observed cell
    #[serde(default = "default_himm_initial")]
    pub initial: u8,

    /// Counter strictly below this is EMPTY
    #[serde(default = "default_empty_threshold")]
    pub empty_threshold: u8,

    /// Counter strictly above this is OCCUPIED
    #[serde(default = "default_occupied_threshold")]
    pub occupied_threshold: u8,

    /// Increment applied to the endpoint cell of a ray
    #[serde(default = "default_hit_increment")]
    pub hit_increment: u8,

    /// Decrement applied to every traversed cell before the endpoint
    #[serde(default = "default_miss_decrement")]
    pub miss_decrement: u8,

    /// Scale hits by 3×3 neighborhood support so isolated returns stay unknown
    #[serde(default = "default_true")]
    pub smoothing: bool,
}

impl Default for HimmConfig {
    fn default() -> Self {
        Self {
            min: default_himm_min(),
            max: default_himm_max(),
            initial: default_himm_initial(),
            empty_threshold: default_empty_threshold(),
            occupied_threshold: default_occupied_threshold(),
            hit_increment: default_hit_increment(),
            miss_decrement: default_miss_decrement(),
            smoothing: default_true(),
        }
    }
}

impl HimmConfig {
    /// Check counter bounds and threshold ordering.
    pub fn validate(&self) -> Result<()> {
        if self.min >= self.max {
            return Err(AnveshakError::Config(format!(
                "himm.min ({}) must be below himm.max ({})",
                self.min, self.max
            )));
        }
        if self.empty_threshold > self.occupied_threshold {
            return Err(AnveshakError::Config(format!(
                "himm.empty_threshold ({}) exceeds himm.occupied_threshold ({})",
                self.empty_threshold, self.occupied_threshold
            )));
        }
        if self.initial < self.empty_threshold || self.initial > self.occupied_threshold {
            return Err(AnveshakError::Config(format!(
                "himm.initial ({}) must lie in the unknown band [{}, {}]",
                self.initial, self.empty_threshold, self.occupied_threshold
            )));
        }
        if self.initial < self.min || self.initial > self.max {
            return Err(AnveshakError::Config(format!(
                "himm.initial ({}) outside [{}, {}]",
                self.initial, self.min, self.max
            )));
        }
        if self.occupied_threshold >= self.max || self.empty_threshold <= self.min {
            return Err(AnveshakError::Config(
                "thresholds must leave both EMPTY and OCCUPIED reachable".to_string(),
            ));
        }
        if self.hit_increment == 0 || self.miss_decrement == 0 {
            return Err(AnveshakError::Config(
                "himm increments must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Range sensor and map-update parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Readings at or beyond this range are treated as "no return" (meters)
    #[serde(default = "default_max_range")]
    pub max_range: f32,

    /// Only beams within ±this angle of the heading update the grid (radians)
    #[serde(default = "default_update_half_angle")]
    pub update_half_angle: f32,

    /// Travel distance between periodic grid updates (meters)
    #[serde(default = "default_update_distance")]
    pub update_distance: f32,

    /// Rotation between periodic grid updates (radians)
    #[serde(default = "default_update_angle")]
    pub update_angle: f32,

    /// Run the obstacle inflation pass after each update
    #[serde(default)]
    pub thicken: bool,

    /// Inflation distance from an occupied cell toward the robot (meters)
    #[serde(default = "default_inflation_radius")]
    pub inflation_radius: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            max_range: default_max_range(),
            update_half_angle: default_update_half_angle(),
            update_distance: default_update_distance(),
            update_angle: default_update_angle(),
            thicken: false,
            inflation_radius: default_inflation_radius(),
        }
    }
}

impl SensorConfig {
    /// Reject a non-positive range or window and negative gates
    pub fn validate(&self) -> Result<()> {
        if !(self.max_range > 0.0) {
            return Err(AnveshakError::Config(format!(
                "sensor.max_range must be positive, got {}",
                self.max_range
            )));
        }
        if !(self.update_half_angle > 0.0) {
            return Err(AnveshakError::Config(
                "sensor.update_half_angle must be positive".to_string(),
            ));
        }
        if self.update_distance < 0.0 || self.update_angle < 0.0 || self.inflation_radius < 0.0 {
            return Err(AnveshakError::Config(
                "sensor distances and angles must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

// Default value functions
fn default_x_min() -> f32 {
    -10.0
}
fn default_x_max() -> f32 {
    10.0
}
fn default_y_min() -> f32 {
    -10.0
}
fn default_y_max() -> f32 {
    10.0
}
fn default_cell_size() -> f32 {
    0.5
}

// HIMM defaults: one miss empties an unknown cell, one hit occupies it
fn default_himm_min() -> u8 {
    0
}
fn default_himm_max() -> u8 {
    15
}
fn default_himm_initial() -> u8 {
    7
}
fn default_empty_threshold() -> u8 {
    6
}
fn default_occupied_threshold() -> u8 {
    9
}
fn default_hit_increment() -> u8 {
    3
}
fn default_miss_decrement() -> u8 {
    2
}
fn default_true() -> bool {
    true
}

// Sensor defaults
fn default_max_range() -> f32 {
    6.0
}
fn default_update_half_angle() -> f32 {
    std::f32::consts::FRAC_PI_2
}
fn default_update_distance() -> f32 {
    0.5
}
fn default_update_angle() -> f32 {
    0.5
}
fn default_inflation_radius() -> f32 {
    0.5
}
