//! Frontier, follower, exploration and recovery configuration.

use serde::{Deserialize, Serialize};

use crate::error::{AnveshakError, Result};

/// How a border is reduced to a single goal cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representative {
    /// Border member nearest the arithmetic mean of all members
    #[default]
    Centroid,
    /// Member in the middle of the trace order
    Median,
}

/// Frontier detection configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrontierConfig {
    /// Borders with fewer cells are ignored
    #[serde(default = "default_min_border_size")]
    pub min_border_size: usize,

    /// Goal cell selection within a border
    #[serde(default)]
    pub representative: Representative,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self {
            min_border_size: default_min_border_size(),
            representative: Representative::default(),
        }
    }
}

/// Pure-pursuit follower configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FollowerConfig {
    /// Lookahead circle radius (meters)
    #[serde(default = "default_lookahead")]
    pub lookahead: f32,

    /// Forward velocity while following (m/s)
    #[serde(default = "default_velocity")]
    pub velocity: f32,

    /// Angular velocity clamp (rad/s)
    #[serde(default = "default_max_angular")]
    pub max_angular: f32,

    /// Hold time per motion command (milliseconds)
    #[serde(default = "default_control_interval_ms")]
    pub control_interval_ms: u64,

    /// Distance to the final waypoint that counts as arrived (meters)
    #[serde(default = "default_goal_tolerance")]
    pub goal_tolerance: f32,

    /// Forward window for obstacle checks, ±radians about the heading
    #[serde(default = "default_obstacle_half_angle")]
    pub obstacle_half_angle: f32,

    /// Readings below this inside the window abort the segment (meters)
    #[serde(default = "default_min_clearance")]
    pub min_clearance: f32,

    /// Control steps allowed per segment before giving up
    #[serde(default = "default_max_control_steps")]
    pub max_control_steps: usize,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            lookahead: default_lookahead(),
            velocity: default_velocity(),
            max_angular: default_max_angular(),
            control_interval_ms: default_control_interval_ms(),
            goal_tolerance: default_goal_tolerance(),
            obstacle_half_angle: default_obstacle_half_angle(),
            min_clearance: default_min_clearance(),
            max_control_steps: default_max_control_steps(),
        }
    }
}

impl FollowerConfig {
    /// Hold duration for one motion command.
    pub fn control_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.control_interval_ms)
    }
}

/// Exploration loop configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExplorationConfig {
    /// Waypoints followed between re-checks of obstacles and path validity
    #[serde(default = "default_segment_length")]
    pub segment_length: usize,

    /// Total picks of the same unreached goal before it is marked occupied
    #[serde(default = "default_max_goal_repeats")]
    pub max_goal_repeats: usize,

    /// Stop after this many cycles (0 = run until no frontier remains)
    #[serde(default)]
    pub max_cycles: usize,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            segment_length: default_segment_length(),
            max_goal_repeats: default_max_goal_repeats(),
            max_cycles: 0,
        }
    }
}

/// Randomized recovery manoeuvre configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// In-place rotation speed (rad/s)
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,

    /// Rotation steps before giving up on a clear heading
    #[serde(default = "default_max_rotation_steps")]
    pub max_rotation_steps: usize,

    /// Upper bound of random extra rotation steps once clear
    #[serde(default = "default_extra_rotation_steps")]
    pub extra_rotation_steps: usize,

    /// Distance to advance after rotating (meters)
    #[serde(default = "default_advance_distance")]
    pub advance_distance: f32,

    /// Forward speed while advancing (m/s)
    #[serde(default = "default_advance_speed")]
    pub advance_speed: f32,

    /// Advance steps before giving up
    #[serde(default = "default_max_advance_steps")]
    pub max_advance_steps: usize,

    /// RNG seed (0 = seed from entropy)
    #[serde(default)]
    pub seed: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            rotation_speed: default_rotation_speed(),
            max_rotation_steps: default_max_rotation_steps(),
            extra_rotation_steps: default_extra_rotation_steps(),
            advance_distance: default_advance_distance(),
            advance_speed: default_advance_speed(),
            max_advance_steps: default_max_advance_steps(),
            seed: 0,
        }
    }
}

/// Reject configurations the loop cannot make progress with.
pub(crate) fn validate(
    frontier: &FrontierConfig,
    follower: &FollowerConfig,
    exploration: &ExplorationConfig,
    recovery: &RecoveryConfig,
) -> Result<()> {
    if frontier.min_border_size == 0 {
        return Err(AnveshakError::Config(
            "frontier.min_border_size must be at least 1".to_string(),
        ));
    }
    if !(follower.lookahead > 0.0) || !(follower.velocity > 0.0) || !(follower.max_angular > 0.0)
    {
        return Err(AnveshakError::Config(
            "follower lookahead, velocity and max_angular must be positive".to_string(),
        ));
    }
    if follower.control_interval_ms == 0 || follower.max_control_steps == 0 {
        return Err(AnveshakError::Config(
            "follower control interval and step limit must be non-zero".to_string(),
        ));
    }
    if exploration.segment_length == 0 || exploration.max_goal_repeats == 0 {
        return Err(AnveshakError::Config(
            "exploration.segment_length and max_goal_repeats must be non-zero".to_string(),
        ));
    }
    if !(recovery.rotation_speed > 0.0) || recovery.advance_speed < 0.0 {
        return Err(AnveshakError::Config(
            "recovery speeds must be positive".to_string(),
        ));
    }
    Ok(())
}

// Frontier defaults
fn default_min_border_size() -> usize {
    1
}

// Follower defaults
fn default_lookahead() -> f32 {
    1.0
}
fn default_velocity() -> f32 {
    0.35
}
fn default_max_angular() -> f32 {
    1.2
}
fn default_control_interval_ms() -> u64 {
    500
}
fn default_goal_tolerance() -> f32 {
    0.3
}
fn default_obstacle_half_angle() -> f32 {
    0.35
}
fn default_min_clearance() -> f32 {
    0.3
}
fn default_max_control_steps() -> usize {
    120
}

// Exploration defaults
fn default_segment_length() -> usize {
    6
}
fn default_max_goal_repeats() -> usize {
    3
}

// Recovery defaults
fn default_rotation_speed() -> f32 {
    0.8
}
fn default_max_rotation_steps() -> usize {
    16
}
fn default_extra_rotation_steps() -> usize {
    3
}
fn default_advance_distance() -> f32 {
    0.3
}
fn default_advance_speed() -> f32 {
    0.2
}
fn default_max_advance_steps() -> usize {
    6
}
