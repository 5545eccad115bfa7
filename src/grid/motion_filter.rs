//! Motion gate for periodic grid updates while following a path.
//!
//! A sweep is folded into the grid only after the robot has travelled
//! `update_distance` or turned `update_angle` since the last accepted
//! sweep. Forced updates (end of segment, after recovery) bypass the gate
//! and re-anchor it.

use crate::config::SensorConfig;
use crate::core::{Pose2D, angle_diff};

/// Distance/rotation gate in front of [`OccupancyGrid::update`](super::OccupancyGrid::update).
#[derive(Clone, Debug)]
pub struct MotionFilter {
    /// Pose when the last sweep was accepted
    last_pose: Option<Pose2D>,
    max_distance: f32,
    max_angle: f32,
    /// Sweeps that passed the gate
    passed_count: u64,
    /// Sweeps held back
    filtered_count: u64,
}

impl MotionFilter {
    /// Create a gate using the sensor update thresholds.
    pub fn new(sensor: &SensorConfig) -> Self {
        Self {
            last_pose: None,
            max_distance: sensor.update_distance,
            max_angle: sensor.update_angle,
            passed_count: 0,
            filtered_count: 0,
        }
    }

    /// Check whether a sweep at `pose` should update the grid.
    ///
    /// The first call always passes. Accepting a sweep re-anchors the gate.
    pub fn should_process(&mut self, pose: Pose2D) -> bool {
        let Some(last) = self.last_pose else {
            self.accept(pose);
            return true;
        };

        let distance = pose.position().distance(&last.position());
        let rotation = angle_diff(last.theta, pose.theta).abs();

        if distance >= self.max_distance || rotation >= self.max_angle {
            self.accept(pose);
            true
        } else {
            self.filtered_count += 1;
            false
        }
    }

    /// Record a forced update at `pose`.
    pub fn accept(&mut self, pose: Pose2D) {
        self.last_pose = Some(pose);
        self.passed_count += 1;
    }

    /// Forget the anchor so the next sweep passes.
    pub fn reset(&mut self) {
        self.last_pose = None;
    }

    /// (passed, filtered) counts
    pub fn stats(&self) -> (u64, u64) {
        (self.passed_count, self.filtered_count)
    }
}
