//! Randomized recovery manoeuvre after an aborted segment.
//!
//! 1. Rotate in place, in a random direction, until the forward window is
//!    clear (bounded by `max_rotation_steps`)
//! 2. Keep rotating for a random number of extra steps so repeated
//!    recoveries at the same spot leave on different headings
//! 3. Advance up to `advance_distance`, checking clearance before every step

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{FollowerConfig, RecoveryConfig};
use crate::follower::check_obstacle;
use crate::grid::{MotionFilter, OccupancyGrid};
use crate::robot::{RobotLink, VelocityCommand};

/// How a recovery ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecoveryOutcome {
    /// Found a clear heading and advanced this far (meters)
    Advanced(f32),
    /// No clear heading within the rotation budget
    Blocked,
}

/// Recovery behavior with its own RNG.
pub struct Recovery {
    config: RecoveryConfig,
    interval: Duration,
    obstacle_half_angle: f32,
    min_clearance: f32,
    rng: StdRng,
}

impl Recovery {
    /// Create a recovery behavior.
    ///
    /// Seed 0 draws from OS entropy; any other seed is reproducible.
    pub fn new(config: RecoveryConfig, follower: &FollowerConfig) -> Self {
        let rng = if config.seed == 0 {
            StdRng::from_os_rng()
        } else {
            StdRng::seed_from_u64(config.seed)
        };
        Self {
            interval: follower.control_interval(),
            obstacle_half_angle: follower.obstacle_half_angle,
            min_clearance: follower.min_clearance,
            config,
            rng,
        }
    }

    fn blocked<R: RobotLink>(&self, robot: &R) -> bool {
        check_obstacle(&robot.scan(), self.obstacle_half_angle, self.min_clearance)
    }

    fn step<R: RobotLink>(
        &self,
        robot: &mut R,
        grid: &mut OccupancyGrid,
        filter: &mut MotionFilter,
        cmd: VelocityCommand,
    ) {
        robot.command(cmd);
        robot.hold(self.interval);
        let pose = robot.pose();
        if filter.should_process(pose) {
            grid.observe(pose, &robot.scan());
        }
    }

    /// Run the manoeuvre. The robot is stopped on return.
    pub fn execute<R: RobotLink>(
        &mut self,
        robot: &mut R,
        grid: &mut OccupancyGrid,
        filter: &mut MotionFilter,
    ) -> RecoveryOutcome {
        robot.stop();

        let direction = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let extra_steps = self.rng.random_range(0..=self.config.extra_rotation_steps);
        let turn = VelocityCommand::rotate(direction * self.config.rotation_speed);

        tracing::info!(
            "Recovery: rotating {} until clear (+{} steps)",
            if direction > 0.0 { "left" } else { "right" },
            extra_steps
        );

        let mut rotation_steps = 0;
        while self.blocked(robot) {
            if rotation_steps >= self.config.max_rotation_steps {
                robot.stop();
                tracing::warn!(
                    "Recovery: no clear heading after {} rotation steps",
                    rotation_steps
                );
                return RecoveryOutcome::Blocked;
            }
            self.step(robot, grid, filter, turn);
            rotation_steps += 1;
        }
        for _ in 0..extra_steps {
            self.step(robot, grid, filter, turn);
        }
        robot.stop();

        let start = robot.pose().position();
        let forward = VelocityCommand::new(self.config.advance_speed, 0.0);
        let mut advanced = 0.0;
        for _ in 0..self.config.max_advance_steps {
            if advanced >= self.config.advance_distance || self.blocked(robot) {
                break;
            }
            self.step(robot, grid, filter, forward);
            advanced = robot.pose().position().distance(&start);
        }
        robot.stop();

        tracing::info!(
            "Recovery: advanced {:.2}m after {} rotation steps",
            advanced,
            rotation_steps
        );
        RecoveryOutcome::Advanced(advanced)
    }
}
