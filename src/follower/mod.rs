//! Path follower using pure pursuit.
//!
//! Each control step:
//! 1. Pick the first waypoint (at or after the current lookahead index)
//!    that lies at least `lookahead` away from the robot
//! 2. Intersect the lookahead circle with the line from that waypoint's
//!    predecessor to the waypoint; aim at the intersection nearer the
//!    waypoint
//! 3. Turn along the arc through the aim point: `ω = v · κ`,
//!    `κ = 2 · (heading × d) / |d|²`
//!
//! ```text
//!                 aim
//!        w0 ─ ─ ─ ─●─ ─ ─ ─ w1        lookahead circle
//!                ╱                    centered on the robot
//!               ╱  L
//!          robot ──▶ heading
//! ```
//!
//! The lookahead index never decreases within a segment, so the robot
//! cannot be pulled back toward waypoints it has already passed.

pub mod geometry;

use crate::config::FollowerConfig;
use crate::core::{GridCoord, Pose2D, RangeScan, WorldPoint};
use crate::grid::{MotionFilter, OccupancyGrid};
use crate::robot::{RobotLink, VelocityCommand};

use geometry::{curvature, line_circle_intersections};

/// Output of one steering computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteeringDecision {
    /// Point the robot is steering toward
    pub target: WorldPoint,
    /// Signed curvature of the commanded arc (1/m, positive = left)
    pub curvature: f32,
    /// Command to send
    pub command: VelocityCommand,
    /// Lookahead index after this step
    pub lookahead_index: usize,
}

/// How a segment ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowOutcome {
    /// Within goal tolerance of the final waypoint
    Arrived,
    /// Forward clearance dropped below the threshold; robot stopped
    ObstacleDetected,
    /// Control step budget exhausted; robot stopped
    StepLimit,
}

/// Cell centers of a planned path.
pub fn convert_path(grid: &OccupancyGrid, path: &[GridCoord]) -> Vec<WorldPoint> {
    path.iter().map(|c| grid.grid_to_world(*c)).collect()
}

/// True if any valid reading inside `±half_angle` is closer than `min_clearance`.
pub fn check_obstacle(scan: &RangeScan, half_angle: f32, min_clearance: f32) -> bool {
    scan.forward_window(half_angle)
        .any(|(_, range)| range.is_finite() && range > 0.0 && range < min_clearance)
}

/// Pure-pursuit path follower.
#[derive(Clone, Debug)]
pub struct PathFollower {
    config: FollowerConfig,
    /// Index of the current pursuit waypoint; non-decreasing within a segment
    lookahead_index: usize,
}

impl PathFollower {
    /// Create a new path follower with configuration.
    pub fn new(config: FollowerConfig) -> Self {
        Self {
            config,
            lookahead_index: 0,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &FollowerConfig {
        &self.config
    }

    /// Current pursuit waypoint index
    pub fn lookahead_index(&self) -> usize {
        self.lookahead_index
    }

    /// Restart pursuit at the first waypoint.
    pub fn reset(&mut self) {
        self.lookahead_index = 0;
    }

    /// Check the forward window of a sweep against the configured clearance.
    pub fn obstacle_ahead(&self, scan: &RangeScan) -> bool {
        check_obstacle(scan, self.config.obstacle_half_angle, self.config.min_clearance)
    }

    /// Stop the robot if an obstacle is ahead. Returns true if it stopped.
    pub fn stop_if_obstacle<R: RobotLink>(&self, robot: &mut R) -> bool {
        if self.obstacle_ahead(&robot.scan()) {
            robot.stop();
            tracing::debug!("Obstacle within {:.2}m ahead, stopping", self.config.min_clearance);
            true
        } else {
            false
        }
    }

    /// Compute the steering command toward `waypoints` from `pose`.
    ///
    /// Advances the lookahead index but is otherwise free of state: the
    /// same index, pose and waypoints always give the same decision.
    pub fn steer(&mut self, pose: Pose2D, waypoints: &[WorldPoint]) -> SteeringDecision {
        let position = pose.position();
        let Some(&last) = waypoints.last() else {
            return SteeringDecision {
                target: position,
                curvature: 0.0,
                command: VelocityCommand::stop(),
                lookahead_index: self.lookahead_index,
            };
        };

        let lookahead = self.config.lookahead;
        let start = self.lookahead_index.min(waypoints.len() - 1);
        let beyond = (start..waypoints.len())
            .find(|&i| waypoints[i].distance(&position) >= lookahead);

        let target = match beyond {
            Some(i) => {
                self.lookahead_index = i;
                let forward = waypoints[i];
                let behind = if i == 0 { position } else { waypoints[i - 1] };
                line_circle_intersections(position, lookahead, behind, forward)
                    .into_iter()
                    .min_by(|a, b| {
                        a.distance_squared(&forward)
                            .total_cmp(&b.distance_squared(&forward))
                    })
                    .unwrap_or(forward)
            }
            None => {
                self.lookahead_index = waypoints.len() - 1;
                last
            }
        };

        let offset = target - position;
        let heading = pose.heading();
        let k = curvature(heading, offset);
        let command = self.command_for(heading, offset, k);

        tracing::trace!(
            "Pursuit idx {} target ({:.2}, {:.2}) k={:.3} cmd=({:.2}, {:.2})",
            self.lookahead_index,
            target.x,
            target.y,
            k,
            command.linear,
            command.angular
        );

        SteeringDecision {
            target,
            curvature: k,
            command,
            lookahead_index: self.lookahead_index,
        }
    }

    fn command_for(&self, heading: WorldPoint, offset: WorldPoint, k: f32) -> VelocityCommand {
        let max_angular = self.config.max_angular;
        if offset.length() <= f32::EPSILON {
            return VelocityCommand::stop();
        }

        // Target behind the robot: turn in place toward it
        if heading.dot(&offset) <= 0.0 {
            let side = if heading.cross(&offset) < 0.0 { -1.0 } else { 1.0 };
            return VelocityCommand::rotate(side * max_angular);
        }

        let velocity = self.config.velocity;
        let angular = velocity * k;
        if angular.abs() <= max_angular {
            VelocityCommand::new(velocity, angular)
        } else {
            // Keep the arc, slow down to respect the turn-rate limit
            VelocityCommand::new(max_angular / k.abs(), max_angular * angular.signum())
        }
    }

    /// Drive along `waypoints` until arrival, an obstacle, or the step limit.
    ///
    /// Each step holds the command for the control interval, then offers the
    /// new pose to `filter`; accepted poses fold a fresh sweep into `grid`.
    pub fn follow_segment<R: RobotLink>(
        &mut self,
        robot: &mut R,
        grid: &mut OccupancyGrid,
        filter: &mut MotionFilter,
        waypoints: &[WorldPoint],
    ) -> FollowOutcome {
        self.reset();
        let Some(&goal) = waypoints.last() else {
            return FollowOutcome::Arrived;
        };
        let interval = self.config.control_interval();

        for _ in 0..self.config.max_control_steps {
            let pose = robot.pose();
            if pose.position().distance(&goal) <= self.config.goal_tolerance {
                robot.stop();
                return FollowOutcome::Arrived;
            }

            let decision = self.steer(pose, waypoints);
            if decision.command.linear > 0.0 && self.stop_if_obstacle(robot) {
                return FollowOutcome::ObstacleDetected;
            }

            robot.command(decision.command);
            robot.hold(interval);

            let pose = robot.pose();
            if filter.should_process(pose) {
                grid.observe(pose, &robot.scan());
            }
        }

        robot.stop();
        if robot.pose().position().distance(&goal) <= self.config.goal_tolerance {
            FollowOutcome::Arrived
        } else {
            tracing::debug!(
                "Segment step limit ({}) reached",
                self.config.max_control_steps
            );
            FollowOutcome::StepLimit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridConfig, HimmConfig, SensorConfig};
    use approx::assert_relative_eq;
    use std::time::Duration;

    /// Point robot with perfect unicycle kinematics and a fixed sweep.
    struct Kinematic {
        pose: Pose2D,
        cmd: VelocityCommand,
        scan: RangeScan,
        stops: usize,
    }

    impl Kinematic {
        fn at(x: f32, y: f32, theta: f32) -> Self {
            Self {
                pose: Pose2D::new(x, y, theta),
                cmd: VelocityCommand::stop(),
                scan: RangeScan::new(vec![5.0; 3], vec![-0.2, 0.0, 0.2]),
                stops: 0,
            }
        }
    }

    impl RobotLink for Kinematic {
        fn pose(&self) -> Pose2D {
            self.pose
        }

        fn scan(&self) -> RangeScan {
            self.scan.clone()
        }

        fn send_velocity(&mut self, linear: f32, angular: f32) {
            self.cmd = VelocityCommand::new(linear, angular);
        }

        fn stop(&mut self) {
            self.stops += 1;
            self.cmd = VelocityCommand::stop();
        }

        fn hold(&mut self, duration: Duration) {
            let dt = duration.as_secs_f32() / 10.0;
            for _ in 0..10 {
                let theta = self.pose.theta + self.cmd.angular * dt;
                self.pose = Pose2D::new(
                    self.pose.x + self.cmd.linear * dt * self.pose.theta.cos(),
                    self.pose.y + self.cmd.linear * dt * self.pose.theta.sin(),
                    theta,
                );
            }
        }
    }

    fn grid() -> OccupancyGrid {
        let config = GridConfig {
            cell_size: 0.5,
            ..GridConfig::with_bounds(-5.0, 10.0, -5.0, 10.0)
        };
        OccupancyGrid::new(&config, HimmConfig::default(), SensorConfig::default()).unwrap()
    }

    fn straight_waypoints() -> Vec<WorldPoint> {
        (1..=8).map(|i| WorldPoint::new(i as f32 * 0.5, 0.0)).collect()
    }

    #[test]
    fn test_steer_straight_ahead() {
        let mut follower = PathFollower::new(FollowerConfig::default());
        let decision = follower.steer(Pose2D::identity(), &straight_waypoints());
        assert_relative_eq!(decision.curvature, 0.0, epsilon = 1e-6);
        assert_relative_eq!(decision.command.linear, FollowerConfig::default().velocity);
        assert_relative_eq!(decision.target.x, FollowerConfig::default().lookahead, epsilon = 1e-5);
        assert_eq!(decision.lookahead_index, 1);
    }

    #[test]
    fn test_steer_turns_toward_path() {
        let mut follower = PathFollower::new(FollowerConfig::default());
        let waypoints: Vec<_> = (1..=6).map(|i| WorldPoint::new(i as f32 * 0.5, 1.0)).collect();
        let decision = follower.steer(Pose2D::identity(), &waypoints);
        assert!(decision.curvature > 0.0);
        assert!(decision.command.angular > 0.0);
        assert!(decision.command.angular <= FollowerConfig::default().max_angular + 1e-6);
    }

    #[test]
    fn test_steer_is_deterministic() {
        let waypoints = vec![
            WorldPoint::new(0.5, 0.2),
            WorldPoint::new(1.0, 0.7),
            WorldPoint::new(1.5, 1.5),
            WorldPoint::new(2.0, 2.5),
        ];
        let pose = Pose2D::new(0.1, -0.1, 0.3);

        let mut a = PathFollower::new(FollowerConfig::default());
        let mut b = PathFollower::new(FollowerConfig::default());
        let first = a.steer(pose, &waypoints);
        let second = b.steer(pose, &waypoints);
        assert_eq!(first, second);

        a.reset();
        assert_eq!(a.steer(pose, &waypoints).curvature, first.curvature);
    }

    #[test]
    fn test_target_behind_rotates_in_place() {
        let mut follower = PathFollower::new(FollowerConfig::default());
        let waypoints = vec![WorldPoint::new(-1.0, 0.1), WorldPoint::new(-2.0, 0.1)];
        let decision = follower.steer(Pose2D::identity(), &waypoints);
        assert_eq!(decision.command.linear, 0.0);
        assert_relative_eq!(
            decision.command.angular.abs(),
            FollowerConfig::default().max_angular
        );
    }

    #[test]
    fn test_lookahead_index_never_decreases() {
        let mut follower = PathFollower::new(FollowerConfig::default());
        let waypoints = straight_waypoints();
        assert_eq!(follower.steer(Pose2D::identity(), &waypoints).lookahead_index, 1);

        let ahead = follower.steer(Pose2D::new(1.2, 0.0, 0.0), &waypoints);
        assert_eq!(ahead.lookahead_index, 4);

        // Returning to the start does not rewind the index
        let back = follower.steer(Pose2D::identity(), &waypoints);
        assert_eq!(back.lookahead_index, 4);
    }

    #[test]
    fn test_final_waypoint_when_within_lookahead() {
        let mut follower = PathFollower::new(FollowerConfig::default());
        let waypoints = vec![WorldPoint::new(0.4, 0.0)];
        let decision = follower.steer(Pose2D::identity(), &waypoints);
        assert_eq!(decision.target, WorldPoint::new(0.4, 0.0));
        assert_eq!(decision.lookahead_index, 0);
    }

    #[test]
    fn test_check_obstacle_window() {
        let scan = RangeScan::new(vec![0.2, 5.0, 0.1], vec![1.0, 0.0, f32::NAN]);
        assert!(!check_obstacle(&scan, 0.35, 0.3));
        let scan = RangeScan::new(vec![5.0, 0.25], vec![0.0, 0.3]);
        assert!(check_obstacle(&scan, 0.35, 0.3));
        let scan = RangeScan::new(vec![f32::INFINITY, 0.0], vec![0.0, 0.0]);
        assert!(!check_obstacle(&scan, 0.35, 0.3));
    }

    #[test]
    fn test_follow_segment_arrives() {
        let mut follower = PathFollower::new(FollowerConfig::default());
        let mut robot = Kinematic::at(0.0, 0.0, 0.0);
        let mut grid = grid();
        let mut filter = MotionFilter::new(grid.sensor());
        let waypoints = straight_waypoints();

        let outcome = follower.follow_segment(&mut robot, &mut grid, &mut filter, &waypoints);
        assert_eq!(outcome, FollowOutcome::Arrived);
        assert!(robot.pose.position().distance(&WorldPoint::new(4.0, 0.0)) <= 0.3);
        assert!(robot.stops >= 1);
        // Periodic updates mapped the corridor ahead
        assert!(grid.count_by_state().empty > 0);
    }

    #[test]
    fn test_follow_segment_aborts_on_obstacle() {
        let mut follower = PathFollower::new(FollowerConfig::default());
        let mut robot = Kinematic::at(0.0, 0.0, 0.0);
        robot.scan = RangeScan::new(vec![0.2], vec![0.0]);
        let mut grid = grid();
        let mut filter = MotionFilter::new(grid.sensor());

        let outcome =
            follower.follow_segment(&mut robot, &mut grid, &mut filter, &straight_waypoints());
        assert_eq!(outcome, FollowOutcome::ObstacleDetected);
        assert_eq!(robot.pose, Pose2D::identity());
        assert_eq!(robot.stops, 1);
    }

    #[test]
    fn test_follow_segment_step_limit() {
        let config = FollowerConfig {
            max_control_steps: 2,
            ..FollowerConfig::default()
        };
        let mut follower = PathFollower::new(config);
        let mut robot = Kinematic::at(0.0, 0.0, 0.0);
        let mut grid = grid();
        let mut filter = MotionFilter::new(grid.sensor());

        let outcome =
            follower.follow_segment(&mut robot, &mut grid, &mut filter, &straight_waypoints());
        assert_eq!(outcome, FollowOutcome::StepLimit);
    }

    #[test]
    fn test_convert_path_uses_cell_centers() {
        let grid = grid();
        let points = convert_path(&grid, &[GridCoord::new(10, 10), GridCoord::new(11, 10)]);
        assert_relative_eq!(points[0].x, 0.25);
        assert_relative_eq!(points[0].y, 0.25);
        assert_relative_eq!(points[1].x, 0.75);
    }
}
