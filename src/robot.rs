//! Robot link abstraction.
//!
//! Everything the exploration loop needs from the robot: where it is, which
//! way it faces, what its range sensor sees, and a way to drive it. The loop
//! owns no transport; implement [`RobotLink`] over hardware, a network
//! client, or the bundled [`SimulatedRobot`](crate::sim::SimulatedRobot).

use std::time::Duration;

use crate::core::{Pose2D, RangeScan, WorldPoint};

/// Velocity command for the robot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VelocityCommand {
    /// Linear velocity in m/s (positive = forward).
    pub linear: f32,
    /// Angular velocity in rad/s (positive = counter-clockwise).
    pub angular: f32,
}

impl VelocityCommand {
    /// Create a new velocity command.
    pub fn new(linear: f32, angular: f32) -> Self {
        Self { linear, angular }
    }

    /// Create a zero velocity command (stop).
    pub fn stop() -> Self {
        Self::default()
    }

    /// Create an in-place rotation.
    pub fn rotate(angular: f32) -> Self {
        Self {
            linear: 0.0,
            angular,
        }
    }

    /// Check if this is a stop command.
    pub fn is_stop(&self) -> bool {
        self.linear.abs() < 0.001 && self.angular.abs() < 0.001
    }
}

/// Trait for reading robot state and issuing motion commands.
///
/// # Example
///
/// ```ignore
/// struct MyRobot {
///     // Hardware connections
/// }
///
/// impl RobotLink for MyRobot {
///     fn pose(&self) -> Pose2D {
///         Pose2D::new(self.x, self.y, self.theta)
///     }
///
///     fn scan(&self) -> RangeScan {
///         self.latest_scan.clone()
///     }
///
///     fn send_velocity(&mut self, linear: f32, angular: f32) {
///         self.motor.set_velocity(linear, angular);
///     }
/// }
/// ```
pub trait RobotLink {
    /// Current position (meters) and heading (radians) in the world frame.
    fn pose(&self) -> Pose2D;

    /// Unit heading vector.
    ///
    /// Default derives it from [`pose`](Self::pose).
    fn heading(&self) -> WorldPoint {
        self.pose().heading()
    }

    /// Latest range sweep; angles relative to the heading.
    fn scan(&self) -> RangeScan;

    /// Command linear (m/s) and angular (rad/s) velocity.
    fn send_velocity(&mut self, linear: f32, angular: f32);

    /// Stop the robot immediately.
    ///
    /// Default implementation sends zero velocity.
    fn stop(&mut self) {
        self.send_velocity(0.0, 0.0);
    }

    /// Let the last command run for `duration`.
    ///
    /// This is the loop's only suspension point. Default blocks the thread.
    fn hold(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    /// Convenience: send a [`VelocityCommand`].
    fn command(&mut self, cmd: VelocityCommand) {
        self.send_velocity(cmd.linear, cmd.angular);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        pose: Pose2D,
        sent: Vec<(f32, f32)>,
    }

    impl RobotLink for Recorder {
        fn pose(&self) -> Pose2D {
            self.pose
        }

        fn scan(&self) -> RangeScan {
            RangeScan::default()
        }

        fn send_velocity(&mut self, linear: f32, angular: f32) {
            self.sent.push((linear, angular));
        }
    }

    #[test]
    fn test_defaults() {
        let mut robot = Recorder {
            pose: Pose2D::new(0.0, 0.0, std::f32::consts::PI / 2.0),
            sent: Vec::new(),
        };
        let heading = robot.heading();
        assert!(heading.x.abs() < 1e-6);
        assert!((heading.y - 1.0).abs() < 1e-6);

        robot.command(VelocityCommand::rotate(0.5));
        robot.stop();
        assert_eq!(robot.sent, vec![(0.0, 0.5), (0.0, 0.0)]);
        assert!(VelocityCommand::stop().is_stop());
    }
}
