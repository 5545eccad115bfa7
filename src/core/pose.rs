//! 2D pose type for robot position and orientation.
//!
//! Counter-clockwise positive rotation, heading measured from +X.

use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use super::point::WorldPoint;

/// Normalize angle to [-π, π).
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a >= PI {
        a -= TAU;
    } else if a < -PI {
        a += TAU;
    }
    a
}

/// Shortest signed angular distance from `from` to `to`.
#[inline]
pub fn angle_diff(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// A 2D pose: position in meters and heading in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in meters.
    pub x: f32,
    /// Y position in meters.
    pub y: f32,
    /// Heading angle in radians [-π, π), CCW positive from X-axis.
    pub theta: f32,
}

impl Pose2D {
    /// Create a new pose. `theta` is normalized to [-π, π).
    #[inline]
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
        }
    }

    /// Origin, facing +X.
    #[inline]
    pub const fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }

    /// Position component.
    #[inline]
    pub fn position(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }

    /// Unit heading vector.
    #[inline]
    pub fn heading(&self) -> WorldPoint {
        let (s, c) = self.theta.sin_cos();
        WorldPoint::new(c, s)
    }

    /// Express a world point in the robot frame (x forward, y left).
    #[inline]
    pub fn to_local(&self, point: WorldPoint) -> WorldPoint {
        (point - self.position()).rotate(-self.theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_normalize_angle() {
        assert_relative_eq!(normalize_angle(0.0), 0.0);
        // 3π lands on the ±π boundary; f32 rounding decides the side
        assert_relative_eq!(normalize_angle(3.0 * PI).abs(), PI, epsilon = 1e-5);
        assert_relative_eq!(normalize_angle(3.0 * PI + 0.1), -PI + 0.1, epsilon = 1e-5);
        assert_relative_eq!(normalize_angle(-3.0 * PI - 0.1), PI - 0.1, epsilon = 1e-5);
        assert_relative_eq!(normalize_angle(-FRAC_PI_2), -FRAC_PI_2);
        assert_relative_eq!(normalize_angle(TAU + 0.5), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_angle_diff_wraps() {
        assert_relative_eq!(angle_diff(PI - 0.1, -PI + 0.1), 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_heading_and_local_frame() {
        let pose = Pose2D::new(1.0, 1.0, FRAC_PI_2);
        let h = pose.heading();
        assert_relative_eq!(h.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(h.y, 1.0, epsilon = 1e-6);

        // A point 2m north of the robot is 2m straight ahead.
        let local = pose.to_local(WorldPoint::new(1.0, 3.0));
        assert_relative_eq!(local.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(local.y, 0.0, epsilon = 1e-5);
    }
}
