//! Simulation backend.
//!
//! A [`WorldMap`] drawn in ASCII plus a [`SimulatedRobot`] that drives
//! through it and reports ray-cast range sweeps. Used by the `anveshak-sim`
//! binary and the integration tests in place of real hardware.

mod robot;
mod world;

pub use robot::{SimConfig, SimulatedRobot};
pub use world::WorldMap;

use crate::core::Pose2D;

/// Two rooms joined by a doorway, 0.5 m cells, 12 m × 7 m.
pub const DEMO_WORLD: &str = "
########################
#..........#...........#
#..........#...........#
#..........#...........#
#......................#
#......................#
#......................#
#..........#...........#
#..........#....####...#
#..........#....####...#
#..........#...........#
#..........#...........#
#..........#...........#
########################
";

/// Cell size of [`DEMO_WORLD`] in meters.
pub const DEMO_RESOLUTION: f32 = 0.5;

/// Where the robot starts in [`DEMO_WORLD`].
pub fn demo_start() -> Pose2D {
    Pose2D::new(2.75, 3.25, 0.0)
}
