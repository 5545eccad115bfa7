//! Core types shared by every subsystem.
//!
//! - [`GridCoord`] / [`WorldPoint`]: integer cell indices and continuous positions
//! - [`Pose2D`]: robot position and heading
//! - [`RangeScan`]: one sweep of range readings relative to the robot heading

mod point;
mod pose;
mod scan;

pub use point::{GridCoord, WorldPoint};
pub use pose::{Pose2D, angle_diff, normalize_angle};
pub use scan::RangeScan;
