//! # Anveshak
//!
//! Frontier-based autonomous exploration for a mobile robot with a planar
//! range sensor.
//!
//! ## Overview
//!
//! The robot builds a HIMM occupancy grid from range sweeps, finds the
//! boundaries between explored free space and unexplored space, and drives
//! to the nearest one until nothing is left to explore:
//!
//! ```text
//!   sweep ──► grid (HIMM) ──► frontiers ──► wavefront path ──► pure pursuit
//!     ▲                                                            │
//!     └──────────────────────── robot link ◄───────────────────────┘
//! ```
//!
//! - **Grid**: bounded-counter cells (Unknown / Empty / Occupied) with a
//!   support kernel on hits and an optional inflation mask
//! - **Frontier detection**: 8-connected border tracing of Empty cells that
//!   touch Unknown space
//! - **Planning**: breadth-first wave from the robot cell with depth-guided
//!   backtracking
//! - **Following**: pure pursuit with a forward obstacle window
//! - **Exploration**: segment-wise following, replanning, stall guard and a
//!   randomized recovery manoeuvre
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use anveshak::{AnveshakConfig, Explorer, Pose2D, WorldPoint};
//! use anveshak::sim::{DEMO_RESOLUTION, DEMO_WORLD, SimConfig, SimulatedRobot, WorldMap};
//!
//! let world = WorldMap::from_ascii(DEMO_WORLD, DEMO_RESOLUTION, WorldPoint::ZERO)?;
//! let mut robot = SimulatedRobot::new(world, Pose2D::new(2.75, 3.25, 0.0), SimConfig::default());
//!
//! let mut explorer = Explorer::new(&AnveshakConfig::default())?;
//! let report = explorer.run(&mut robot);
//! println!("{} goals reached", report.goals_reached);
//! ```
//!
//! ## Coordinate System
//!
//! - X: right, Y: up; grid row 0 is the bottom of the map
//! - Theta: radians, CCW positive from +X, normalized to [-π, π)
//! - Scan angles are relative to the robot heading

#![warn(missing_docs)]

// Configuration and errors
pub mod config;
pub mod error;

// Core types
pub mod core;

// Occupancy grid
pub mod grid;

// Frontier detection
pub mod frontier;

// Wavefront path planning
pub mod planning;

// Pure-pursuit path following
pub mod follower;

// Robot abstraction and the exploration loop
pub mod exploration;
pub mod robot;

// Map rendering
pub mod display;

// Simulation backend
pub mod sim;

// Re-export commonly used types
pub use config::{
    AnveshakConfig, ExplorationConfig, FollowerConfig, FrontierConfig, GridConfig, HimmConfig,
    RecoveryConfig, Representative, SensorConfig,
};
pub use core::{GridCoord, Pose2D, RangeScan, WorldPoint};
pub use display::{AsciiDisplay, MapDisplay, MapFrame};
pub use error::{AnveshakError, Result};
pub use exploration::{CycleOutcome, ExplorationReport, ExplorationStatus, Explorer};
pub use follower::{FollowOutcome, PathFollower};
pub use frontier::{Frontier, FrontierDetector};
pub use grid::{CellCounts, CellState, MotionFilter, OccupancyGrid};
pub use planning::WavefrontPlanner;
pub use robot::{RobotLink, VelocityCommand};
