//! Path planning on the occupancy grid.
//!
//! - [`wave`]: breadth-first layers from the robot cell
//! - [`find_path`]: backtracking extraction of a 4-connected path

mod wavefront;

pub use wavefront::{Wave, find_path, wave};

use crate::core::GridCoord;
use crate::grid::OccupancyGrid;

/// Wavefront planner.
#[derive(Clone, Copy, Debug, Default)]
pub struct WavefrontPlanner;

impl WavefrontPlanner {
    /// Create a planner
    pub fn new() -> Self {
        Self
    }

    /// Plan a path from `start` to `goal`.
    ///
    /// Returns the cells after `start` up to and including `goal`, or `None`
    /// if the goal is blocked or unreachable.
    pub fn plan(
        &self,
        grid: &OccupancyGrid,
        start: GridCoord,
        goal: GridCoord,
    ) -> Option<Vec<GridCoord>> {
        if grid.state(goal).is_occupied() {
            tracing::warn!("Goal ({}, {}) is occupied", goal.x, goal.y);
            return None;
        }

        let w = wave(grid, start, goal);
        let path = find_path(&w, goal);
        match &path {
            Some(cells) => tracing::debug!(
                "Path to ({}, {}): {} cells over {} layers",
                goal.x,
                goal.y,
                cells.len(),
                w.len()
            ),
            None => tracing::debug!(
                "Wave from ({}, {}) exhausted after {} layers without reaching ({}, {})",
                start.x,
                start.y,
                w.len(),
                goal.x,
                goal.y
            ),
        }
        path
    }
}
