//! HIMM range-sensor update for the occupancy grid.
//!
//! For each beam inside the forward update window:
//! - Cells the ray passes through receive a "miss" (counter decremented)
//! - The endpoint cell receives a "hit" (counter incremented), scaled by
//!   the support kernel below when smoothing is on
//!
//! Beams at or beyond `max_range` are truncated to `max_range` and record
//! no hit; the truncated endpoint cell is left untouched.
//!
//! ## Support kernel
//!
//! ```text
//!   0.25  0.5  0.25
//!   0.5   1.0  0.5
//!   0.25  0.5  0.25
//! ```
//!
//! With smoothing on, the kernel weighs the evidence above the initial
//! counter value in the 3×3 neighborhood of the hit cell (the cell itself
//! included). An unsupported hit gains half the hit increment, rounded up,
//! which leaves an isolated return in the UNKNOWN band. Once the weighted
//! support reaches the hit increment the cell gains the full increment, so
//! hits extending an existing obstacle or repeating an earlier return cross
//! the occupied threshold. Every hit raises the counter by at least one.

use serde::{Deserialize, Serialize};

use crate::core::{GridCoord, Pose2D, RangeScan, normalize_angle};

use super::raycaster::BresenhamLine;
use super::storage::OccupancyGrid;

/// Edge neighbor weight of the support kernel
const EDGE_WEIGHT: f32 = 0.5;
/// Corner neighbor weight of the support kernel
const CORNER_WEIGHT: f32 = 0.25;

/// Statistics from one grid update
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    /// Beams that were rasterized
    pub rays_used: usize,
    /// Beams dropped for a non-finite or non-positive range
    pub rays_invalid: usize,
    /// Beams outside the forward update window
    pub rays_outside_window: usize,
    /// Miss observations that changed a counter
    pub cells_missed: usize,
    /// Hit observations applied
    pub cells_hit: usize,
}

impl UpdateResult {
    /// Merge another result into this one
    pub fn merge(&mut self, other: &UpdateResult) {
        self.rays_used += other.rays_used;
        self.rays_invalid += other.rays_invalid;
        self.rays_outside_window += other.rays_outside_window;
        self.cells_missed += other.cells_missed;
        self.cells_hit += other.cells_hit;
    }
}

/// Update the grid with one range sweep taken at `pose`.
///
/// Deterministic: the same grid, pose and scan always produce the same
/// counters. Because counters saturate, repeating an identical sweep
/// converges to a fixed point and the classification stops changing.
pub fn update_from_scan(grid: &mut OccupancyGrid, pose: Pose2D, scan: &RangeScan) -> UpdateResult {
    let mut result = UpdateResult::default();

    let max_range = grid.sensor().max_range;
    let half_angle = grid.sensor().update_half_angle;
    let smoothing = grid.himm().smoothing;

    let position = pose.position();
    let heading = pose.heading();
    let robot_coord = grid.world_to_grid(position);

    for (angle, range) in scan.iter() {
        if !range.is_finite() || range <= 0.0 {
            result.rays_invalid += 1;
            continue;
        }
        if normalize_angle(angle).abs() > half_angle {
            result.rays_outside_window += 1;
            continue;
        }

        let (range, is_hit) = if range >= max_range {
            (max_range, false)
        } else {
            (range, true)
        };

        let endpoint = position + heading.rotate(angle) * range;
        let endpoint_coord = grid.world_to_grid(endpoint);
        result.rays_used += 1;

        for coord in BresenhamLine::new(robot_coord, endpoint_coord) {
            if !grid.is_valid_coord(coord) {
                continue;
            }

            if coord != endpoint_coord {
                if grid.apply_miss(coord) {
                    result.cells_missed += 1;
                }
            } else if is_hit {
                if smoothing {
                    let increment = supported_increment(grid, coord);
                    grid.apply_hit_by(coord, increment);
                } else {
                    grid.apply_hit(coord);
                }
                result.cells_hit += 1;
            }
        }
    }

    tracing::trace!(
        "Grid update: {} rays, {} misses, {} hits",
        result.rays_used,
        result.cells_missed,
        result.cells_hit
    );

    result
}

/// Hit increment scaled by the kernel-weighted support around `coord`.
fn supported_increment(grid: &OccupancyGrid, coord: GridCoord) -> u8 {
    let hit = grid.himm().hit_increment;
    let initial = grid.himm().initial as f32;
    let evidence = |c: GridCoord| {
        grid.confidence(c).map_or(0.0, |value| (value as f32 - initial).max(0.0))
    };

    let mut support = evidence(coord);
    for (i, neighbor) in coord.neighbors_8().iter().enumerate() {
        // neighbors_8 alternates edge (even index) and corner (odd index)
        let weight = if i % 2 == 0 { EDGE_WEIGHT } else { CORNER_WEIGHT };
        support += weight * evidence(*neighbor);
    }

    let full = hit as f32;
    let scale = 0.5 + 0.5 * (support / full).min(1.0);
    ((full * scale).ceil() as u8).max(1)
}

impl OccupancyGrid {
    /// Fold one range sweep into the grid. See [`update_from_scan`].
    pub fn update(&mut self, pose: Pose2D, scan: &RangeScan) -> UpdateResult {
        update_from_scan(self, pose, scan)
    }

    /// Update, then rebuild the inflation mask if thickening is enabled.
    pub fn observe(&mut self, pose: Pose2D, scan: &RangeScan) -> UpdateResult {
        let result = self.update(pose, scan);
        if self.sensor().thicken {
            self.thicken_obstacles(pose);
        }
        result
    }
}
