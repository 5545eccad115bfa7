//! Obstacle thickening toward the robot.
//!
//! Each OCCUPIED cell within sensor range casts a short line back toward
//! the robot; cells on that line within the inflation radius are marked as
//! inflated. The planner treats them as blocked, which keeps paths off the
//! face of obstacles the robot is currently looking at.
//!
//! The mask is rebuilt from scratch on every call and never touches the
//! HIMM counters, so cell states and frontier detection are unaffected and
//! repeated calls give the same mask.

use crate::core::{GridCoord, Pose2D};

use super::cell::CellState;
use super::raycaster::BresenhamLine;
use super::storage::OccupancyGrid;

impl OccupancyGrid {
    /// Rebuild the inflation mask for a robot at `pose`.
    ///
    /// Returns the number of inflated cells.
    pub fn thicken_obstacles(&mut self, pose: Pose2D) -> usize {
        self.inflated.fill(false);

        let robot = self.world_to_grid(pose.position());
        let cell_size = self.cell_size();
        let radius_cells = self.sensor().inflation_radius / cell_size;
        let range_cells = self.sensor().max_range / cell_size;
        let radius_sq = (radius_cells * radius_cells) as i64;
        let range_sq = (range_cells * range_cells) as i64;

        if radius_sq == 0 {
            return 0;
        }

        let sources: Vec<GridCoord> = self
            .coords()
            .filter(|c| self.state(*c) == CellState::Occupied)
            .filter(|c| c.distance_squared(&robot) <= range_sq)
            .collect();

        let mut inflated = 0;
        for source in sources {
            for cell in BresenhamLine::new(source, robot).skip(1) {
                if cell == robot || cell.distance_squared(&source) > radius_sq {
                    break;
                }
                let Some(index) = self.coord_to_index(cell) else {
                    continue;
                };
                if self.inflated[index] || self.state(cell) == CellState::Occupied {
                    continue;
                }
                self.inflated[index] = true;
                inflated += 1;
            }
        }

        tracing::trace!("Thickened obstacles: {} cells inflated", inflated);
        inflated
    }

    /// Drop every inflation mark.
    pub fn clear_inflation(&mut self) {
        self.inflated.fill(false);
    }
}
