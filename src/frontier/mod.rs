//! Frontier detection for autonomous exploration.
//!
//! Frontiers are EMPTY borders: explored, traversable cells touching
//! unexplored space. Each border is reduced to one representative cell and
//! the representative nearest the robot becomes the next goal. When no
//! EMPTY border survives, exploration is complete.

mod border;

pub use border::{Border, qualifies, trace_all_borders, trace_border, trace_borders_of};

use crate::config::{FrontierConfig, Representative};
use crate::core::GridCoord;
use crate::grid::{CellState, OccupancyGrid};

/// A candidate goal derived from one border.
#[derive(Clone, Debug, PartialEq)]
pub struct Frontier {
    /// Goal cell chosen from the border
    pub representative: GridCoord,
    /// Number of border cells
    pub size: usize,
    /// Squared grid distance from the robot cell
    pub distance_sq: i64,
}

/// Frontier detector for exploration.
#[derive(Clone, Debug)]
pub struct FrontierDetector {
    config: FrontierConfig,
}

impl FrontierDetector {
    /// Create a new frontier detector with configuration.
    pub fn new(config: FrontierConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &FrontierConfig {
        &self.config
    }

    /// EMPTY borders with at least `min_border_size` cells.
    pub fn scan_borders(&self, grid: &OccupancyGrid) -> Vec<Border> {
        trace_borders_of(grid, CellState::Empty)
            .into_iter()
            .filter(|b| b.len() >= self.config.min_border_size)
            .collect()
    }

    /// Reduce a border to a single goal cell.
    pub fn representative(&self, border: &Border) -> Option<GridCoord> {
        match self.config.representative {
            Representative::Centroid => centroid_cell(&border.cells),
            Representative::Median => border.cells.get(border.cells.len() / 2).copied(),
        }
    }

    /// All candidate frontiers, nearest first.
    pub fn detect(&self, grid: &OccupancyGrid, robot_cell: GridCoord) -> Vec<Frontier> {
        let mut frontiers: Vec<Frontier> = self
            .scan_borders(grid)
            .iter()
            .filter_map(|border| {
                let representative = self.representative(border)?;
                if grid.state(representative).is_occupied() {
                    return None;
                }
                Some(Frontier {
                    representative,
                    size: border.len(),
                    distance_sq: representative.distance_squared(&robot_cell),
                })
            })
            .collect();

        // Stable sort keeps scan order for equal distances
        frontiers.sort_by_key(|f| f.distance_sq);
        frontiers
    }

    /// Goal cell for the next cycle, or `None` when exploration is complete.
    pub fn pick_frontier(&self, grid: &OccupancyGrid, robot_cell: GridCoord) -> Option<GridCoord> {
        let frontiers = self.detect(grid, robot_cell);
        let chosen = frontiers.first()?;
        tracing::debug!(
            "Picked frontier ({}, {}) of {} cells from {} candidates",
            chosen.representative.x,
            chosen.representative.y,
            chosen.size,
            frontiers.len()
        );
        Some(chosen.representative)
    }
}

/// Member nearest the arithmetic mean; first in trace order on ties.
fn centroid_cell(cells: &[GridCoord]) -> Option<GridCoord> {
    if cells.is_empty() {
        return None;
    }
    let n = cells.len() as f32;
    let mean_x = cells.iter().map(|c| c.x as f32).sum::<f32>() / n;
    let mean_y = cells.iter().map(|c| c.y as f32).sum::<f32>() / n;

    let mut best = cells[0];
    let mut best_dist = f32::MAX;
    for cell in cells {
        let dx = cell.x as f32 - mean_x;
        let dy = cell.y as f32 - mean_y;
        let dist = dx * dx + dy * dy;
        if dist < best_dist {
            best = *cell;
            best_dist = dist;
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridConfig, HimmConfig, SensorConfig};

    fn grid(width: f32, height: f32) -> OccupancyGrid {
        let config = GridConfig {
            cell_size: 1.0,
            ..GridConfig::with_bounds(0.0, width, 0.0, height)
        };
        OccupancyGrid::new(&config, HimmConfig::default(), SensorConfig::default()).unwrap()
    }

    fn fill_empty(grid: &mut OccupancyGrid, xs: std::ops::Range<i32>, ys: std::ops::Range<i32>) {
        for y in ys {
            for x in xs.clone() {
                grid.set_confidence(GridCoord::new(x, y), 0);
            }
        }
    }

    #[test]
    fn test_isolated_robot_cell_is_frontier() {
        let mut grid = grid(5.0, 5.0);
        grid.set_confidence(GridCoord::new(2, 2), 0);

        let detector = FrontierDetector::new(FrontierConfig::default());
        let borders = detector.scan_borders(&grid);
        assert_eq!(borders.len(), 1);
        assert_eq!(borders[0].cells, vec![GridCoord::new(2, 2)]);
        assert_eq!(
            detector.pick_frontier(&grid, GridCoord::new(2, 2)),
            Some(GridCoord::new(2, 2))
        );
    }

    #[test]
    fn test_no_frontier_when_fully_explored() {
        let mut grid = grid(6.0, 6.0);
        for coord in grid.coords().collect::<Vec<_>>() {
            let edge = coord.x == 0 || coord.y == 0 || coord.x == 5 || coord.y == 5;
            if edge {
                grid.mark_occupied(coord);
            } else {
                grid.set_confidence(coord, 0);
            }
        }
        let detector = FrontierDetector::new(FrontierConfig::default());
        assert!(detector.pick_frontier(&grid, GridCoord::new(2, 2)).is_none());
    }

    #[test]
    fn test_min_border_size_filters() {
        let mut grid = grid(10.0, 5.0);
        grid.set_confidence(GridCoord::new(1, 2), 0);
        fill_empty(&mut grid, 5..9, 2..3);

        let detector = FrontierDetector::new(FrontierConfig {
            min_border_size: 2,
            ..FrontierConfig::default()
        });
        let borders = detector.scan_borders(&grid);
        assert_eq!(borders.len(), 1);
        assert_eq!(borders[0].len(), 4);
    }

    #[test]
    fn test_nearest_representative_wins() {
        let mut grid = grid(20.0, 5.0);
        fill_empty(&mut grid, 1..4, 2..3);
        fill_empty(&mut grid, 14..17, 2..3);

        let detector = FrontierDetector::new(FrontierConfig::default());
        assert_eq!(
            detector.pick_frontier(&grid, GridCoord::new(0, 2)),
            Some(GridCoord::new(2, 2))
        );
        assert_eq!(
            detector.pick_frontier(&grid, GridCoord::new(19, 2)),
            Some(GridCoord::new(15, 2))
        );
    }

    #[test]
    fn test_centroid_and_median() {
        // L-shaped border traced from (0, 0)
        let cells = vec![
            GridCoord::new(0, 0),
            GridCoord::new(1, 0),
            GridCoord::new(2, 0),
            GridCoord::new(3, 0),
            GridCoord::new(3, 1),
            GridCoord::new(3, 2),
        ];
        // Mean is (2.0, 0.5); (2,0) is the only member within 0.5 of it
        assert_eq!(centroid_cell(&cells), Some(GridCoord::new(2, 0)));

        let border = Border {
            state: CellState::Empty,
            cells,
            extremities: Vec::new(),
        };
        let median = FrontierDetector::new(FrontierConfig {
            representative: Representative::Median,
            ..FrontierConfig::default()
        });
        assert_eq!(median.representative(&border), Some(GridCoord::new(3, 0)));
    }

    #[test]
    fn test_detect_sorted_by_distance() {
        let mut grid = grid(20.0, 5.0);
        fill_empty(&mut grid, 1..2, 1..2);
        fill_empty(&mut grid, 8..9, 1..2);
        fill_empty(&mut grid, 15..16, 1..2);

        let detector = FrontierDetector::new(FrontierConfig::default());
        let frontiers = detector.detect(&grid, GridCoord::new(9, 1));
        let order: Vec<i32> = frontiers.iter().map(|f| f.representative.x).collect();
        assert_eq!(order, vec![8, 15, 1]);
    }
}
