//! Occupancy grid storage: one HIMM counter per cell.

use crate::config::{AnveshakConfig, GridConfig, HimmConfig, SensorConfig};
use crate::core::{GridCoord, WorldPoint};
use crate::error::Result;

use super::cell::{CellCounts, CellState};

/// Fixed-size occupancy grid over a rectangular world region.
///
/// The grid uses a coordinate system where:
/// - Cell (0, 0) has its lower-left corner at `origin` (`x_min`, `y_min`)
/// - Positive X is to the right (column index), positive Y is up (row index)
/// - Cell (x, y) covers `origin + [x, x+1) * cell_size` horizontally
///
/// Storage is row-major: index = `y * width + x`. Coordinates outside the
/// grid are never indexed; lookups report them as [`CellState::Unknown`]
/// and as non-traversable.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    /// HIMM confidence counters, one per cell
    counters: Vec<u8>,
    /// Inflation mask written by the thickening pass
    pub(super) inflated: Vec<bool>,
    width: usize,
    height: usize,
    cell_size: f32,
    origin: WorldPoint,
    himm: HimmConfig,
    sensor: SensorConfig,
}

impl OccupancyGrid {
    /// Create a grid covering the configured bounds, every cell UNKNOWN.
    pub fn new(grid: &GridConfig, himm: HimmConfig, sensor: SensorConfig) -> Result<Self> {
        grid.validate()?;
        himm.validate()?;
        sensor.validate()?;

        let width = grid.width();
        let height = grid.height();
        let size = width * height;

        tracing::debug!(
            "Grid {}x{} cells at {} m over x [{}, {}) y [{}, {})",
            width,
            height,
            grid.cell_size,
            grid.x_min,
            grid.x_max,
            grid.y_min,
            grid.y_max
        );

        Ok(Self {
            counters: vec![himm.initial; size],
            inflated: vec![false; size],
            width,
            height,
            cell_size: grid.cell_size,
            origin: WorldPoint::new(grid.x_min, grid.y_min),
            himm,
            sensor,
        })
    }

    /// Create a grid from the top-level configuration.
    pub fn from_config(config: &AnveshakConfig) -> Result<Self> {
        Self::new(&config.grid, config.himm.clone(), config.sensor.clone())
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Meters per cell
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World coordinates of the lower-left corner of cell (0, 0)
    #[inline]
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Total number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Counter constants
    #[inline]
    pub fn himm(&self) -> &HimmConfig {
        &self.himm
    }

    /// Sensor and update settings
    #[inline]
    pub fn sensor(&self) -> &SensorConfig {
        &self.sensor
    }

    /// Raw counters in row-major order
    #[inline]
    pub fn counters(&self) -> &[u8] {
        &self.counters
    }

    /// Highest value a counter can reach
    #[inline]
    pub fn max_confidence(&self) -> u8 {
        self.himm.max
    }

    /// Convert world coordinates to grid coordinates
    #[inline]
    pub fn world_to_grid(&self, point: WorldPoint) -> GridCoord {
        let x = ((point.x - self.origin.x) / self.cell_size).floor() as i32;
        let y = ((point.y - self.origin.y) / self.cell_size).floor() as i32;
        GridCoord::new(x, y)
    }

    /// Convert grid coordinates to world coordinates (cell center)
    #[inline]
    pub fn grid_to_world(&self, coord: GridCoord) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + (coord.x as f32 + 0.5) * self.cell_size,
            self.origin.y + (coord.y as f32 + 0.5) * self.cell_size,
        )
    }

    /// Check if grid coordinates are within bounds
    #[inline]
    pub fn is_valid_coord(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    /// Convert grid coordinates to flat array index
    #[inline]
    pub fn coord_to_index(&self, coord: GridCoord) -> Option<usize> {
        if self.is_valid_coord(coord) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    /// Convert flat array index to grid coordinates
    #[inline]
    pub fn index_to_coord(&self, index: usize) -> GridCoord {
        GridCoord::new((index % self.width) as i32, (index / self.width) as i32)
    }

    /// Iterate all in-bounds coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.cell_count()).map(|i| self.index_to_coord(i))
    }

    /// Counter value at a cell, `None` outside the grid
    #[inline]
    pub fn confidence(&self, coord: GridCoord) -> Option<u8> {
        self.coord_to_index(coord).map(|i| self.counters[i])
    }

    /// Classified state of a cell; out-of-bounds cells are UNKNOWN
    #[inline]
    pub fn state(&self, coord: GridCoord) -> CellState {
        match self.confidence(coord) {
            Some(counter) => CellState::classify(counter, &self.himm),
            None => CellState::Unknown,
        }
    }

    /// True if the thickening pass marked this cell
    #[inline]
    pub fn is_inflated(&self, coord: GridCoord) -> bool {
        self.coord_to_index(coord)
            .map(|i| self.inflated[i])
            .unwrap_or(false)
    }

    /// In bounds, not OCCUPIED and not inflated
    #[inline]
    pub fn is_traversable(&self, coord: GridCoord) -> bool {
        match self.coord_to_index(coord) {
            Some(i) => {
                !self.inflated[i]
                    && CellState::classify(self.counters[i], &self.himm) != CellState::Occupied
            }
            None => false,
        }
    }

    /// Raise a counter by the hit increment, clamped at MAX.
    ///
    /// Returns true if the counter changed.
    pub fn apply_hit(&mut self, coord: GridCoord) -> bool {
        self.apply_hit_by(coord, self.himm.hit_increment)
    }

    /// Raise a counter by `increment`, clamped at MAX.
    ///
    /// Returns true if the counter changed.
    pub fn apply_hit_by(&mut self, coord: GridCoord, increment: u8) -> bool {
        let Some(i) = self.coord_to_index(coord) else {
            return false;
        };
        let old = self.counters[i];
        let new = old.saturating_add(increment).min(self.himm.max);
        self.counters[i] = new;
        new != old
    }

    /// Lower a counter by the miss decrement, clamped at MIN.
    ///
    /// Returns true if the counter changed.
    pub fn apply_miss(&mut self, coord: GridCoord) -> bool {
        let Some(i) = self.coord_to_index(coord) else {
            return false;
        };
        let old = self.counters[i];
        let new = old.saturating_sub(self.himm.miss_decrement).max(self.himm.min);
        self.counters[i] = new;
        new != old
    }

    /// Overwrite a counter, clamped to `[MIN, MAX]`. Ignored outside the grid.
    pub fn set_confidence(&mut self, coord: GridCoord, value: u8) {
        if let Some(i) = self.coord_to_index(coord) {
            self.counters[i] = value.clamp(self.himm.min, self.himm.max);
        }
    }

    /// Force a cell to MAX so it is never selected or traversed again.
    pub fn mark_occupied(&mut self, coord: GridCoord) {
        if self.is_valid_coord(coord) {
            tracing::debug!("Marking ({}, {}) artificially occupied", coord.x, coord.y);
            self.set_confidence(coord, self.himm.max);
        }
    }

    /// Count cells by state
    pub fn count_by_state(&self) -> CellCounts {
        let mut counts = CellCounts::default();
        for &counter in &self.counters {
            counts.add(CellState::classify(counter, &self.himm));
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_grid(width: f32, height: f32) -> OccupancyGrid {
        let config = GridConfig {
            cell_size: 1.0,
            ..GridConfig::with_bounds(0.0, width, 0.0, height)
        };
        OccupancyGrid::new(&config, HimmConfig::default(), SensorConfig::default()).unwrap()
    }

    #[test]
    fn test_new_grid_all_unknown() {
        let grid = unit_grid(6.0, 4.0);
        assert_eq!(grid.width(), 6);
        assert_eq!(grid.height(), 4);
        let counts = grid.count_by_state();
        assert_eq!(counts.unknown, 24);
        assert_eq!(counts.empty + counts.occupied, 0);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let config = GridConfig::with_bounds(1.0, 0.0, 0.0, 1.0);
        let result = OccupancyGrid::new(&config, HimmConfig::default(), SensorConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_coordinate_round_trip_all_cells() {
        let config = GridConfig {
            cell_size: 0.3,
            ..GridConfig::with_bounds(-2.1, 3.0, -1.5, 2.2)
        };
        let grid =
            OccupancyGrid::new(&config, HimmConfig::default(), SensorConfig::default()).unwrap();
        for coord in grid.coords() {
            assert_eq!(grid.world_to_grid(grid.grid_to_world(coord)), coord);
        }
    }

    #[test]
    fn test_world_to_grid_floors() {
        let config = GridConfig {
            cell_size: 1.0,
            ..GridConfig::with_bounds(-5.0, 5.0, -5.0, 5.0)
        };
        let grid =
            OccupancyGrid::new(&config, HimmConfig::default(), SensorConfig::default()).unwrap();
        assert_eq!(grid.world_to_grid(WorldPoint::new(-5.0, -5.0)), GridCoord::new(0, 0));
        assert_eq!(grid.world_to_grid(WorldPoint::new(0.2, -0.2)), GridCoord::new(5, 4));
        assert_eq!(grid.world_to_grid(WorldPoint::new(-6.0, 0.0)).x, -1);
    }

    #[test]
    fn test_repeated_hits_monotone_and_clamped() {
        let mut grid = unit_grid(3.0, 3.0);
        let c = GridCoord::new(1, 1);
        let mut last = grid.confidence(c).unwrap();
        for _ in 0..20 {
            grid.apply_hit(c);
            let now = grid.confidence(c).unwrap();
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, grid.himm().max);
        assert_eq!(grid.state(c), CellState::Occupied);
        assert!(!grid.apply_hit(c));
    }

    #[test]
    fn test_repeated_misses_monotone_and_clamped() {
        let mut grid = unit_grid(3.0, 3.0);
        let c = GridCoord::new(2, 0);
        let mut last = grid.confidence(c).unwrap();
        for _ in 0..20 {
            grid.apply_miss(c);
            let now = grid.confidence(c).unwrap();
            assert!(now <= last);
            last = now;
        }
        assert_eq!(last, grid.himm().min);
        assert_eq!(grid.state(c), CellState::Empty);
    }

    #[test]
    fn test_out_of_bounds_is_unknown_and_blocked() {
        let mut grid = unit_grid(3.0, 3.0);
        let outside = GridCoord::new(-1, 3);
        assert_eq!(grid.state(outside), CellState::Unknown);
        assert!(!grid.is_traversable(outside));
        assert!(!grid.apply_hit(outside));
        assert!(!grid.apply_miss(outside));
        grid.mark_occupied(outside);
        assert_eq!(grid.confidence(outside), None);
    }

    #[test]
    fn test_mark_occupied() {
        let mut grid = unit_grid(3.0, 3.0);
        let c = GridCoord::new(0, 2);
        grid.set_confidence(c, 0);
        assert!(grid.is_traversable(c));
        grid.mark_occupied(c);
        assert_eq!(grid.confidence(c), Some(grid.max_confidence()));
        assert!(!grid.is_traversable(c));
    }

    #[test]
    fn test_set_confidence_clamps() {
        let himm = HimmConfig {
            min: 2,
            empty_threshold: 5,
            ..HimmConfig::default()
        };
        let config = GridConfig {
            cell_size: 1.0,
            ..GridConfig::with_bounds(0.0, 2.0, 0.0, 2.0)
        };
        let mut grid = OccupancyGrid::new(&config, himm, SensorConfig::default()).unwrap();
        grid.set_confidence(GridCoord::new(0, 0), 0);
        assert_eq!(grid.confidence(GridCoord::new(0, 0)), Some(2));
        grid.set_confidence(GridCoord::new(0, 0), 200);
        assert_eq!(grid.confidence(GridCoord::new(0, 0)), Some(15));
    }
}
