//! HIMM occupancy grid.
//!
//! - [`OccupancyGrid`]: fixed-size counter storage, coordinate transforms,
//!   hit/miss primitives and the artificial-occupancy override
//! - [`CellState`]: ternary classification computed from a counter
//! - [`update_from_scan`]: folds a range sweep into the grid
//! - [`MotionFilter`]: gates periodic updates by travelled distance
//! - [`BresenhamLine`]: the ray rasterizer shared by updates and inflation

mod cell;
mod inflation;
mod motion_filter;
mod range_update;
pub mod raycaster;
mod storage;

pub use cell::{CellCounts, CellState};
pub use motion_filter::MotionFilter;
pub use range_update::{UpdateResult, update_from_scan};
pub use raycaster::BresenhamLine;
pub use storage::OccupancyGrid;
