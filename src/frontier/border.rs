//! Border tracing over the ternary grid.
//!
//! A cell *qualifies* when it is in bounds, not OCCUPIED, and has at least
//! one in-bounds 4-connected UNKNOWN neighbor. A border is the maximal set
//! of qualifying cells that share the seed's state and are reachable from
//! the seed through 8-connected steps:
//!
//! ```text
//!   ? ? ? ? ?        ? ? ? ? ?
//!   ? . . . ?        ? B B B ?     B = border member (EMPTY, touches '?')
//!   # . . . ?   ->   # B . B ?
//!   # . . . ?        # B B B ?
//!   # # # # #        # # # # #
//! ```

use std::collections::{HashSet, VecDeque};

use crate::core::GridCoord;
use crate::grid::{CellState, OccupancyGrid};

/// One traced border.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Border {
    /// State shared by every member
    pub state: CellState,
    /// Members in trace order, seed first
    pub cells: Vec<GridCoord>,
    /// Members with an in-bounds 8-neighbor in a different state
    pub extremities: Vec<GridCoord>,
}

impl Border {
    /// Number of cells in the border
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the border holds no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// True if `coord` can be part of a border.
pub fn qualifies(grid: &OccupancyGrid, coord: GridCoord) -> bool {
    if !grid.is_valid_coord(coord) || grid.state(coord).is_occupied() {
        return false;
    }
    coord
        .neighbors_4()
        .iter()
        .any(|n| grid.is_valid_coord(*n) && grid.state(*n).is_unknown())
}

/// Trace the border containing `seed`.
///
/// Pure: reads the grid and nothing else. Returns `None` if the seed does
/// not qualify.
pub fn trace_border(grid: &OccupancyGrid, seed: GridCoord) -> Option<Border> {
    if !qualifies(grid, seed) {
        return None;
    }
    let state = grid.state(seed);

    let mut visited: HashSet<GridCoord> = HashSet::new();
    let mut queue = VecDeque::new();
    let mut cells = Vec::new();

    visited.insert(seed);
    queue.push_back(seed);

    while let Some(cell) = queue.pop_front() {
        cells.push(cell);
        for neighbor in cell.neighbors_8() {
            if visited.contains(&neighbor) {
                continue;
            }
            if grid.state(neighbor) == state && qualifies(grid, neighbor) {
                visited.insert(neighbor);
                queue.push_back(neighbor);
            }
        }
    }

    let extremities = cells
        .iter()
        .copied()
        .filter(|cell| {
            cell.neighbors_8()
                .iter()
                .any(|n| grid.is_valid_coord(*n) && grid.state(*n) != state)
        })
        .collect();

    Some(Border {
        state,
        cells,
        extremities,
    })
}

/// Trace every border in the grid, whatever its state.
///
/// Cells are scanned in row-major order; each qualifying cell not already
/// claimed seeds a new trace. Every qualifying cell ends up in exactly one
/// border.
pub fn trace_all_borders(grid: &OccupancyGrid) -> Vec<Border> {
    trace_borders_where(grid, |_| true)
}

/// Trace only borders whose cells are in `state`.
pub fn trace_borders_of(grid: &OccupancyGrid, state: CellState) -> Vec<Border> {
    trace_borders_where(grid, |s| s == state)
}

fn trace_borders_where(grid: &OccupancyGrid, keep: impl Fn(CellState) -> bool) -> Vec<Border> {
    let mut claimed = vec![false; grid.cell_count()];
    let mut borders = Vec::new();

    for (index, coord) in grid.coords().enumerate() {
        if claimed[index] || !keep(grid.state(coord)) {
            continue;
        }
        let Some(border) = trace_border(grid, coord) else {
            continue;
        };
        for cell in &border.cells {
            if let Some(i) = grid.coord_to_index(*cell) {
                claimed[i] = true;
            }
        }
        borders.push(border);
    }

    borders
}
