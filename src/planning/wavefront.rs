//! Wavefront planner with backtracking path extraction.
//!
//! The wave is a breadth-first expansion from the robot cell over
//! 4-connected, non-occupied cells, stored as layers:
//!
//! ```text
//!   layer:  S 0 1 2 3       S = start, G = goal
//!           0 1 # 3 4       # = occupied
//!           1 2 # 4 G(5)
//! ```
//!
//! The path is recovered by walking back from the goal, one layer at a time,
//! using an explicit stack of `(depth, candidate index)` frames. A frame
//! whose candidates are exhausted marks its cell dead and pops.

use std::collections::{HashMap, HashSet};

use crate::core::GridCoord;
use crate::grid::OccupancyGrid;

/// Breadth-first layers around a start cell.
#[derive(Clone, Debug, Default)]
pub struct Wave {
    start: GridCoord,
    layers: Vec<Vec<GridCoord>>,
    depth: HashMap<GridCoord, usize>,
}

impl Wave {
    /// Cell the wave grew from
    pub fn start(&self) -> GridCoord {
        self.start
    }

    /// Layers in expansion order; layer 0 is adjacent to the start
    pub fn layers(&self) -> &[Vec<GridCoord>] {
        &self.layers
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True if the wave never left its start cell
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer index of a cell, if the wave reached it
    pub fn depth_of(&self, coord: GridCoord) -> Option<usize> {
        self.depth.get(&coord).copied()
    }

    /// True if the wave reached `coord`
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.depth.contains_key(&coord)
    }
}

/// Grow a wave from `start` until `goal` appears or nothing new is reachable.
///
/// Occupied, inflated and out-of-bounds cells are never entered; the goal
/// itself only has to be in bounds and not occupied. A wave from a cell to
/// itself, or from outside the grid, is empty.
pub fn wave(grid: &OccupancyGrid, start: GridCoord, goal: GridCoord) -> Wave {
    let mut result = Wave {
        start,
        ..Wave::default()
    };
    if start == goal || !grid.is_valid_coord(start) {
        return result;
    }

    let passable = |c: GridCoord| {
        if c == goal {
            grid.is_valid_coord(c) && !grid.state(c).is_occupied()
        } else {
            grid.is_traversable(c)
        }
    };

    let mut visited: HashSet<GridCoord> = HashSet::new();
    visited.insert(start);
    let mut current = vec![start];

    loop {
        let mut next = Vec::new();
        let mut reached = false;
        for cell in &current {
            for neighbor in cell.neighbors_4() {
                if visited.contains(&neighbor) || !passable(neighbor) {
                    continue;
                }
                visited.insert(neighbor);
                reached |= neighbor == goal;
                next.push(neighbor);
            }
        }

        if next.is_empty() {
            break;
        }

        let depth = result.layers.len();
        for cell in &next {
            result.depth.insert(*cell, depth);
        }
        result.layers.push(next.clone());

        if reached {
            break;
        }
        current = next;
    }

    result
}

/// Extract a path from the wave's start to `goal`.
///
/// The path excludes the start, ends at the goal and steps between
/// 4-connected cells. `None` if the goal is not in the wave; an empty path
/// if the goal is the start.
pub fn find_path(wave: &Wave, goal: GridCoord) -> Option<Vec<GridCoord>> {
    if goal == wave.start {
        return Some(Vec::new());
    }
    let goal_depth = wave.depth_of(goal)?;

    let mut dead: HashSet<GridCoord> = HashSet::new();
    // Cells from the goal back toward the start; path[i] sits on stack[i]
    let mut path = vec![goal];
    // (depth, next candidate index into neighbors_4)
    let mut stack: Vec<(usize, usize)> = vec![(goal_depth, 0)];

    while let Some(frame) = stack.last_mut() {
        let (depth, candidate) = *frame;
        let Some(&cell) = path.last() else {
            break;
        };

        if depth == 0 {
            path.reverse();
            return Some(path);
        }

        let neighbors = cell.neighbors_4();
        let mut step = None;
        let mut index = candidate;
        while index < neighbors.len() {
            let neighbor = neighbors[index];
            index += 1;
            if wave.depth_of(neighbor) == Some(depth - 1) && !dead.contains(&neighbor) {
                step = Some(neighbor);
                break;
            }
        }
        frame.1 = index;

        match step {
            Some(next) if stack.len() < wave.len() => {
                path.push(next);
                stack.push((depth - 1, 0));
            }
            _ => {
                dead.insert(cell);
                path.pop();
                stack.pop();
            }
        }
    }

    None
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
        let mut grid =
            OccupancyGrid::new(&config, HimmConfig::default(), SensorConfig::default()).unwrap();
        for coord in grid.coords().collect::<Vec<_>>() {
            grid.set_confidence(coord, 0);
        }
        grid
    }

    fn assert_connected(start: GridCoord, path: &[GridCoord]) {
        let mut previous = start;
        for cell in path {
            assert!(previous.is_adjacent_4(cell), "{:?} -> {:?}", previous, cell);
            previous = *cell;
        }
    }

    /// Wave built directly from layers, bypassing the grid
    fn layered_wave(start: GridCoord, layers: Vec<Vec<GridCoord>>) -> Wave {
        let mut depth = HashMap::new();
        for (i, layer) in layers.iter().enumerate() {
            for cell in layer {
                depth.insert(*cell, i);
            }
        }
        Wave {
            start,
            layers,
            depth,
        }
    }

    #[test]
    fn test_backtracks_out_of_dead_end() {
        let c = GridCoord::new;
        // (3, 2) sits one layer below the goal but has no parent in layer 0
        let w = layered_wave(c(1, 0), vec![vec![c(2, 0)], vec![c(3, 2), c(2, 1)], vec![c(3, 1)]]);

        let path = find_path(&w, c(3, 1)).unwrap();
        assert_eq!(path, vec![c(2, 0), c(2, 1), c(3, 1)]);
        assert!(!path.contains(&c(3, 2)));
        assert_connected(c(1, 0), &path);
    }

    #[test]
    fn test_all_branches_dead_gives_none() {
        let c = GridCoord::new;
        // Layer 0 touches neither layer 1 cell
        let w = layered_wave(c(0, 0), vec![vec![c(1, 0)], vec![c(3, 2), c(2, 1)], vec![c(3, 1)]]);
        assert_eq!(find_path(&w, c(3, 1)), None);
    }

    #[test]
    fn test_depth_cap_stops_search() {
        let c = GridCoord::new;
        let mut w = layered_wave(c(0, 0), vec![vec![c(1, 0)], vec![c(2, 0)], vec![c(3, 0)]]);
        assert_eq!(find_path(&w, c(3, 0)).map(|p| p.len()), Some(3));

        // Goal still reports depth 2, but only two layers remain to descend
        w.layers.truncate(2);
        assert_eq!(find_path(&w, c(3, 0)), None);
    }

    #[test]
    fn test_corridor_path() {
        let grid = grid(10.0, 1.0);
        let start = GridCoord::new(0, 0);
        let goal = GridCoord::new(9, 0);

        let w = wave(&grid, start, goal);
        assert_eq!(w.len(), 9);
        assert_eq!(w.depth_of(goal), Some(8));

        let path = find_path(&w, goal).unwrap();
        assert_eq!(path.len(), 9);
        assert_eq!(*path.last().unwrap(), goal);
        assert!(!path.contains(&start));
        for pair in path.windows(2) {
            assert!(pair[1].x > pair[0].x);
        }
        assert_connected(start, &path);
    }

    #[test]
    fn test_blocked_corridor() {
        let mut grid = grid(10.0, 1.0);
        grid.mark_occupied(GridCoord::new(5, 0));
        let goal = GridCoord::new(9, 0);

        let w = wave(&grid, GridCoord::new(0, 0), goal);
        assert!(!w.contains(goal));
        assert_eq!(w.len(), 4);
        assert!(find_path(&w, goal).is_none());
    }

    #[test]
    fn test_detour_around_wall() {
        let mut grid = grid(7.0, 5.0);
        for y in 0..4 {
            grid.mark_occupied(GridCoord::new(3, y));
        }
        let start = GridCoord::new(0, 0);
        let goal = GridCoord::new(6, 0);

        let w = wave(&grid, start, goal);
        let path = find_path(&w, goal).unwrap();
        assert_eq!(path.len(), w.depth_of(goal).unwrap() + 1);
        assert!(path.contains(&GridCoord::new(3, 4)));
        assert!(path.iter().all(|c| grid.is_traversable(*c)));
        assert_connected(start, &path);
    }

    #[test]
    fn test_depth_increases_along_path() {
        let grid = grid(6.0, 6.0);
        let start = GridCoord::new(1, 1);
        let goal = GridCoord::new(4, 5);
        let w = wave(&grid, start, goal);
        let path = find_path(&w, goal).unwrap();
        for (i, cell) in path.iter().enumerate() {
            assert_eq!(w.depth_of(*cell), Some(i));
        }
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = grid(3.0, 3.0);
        let c = GridCoord::new(1, 1);
        let w = wave(&grid, c, c);
        assert!(w.is_empty());
        assert_eq!(find_path(&w, c), Some(Vec::new()));
    }

    #[test]
    fn test_occupied_goal_unreachable() {
        let mut grid = grid(5.0, 5.0);
        let goal = GridCoord::new(4, 4);
        grid.mark_occupied(goal);
        let w = wave(&grid, GridCoord::new(0, 0), goal);
        assert!(!w.contains(goal));
        assert!(find_path(&w, goal).is_none());
    }

    #[test]
    fn test_unknown_cells_are_traversable() {
        let mut grid = grid(5.0, 1.0);
        grid.set_confidence(GridCoord::new(2, 0), grid.himm().initial);
        let goal = GridCoord::new(4, 0);
        let w = wave(&grid, GridCoord::new(0, 0), goal);
        assert!(w.contains(goal));
    }

    #[test]
    fn test_inflated_cells_block_but_not_goal() {
        let config = GridConfig {
            cell_size: 1.0,
            ..GridConfig::with_bounds(0.0, 6.0, 0.0, 1.0)
        };
        let sensor = SensorConfig {
            inflation_radius: 1.0,
            ..SensorConfig::default()
        };
        let mut grid = OccupancyGrid::new(&config, HimmConfig::default(), sensor).unwrap();
        for coord in grid.coords().collect::<Vec<_>>() {
            grid.set_confidence(coord, 0);
        }
        grid.mark_occupied(GridCoord::new(5, 0));
        grid.thicken_obstacles(crate::core::Pose2D::new(0.5, 0.5, 0.0));
        assert!(grid.is_inflated(GridCoord::new(4, 0)));

        let goal = GridCoord::new(4, 0);
        let w = wave(&grid, GridCoord::new(0, 0), goal);
        assert_eq!(find_path(&w, goal).map(|p| p.len()), Some(4));
    }

    #[test]
    fn test_start_outside_grid() {
        let grid = grid(3.0, 3.0);
        let w = wave(&grid, GridCoord::new(-1, 0), GridCoord::new(2, 2));
        assert!(w.is_empty());
    }
}
