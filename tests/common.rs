//! Shared worlds and setup for the exploration integration tests.

#![allow(dead_code)]

use anveshak::sim::{SimConfig, SimulatedRobot, WorldMap};
use anveshak::{AnveshakConfig, GridConfig, GridCoord, OccupancyGrid, Pose2D, WorldPoint};

/// Cell size shared by the test worlds and the grid.
pub const RESOLUTION: f32 = 0.5;

/// Fixed seed so runs are reproducible.
pub const SEED: u64 = 42;

/// A closed rectangular room with one-cell walls, `width` × `height` cells
/// including the walls.
pub fn room_text(width: usize, height: usize) -> String {
    let wall = "#".repeat(width);
    let inner = format!("#{}#", ".".repeat(width - 2));
    let mut lines = vec![wall.clone()];
    lines.extend(std::iter::repeat_n(inner, height - 2));
    lines.push(wall);
    lines.join("\n")
}

/// Two rooms side by side, joined by a doorway three cells wide.
pub fn two_rooms_text() -> String {
    "
####################
#........#.........#
#........#.........#
#........#.........#
#..................#
#..................#
#..................#
#........#.........#
#........#.........#
#........#.........#
####################
"
    .to_string()
}

pub fn world(text: &str) -> WorldMap {
    WorldMap::from_ascii(text, RESOLUTION, WorldPoint::ZERO).unwrap()
}

/// Default configuration with the grid covering exactly `world`.
pub fn config_for(world: &WorldMap) -> AnveshakConfig {
    let (x_min, x_max, y_min, y_max) = world.bounds();
    let mut config = AnveshakConfig {
        grid: GridConfig::with_bounds(x_min, x_max, y_min, y_max),
        ..AnveshakConfig::default()
    };
    config.grid.cell_size = RESOLUTION;
    config.recovery.seed = SEED;
    config
}

pub fn robot(world: WorldMap, x: f32, y: f32) -> SimulatedRobot {
    let sim = SimConfig {
        seed: SEED,
        ..SimConfig::default()
    };
    SimulatedRobot::new(world, Pose2D::new(x, y, 0.0), sim)
}

/// Free cells of `world` (grid and world share cell size and origin).
pub fn free_cells(world: &WorldMap) -> Vec<GridCoord> {
    let mut cells = Vec::new();
    for row in 0..world.height() {
        for col in 0..world.width() {
            let x = (col as f32 + 0.5) * world.resolution();
            let y = (row as f32 + 0.5) * world.resolution();
            if !world.is_occupied(x, y) {
                cells.push(GridCoord::new(col as i32, row as i32));
            }
        }
    }
    cells
}

/// Fraction of the world's free cells the grid classifies as EMPTY.
pub fn free_space_recall(grid: &OccupancyGrid, world: &WorldMap) -> f32 {
    let free = free_cells(world);
    let found = free
        .iter()
        .filter(|c| grid.state(**c) == anveshak::CellState::Empty)
        .count();
    found as f32 / free.len() as f32
}
