//! Ground-truth world for simulation.
//!
//! Worlds are drawn as ASCII art, one character per cell:
//!
//! ```text
//! ##########
//! #........#
//! #...##...#
//! #........#
//! ##########
//! ```
//!
//! `#` is a wall, anything else is free. The first line is the top of the
//! world, so row 0 of the map is the last line of the drawing.

use crate::core::WorldPoint;
use crate::error::{AnveshakError, Result};

/// Wall layout the simulated robot moves in.
#[derive(Clone, Debug)]
pub struct WorldMap {
    walls: Vec<bool>,
    width: usize,
    height: usize,
    resolution: f32,
    origin: WorldPoint,
}

impl WorldMap {
    /// Parse an ASCII drawing with cells of `resolution` meters.
    ///
    /// Short lines are padded with free cells. Blank leading and trailing
    /// lines are ignored.
    pub fn from_ascii(text: &str, resolution: f32, origin: WorldPoint) -> Result<Self> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(AnveshakError::WorldMap(format!(
                "resolution must be positive, got {}",
                resolution
            )));
        }

        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .skip_while(|l| l.is_empty())
            .collect();
        let end = lines
            .iter()
            .rposition(|l| !l.is_empty())
            .map_or(0, |i| i + 1);
        let lines = &lines[..end];

        let height = lines.len();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(AnveshakError::WorldMap("world drawing is empty".into()));
        }

        let mut walls = vec![false; width * height];
        for (line_index, line) in lines.iter().enumerate() {
            let row = height - 1 - line_index;
            for (col, ch) in line.chars().enumerate() {
                walls[row * width + col] = ch == '#';
            }
        }

        Ok(Self {
            walls,
            width,
            height,
            resolution,
            origin,
        })
    }

    /// Width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell size in meters
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// World extent as `(x_min, x_max, y_min, y_max)`.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        (
            self.origin.x,
            self.origin.x + self.width as f32 * self.resolution,
            self.origin.y,
            self.origin.y + self.height as f32 * self.resolution,
        )
    }

    /// Number of wall cells
    pub fn wall_count(&self) -> usize {
        self.walls.iter().filter(|&&w| w).count()
    }

    /// Whether a world point lies in a wall. Outside the map counts as wall.
    pub fn is_occupied(&self, x: f32, y: f32) -> bool {
        let col = ((x - self.origin.x) / self.resolution).floor();
        let row = ((y - self.origin.y) / self.resolution).floor();
        if col < 0.0 || row < 0.0 || col >= self.width as f32 || row >= self.height as f32 {
            return true;
        }
        self.walls[row as usize * self.width + col as usize]
    }

    /// Distance from `from` along `angle` to the first wall.
    ///
    /// Marches in quarter-cell steps and returns `max_range` when nothing is
    /// hit within range.
    pub fn ray_cast(&self, from: WorldPoint, angle: f32, max_range: f32) -> f32 {
        let step = self.resolution * 0.25;
        let (sin, cos) = angle.sin_cos();

        let mut distance = step;
        while distance < max_range {
            if self.is_occupied(from.x + distance * cos, from.y + distance * sin) {
                return distance;
            }
            distance += step;
        }
        max_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "
#####
#...#
#...#
#####
";

    fn room() -> WorldMap {
        WorldMap::from_ascii(ROOM, 1.0, WorldPoint::ZERO).unwrap()
    }

    #[test]
    fn test_parse_dimensions() {
        let world = room();
        assert_eq!(world.width(), 5);
        assert_eq!(world.height(), 4);
        assert_eq!(world.wall_count(), 14);
        assert_eq!(world.bounds(), (0.0, 5.0, 0.0, 4.0));
    }

    #[test]
    fn test_rows_bottom_up() {
        let world = WorldMap::from_ascii("#..\n...", 1.0, WorldPoint::ZERO).unwrap();
        // The '#' is on the first line, which is the top row.
        assert!(world.is_occupied(0.5, 1.5));
        assert!(!world.is_occupied(0.5, 0.5));
    }

    #[test]
    fn test_outside_is_occupied() {
        let world = room();
        assert!(world.is_occupied(-0.1, 1.0));
        assert!(world.is_occupied(1.0, 4.1));
        assert!(!world.is_occupied(2.5, 2.0));
    }

    #[test]
    fn test_ray_cast() {
        let world = room();
        let from = WorldPoint::new(1.5, 1.5);

        // Wall column starts at x = 4
        let east = world.ray_cast(from, 0.0, 10.0);
        assert!(east >= 2.5 && east <= 2.75, "east range {}", east);

        let west = world.ray_cast(from, std::f32::consts::PI, 10.0);
        assert!(west >= 0.5 && west <= 0.75, "west range {}", west);

        // Nothing within range
        assert_eq!(world.ray_cast(from, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_invalid_input() {
        assert!(WorldMap::from_ascii("\n\n", 1.0, WorldPoint::ZERO).is_err());
        assert!(WorldMap::from_ascii("#", 0.0, WorldPoint::ZERO).is_err());
    }
}
