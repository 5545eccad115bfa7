//! Bresenham line rasterization for range-sensor rays.
//!
//! A ray from the robot cell to the endpoint cell is walked cell by cell:
//!
//! ```text
//! From (0,0) to (7,3):
//!
//!     3 │        ●   <- endpoint (hit)
//!     2 │     ●●
//!     1 │  ●●        <- traversed (miss)
//!     0 ●●
//!       └──────────
//!        0 1 2 3 4 5 6 7
//! ```
//!
//! Integer-only stepping gives deterministic, gap-free coverage, so the
//! same ray always touches the same cells.

use crate::core::GridCoord;

/// Bresenham's line algorithm iterator.
///
/// Yields every cell from `start` to `end`, both inclusive. Coordinates may
/// lie outside any grid; callers filter them.
#[derive(Clone, Debug)]
pub struct BresenhamLine {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    x_inc: i32,
    y_inc: i32,
    error: i32,
    steep: bool,
    end_x: i32,
    end_y: i32,
    done: bool,
}

impl BresenhamLine {
    /// Create a line iterator from start to end coordinates.
    pub fn new(start: GridCoord, end: GridCoord) -> Self {
        let dx = (end.x - start.x).abs();
        let dy = (end.y - start.y).abs();
        let steep = dy > dx;

        // Walk along the major axis; swap so that axis is always "x".
        let (x, y, end_x, end_y, dx, dy) = if steep {
            (start.y, start.x, end.y, end.x, dy, dx)
        } else {
            (start.x, start.y, end.x, end.y, dx, dy)
        };

        Self {
            x,
            y,
            dx,
            dy,
            x_inc: if end_x > x { 1 } else { -1 },
            y_inc: if end_y > y { 1 } else { -1 },
            error: dx / 2,
            steep,
            end_x,
            end_y,
            done: false,
        }
    }

    /// Number of cells the full line covers.
    pub fn cell_count(&self) -> usize {
        self.dx as usize + 1
    }
}

impl Iterator for BresenhamLine {
    type Item = GridCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = if self.steep {
            GridCoord::new(self.y, self.x)
        } else {
            GridCoord::new(self.x, self.y)
        };

        if self.x == self.end_x && self.y == self.end_y {
            self.done = true;
            return Some(result);
        }

        self.error -= self.dy;
        if self.error < 0 {
            self.y += self.y_inc;
            self.error += self.dx;
        }
        self.x += self.x_inc;

        Some(result)
    }
}
