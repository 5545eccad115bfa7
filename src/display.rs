//! Map display sink.
//!
//! The exploration loop pushes a [`MapFrame`] once per cycle. Displays are
//! visualization only; a failing display is logged and otherwise ignored.

use std::io::Write;

use crate::config::HimmConfig;
use crate::core::GridCoord;
use crate::grid::{CellState, OccupancyGrid};

/// Snapshot of the grid handed to a display.
#[derive(Clone, Copy, Debug)]
pub struct MapFrame<'a> {
    /// Raw counters, row-major, row 0 at the bottom
    pub counters: &'a [u8],
    /// Width in cells
    pub width: usize,
    /// Height in cells
    pub height: usize,
    /// Highest possible counter value
    pub max_confidence: u8,
    /// Thresholds used to classify counters
    pub himm: &'a HimmConfig,
    /// Cell drawn as the robot
    pub robot_cell: GridCoord,
}

impl<'a> MapFrame<'a> {
    /// Borrow a frame from the live grid.
    pub fn from_grid(grid: &'a OccupancyGrid, robot_cell: GridCoord) -> Self {
        Self {
            counters: grid.counters(),
            width: grid.width(),
            height: grid.height(),
            max_confidence: grid.max_confidence(),
            himm: grid.himm(),
            robot_cell,
        }
    }

    /// Glyph for one cell
    fn glyph(&self, x: usize, y: usize) -> char {
        if self.robot_cell.x == x as i32 && self.robot_cell.y == y as i32 {
            return 'R';
        }
        CellState::classify(self.counters[y * self.width + x], self.himm).as_char()
    }
}

/// Receives one frame per exploration cycle.
pub trait MapDisplay {
    /// Render one frame
    fn show(&mut self, frame: &MapFrame<'_>) -> std::io::Result<()>;
}

/// Renders frames as text: `.` empty, `#` occupied, `?` unknown, `R` robot.
pub struct AsciiDisplay<W: Write> {
    out: W,
}

impl<W: Write> AsciiDisplay<W> {
    /// Display into any writer
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl AsciiDisplay<std::io::Stdout> {
    /// Display on standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> MapDisplay for AsciiDisplay<W> {
    fn show(&mut self, frame: &MapFrame<'_>) -> std::io::Result<()> {
        let mut text = String::with_capacity((frame.width + 1) * frame.height);
        for y in (0..frame.height).rev() {
            for x in 0..frame.width {
                text.push(frame.glyph(x, y));
            }
            text.push('\n');
        }
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }
}
