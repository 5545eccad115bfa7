//! Ternary cell state derived from HIMM counters.
//!
//! State is never stored. It is computed from the counter on demand, so a
//! single counter update can never leave the two out of sync.

use serde::{Deserialize, Serialize};

use crate::config::HimmConfig;

/// What the map believes about a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellState {
    /// Counter sits between the thresholds (or was never touched)
    #[default]
    Unknown = 0,
    /// Counter below the empty threshold; traversable
    Empty = 1,
    /// Counter above the occupied threshold; obstacle
    Occupied = 2,
}

impl CellState {
    /// Classify a counter against the configured thresholds.
    #[inline]
    pub fn classify(counter: u8, himm: &HimmConfig) -> Self {
        if counter < himm.empty_threshold {
            CellState::Empty
        } else if counter > himm.occupied_threshold {
            CellState::Occupied
        } else {
            CellState::Unknown
        }
    }

    /// True for OCCUPIED
    #[inline]
    pub fn is_occupied(self) -> bool {
        self == CellState::Occupied
    }

    /// True for UNKNOWN
    #[inline]
    pub fn is_unknown(self) -> bool {
        self == CellState::Unknown
    }

    /// Single character representation for debugging
    pub fn as_char(self) -> char {
        match self {
            CellState::Unknown => '?',
            CellState::Empty => '.',
            CellState::Occupied => '#',
        }
    }
}

/// Per-state cell counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCounts {
    /// Cells still in the UNKNOWN band
    pub unknown: usize,
    /// Cells classified EMPTY
    pub empty: usize,
    /// Cells classified OCCUPIED
    pub occupied: usize,
}

impl CellCounts {
    /// Total cells counted.
    pub fn total(&self) -> usize {
        self.unknown + self.empty + self.occupied
    }

    /// Fraction of cells no longer unknown.
    pub fn known_fraction(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.empty + self.occupied) as f32 / total as f32
    }

    pub(crate) fn add(&mut self, state: CellState) {
        match state {
            CellState::Unknown => self.unknown += 1,
            CellState::Empty => self.empty += 1,
            CellState::Occupied => self.occupied += 1,
        }
    }
}
