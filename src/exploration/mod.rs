//! Autonomous frontier exploration.
//!
//! [`Explorer`] ties the grid, frontier detector, planner and path follower
//! into the sense→plan→act loop, with [`Recovery`] for aborted segments.

mod explorer;
mod recovery;
mod state;

pub use explorer::Explorer;
pub use recovery::{Recovery, RecoveryOutcome};
pub use state::{CycleOutcome, ExplorationReport, ExplorationStatus};
