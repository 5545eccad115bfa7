//! Exploration outcomes and run statistics.

use serde::Serialize;

use crate::core::GridCoord;
use crate::grid::CellCounts;

/// Result of a single sense→plan→act cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No EMPTY border left; exploration is done
    Complete,
    /// Followed the whole path to the goal
    Reached(GridCoord),
    /// Goal was the robot's own cell; swept in place instead
    Swept,
    /// No path to the goal; goal marked occupied
    PlanningFailed(GridCoord),
    /// Goal picked too many times without progress; marked occupied
    GoalBlocked(GridCoord),
    /// Remaining path became blocked between segments
    Replan,
    /// Segment aborted on an obstacle or step limit; recovery ran
    Aborted,
}

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ExplorationStatus {
    /// Ran until no frontier remained
    Complete,
    /// Stopped at the configured cycle limit
    CycleLimit,
}

/// Summary of an exploration run.
#[derive(Clone, Debug, Serialize)]
pub struct ExplorationReport {
    /// Why the run ended
    pub status: ExplorationStatus,
    /// Cycles started
    pub cycles: usize,
    /// Goals whose whole path was followed
    pub goals_reached: usize,
    /// Goals with no path, marked occupied
    pub planning_failures: usize,
    /// Goals dropped by the repeat guard
    pub goals_blocked: usize,
    /// Paths abandoned because a later cell became blocked
    pub replans: usize,
    /// Segments aborted on an obstacle or the step limit
    pub aborts: usize,
    /// Recoveries that found no clear heading
    pub recoveries_blocked: usize,
    /// Cell counts when the run ended
    pub coverage: CellCounts,
}

impl ExplorationReport {
    pub(crate) fn new() -> Self {
        Self {
            status: ExplorationStatus::CycleLimit,
            cycles: 0,
            goals_reached: 0,
            planning_failures: 0,
            goals_blocked: 0,
            replans: 0,
            aborts: 0,
            recoveries_blocked: 0,
            coverage: CellCounts::default(),
        }
    }

    /// True if the run ended because nothing was left to explore
    pub fn is_complete(&self) -> bool {
        self.status == ExplorationStatus::Complete
    }
}
