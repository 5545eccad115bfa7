//! Frontier exploration loop.
//!
//! Each cycle:
//! 1. Pick the nearest frontier; none left means exploration is complete
//! 2. Plan a wavefront path to it; no path marks the goal occupied
//! 3. Follow the path in fixed-size segments, re-checking obstacles and
//!    path validity between segments
//! 4. On an aborted segment, run the randomized recovery manoeuvre
//!
//! The grid is owned here. Detection and planning borrow it immutably, and
//! it is only written after a motion command has finished executing.

use std::collections::HashMap;
use std::f32::consts::TAU;

use crate::config::{AnveshakConfig, ExplorationConfig};
use crate::core::GridCoord;
use crate::display::{MapDisplay, MapFrame};
use crate::error::Result;
use crate::follower::{FollowOutcome, PathFollower, convert_path};
use crate::frontier::FrontierDetector;
use crate::grid::{MotionFilter, OccupancyGrid};
use crate::planning::WavefrontPlanner;
use crate::robot::{RobotLink, VelocityCommand};

use super::recovery::{Recovery, RecoveryOutcome};
use super::state::{CycleOutcome, ExplorationReport, ExplorationStatus};

/// Autonomous explorer.
pub struct Explorer {
    config: ExplorationConfig,
    grid: OccupancyGrid,
    filter: MotionFilter,
    detector: FrontierDetector,
    planner: WavefrontPlanner,
    follower: PathFollower,
    recovery: Recovery,
    display: Option<Box<dyn MapDisplay>>,
    /// Rotation command and step count for a full in-place sweep
    sweep: (VelocityCommand, usize),
    /// How many cycles picked each goal cell
    goal_attempts: HashMap<GridCoord, usize>,
    report: ExplorationReport,
}

impl Explorer {
    /// Build every component from one configuration.
    pub fn new(config: &AnveshakConfig) -> Result<Self> {
        config.validate()?;
        let grid = OccupancyGrid::from_config(config)?;

        let step_angle = config.recovery.rotation_speed
            * config.follower.control_interval().as_secs_f32();
        let sweep_steps = (TAU / step_angle).ceil() as usize;

        Ok(Self {
            config: config.exploration.clone(),
            filter: MotionFilter::new(grid.sensor()),
            grid,
            detector: FrontierDetector::new(config.frontier.clone()),
            planner: WavefrontPlanner::new(),
            follower: PathFollower::new(config.follower.clone()),
            recovery: Recovery::new(config.recovery.clone(), &config.follower),
            display: None,
            sweep: (
                VelocityCommand::rotate(config.recovery.rotation_speed),
                sweep_steps,
            ),
            goal_attempts: HashMap::new(),
            report: ExplorationReport::new(),
        })
    }

    /// Attach a display that receives one frame per cycle.
    pub fn with_display(mut self, display: Box<dyn MapDisplay>) -> Self {
        self.display = Some(display);
        self
    }

    /// The map built so far
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Statistics so far
    pub fn report(&self) -> ExplorationReport {
        let mut report = self.report.clone();
        report.coverage = self.grid.count_by_state();
        report
    }

    /// Explore until no frontier remains or the cycle limit is hit.
    pub fn run<R: RobotLink>(&mut self, robot: &mut R) -> ExplorationReport {
        tracing::info!(
            "Starting exploration on a {}x{} grid",
            self.grid.width(),
            self.grid.height()
        );
        self.sweep_in_place(robot);

        loop {
            if self.config.max_cycles > 0 && self.report.cycles >= self.config.max_cycles {
                tracing::warn!("Cycle limit ({}) reached", self.config.max_cycles);
                self.report.status = ExplorationStatus::CycleLimit;
                break;
            }
            if self.cycle(robot) == CycleOutcome::Complete {
                self.report.status = ExplorationStatus::Complete;
                break;
            }
        }

        robot.stop();
        let report = self.report();
        tracing::info!(
            "Exploration finished ({:?}) after {} cycles: {} goals, {:.0}% of cells known",
            report.status,
            report.cycles,
            report.goals_reached,
            report.coverage.known_fraction() * 100.0
        );
        report
    }

    /// Run one sense→plan→act cycle.
    pub fn cycle<R: RobotLink>(&mut self, robot: &mut R) -> CycleOutcome {
        self.report.cycles += 1;
        let robot_cell = self.grid.world_to_grid(robot.pose().position());
        self.show(robot_cell);

        let Some(goal) = self.detector.pick_frontier(&self.grid, robot_cell) else {
            tracing::info!("Exploration complete: no frontiers remaining");
            return CycleOutcome::Complete;
        };

        if self.repeat_goal(goal) {
            tracing::warn!(
                "Frontier ({}, {}) picked more than {} times, marking occupied",
                goal.x,
                goal.y,
                self.config.max_goal_repeats
            );
            self.grid.mark_occupied(goal);
            self.report.goals_blocked += 1;
            return CycleOutcome::GoalBlocked(goal);
        }

        let Some(path) = self.planner.plan(&self.grid, robot_cell, goal) else {
            tracing::warn!(
                "No path from ({}, {}) to frontier ({}, {}), marking occupied",
                robot_cell.x,
                robot_cell.y,
                goal.x,
                goal.y
            );
            self.grid.mark_occupied(goal);
            self.report.planning_failures += 1;
            return CycleOutcome::PlanningFailed(goal);
        };

        if path.is_empty() {
            tracing::debug!("Frontier is the robot cell, sweeping in place");
            self.sweep_in_place(robot);
            return CycleOutcome::Swept;
        }

        tracing::info!(
            "Cycle {}: frontier ({}, {}), path of {} cells",
            self.report.cycles,
            goal.x,
            goal.y,
            path.len()
        );
        self.follow_path(robot, goal, &path)
    }

    fn follow_path<R: RobotLink>(
        &mut self,
        robot: &mut R,
        goal: GridCoord,
        path: &[GridCoord],
    ) -> CycleOutcome {
        let waypoints = convert_path(&self.grid, path);
        let segment_length = self.config.segment_length;

        for (index, segment) in waypoints.chunks(segment_length).enumerate() {
            let remaining = &path[index * segment_length..];
            if !self.path_clear(remaining, goal) {
                tracing::info!("Remaining path blocked, replanning");
                robot.stop();
                self.report.replans += 1;
                return CycleOutcome::Replan;
            }

            match self.follower.follow_segment(robot, &mut self.grid, &mut self.filter, segment) {
                FollowOutcome::Arrived => {}
                outcome => {
                    tracing::warn!("Segment {} aborted: {:?}", index, outcome);
                    self.report.aborts += 1;
                    let result = self.recovery.execute(robot, &mut self.grid, &mut self.filter);
                    if result == RecoveryOutcome::Blocked {
                        self.report.recoveries_blocked += 1;
                    }
                    self.sense(robot);
                    return CycleOutcome::Aborted;
                }
            }
        }

        self.sense(robot);
        self.report.goals_reached += 1;
        CycleOutcome::Reached(goal)
    }

    /// Count a pick of `goal`. True once it has been picked too often.
    fn repeat_goal(&mut self, goal: GridCoord) -> bool {
        let count = self.goal_attempts.entry(goal).or_insert(0);
        *count += 1;
        *count > self.config.max_goal_repeats
    }

    /// Path cells still enterable in the current grid.
    fn path_clear(&self, cells: &[GridCoord], goal: GridCoord) -> bool {
        cells.iter().all(|c| {
            if *c == goal {
                !self.grid.state(*c).is_occupied()
            } else {
                self.grid.is_traversable(*c)
            }
        })
    }

    /// Forced grid update at the current pose.
    fn sense<R: RobotLink>(&mut self, robot: &R) {
        let pose = robot.pose();
        self.grid.observe(pose, &robot.scan());
        self.filter.accept(pose);
    }

    /// One full in-place turn, updating the grid after every step.
    fn sweep_in_place<R: RobotLink>(&mut self, robot: &mut R) {
        let (turn, steps) = self.sweep;
        let interval = self.follower.config().control_interval();
        self.sense(robot);
        for _ in 0..steps {
            robot.command(turn);
            robot.hold(interval);
            self.sense(robot);
        }
        robot.stop();
    }

    fn show(&mut self, robot_cell: GridCoord) {
        let Some(display) = self.display.as_mut() else {
            return;
        };
        if let Err(e) = display.show(&MapFrame::from_grid(&self.grid, robot_cell)) {
            tracing::warn!("Map display failed: {}", e);
        }
    }
}
