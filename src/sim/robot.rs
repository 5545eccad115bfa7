//! Simulated differential-drive robot with a 360° range sensor.
//!
//! Motion is integrated with unicycle kinematics in fixed sub-steps while a
//! command is held. A step that would put the robot body into a wall keeps
//! the rotation but drops the translation, so the robot stalls against
//! obstacles instead of passing through them.
//!
//! A fresh sweep is taken at construction and after every hold; `scan`
//! returns that latest sweep.

use std::f32::consts::{PI, TAU};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{Pose2D, RangeScan, normalize_angle};
use crate::robot::RobotLink;

use super::world::WorldMap;

/// Simulated robot parameters.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Body radius used for collision checks (meters)
    pub robot_radius: f32,
    /// Beams per sweep, evenly spaced over a full turn
    pub num_beams: usize,
    /// Sensor range (meters)
    pub max_range: f32,
    /// Uniform range noise amplitude (meters); 0 disables noise
    pub range_noise: f32,
    /// Integration step while holding a command
    pub physics_step: Duration,
    /// Noise seed; 0 draws from OS entropy
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            robot_radius: 0.15,
            num_beams: 72,
            max_range: 6.0,
            range_noise: 0.0,
            physics_step: Duration::from_millis(50),
            seed: 0,
        }
    }
}

/// A robot moving through a [`WorldMap`].
pub struct SimulatedRobot {
    world: WorldMap,
    config: SimConfig,
    pose: Pose2D,
    linear: f32,
    angular: f32,
    rng: StdRng,
    latest_scan: RangeScan,
    collisions: usize,
    elapsed: Duration,
}

impl SimulatedRobot {
    /// Place a robot in `world` at `pose`.
    pub fn new(world: WorldMap, pose: Pose2D, config: SimConfig) -> Self {
        let rng = if config.seed == 0 {
            StdRng::from_os_rng()
        } else {
            StdRng::seed_from_u64(config.seed)
        };
        let mut robot = Self {
            world,
            config,
            pose,
            linear: 0.0,
            angular: 0.0,
            rng,
            latest_scan: RangeScan::default(),
            collisions: 0,
            elapsed: Duration::ZERO,
        };
        robot.latest_scan = robot.take_scan();
        robot
    }

    /// The ground-truth world
    pub fn world(&self) -> &WorldMap {
        &self.world
    }

    /// Physics steps that were blocked by a wall
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Simulated time spent holding commands
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Currently commanded `(linear, angular)` velocity
    pub fn velocity(&self) -> (f32, f32) {
        (self.linear, self.angular)
    }

    /// Advance the pose by `dt` seconds. Returns true if blocked by a wall.
    fn integrate(&mut self, dt: f32) -> bool {
        let Pose2D { x, y, theta } = self.pose;
        let (new_x, new_y, new_theta) = if self.angular.abs() < 1e-6 {
            (
                x + self.linear * theta.cos() * dt,
                y + self.linear * theta.sin() * dt,
                theta,
            )
        } else {
            let r = self.linear / self.angular;
            let new_theta = theta + self.angular * dt;
            (
                x + r * (new_theta.sin() - theta.sin()),
                y + r * (theta.cos() - new_theta.cos()),
                new_theta,
            )
        };

        let moved = (new_x - x).abs() > f32::EPSILON || (new_y - y).abs() > f32::EPSILON;
        if moved && self.collides(new_x, new_y) {
            self.pose.theta = normalize_angle(new_theta);
            return true;
        }
        self.pose = Pose2D::new(new_x, new_y, new_theta);
        false
    }

    /// Noise-free sweep at the current pose, beams from -π upward.
    fn ray_scan(&self) -> RangeScan {
        let beams = self.config.num_beams.max(1);
        let angle_step = TAU / beams as f32;
        let origin = self.pose.position();

        let mut scan = RangeScan::with_capacity(beams);
        for i in 0..beams {
            let angle = -PI + i as f32 * angle_step;
            let heading = self.pose.theta + angle;
            let range = self.world.ray_cast(origin, heading, self.config.max_range);
            scan.push(angle, range);
        }
        scan
    }

    /// Sweep with range noise applied, clamped to `[0, max_range]`.
    fn take_scan(&mut self) -> RangeScan {
        let clean = self.ray_scan();
        let noise = self.config.range_noise;
        if noise <= 0.0 {
            return clean;
        }
        let max_range = self.config.max_range;
        let mut scan = RangeScan::with_capacity(clean.len());
        for (angle, range) in clean.iter() {
            let jitter = self.rng.random_range(-noise..=noise);
            scan.push(angle, (range + jitter).clamp(0.0, max_range));
        }
        scan
    }

    /// Body circle check: eight rim points plus the center.
    fn collides(&self, x: f32, y: f32) -> bool {
        let radius = self.config.robot_radius;
        (0..8).any(|i| {
            let angle = i as f32 / 8.0 * TAU;
            let (sin, cos) = angle.sin_cos();
            self.world.is_occupied(x + radius * cos, y + radius * sin)
        }) || self.world.is_occupied(x, y)
    }
}

impl RobotLink for SimulatedRobot {
    fn pose(&self) -> Pose2D {
        self.pose
    }

    fn scan(&self) -> RangeScan {
        self.latest_scan.clone()
    }

    fn send_velocity(&mut self, linear: f32, angular: f32) {
        self.linear = linear;
        self.angular = angular;
    }

    fn hold(&mut self, duration: Duration) {
        let step = self.config.physics_step.as_secs_f32().max(1e-3);
        let mut remaining = duration.as_secs_f32();
        while remaining > 1e-6 {
            let dt = remaining.min(step);
            if self.integrate(dt) {
                self.collisions += 1;
            }
            remaining -= dt;
        }
        self.elapsed += duration;
        self.latest_scan = self.take_scan();
    }
}
