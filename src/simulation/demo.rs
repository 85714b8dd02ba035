//! Turtlebot demo: a robot moved to random places next to an obstacle, checking for
//! collisions at every place.

use std::f64::consts::PI;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use tracing::info;

use crate::parameter_error::ParameterError;
use crate::world::{RobotModel, World, RED, TAN};

/// Settings of the demo
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Side of the square floor, meters. The robot is placed anywhere on it.
    pub floor_width: f64,
    pub iterations: usize,
    /// Seed of the generator for the robot placements
    pub seed: u64,
    /// Pause after every placement (only with viewer)
    pub wait: Duration,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            floor_width: 2.0,
            iterations: 10,
            seed: 0,
            wait: Duration::from_secs(1),
        }
    }
}

/// Outcome of one placement of the robot
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub index: usize,
    /// Values of the x, y and theta joints
    pub values: Vec<f64>,
    pub collision: bool,
}

/// Populates the world and runs the placement loop. The world is left populated so the
/// caller decides when to disconnect.
pub fn run_demo(config: &DemoConfig, world: &mut World) -> Result<Vec<IterationRecord>, ParameterError> {
    let floor_width = config.floor_width;
    if !(floor_width.is_finite() && floor_width > 0.0) {
        return Err(ParameterError::ParseError(format!("Floor width must be positive, got {}", floor_width)));
    }

    let floor = world.create_box(floor_width, floor_width, 0.001, TAN);
    world.set_point(floor, [0.0, 0.0, -0.001 / 2.0])?;

    let obstacle = world.create_box(0.5, 0.5, 0.1, RED);
    world.set_point(obstacle, [0.5, 0.5, 0.1 / 2.0])?;
    info!("Position: {:?}", world.get_point(obstacle)?);
    world.set_euler(obstacle, [0.0, 0.0, PI / 4.0])?;
    info!("Orientation: {:?}", world.get_euler(obstacle)?);

    let robot = {
        let mut locked = world.lock_renderer();
        let mut quiet = locked.hide_output();
        let robot = quiet.load_model(&RobotModel::turtlebot());
        let robot_z = quiet.stable_z(robot, floor)?;
        quiet.set_point(robot, [0.0, 0.0, robot_z])?;
        robot
    };
    world.dump_body(robot)?;

    let x_joint = world.joint_from_name(robot, "x")?;
    let y_joint = world.joint_from_name(robot, "y")?;
    let theta_joint = world.joint_from_name(robot, "theta")?;
    let joints = [x_joint, y_joint, theta_joint];

    let half = floor_width / 2.0;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records = Vec::with_capacity(config.iterations);
    for index in 0..config.iterations {
        let x = rng.gen_range(-half..=half);
        world.set_joint_position(robot, x_joint, x)?;
        let y = rng.gen_range(-half..=half);
        world.set_joint_position(robot, y_joint, y)?;
        let theta = rng.gen_range(-PI..=PI);
        world.set_joint_position(robot, theta_joint, theta)?;

        let values = world.get_joint_positions(robot, &joints)?;
        info!("Iteration {}) Joint values: {:?}", index, values);
        let collision = world.pairwise_collision(robot, obstacle)?;
        info!("Collision: {}", collision);
        records.push(IterationRecord { index, values, collision });
        world.wait_for_duration(config.wait);
    }
    world.wait_for_user()?;
    Ok(records)
}
