//! Kinematics sampling for a dual-arm mobile manipulator with a shared torso lift joint,
//! such as the PR2.
//!
//! Each arm has 7 joints and shares the torso lift with the other arm, so together with the
//! torso it has 8 degrees of freedom to reach a 6 DOF pose. The two extra degrees (torso
//! height and upper arm roll) are the redundant parameters: the analytic solver needs them
//! as inputs, and this crate samples them until the solver returns solutions inside the
//! joint limits.
//!
//! # Features
//!
//! - The analytic solver is any implementation of [`kinematic_traits::ArmSolver`]. It works
//!   in the arm base frame; [`tool::Base`] and [`tool::Tool`] place it in the world and
//!   attach tools.
//! - Conversions between the real-first `[w, x, y, z]` and real-last `[x, y, z, w]`
//!   quaternion conventions, see [`conventions`].
//! - Joint limits with continuous joints, see [`constraints::Constraints`].
//! - Rejection sampling of the redundant parameters with a bounded number of attempts, see
//!   [`ik_sampling::sample_tool_ik`]. Randomness comes from the caller supplied generator,
//!   so a seeded generator gives reproducible results.
//! - PR2 arm descriptions built in, other arms can be read from YAML.
//! - A small collision world and a turtlebot demo (feature `simulation`).
//!
//! ## Binaries
//!
//! - **turtlebot_demo**: places a mobile robot at random spots next to an obstacle and
//!   reports collisions.

pub mod parameters;
pub mod parameters_robots;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;

#[path = "utils/utils.rs"]
pub mod utils;
pub mod kinematic_traits;
pub mod conventions;
pub mod arm_kinematics;

pub mod constraints;

pub mod tool;

pub mod robot;

pub mod ik_sampling;

pub mod parameter_error;

#[cfg(feature = "simulation")]
#[path = "simulation/world.rs"]
pub mod world;

#[cfg(feature = "simulation")]
#[path = "simulation/demo.rs"]
pub mod demo;

#[cfg(test)]
mod tests;
