//! Inverse kinematics by sampling the redundant joints.
//!
//! The analytic arm solvers need the torso lift and the upper arm roll as inputs. Full
//! inverse kinematics is then obtained by drawing these two values at random, solving for
//! the remaining joints and rejecting solutions outside the joint limits.
//!
//! ```
//! use std::sync::Arc;
//! use nalgebra::{Isometry3, Matrix3, Vector3};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use rs_dual_arm_kinematics::ik_sampling::{sample_tool_ik, IkSamplingOptions, RedundantBounds};
//! use rs_dual_arm_kinematics::kinematic_traits::{Arm, ArmSolver, Configuration, Solutions};
//! use rs_dual_arm_kinematics::parameters::ArmParameters;
//! use rs_dual_arm_kinematics::robot::{ArmModel, DualArmRobot};
//!
//! // Stand-in for the generated analytic solver, returns the same solution for any pose
//! struct Fixed;
//! impl ArmSolver for Fixed {
//!     fn forward(&self, _: &Configuration) -> (Vector3<f64>, Matrix3<f64>) {
//!         (Vector3::new(0.6, 0.2, 0.8), Matrix3::identity())
//!     }
//!     fn inverse(&self, _: &Matrix3<f64>, _: &Vector3<f64>, free: &[f64; 2]) -> Option<Solutions> {
//!         Some(vec![[free[0], 0.5, 0.2, free[1], -1.0, 0.0, -0.5, 0.0]])
//!     }
//! }
//!
//! let solver: Arc<dyn ArmSolver> = Arc::new(Fixed);
//! let robot = DualArmRobot::new(
//!     ArmModel::new(ArmParameters::pr2_left(), solver.clone()).unwrap(),
//!     ArmModel::new(ArmParameters::pr2_right(), solver).unwrap(),
//! ).unwrap();
//!
//! let options = IkSamplingOptions {
//!     upper: RedundantBounds::Current,
//!     ..Default::default()
//! };
//! let mut rng = StdRng::seed_from_u64(7);
//! let target = Isometry3::translation(0.6, 0.2, 0.8);
//! let found = sample_tool_ik(&robot, Arm::Left, &target, &options, &mut rng).unwrap();
//! assert_eq!(found.map(|q| q[3]), Some(0.0)); // Upper arm roll stays where it was
//! ```

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, trace};

use crate::arm_kinematics::inverse_kinematics;
use crate::constraints::Constraints;
use crate::kinematic_traits::{Arm, ArmSolver, Configuration, Pose, Solutions};
use crate::parameter_error::ParameterError;
use crate::robot::DualArmRobot;
use crate::utils::format_configuration;

/// Maximal number of draws `sample_tool_ik` makes by default.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// How to sample one of the redundant joints.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RedundantBounds {
    /// Anywhere within the joint limits
    #[default]
    FullRange,
    /// Keep the value the joint has when the generator is created
    Current,
    /// Within the given range. It may exceed the joint limits, solutions outside the limits
    /// are rejected anyway.
    Explicit { min: f64, max: f64 },
}

/// Range a redundant value is drawn from. Zero width range always yields its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRange {
    pub min: f64,
    pub max: f64,
}

impl SampleRange {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

/// Resolves bounds for the named joint of the robot. `Current` is read now, not when the
/// values are later drawn.
pub fn resolve_bounds(robot: &DualArmRobot, joint: &str, bounds: RedundantBounds)
                      -> Result<SampleRange, ParameterError> {
    let (min, max) = match bounds {
        RedundantBounds::FullRange => {
            let (min, max) = robot.joint_limits(joint)?;
            if !min.is_finite() || !max.is_finite() {
                return Err(ParameterError::UnboundedJoint(joint.to_string()));
            }
            (min, max)
        }
        RedundantBounds::Current => {
            let value = robot.joint_position(joint)?;
            (value, value)
        }
        RedundantBounds::Explicit { min, max } => (min, max),
    };
    // The width must be finite too, or it cannot be sampled uniformly
    if !min.is_finite() || !max.is_finite() || min > max || !(max - min).is_finite() {
        return Err(ParameterError::InvalidBounds { joint: joint.to_string(), min, max });
    }
    Ok(SampleRange { min, max })
}

/// Endless source of solution batches for one target pose. Every batch is computed from a
/// fresh independent draw of the torso and upper arm roll, and contains the solutions that
/// respect the joint limits; it is often empty. Iterating never ends, bound it with `take`
/// or use `sample_tool_ik`.
pub struct IkGenerator<'r, R: Rng + ?Sized> {
    solver: &'r dyn ArmSolver,
    /// Target in the robot base frame
    target: Pose,
    torso: SampleRange,
    upper: SampleRange,
    constraints: Constraints,
    rng: &'r mut R,
    draws: usize,
}

impl<'r, R: Rng + ?Sized> IkGenerator<'r, R> {
    /// Draws the redundant values once and returns the compliant solutions.
    pub fn next_batch(&mut self) -> Solutions {
        let torso = self.torso.sample(&mut *self.rng);
        let upper = self.upper.sample(&mut *self.rng);
        self.draws += 1;

        let candidates = inverse_kinematics(self.solver, &self.target, torso, upper);
        let solutions = self.constraints.filter(&candidates);
        trace!(torso, upper, candidates = candidates.len(), valid = solutions.len(),
            "IK draw {}", self.draws);
        solutions
    }

    /// Number of draws made so far
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Target pose in the robot base frame
    pub fn target(&self) -> &Pose {
        &self.target
    }

    pub fn torso_range(&self) -> SampleRange {
        self.torso
    }

    pub fn upper_range(&self) -> SampleRange {
        self.upper
    }
}

impl<'r, R: Rng + ?Sized> Iterator for IkGenerator<'r, R> {
    type Item = Solutions;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_batch())
    }
}

/// Creates the generator for the world pose of the arm's tool frame. The pose is moved into
/// the base frame and the bounds are resolved at this point, with the current state of
/// the robot.
pub fn get_ik_generator<'r, R: Rng + ?Sized>(
    robot: &'r DualArmRobot,
    arm: Arm,
    world_pose: &Pose,
    torso: RedundantBounds,
    upper: RedundantBounds,
    rng: &'r mut R,
) -> Result<IkGenerator<'r, R>, ParameterError> {
    let model = robot.arm(arm);
    let target = robot.base_pose().inverse() * world_pose;
    let torso = resolve_bounds(robot, &model.parameters.torso_joint, torso)?;
    let upper = resolve_bounds(robot, &model.parameters.upper_joint, upper)?;

    Ok(IkGenerator {
        solver: model.solver.as_ref(),
        target,
        torso,
        upper,
        constraints: model.parameters.constraints.clone(),
        rng,
        draws: 0,
    })
}

/// Settings of `sample_tool_ik`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IkSamplingOptions {
    pub max_attempts: usize,
    pub torso: RedundantBounds,
    pub upper: RedundantBounds,
}

impl Default for IkSamplingOptions {
    fn default() -> Self {
        IkSamplingOptions {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            torso: RedundantBounds::FullRange,
            upper: RedundantBounds::FullRange,
        }
    }
}

/// Finds one configuration of the arm that puts its tool frame at the given world pose.
/// At most `max_attempts` draws are made; the first non-empty batch decides and one of its
/// solutions is picked uniformly at random. Ok(None) if all attempts came out empty,
/// which is a common outcome near the border of the workspace.
pub fn sample_tool_ik<R: Rng + ?Sized>(
    robot: &DualArmRobot,
    arm: Arm,
    world_pose: &Pose,
    options: &IkSamplingOptions,
    rng: &mut R,
) -> Result<Option<Configuration>, ParameterError> {
    let mut generator = get_ik_generator(robot, arm, world_pose, options.torso, options.upper, rng)?;
    for attempt in 1..=options.max_attempts {
        let solutions = generator.next_batch();
        if !solutions.is_empty() {
            let chosen = solutions.choose(&mut *generator.rng).copied();
            if let Some(q) = &chosen {
                debug!("{} arm: {} solutions on attempt {}, using {}",
                    arm, solutions.len(), attempt, format_configuration(q));
            }
            return Ok(chosen);
        }
    }
    debug!("{} arm: no solution in {} attempts", arm, options.max_attempts);
    Ok(None)
}
