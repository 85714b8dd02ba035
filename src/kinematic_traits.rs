//! Types and the solver trait shared by the whole crate

extern crate nalgebra as na;

use std::fmt;
use std::str::FromStr;
use na::{Isometry3, Matrix3, Vector3};
use crate::parameter_error::ParameterError;

/// Pose is used as a pose of the tool center point or of the robot base. It contains both
/// Cartesian position and rotation quaternion
/// ```
/// extern crate nalgebra as na;
/// use na::{Isometry3, Translation3, UnitQuaternion};
///
/// type Pose = Isometry3<f64>;
///
/// let translation = Translation3::new(0.6, 0.2, 0.8);
/// // The quaternion should be normalized to represent a valid rotation.
/// let rotation = UnitQuaternion::from_quaternion(na::Quaternion::new(1.0, 0.0, 0.0, 1.0).normalize());
/// let transform = Pose::from_parts(translation, rotation);
/// ```
pub type Pose = Isometry3<f64>;

/// Number of joints controlled when solving for one arm: the torso lift joint followed by the
/// seven joints of the arm.
pub const ARM_JOINTS: usize = 8;

/// Joint values of one arm including the torso, in the order the analytic solver expects
/// (torso lift, shoulder pan, shoulder lift, upper arm roll, elbow flex, forearm roll,
/// wrist flex, wrist roll). Prismatic torso in meters, revolute joints in radians.
pub type Configuration = [f64; ARM_JOINTS];

/// Zero or more configurations returned by the inverse kinematics.
pub type Solutions = Vec<Configuration>;

/// Index of the torso lift joint in the configuration
pub const TORSO: usize = 0;

/// Index of the upper arm roll joint in the configuration
pub const UPPER_ROLL: usize = 3;

/// One of the two arms of the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arm {
    Left,
    Right,
}

impl Arm {
    pub const BOTH: [Arm; 2] = [Arm::Left, Arm::Right];

    /// Single letter prefix of the joint and link names of this arm ("l" or "r").
    pub fn prefix(&self) -> &'static str {
        match self {
            Arm::Left => "l",
            Arm::Right => "r",
        }
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arm::Left => write!(f, "left"),
            Arm::Right => write!(f, "right"),
        }
    }
}

impl FromStr for Arm {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Arm::Left),
            "right" | "r" => Ok(Arm::Right),
            other => Err(ParameterError::ParseError(format!("Unknown arm '{}'", other))),
        }
    }
}

/// Closed-form kinematics of a single arm. Implementations are typically generated
/// analytically for one robot geometry and are treated as black boxes here.
///
/// The inverse kinematics requires the two redundant joints (torso lift and upper arm roll)
/// to be given as free parameters and solves for the remaining joints. The returned
/// configurations are complete, including the free values as they were passed.
pub trait ArmSolver: Send + Sync {
    /// Position and rotation matrix of the tool frame in the robot base frame.
    fn forward(&self, configuration: &Configuration) -> (Vector3<f64>, Matrix3<f64>);

    /// All solutions for the given tool frame rotation and translation, with
    /// `free = [torso, upper_roll]`. Returns None if the pose cannot be reached with these
    /// free values at all, which is not the same as an empty list of solutions.
    fn inverse(&self, rotation: &Matrix3<f64>, translation: &Vector3<f64>,
               free: &[f64; 2]) -> Option<Solutions>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_names() {
        assert_eq!(Arm::Left.to_string(), "left");
        assert_eq!(Arm::Right.to_string(), "right");
        assert_eq!("Left".parse::<Arm>().unwrap(), Arm::Left);
        assert_eq!(" r ".parse::<Arm>().unwrap(), Arm::Right);
        assert!("middle".parse::<Arm>().is_err());
        assert_eq!(Arm::Right.prefix(), "r");
    }
}
