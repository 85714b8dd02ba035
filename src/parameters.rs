//! Defines the arm description data structure

use crate::constraints::Constraints;
use crate::kinematic_traits::{Arm, ARM_JOINTS, TORSO, UPPER_ROLL};
use crate::parameter_error::ParameterError;

/// Static description of one arm together with the torso: names of the frames and joints
/// the solver works with, and the limits of the controlled joints.
/// See [parameters_robots.rs](parameters_robots.rs) for the PR2 arms.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmParameters {
    pub arm: Arm,

    /// Link the solver poses are expressed in
    pub base_link: String,

    /// Tool frame link, the frame the solver computes the pose of
    pub tool_link: String,

    /// Redundant prismatic joint shared by both arms, first in the configuration.
    pub torso_joint: String,

    /// Redundant revolute joint of this arm, at index `UPPER_ROLL` in the configuration.
    pub upper_joint: String,

    /// Controlled joints, torso group followed by the arm group, in solver order.
    pub joints: [String; ARM_JOINTS],

    /// Limits of the controlled joints, same order as `joints`.
    pub constraints: Constraints,
}

impl ArmParameters {
    /// Checks that the redundant joints are where the solver expects them and that limits
    /// are ordered.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.joints[TORSO] != self.torso_joint {
            return Err(ParameterError::KinematicsConfigurationError(format!(
                "torso joint {} must be the first joint, found {}",
                self.torso_joint, self.joints[TORSO])));
        }
        if self.joints[UPPER_ROLL] != self.upper_joint {
            return Err(ParameterError::KinematicsConfigurationError(format!(
                "upper arm roll joint {} must be joint {}, found {}",
                self.upper_joint, UPPER_ROLL, self.joints[UPPER_ROLL])));
        }
        for (i, name) in self.joints.iter().enumerate() {
            let (from, to) = self.constraints.limits(i);
            if from.is_nan() || to.is_nan() || from > to {
                return Err(ParameterError::InvalidBounds { joint: name.clone(), min: from, max: to });
            }
        }
        Ok(())
    }

    /// Position of the joint in the configuration
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|joint| joint == name)
    }

    /// Limits of the named joint if it is one of the controlled joints.
    pub fn joint_limits(&self, name: &str) -> Option<(f64, f64)> {
        self.joint_index(name).map(|i| self.constraints.limits(i))
    }

    /// Convert to string yaml representation (quick viewing, saving).
    /// Limits are written in radians (meters for the torso) with all digits, so
    /// `from_yaml_str` reads back exactly the same description.
    pub fn to_yaml(&self) -> String {
        let joints = self.joints.iter().enumerate()
            .map(|(i, name)| {
                if self.constraints.is_continuous(i) {
                    format!("  - {{ name: {}, continuous: true }}\n", name)
                } else {
                    let (from, to) = self.constraints.limits(i);
                    format!("  - {{ name: {}, lower: {}, upper: {} }}\n", name, from, to)
                }
            })
            .collect::<String>();

        format!(
            "arm: {}\n\
            base_link: {}\n\
            tool_link: {}\n\
            torso_joint: {}\n\
            upper_joint: {}\n\
            joints:\n{}",
            self.arm,
            self.base_link,
            self.tool_link,
            self.torso_joint,
            self.upper_joint,
            joints
        )
    }
}
