//! State of the dual-arm mobile manipulator: where the base is and where the joints are.

use std::collections::HashMap;
use std::sync::Arc;
use nalgebra::Isometry3;
use crate::arm_kinematics::forward_pose;
use crate::kinematic_traits::{Arm, ArmSolver, Configuration, Pose, ARM_JOINTS};
use crate::parameter_error::ParameterError;
use crate::parameters::ArmParameters;
use crate::tool::Base;

/// Description of one arm together with its analytic solver.
#[derive(Clone)]
pub struct ArmModel {
    pub parameters: ArmParameters,
    pub solver: Arc<dyn ArmSolver>,
}

impl ArmModel {
    pub fn new(parameters: ArmParameters, solver: Arc<dyn ArmSolver>) -> Result<Self, ParameterError> {
        parameters.validate()?;
        Ok(ArmModel { parameters, solver })
    }
}

/// Robot with two arms sharing the torso. Joint positions are kept by joint name, so the
/// torso joint that both arms control has a single value.
#[derive(Clone)]
pub struct DualArmRobot {
    base_pose: Pose,
    positions: HashMap<String, f64>,
    left: ArmModel,
    right: ArmModel,
}

impl DualArmRobot {
    /// Creates the robot at the world origin with all joints at zero.
    pub fn new(left: ArmModel, right: ArmModel) -> Result<Self, ParameterError> {
        if left.parameters.arm != Arm::Left || right.parameters.arm != Arm::Right {
            return Err(ParameterError::KinematicsConfigurationError(format!(
                "arms swapped: left model is {}, right model is {}",
                left.parameters.arm, right.parameters.arm)));
        }
        if left.parameters.torso_joint != right.parameters.torso_joint {
            return Err(ParameterError::KinematicsConfigurationError(format!(
                "arms must share the torso, found {} and {}",
                left.parameters.torso_joint, right.parameters.torso_joint)));
        }
        let positions = left.parameters.joints.iter()
            .chain(right.parameters.joints.iter())
            .map(|name| (name.clone(), 0.0))
            .collect();
        Ok(DualArmRobot { base_pose: Isometry3::identity(), positions, left, right })
    }

    pub fn arm(&self, arm: Arm) -> &ArmModel {
        match arm {
            Arm::Left => &self.left,
            Arm::Right => &self.right,
        }
    }

    /// Pose of the base link in the world
    pub fn base_pose(&self) -> Pose {
        self.base_pose
    }

    pub fn set_base_pose(&mut self, pose: Pose) {
        self.base_pose = pose;
    }

    /// Torso joints followed by the arm joints, in the order of the configuration.
    pub fn arm_joints(&self, arm: Arm) -> &[String; ARM_JOINTS] {
        &self.arm(arm).parameters.joints
    }

    pub fn joint_position(&self, joint: &str) -> Result<f64, ParameterError> {
        self.positions.get(joint)
            .copied()
            .ok_or_else(|| ParameterError::UnknownJoint(joint.to_string()))
    }

    /// Sets the joint without checking the limits, same as a simulator would.
    pub fn set_joint_position(&mut self, joint: &str, value: f64) -> Result<(), ParameterError> {
        match self.positions.get_mut(joint) {
            Some(position) => {
                *position = value;
                Ok(())
            }
            None => Err(ParameterError::UnknownJoint(joint.to_string())),
        }
    }

    /// Limits of the joint as declared in the arm description.
    pub fn joint_limits(&self, joint: &str) -> Result<(f64, f64), ParameterError> {
        self.left.parameters.joint_limits(joint)
            .or_else(|| self.right.parameters.joint_limits(joint))
            .ok_or_else(|| ParameterError::UnknownJoint(joint.to_string()))
    }

    pub fn arm_configuration(&self, arm: Arm) -> Configuration {
        // All names of the arm are inserted in new(), lookup cannot fail.
        self.arm_joints(arm).clone().map(|name| self.positions[&name])
    }

    pub fn set_arm_configuration(&mut self, arm: Arm, configuration: &Configuration) {
        let joints = self.arm_joints(arm).clone();
        for (name, value) in joints.into_iter().zip(configuration.iter()) {
            self.positions.insert(name, *value);
        }
    }

    /// The arm solver placed at the current base pose, so it works in world coordinates.
    pub fn world_solver(&self, arm: Arm) -> Base {
        Base { robot: self.arm(arm).solver.clone(), base: self.base_pose }
    }

    /// Pose of the arm's tool frame in the world, for the current joint positions.
    pub fn tool_pose(&self, arm: Arm) -> Pose {
        forward_pose(&self.world_solver(arm), &self.arm_configuration(arm))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use nalgebra::{Translation3, UnitQuaternion};
    use crate::tests::test_utils::PlanarSolver;
    use crate::utils::assert_pose_eq;

    pub(crate) fn pr2_with(left: Arc<dyn ArmSolver>, right: Arc<dyn ArmSolver>) -> DualArmRobot {
        DualArmRobot::new(
            ArmModel::new(ArmParameters::pr2_left(), left).expect("Valid left arm"),
            ArmModel::new(ArmParameters::pr2_right(), right).expect("Valid right arm"),
        ).expect("Valid robot")
    }

    fn pr2() -> DualArmRobot {
        pr2_with(Arc::new(PlanarSolver::default()), Arc::new(PlanarSolver::default()))
    }

    #[test]
    fn test_shared_torso() {
        let mut robot = pr2();
        robot.set_joint_position("torso_lift_joint", 0.2).unwrap();
        assert_eq!(robot.arm_configuration(Arm::Left)[0], 0.2);
        assert_eq!(robot.arm_configuration(Arm::Right)[0], 0.2);

        let mut q = robot.arm_configuration(Arm::Left);
        q[0] = 0.3;
        q[3] = 1.0;
        robot.set_arm_configuration(Arm::Left, &q);
        assert_eq!(robot.joint_position("torso_lift_joint").unwrap(), 0.3);
        assert_eq!(robot.joint_position("l_upper_arm_roll_joint").unwrap(), 1.0);
        assert_eq!(robot.joint_position("r_upper_arm_roll_joint").unwrap(), 0.0);
    }

    #[test]
    fn test_unknown_joint() {
        let mut robot = pr2();
        assert!(matches!(robot.joint_position("head_pan_joint"), Err(ParameterError::UnknownJoint(_))));
        assert!(robot.set_joint_position("head_pan_joint", 0.0).is_err());
        assert!(robot.joint_limits("head_pan_joint").is_err());
        assert_eq!(robot.joint_limits("r_upper_arm_roll_joint").unwrap(), (-3.9, 0.8));
    }

    #[test]
    fn test_swapped_arms_rejected() {
        let solver: Arc<dyn ArmSolver> = Arc::new(PlanarSolver::default());
        let result = DualArmRobot::new(
            ArmModel::new(ArmParameters::pr2_right(), solver.clone()).unwrap(),
            ArmModel::new(ArmParameters::pr2_left(), solver).unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_tool_pose_follows_base() {
        let mut robot = pr2();
        let q = [0.2, 0.3, 0.1, 0.0, -0.1, 0.0, 0.0, 0.0];
        robot.set_arm_configuration(Arm::Left, &q);
        let at_origin = robot.tool_pose(Arm::Left);

        let base = Isometry3::from_parts(Translation3::new(1.0, 2.0, 0.0),
                                         UnitQuaternion::from_euler_angles(0.0, 0.0, 0.4));
        robot.set_base_pose(base);
        assert_pose_eq(&robot.tool_pose(Arm::Left), &(base * at_origin), 1E-9, 1E-9);
        assert!((at_origin.translation.vector - nalgebra::Vector3::new(0.3, 0.1, 0.1)).norm() < 1E-12);
    }
}
