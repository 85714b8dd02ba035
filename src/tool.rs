//! Provides tool and base for the arm solver.
//! Both Tool and Base take arbitrary implementation of ArmSolver and are such
//! implementations themselves. Hence, they can be cascaded, like the arm standing on the
//! mobile base and holding a tool:
//! ```
//! use std::sync::Arc;
//! use nalgebra::{Isometry3, Matrix3, Translation3, UnitQuaternion, Vector3};
//! use rs_dual_arm_kinematics::kinematic_traits::{ArmSolver, Configuration, Solutions};
//! use rs_dual_arm_kinematics::arm_kinematics::forward_pose;
//!
//! // Stand-in for the generated analytic solver of one arm
//! struct Fixed;
//! impl ArmSolver for Fixed {
//!     fn forward(&self, _: &Configuration) -> (Vector3<f64>, Matrix3<f64>) {
//!         (Vector3::new(0.6, 0.2, 0.8), Matrix3::identity())
//!     }
//!     fn inverse(&self, _: &Matrix3<f64>, _: &Vector3<f64>, _: &[f64; 2]) -> Option<Solutions> {
//!         None
//!     }
//! }
//!
//! // Robot base is 2 meters ahead in the world
//! let on_base = rs_dual_arm_kinematics::tool::Base {
//!   robot: Arc::new(Fixed),
//!   base: Isometry3::from_parts(Translation3::new(2.0, 0.0, 0.0), UnitQuaternion::identity()),
//! };
//!
//! // Fingers extend 0.1 meter in the X direction of the tool frame
//! let with_tool = rs_dual_arm_kinematics::tool::Tool {
//!   robot: Arc::new(on_base),
//!   tool: Isometry3::from_parts(Translation3::new(0.1, 0.0, 0.0), UnitQuaternion::identity()),
//! };
//!
//! let tcp = forward_pose(&with_tool, &[0.0; 8]);
//! assert!((tcp.translation.x - 2.7).abs() < 1E-9);
//! ```

extern crate nalgebra as na;

use std::sync::Arc;
use na::{Isometry3, Matrix3, Vector3};
use crate::conventions::pose_from_matrix;
use crate::kinematic_traits::{ArmSolver, Configuration, Pose, Solutions};

/// Defines the fixed tool that can be attached to the tool frame of the arm.
/// The tool moves with the arm, providing additional translation and, if needed,
/// rotation. The tool itself fully implements the ArmSolver,
/// providing both inverse and forward kinematics for the arm with a tool (with
/// "pose" being assumed as the position and rotation of the tip of the tool).
#[derive(Clone)]
pub struct Tool {
    pub robot: Arc<dyn ArmSolver>,  // The arm

    /// Transformation from the solver's tool frame to the tool's TCP.
    pub tool: Isometry3<f64>,
}

/// Defines the base that holds the arm: for a mobile manipulator, the current pose of
/// the robot base link in the world. Base itself fully implements the ArmSolver,
/// providing both inverse and forward kinematics in the world frame.
#[derive(Clone)]
pub struct Base {
    pub robot: Arc<dyn ArmSolver>,  // The arm

    /// Transformation from the world origin to the robot base link.
    pub base: Isometry3<f64>,
}

fn into_parts(pose: &Pose) -> (Vector3<f64>, Matrix3<f64>) {
    (pose.translation.vector, pose.rotation.to_rotation_matrix().into_inner())
}

fn inverse_for(robot: &dyn ArmSolver, pose: &Pose, free: &[f64; 2]) -> Option<Solutions> {
    let (translation, rotation) = into_parts(pose);
    robot.inverse(&rotation, &translation, free)
}

impl ArmSolver for Tool {
    fn forward(&self, qs: &Configuration) -> (Vector3<f64>, Matrix3<f64>) {
        let (translation, rotation) = self.robot.forward(qs);
        into_parts(&(pose_from_matrix(&translation, &rotation) * self.tool))
    }

    fn inverse(&self, rotation: &Matrix3<f64>, translation: &Vector3<f64>,
               free: &[f64; 2]) -> Option<Solutions> {
        let tcp = pose_from_matrix(translation, rotation);
        inverse_for(self.robot.as_ref(), &(tcp * self.tool.inverse()), free)
    }
}

impl ArmSolver for Base {
    fn forward(&self, qs: &Configuration) -> (Vector3<f64>, Matrix3<f64>) {
        let (translation, rotation) = self.robot.forward(qs);
        into_parts(&(self.base * pose_from_matrix(&translation, &rotation)))
    }

    fn inverse(&self, rotation: &Matrix3<f64>, translation: &Vector3<f64>,
               free: &[f64; 2]) -> Option<Solutions> {
        let tcp = pose_from_matrix(translation, rotation);
        inverse_for(self.robot.as_ref(), &(self.base.inverse() * tcp), free)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use super::*;
    use nalgebra::{Translation3, UnitQuaternion};
    use crate::arm_kinematics::{forward_pose, inverse_kinematics};
    use crate::tests::test_utils::PlanarSolver;
    use crate::utils::assert_pose_eq;

    /// Asserts that two `Translation3<f64>` instances are approximately equal within a given tolerance.
    fn assert_diff(a: &Translation3<f64>, b: &Translation3<f64>, expected_diff: [f64; 3], epsilon: f64) {
        let actual_diff = a.vector - b.vector;
        for (axis, (actual, expected)) in actual_diff.iter().zip(expected_diff.iter()).enumerate() {
            assert!(
                (actual - expected).abs() <= epsilon,
                "Difference on axis {} is not as expected: actual difference = {}, expected difference = {}",
                axis, actual, expected
            );
        }
    }

    #[test]
    fn test_tool() {
        let arm: Arc<dyn ArmSolver> = Arc::new(PlanarSolver::default());

        // Fingers extend 0.2 meter in the X direction of the tool frame
        let with_tool = Tool {
            robot: arm.clone(),
            tool: Isometry3::from_parts(Translation3::new(0.2, 0.0, 0.0), UnitQuaternion::identity()),
        };

        let q = [0.1, 0.3, 0.0, 0.0, -0.2, 0.0, 0.0, 0.0];
        let without = forward_pose(arm.as_ref(), &q);
        let with = forward_pose(&with_tool, &q);
        assert_diff(&with.translation, &without.translation, [0.2, 0.0, 0.0], 1E-9);

        // Turning the wrist by 90 degrees turns the tool to Y
        let q = [0.1, 0.3, 0.0, 0.0, -0.2, 0.0, 0.0, PI / 2.0];
        let without = forward_pose(arm.as_ref(), &q);
        let with = forward_pose(&with_tool, &q);
        assert_diff(&with.translation, &without.translation, [0.0, 0.2, 0.0], 1E-9);
    }

    #[test]
    fn test_base() {
        let arm: Arc<dyn ArmSolver> = Arc::new(PlanarSolver::default());
        let base = Isometry3::from_parts(
            Translation3::new(1.0, -1.0, 0.05),
            UnitQuaternion::from_euler_angles(0.0, 0.0, PI / 2.0),
        );
        let on_base = Base { robot: arm.clone(), base };

        let q = [0.1, 0.3, 0.0, 0.0, -0.2, 0.0, 0.0, 0.0];
        let local = forward_pose(arm.as_ref(), &q);
        let world = forward_pose(&on_base, &q);
        assert_pose_eq(&world, &(base * local), 1E-9, 1E-9);
        // Base is rotated, arm X becomes world Y
        assert_diff(&world.translation, &Translation3::new(1.0, -1.0, 0.05), [0.0, 0.3, -0.1], 1E-9);
    }

    #[test]
    fn test_cascaded_inverse_matches_forward() {
        let arm: Arc<dyn ArmSolver> = Arc::new(PlanarSolver::default());
        let on_base = Base {
            robot: arm,
            base: Isometry3::from_parts(Translation3::new(0.5, 0.5, 0.0),
                                        UnitQuaternion::from_euler_angles(0.0, 0.0, -0.3)),
        };
        let complete = Tool {
            robot: Arc::new(on_base),
            tool: Isometry3::from_parts(Translation3::new(0.1, 0.0, 0.0), UnitQuaternion::identity()),
        };

        let q = [0.2, 0.25, 0.1, 0.05, -0.1, 0.0, 0.0, 0.7];
        let tcp = forward_pose(&complete, &q);
        let solutions = inverse_kinematics(&complete, &tcp, q[0], q[3]);
        assert!(!solutions.is_empty());
        for solution in &solutions {
            assert_eq!(solution[0], q[0]);
            assert_eq!(solution[3], q[3]);
            assert_pose_eq(&forward_pose(&complete, solution), &tcp, 1E-9, 1E-9);
        }
    }
}
