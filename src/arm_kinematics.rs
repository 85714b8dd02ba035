//! Adapters between poses and the native interface of the analytic arm solvers.

use crate::conventions::{pose_from_matrix, quat_from_matrix};
use crate::kinematic_traits::{ArmSolver, Configuration, Pose, Solutions, ARM_JOINTS};

/// Forward kinematics from the robot base link to the tool frame of the arm.
/// Returns position and `[x, y, z, w]` quaternion.
///
/// # Panics
/// If `configuration` does not have exactly `ARM_JOINTS` values. Passing the wrong
/// joint group is a programming error.
pub fn forward_kinematics(solver: &dyn ArmSolver, configuration: &[f64]) -> ([f64; 3], [f64; 4]) {
    assert_eq!(configuration.len(), ARM_JOINTS,
               "Forward kinematics needs torso and arm joints, {} values, got {}",
               ARM_JOINTS, configuration.len());
    let mut qs: Configuration = [0.0; ARM_JOINTS];
    qs.copy_from_slice(configuration);

    let (position, rotation) = solver.forward(&qs);
    ([position.x, position.y, position.z], quat_from_matrix(&rotation))
}

/// Forward kinematics as a pose in the robot base frame.
pub fn forward_pose(solver: &dyn ArmSolver, configuration: &Configuration) -> Pose {
    let (position, rotation) = solver.forward(configuration);
    pose_from_matrix(&position, &rotation)
}

/// Calls the analytic solver for the pose in the robot base frame, with torso and upper arm
/// roll fixed. If the solver reports the pose as infeasible, the result is empty.
pub fn inverse_kinematics(solver: &dyn ArmSolver, pose: &Pose, torso: f64, upper: f64) -> Solutions {
    let translation = pose.translation.vector;
    let rotation = pose.rotation.to_rotation_matrix().into_inner();
    solver.inverse(&rotation, &translation, &[torso, upper]).unwrap_or_default()
}
