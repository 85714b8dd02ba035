//! Conversions between quaternion component orders and between poses and their parts.
//!
//! Geometry helpers of this crate keep quaternions as `[x, y, z, w]` (real part last).
//! Analytic solvers are usually generated with the real part first, `[w, x, y, z]`.
//! Both conversions are pure permutations, so a round trip returns the original bits.

extern crate nalgebra as na;

use na::{Matrix3, Quaternion, Rotation3, Translation3, UnitQuaternion, Vector3};
use crate::kinematic_traits::Pose;

/// `[x, y, z, w]` to `[w, x, y, z]`
pub fn wxyz_from_xyzw(quat: [f64; 4]) -> [f64; 4] {
    let [x, y, z, w] = quat;
    [w, x, y, z]
}

/// `[w, x, y, z]` to `[x, y, z, w]`
pub fn xyzw_from_wxyz(quat: [f64; 4]) -> [f64; 4] {
    let [w, x, y, z] = quat;
    [x, y, z, w]
}

/// Rotation matrix to `[x, y, z, w]` quaternion. The matrix is assumed to be orthonormal.
pub fn quat_from_matrix(rotation: &Matrix3<f64>) -> [f64; 4] {
    let q = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(*rotation));
    [q.i, q.j, q.k, q.w]
}

/// `[x, y, z, w]` quaternion to rotation matrix. The quaternion is normalized first.
pub fn matrix_from_quat(quat: [f64; 4]) -> Matrix3<f64> {
    unit_quaternion(quat).to_rotation_matrix().into_inner()
}

pub fn unit_quaternion(quat: [f64; 4]) -> UnitQuaternion<f64> {
    let [x, y, z, w] = quat;
    UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z))
}

pub fn pose_from_parts(point: [f64; 3], quat: [f64; 4]) -> Pose {
    Pose::from_parts(Translation3::new(point[0], point[1], point[2]), unit_quaternion(quat))
}

/// Position and `[x, y, z, w]` quaternion of the pose
pub fn parts_from_pose(pose: &Pose) -> ([f64; 3], [f64; 4]) {
    (point_from_pose(pose), quat_from_pose(pose))
}

pub fn point_from_pose(pose: &Pose) -> [f64; 3] {
    let t = pose.translation.vector;
    [t.x, t.y, t.z]
}

pub fn quat_from_pose(pose: &Pose) -> [f64; 4] {
    let q = pose.rotation;
    [q.i, q.j, q.k, q.w]
}

/// Builds the pose from the position and rotation matrix as returned by the analytic solvers.
pub fn pose_from_matrix(translation: &Vector3<f64>, rotation: &Matrix3<f64>) -> Pose {
    Pose::from_parts(
        Translation3::from(*translation),
        UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(*rotation)),
    )
}
