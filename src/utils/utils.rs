//! Helper functions

use crate::kinematic_traits::{Configuration, TORSO};
use nalgebra::{Isometry3, UnitQuaternion};

/// Formats configuration for output, torso in meters, the rest in degrees.
pub fn format_configuration(configuration: &Configuration) -> String {
    let mut row_str = String::new();
    for (joint_idx, value) in configuration.iter().enumerate() {
        if joint_idx == TORSO {
            row_str.push_str(&format!("{:5.3} ", value));
        } else {
            row_str.push_str(&format!("{:5.2} ", value.to_degrees()));
        }
    }
    format!("[{}]", row_str.trim_end())
}

pub fn format_pose(isometry: &Isometry3<f64>) -> String {
    let translation = isometry.translation.vector;
    let rotation: UnitQuaternion<f64> = isometry.rotation;
    format!(
        "x: {:.5}, y: {:.5}, z: {:.5},  quat: {:.5},{:.5},{:.5},{:.5}",
        translation.x, translation.y, translation.z, rotation.i, rotation.j, rotation.k, rotation.w
    )
}

/// Allows to specify joint values in degrees (converts to radians). Torso is in millimeters.
#[allow(dead_code)]
pub fn as_radians(torso_mm: i32, degrees: [i32; 7]) -> Configuration {
    std::array::from_fn(|i| {
        if i == TORSO { torso_mm as f64 / 1000.0 } else { (degrees[i - 1] as f64).to_radians() }
    })
}

pub fn assert_pose_eq(ta: &Isometry3<f64>, tb: &Isometry3<f64>,
                      distance_tolerance: f64, angular_tolerance: f64) -> bool {
    let translation_distance = (ta.translation.vector - tb.translation.vector).norm();
    let angular_distance = ta.rotation.angle_to(&tb.rotation);

    if translation_distance.abs() > distance_tolerance {
        panic!("Poses have too different translations:\n{}\n{}", format_pose(ta), format_pose(tb));
    }

    if angular_distance.abs() > angular_tolerance {
        panic!("Poses have too different angles:\n{}\n{}", format_pose(ta), format_pose(tb));
    }
    true
}
