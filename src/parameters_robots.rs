//! Hardcoded arm descriptions for the PR2

use crate::constraints::Constraints;
use crate::kinematic_traits::Arm;
use crate::parameters::ArmParameters;

pub const PR2_BASE_LINK: &str = "base_link";
pub const PR2_TORSO_JOINT: &str = "torso_lift_joint";

/// Arm joints, to be prefixed with "l_" or "r_"
const PR2_ARM_GROUP: [&str; 7] = [
    "shoulder_pan_joint",
    "shoulder_lift_joint",
    "upper_arm_roll_joint",
    "elbow_flex_joint",
    "forearm_roll_joint",
    "wrist_flex_joint",
    "wrist_roll_joint",
];

const INF: f64 = f64::INFINITY;

impl ArmParameters {
    /// Joint names of the arm group of the given PR2 arm
    pub fn pr2_arm_group(arm: Arm) -> [String; 7] {
        PR2_ARM_GROUP.map(|joint| format!("{}_{}", arm.prefix(), joint))
    }

    /// PR2 arm, limits as in the robot description shipped with the robot.
    pub fn pr2(arm: Arm) -> Self {
        let group = Self::pr2_arm_group(arm);
        let joints = std::array::from_fn(|i| {
            if i == 0 { PR2_TORSO_JOINT.to_string() } else { group[i - 1].clone() }
        });

        // Shoulder pan and upper arm roll are mirrored between the arms.
        let (pan, upper) = match arm {
            Arm::Left => ((-0.714602, 2.285398), (-0.8, 3.9)),
            Arm::Right => ((-2.285398, 0.714602), (-3.9, 0.8)),
        };

        ArmParameters {
            arm,
            base_link: PR2_BASE_LINK.to_string(),
            tool_link: format!("{}_gripper_tool_frame", arm.prefix()),
            torso_joint: PR2_TORSO_JOINT.to_string(),
            upper_joint: format!("{}_upper_arm_roll_joint", arm.prefix()),
            joints,
            constraints: Constraints::new(
                [0.0115, pan.0, -0.5236, upper.0, -2.3213, -INF, -2.094, -INF],
                [0.325, pan.1, 1.3963, upper.1, 0.0, INF, 0.0, INF],
            ),
        }
    }

    pub fn pr2_left() -> Self {
        Self::pr2(Arm::Left)
    }

    pub fn pr2_right() -> Self {
        Self::pr2(Arm::Right)
    }
}
