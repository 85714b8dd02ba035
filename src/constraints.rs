use crate::kinematic_traits::{Configuration, Solutions, ARM_JOINTS};

/// Joint limits of the torso and the arm, in the order of the configuration.
/// Continuous joints have infinite limits.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraints {
    /// Lower limit, inclusive
    pub from: [f64; ARM_JOINTS],

    /// Upper limit, inclusive
    pub to: [f64; ARM_JOINTS],
}

impl Constraints {
    pub fn new(from: [f64; ARM_JOINTS], to: [f64; ARM_JOINTS]) -> Self {
        Constraints { from, to }
    }

    /// Constraints that accept any finite configuration
    pub fn unconstrained() -> Self {
        Constraints {
            from: [f64::NEG_INFINITY; ARM_JOINTS],
            to: [f64::INFINITY; ARM_JOINTS],
        }
    }

    pub fn limits(&self, joint: usize) -> (f64, f64) {
        (self.from[joint], self.to[joint])
    }

    pub fn is_continuous(&self, joint: usize) -> bool {
        self.from[joint] == f64::NEG_INFINITY && self.to[joint] == f64::INFINITY
    }

    /// True if every joint value lies within its limits. NaN never does.
    pub fn compliant(&self, angles: &Configuration) -> bool {
        angles.iter()
            .zip(self.from.iter().zip(self.to.iter()))
            .all(|(angle, (from, to))| *angle >= *from && *angle <= *to)
    }

    pub fn violates(&self, angles: &Configuration) -> bool {
        !self.compliant(angles)
    }

    pub fn filter(&self, angles: &Solutions) -> Solutions {
        angles.iter()
            .filter(|angle_array| self.compliant(angle_array))
            .cloned()
            .collect()
    }
}
