//! Supports reading arm descriptions from YAML file (optional)

use std::path::Path;
use yaml_rust2::{Yaml, YamlLoader};

use crate::constraints::Constraints;
use crate::kinematic_traits::{Arm, ARM_JOINTS};
use crate::parameter_error::ParameterError;
use crate::parameters::ArmParameters;

impl ArmParameters {
    /// Read the arm description from YAML file. YAML file like this is supported:
    /// ```yaml
    /// arm: left
    /// base_link: base_link
    /// tool_link: l_gripper_tool_frame
    /// torso_joint: torso_lift_joint
    /// upper_joint: l_upper_arm_roll_joint
    /// joints:
    ///   - { name: torso_lift_joint, lower: 0.0115, upper: 0.325 }
    ///   - { name: l_shoulder_pan_joint, lower: deg(-40.94), upper: deg(130.94) }
    ///   - { name: l_shoulder_lift_joint, lower: -0.5236, upper: 1.3963 }
    ///   - { name: l_upper_arm_roll_joint, lower: -0.8, upper: 3.9 }
    ///   - { name: l_elbow_flex_joint, lower: -2.3213, upper: 0 }
    ///   - { name: l_forearm_roll_joint, continuous: true }
    ///   - { name: l_wrist_flex_joint, lower: -2.094, upper: 0 }
    ///   - { name: l_wrist_roll_joint, continuous: true }
    /// ```
    /// Exactly 8 joints are expected, torso first and the upper arm roll joint fourth.
    /// Angles can be given in radians or as deg(angle). Missing `base_link` defaults to
    /// "base_link".
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
        let docs = YamlLoader::load_from_str(contents)
            .map_err(|e| ParameterError::ParseError(e.to_string()))?;
        let doc = docs.first()
            .ok_or_else(|| ParameterError::ParseError("Empty YAML document".to_string()))?;

        let arm: Arm = read_string(doc, "arm")?.parse()?;
        let base_link = match &doc["base_link"] {
            Yaml::BadValue => "base_link".to_string(),
            value => value.as_str()
                .ok_or_else(|| ParameterError::ParseError("base_link must be a string".to_string()))?
                .to_string(),
        };

        let entries = doc["joints"].as_vec()
            .ok_or_else(|| ParameterError::MissingField("joints".to_string()))?;
        if entries.len() != ARM_JOINTS {
            return Err(ParameterError::InvalidLength { expected: ARM_JOINTS, found: entries.len() });
        }

        let mut names: Vec<String> = Vec::with_capacity(ARM_JOINTS);
        let mut from = [0.0; ARM_JOINTS];
        let mut to = [0.0; ARM_JOINTS];
        for (i, entry) in entries.iter().enumerate() {
            let name = read_string(entry, "name")?;
            if entry["continuous"].as_bool().unwrap_or(false) {
                from[i] = f64::NEG_INFINITY;
                to[i] = f64::INFINITY;
            } else {
                from[i] = read_value(&entry["lower"], &format!("{}.lower", name))?;
                to[i] = read_value(&entry["upper"], &format!("{}.upper", name))?;
            }
            names.push(name);
        }

        let joints: [String; ARM_JOINTS] = names.try_into()
            .map_err(|v: Vec<String>| ParameterError::InvalidLength { expected: ARM_JOINTS, found: v.len() })?;

        let parameters = ArmParameters {
            arm,
            base_link,
            tool_link: read_string(doc, "tool_link")?,
            torso_joint: read_string(doc, "torso_joint")?,
            upper_joint: read_string(doc, "upper_joint")?,
            joints,
            constraints: Constraints::new(from, to),
        };
        parameters.validate()?;
        Ok(parameters)
    }
}

fn read_string(yaml: &Yaml, field: &str) -> Result<String, ParameterError> {
    yaml[field].as_str()
        .map(str::to_string)
        .ok_or_else(|| ParameterError::MissingField(field.to_string()))
}

/// Number as is, or deg(angle) converted to radians.
fn read_value(yaml: &Yaml, field: &str) -> Result<f64, ParameterError> {
    match yaml {
        Yaml::Real(_) => yaml.as_f64()
            .ok_or_else(|| ParameterError::ParseError(format!("{}: not a number", field))),
        Yaml::Integer(value) => Ok(*value as f64),
        Yaml::String(text) => parse_angle(text)
            .ok_or_else(|| ParameterError::WrongAngle(format!("{}: {}", field, text))),
        Yaml::BadValue => Err(ParameterError::MissingField(field.to_string())),
        _ => Err(ParameterError::ParseError(format!("{}: unexpected value {:?}", field, yaml))),
    }
}

fn parse_angle(text: &str) -> Option<f64> {
    let text = text.trim();
    match text.strip_prefix("deg(").and_then(|rest| rest.strip_suffix(')')) {
        Some(degrees) => degrees.trim().parse::<f64>().ok().map(f64::to_radians),
        None => text.parse::<f64>().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_angle() {
        let close = |text: &str, expected: f64| (parse_angle(text).unwrap() - expected).abs() < 1e-12;
        assert!(close("deg(180)", std::f64::consts::PI));
        assert!(close(" deg( -90.0 ) ", -std::f64::consts::FRAC_PI_2));
        assert_eq!(parse_angle("0.5"), Some(0.5));
        assert_eq!(parse_angle("rad(1)"), None);
        assert_eq!(parse_angle("deg(x)"), None);
    }
}
