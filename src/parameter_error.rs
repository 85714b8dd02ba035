//! Error handling for arm descriptions, robot state and sampling bounds

use std::io;

/// Unified error to report failures while reading arm descriptions, accessing robot
/// or world state, and resolving sampling bounds.
#[derive(Debug)]
pub enum ParameterError {
    IoError(io::Error),
    ParseError(String),
    MissingField(String),
    WrongAngle(String),
    InvalidLength { expected: usize, found: usize },
    InvalidBounds { joint: String, min: f64, max: f64 },
    UnboundedJoint(String),
    UnknownJoint(String),
    UnknownBody(usize),
    KinematicsConfigurationError(String),
}

impl std::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ParameterError::IoError(ref err) =>
                write!(f, "IO Error: {}", err),
            ParameterError::ParseError(ref msg) =>
                write!(f, "Parse Error: {}", msg),
            ParameterError::WrongAngle(ref msg) =>
                write!(f, "Wrong angle representation: {}", msg),
            ParameterError::MissingField(ref field) =>
                write!(f, "Missing Field: {}", field),
            ParameterError::InvalidLength { expected, found } =>
                write!(f, "Invalid Length: expected {}, found {}", expected, found),
            ParameterError::InvalidBounds { ref joint, min, max } =>
                write!(f, "Invalid bounds for {}: [{}, {}]", joint, min, max),
            ParameterError::UnboundedJoint(ref joint) =>
                write!(f, "Joint {} has no limits to sample from", joint),
            ParameterError::UnknownJoint(ref joint) =>
                write!(f, "Unknown joint: {}", joint),
            ParameterError::UnknownBody(body) =>
                write!(f, "Unknown body: {}", body),
            ParameterError::KinematicsConfigurationError(ref err) =>
                write!(f, "Kinematics Configuration Error: {}", err),
        }
    }
}

impl std::error::Error for ParameterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParameterError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ParameterError {
    fn from(err: io::Error) -> Self {
        ParameterError::IoError(err)
    }
}
