use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    Io { path: String, message: String },
    UnknownParameter { line: usize, key: String },
    MissingValue { line: usize, key: String },
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::Io { path, message } => write!(f, "cannot read {}: {}", path, message),
            ControlError::UnknownParameter { line, key } => {
                write!(f, "unknown parameter '{}' on line {}", key, line)
            }
            ControlError::MissingValue { line, key } => {
                write!(f, "parameter '{}' on line {} has no value", key, line)
            }
            ControlError::InvalidValue { key, value } => {
                write!(f, "invalid value '{}' for parameter '{}'", value, key)
            }
        }
    }
}

impl Error for ControlError {}
