use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrystalError {
    Io { path: String, message: String },
    Parse { line: usize, message: String },
    UnknownSpecies(String),
    NoAtoms,
}

impl fmt::Display for CrystalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrystalError::Io { path, message } => write!(f, "cannot read {}: {}", path, message),
            CrystalError::Parse { line, message } => {
                write!(f, "in.crystal line {}: {}", line, message)
            }
            CrystalError::UnknownSpecies(sp) => {
                write!(f, "atom species '{}' has no species line", sp)
            }
            CrystalError::NoAtoms => write!(f, "crystal has no atoms"),
        }
    }
}

impl Error for CrystalError {}
