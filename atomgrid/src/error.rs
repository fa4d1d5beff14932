use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomGridError {
    UnsupportedOrbitals {
        species: String,
        norb: usize,
        max: usize,
    },
}

impl fmt::Display for AtomGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomGridError::UnsupportedOrbitals { species, norb, max } => write!(
                f,
                "species {} asks for {} orbitals, the basis provides at most {}",
                species, norb, max
            ),
        }
    }
}

impl Error for AtomGridError {}
