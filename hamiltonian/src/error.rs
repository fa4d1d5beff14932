use crate::Term;

use dwgrid::LayoutError;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HamiltonianError {
    Layout(LayoutError),
    MissingContribution(Term),
    MissingOverlap,
    MissingContraction,
    MissingCoefficients { atom: usize },
    Coefficients {
        atom: usize,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for HamiltonianError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HamiltonianError::Layout(e) => write!(f, "contribution layout: {}", e),
            HamiltonianError::MissingContribution(term) => {
                write!(f, "term '{}' is switched on but was not provided", term)
            }
            HamiltonianError::MissingOverlap => {
                write!(f, "contraction needs the overlap matrix")
            }
            HamiltonianError::MissingContraction => {
                write!(f, "contraction requested without a contraction scheme")
            }
            HamiltonianError::MissingCoefficients { atom } => {
                write!(f, "no contraction coefficients for atom {}", atom)
            }
            HamiltonianError::Coefficients {
                atom,
                expected,
                found,
            } => write!(
                f,
                "contraction coefficients of atom {} act on {} orbitals, the atom has {}",
                atom, found, expected
            ),
        }
    }
}

impl Error for HamiltonianError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HamiltonianError::Layout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LayoutError> for HamiltonianError {
    fn from(e: LayoutError) -> Self {
        HamiltonianError::Layout(e)
    }
}
