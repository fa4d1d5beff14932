use atomgrid::AtomGridError;
use dwmpi::CommError;
use fftgrid::GridError;
use hlr::QuadratureError;

use std::error::Error;
use std::fmt;

/// Failure of one rank's run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// Rank count given on the command line.
    InvalidRanks(usize),
    Comm(CommError),
    Grid(GridError),
    Orbitals(AtomGridError),
    Quadrature(QuadratureError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::InvalidRanks(n) => write!(f, "invalid number of ranks: {}", n),
            RunError::Comm(e) => write!(f, "communication: {}", e),
            RunError::Grid(e) => write!(f, "grid: {}", e),
            RunError::Orbitals(e) => write!(f, "orbitals: {}", e),
            RunError::Quadrature(e) => write!(f, "quadrature: {}", e),
        }
    }
}

impl Error for RunError {}

impl From<CommError> for RunError {
    fn from(e: CommError) -> Self {
        RunError::Comm(e)
    }
}

impl From<GridError> for RunError {
    fn from(e: GridError) -> Self {
        RunError::Grid(e)
    }
}

impl From<AtomGridError> for RunError {
    fn from(e: AtomGridError) -> Self {
        RunError::Orbitals(e)
    }
}

impl From<QuadratureError> for RunError {
    fn from(e: QuadratureError) -> Self {
        RunError::Quadrature(e)
    }
}
