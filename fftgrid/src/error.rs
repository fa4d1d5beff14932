use dwmpi::CommError;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    Comm(CommError),
    UnsortedCells { position: usize },
    CellOutOfRange { cell: u64, ntot: usize },
    FieldLength {
        field: &'static str,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::Comm(e) => write!(f, "grid communication failed: {}", e),
            GridError::UnsortedCells { position } => write!(
                f,
                "C cell list is not strictly ascending at position {}",
                position
            ),
            GridError::CellOutOfRange { cell, ntot } => {
                write!(f, "cell {} is outside a grid of {} cells", cell, ntot)
            }
            GridError::FieldLength {
                field,
                expected,
                found,
            } => write!(
                f,
                "{} has {} values, the partition needs {}",
                field, found, expected
            ),
        }
    }
}

impl Error for GridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GridError::Comm(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CommError> for GridError {
    fn from(e: CommError) -> Self {
        GridError::Comm(e)
    }
}
