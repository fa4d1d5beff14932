use std::fmt;

/// Failures of the message-passing layer. None of them is recoverable;
/// callers propagate them up to the driver, which ends the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommError {
    /// An MPI call returned a code other than `MPI_SUCCESS`.
    Mpi { call: &'static str, code: i32 },
    /// The peer rank went away before the transfer completed.
    Disconnected { peer: usize },
    /// The incoming message length differs from the posted buffer.
    Truncated {
        peer: usize,
        expected: usize,
        received: usize,
    },
    /// The incoming message carries another element type.
    TypeMismatch { peer: usize },
    InvalidRank { rank: usize, size: usize },
}

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommError::Mpi { call, code } => write!(f, "{} failed with error code {}", call, code),
            CommError::Disconnected { peer } => write!(f, "rank {} disconnected", peer),
            CommError::Truncated {
                peer,
                expected,
                received,
            } => write!(
                f,
                "message from rank {} has {} elements, {} expected",
                peer, received, expected
            ),
            CommError::TypeMismatch { peer } => {
                write!(f, "message from rank {} has an unexpected element type", peer)
            }
            CommError::InvalidRank { rank, size } => {
                write!(f, "rank {} out of range for communicator of size {}", rank, size)
            }
        }
    }
}

impl std::error::Error for CommError {}
