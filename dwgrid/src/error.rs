use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    Length { expected: usize, found: usize },
    PairCount { expected: usize, found: usize },
    Block {
        pair: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },
    SpinCount { expected: usize, found: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Length { expected, found } => {
                write!(f, "data length {} does not match shape size {}", found, expected)
            }
            LayoutError::PairCount { expected, found } => {
                write!(f, "{} pair blocks where {} were expected", found, expected)
            }
            LayoutError::Block {
                pair,
                expected,
                found,
            } => write!(
                f,
                "pair {} has block shape {}x{}, expected {}x{}",
                pair, found.0, found.1, expected.0, expected.1
            ),
            LayoutError::SpinCount { expected, found } => {
                write!(f, "{} spin components where {} were expected", found, expected)
            }
        }
    }
}

impl Error for LayoutError {}
