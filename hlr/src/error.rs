use dwgrid::LayoutError;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuadratureError {
    Layout(LayoutError),
    FieldLength { expected: usize, found: usize },
    CenterCount { expected: usize, found: usize },
}

impl fmt::Display for QuadratureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuadratureError::Layout(e) => write!(f, "matrix layout: {}", e),
            QuadratureError::FieldLength { expected, found } => write!(
                f,
                "potential has {} values, partition C holds {} cells",
                found, expected
            ),
            QuadratureError::CenterCount { expected, found } => {
                write!(f, "{} centers given, {} needed", found, expected)
            }
        }
    }
}

impl Error for QuadratureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            QuadratureError::Layout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LayoutError> for QuadratureError {
    fn from(e: LayoutError) -> Self {
        QuadratureError::Layout(e)
    }
}
