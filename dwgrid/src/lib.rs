//! Owned containers for grid fields and pair-indexed matrix blocks.

mod array3;
pub use array3::Array3;

mod blocks;
pub use blocks::{PairBlocks, SpinBlocks};

mod error;
pub use error::LayoutError;

pub use ndarray_crate::Array2;

#[cfg(test)]
mod tests;
