use crate::LayoutError;

use ndarray_crate::{Array2, Zip};
use rayon::prelude::*;

/// One dense block per (local atom, neighbor) pair.
///
/// Blocks are stored flat in neighbor-list order: all neighbors of local
/// atom 0, then all neighbors of local atom 1, and so on. Block `(i, j)` is
/// indexed by the orbital `i` of the local atom and the orbital `j` of the
/// neighbor.
#[derive(Debug, Clone, PartialEq)]
pub struct PairBlocks {
    offsets: Vec<usize>,
    blocks: Vec<Array2<f64>>,
}

impl PairBlocks {
    /// `shapes[mc_an][h_an]` is the `(NO0, NO1)` shape of that pair's block.
    pub fn new(shapes: &[Vec<(usize, usize)>]) -> PairBlocks {
        let mut offsets = Vec::with_capacity(shapes.len() + 1);
        let mut blocks = Vec::new();

        offsets.push(0);

        for atom in shapes.iter() {
            for &(no0, no1) in atom.iter() {
                blocks.push(Array2::zeros((no0, no1)));
            }
            offsets.push(blocks.len());
        }

        PairBlocks { offsets, blocks }
    }

    /// Zero-filled blocks with the same layout as `self`.
    pub fn zeros_like(&self) -> PairBlocks {
        PairBlocks {
            offsets: self.offsets.clone(),
            blocks: self.blocks.iter().map(|b| Array2::zeros(b.dim())).collect(),
        }
    }

    pub fn get_natoms(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn get_nneighbors(&self, mc_an: usize) -> usize {
        self.offsets[mc_an + 1] - self.offsets[mc_an]
    }

    pub fn get_npairs(&self) -> usize {
        self.blocks.len()
    }

    pub fn get_pair_offset(&self, mc_an: usize) -> usize {
        self.offsets[mc_an]
    }

    pub fn get_block(&self, mc_an: usize, h_an: usize) -> &Array2<f64> {
        &self.blocks[self.offsets[mc_an] + h_an]
    }

    pub fn get_block_mut(&mut self, mc_an: usize, h_an: usize) -> &mut Array2<f64> {
        &mut self.blocks[self.offsets[mc_an] + h_an]
    }

    pub fn as_slice(&self) -> &[Array2<f64>] {
        &self.blocks
    }

    pub fn as_mut_slice(&mut self) -> &mut [Array2<f64>] {
        &mut self.blocks
    }

    pub fn check_layout(&self, other: &PairBlocks) -> Result<(), LayoutError> {
        if self.blocks.len() != other.blocks.len() {
            return Err(LayoutError::PairCount {
                expected: self.blocks.len(),
                found: other.blocks.len(),
            });
        }

        for (pair, (a, b)) in self.blocks.iter().zip(other.blocks.iter()).enumerate() {
            if a.dim() != b.dim() {
                return Err(LayoutError::Block {
                    pair,
                    expected: a.dim(),
                    found: b.dim(),
                });
            }
        }

        Ok(())
    }

    pub fn set_zero(&mut self) {
        self.blocks.iter_mut().for_each(|b| b.fill(0.0));
    }

    /// `self += factor · other`, block by block.
    pub fn add_scaled(&mut self, other: &PairBlocks, factor: f64) -> Result<(), LayoutError> {
        self.check_layout(other)?;

        self.blocks
            .par_iter_mut()
            .zip(other.blocks.par_iter())
            .for_each(|(d, s)| {
                Zip::from(d).and(s).for_each(|d, &s| *d += factor * s);
            });

        Ok(())
    }

    pub fn norm(&self) -> f64 {
        self.blocks
            .iter()
            .flat_map(|b| b.iter())
            .map(|v| v * v)
            .sum::<f64>()
            .sqrt()
    }

    pub fn max_abs(&self) -> f64 {
        self.blocks
            .iter()
            .flat_map(|b| b.iter())
            .fold(0.0, |m: f64, v| m.max(v.abs()))
    }
}

/// Pair blocks per spin component.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinBlocks {
    spins: Vec<PairBlocks>,
}

impl SpinBlocks {
    pub fn new(nspin: usize, layout: &PairBlocks) -> SpinBlocks {
        SpinBlocks {
            spins: (0..nspin).map(|_| layout.zeros_like()).collect(),
        }
    }

    pub fn from_vec(spins: Vec<PairBlocks>) -> Result<SpinBlocks, LayoutError> {
        if let Some(first) = spins.first() {
            for s in spins.iter().skip(1) {
                first.check_layout(s)?;
            }
        }

        Ok(SpinBlocks { spins })
    }

    pub fn get_nspin(&self) -> usize {
        self.spins.len()
    }

    pub fn get_spin(&self, spin: usize) -> &PairBlocks {
        &self.spins[spin]
    }

    pub fn get_spin_mut(&mut self, spin: usize) -> &mut PairBlocks {
        &mut self.spins[spin]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PairBlocks> {
        self.spins.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, PairBlocks> {
        self.spins.iter_mut()
    }

    /// Checks that `self` has at least `nspin` components laid out like
    /// `layout`.
    pub fn check_layout(&self, layout: &PairBlocks, nspin: usize) -> Result<(), LayoutError> {
        if self.spins.len() < nspin {
            return Err(LayoutError::SpinCount {
                expected: nspin,
                found: self.spins.len(),
            });
        }

        for s in self.spins.iter().take(nspin) {
            layout.check_layout(s)?;
        }

        Ok(())
    }

    pub fn set_zero(&mut self) {
        self.spins.iter_mut().for_each(|s| s.set_zero());
    }

    pub fn max_abs(&self) -> f64 {
        self.spins.iter().fold(0.0, |m: f64, s| m.max(s.max_abs()))
    }
}
