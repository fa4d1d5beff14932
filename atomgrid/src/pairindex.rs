use dwgrid::{LayoutError, PairBlocks};

/// One (local atom, neighbor) pair with its block shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairEntry {
    pub mc_an: usize,
    pub h_an: usize,
    pub gc_an: usize,
    pub gh_an: usize,
    pub no0: usize,
    pub no1: usize,
}

/// The (atom, neighbor) loops flattened into one index, in the block order
/// of [`PairBlocks`]. Built once per topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairIndex {
    entries: Vec<PairEntry>,
    natoms: usize,
}

impl PairIndex {
    pub fn new(entries: Vec<PairEntry>, natoms: usize) -> PairIndex {
        PairIndex { entries, natoms }
    }

    pub fn get_entries(&self) -> &[PairEntry] {
        &self.entries
    }

    pub fn get_npairs(&self) -> usize {
        self.entries.len()
    }

    /// Number of local atoms (`Matomnum`).
    pub fn get_natoms(&self) -> usize {
        self.natoms
    }

    /// Zero blocks shaped for this index.
    pub fn new_blocks(&self) -> PairBlocks {
        let mut shapes: Vec<Vec<(usize, usize)>> = vec![Vec::new(); self.natoms];

        for e in self.entries.iter() {
            shapes[e.mc_an].push((e.no0, e.no1));
        }

        PairBlocks::new(&shapes)
    }

    pub fn check_blocks(&self, blocks: &PairBlocks) -> Result<(), LayoutError> {
        if blocks.get_npairs() != self.entries.len() {
            return Err(LayoutError::PairCount {
                expected: self.entries.len(),
                found: blocks.get_npairs(),
            });
        }

        for (pair, (e, b)) in self.entries.iter().zip(blocks.as_slice()).enumerate() {
            if b.dim() != (e.no0, e.no1) {
                return Err(LayoutError::Block {
                    pair,
                    expected: (e.no0, e.no1),
                    found: b.dim(),
                });
            }
        }

        Ok(())
    }
}
