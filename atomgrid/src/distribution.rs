use std::ops::Range;

/// Contiguous blocks of global atoms per rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomDistribution {
    rank: usize,
    natoms: usize,
    chunks: Vec<Range<usize>>,
}

impl AtomDistribution {
    pub fn new(natoms: usize, nranks: usize, rank: usize) -> AtomDistribution {
        AtomDistribution {
            rank,
            natoms,
            chunks: utility::get_chunks(natoms, nranks),
        }
    }

    pub fn get_natoms(&self) -> usize {
        self.natoms
    }

    /// `Matomnum`
    pub fn get_matomnum(&self) -> usize {
        self.chunks[self.rank].len()
    }

    pub fn get_local_atoms(&self) -> Range<usize> {
        self.chunks[self.rank].clone()
    }

    /// Rank that owns a global atom, `None` past the last atom.
    pub fn get_owner(&self, gc_an: usize) -> Option<usize> {
        self.chunks.iter().position(|c| c.contains(&gc_an))
    }

    pub fn is_local(&self, gc_an: usize) -> bool {
        self.chunks[self.rank].contains(&gc_an)
    }

    /// Local index of a global atom owned by this rank.
    pub fn get_local_index(&self, gc_an: usize) -> Option<usize> {
        if self.is_local(gc_an) {
            Some(gc_an - self.chunks[self.rank].start)
        } else {
            None
        }
    }

    pub fn get_global_index(&self, mc_an: usize) -> usize {
        self.chunks[self.rank].start + mc_an
    }
}
