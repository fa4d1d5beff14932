use crate::{FFTGrid, GridError};

use std::ops::Range;

/// Slab decomposition: every rank owns a contiguous run of `N1`-long rows.
///
/// Rank `r` owns rows `[ceil(r·N2D/P), ceil((r+1)·N2D/P))`, which also makes
/// its global cells one contiguous range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionB {
    n1: usize,
    rank: usize,
    row_starts: Vec<usize>,
}

impl PartitionB {
    pub fn new(grid: &FFTGrid, nranks: usize, rank: usize) -> PartitionB {
        assert!(nranks > 0 && rank < nranks);

        let n2d = grid.get_n2d();

        let row_starts = (0..=nranks)
            .map(|r| utility::div_ceil(r * n2d, nranks))
            .collect();

        PartitionB {
            n1: grid.get_n1(),
            rank,
            row_starts,
        }
    }

    pub fn get_nranks(&self) -> usize {
        self.row_starts.len() - 1
    }

    pub fn get_rank(&self) -> usize {
        self.rank
    }

    pub fn get_rows(&self, rank: usize) -> Range<usize> {
        self.row_starts[rank]..self.row_starts[rank + 1]
    }

    pub fn get_cells(&self, rank: usize) -> Range<u64> {
        let rows = self.get_rows(rank);

        (rows.start * self.n1) as u64..(rows.end * self.n1) as u64
    }

    pub fn get_my_cells(&self) -> Range<u64> {
        self.get_cells(self.rank)
    }

    /// Number of cells of this rank's slab.
    pub fn get_num_local(&self) -> usize {
        let rows = self.get_rows(self.rank);

        (rows.end - rows.start) * self.n1
    }

    pub fn get_owner(&self, gn: u64) -> usize {
        let row = gn as usize / self.n1;

        // last rank whose first row is not past `row`; empty ranks share a start
        self.row_starts.partition_point(|&s| s <= row) - 1
    }

    /// `BN = GN − row_start·N1`, valid for cells of this rank.
    pub fn get_local_index(&self, gn: u64) -> usize {
        gn as usize - self.row_starts[self.rank] * self.n1
    }

    pub fn get_global_index(&self, bn: usize) -> u64 {
        (self.row_starts[self.rank] * self.n1 + bn) as u64
    }
}

/// Cells held by one rank for atom-centered work, in ascending global order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionC {
    cells: Vec<u64>,
}

impl PartitionC {
    pub fn new(cells: Vec<u64>, grid: &FFTGrid) -> Result<PartitionC, GridError> {
        let ntot = grid.get_ntot();

        for (i, w) in cells.windows(2).enumerate() {
            if w[0] >= w[1] {
                return Err(GridError::UnsortedCells { position: i + 1 });
            }
        }

        if let Some(&last) = cells.last() {
            if last as usize >= ntot {
                return Err(GridError::CellOutOfRange { cell: last, ntot });
            }
        }

        Ok(PartitionC { cells })
    }

    pub fn get_cells(&self) -> &[u64] {
        &self.cells
    }

    pub fn get_num_local(&self) -> usize {
        self.cells.len()
    }

    pub fn get_global_index(&self, mn: usize) -> u64 {
        self.cells[mn]
    }

    pub fn find(&self, gn: u64) -> Option<usize> {
        self.cells.binary_search(&gn).ok()
    }
}
