//! Atom-centered view of the real-space grid: which atoms a rank owns, their
//! neighbors, the grid points each atom touches and the orbital values on
//! them.

mod basis;
pub use basis::{AtomicBasis, GaussianBasis};

mod distribution;
pub use distribution::AtomDistribution;

mod error;
pub use error::AtomGridError;

mod neighbor;
pub use neighbor::{Neighbor, NeighborList};

mod orbital;
pub use orbital::{OrbitalGrid, OrbitalTables};

mod pairindex;
pub use pairindex::{PairEntry, PairIndex};

mod support;
pub use support::{AtomSupport, Overlap};

use crystal::Crystal;
use fftgrid::FFTGrid;
use itertools::Itertools;
use tracing::debug;
use vector3::Vector3f64;

/// Everything one rank knows about its atoms on the grid.
#[derive(Debug, Clone)]
pub struct AtomGrid {
    dist: AtomDistribution,
    neighbors: NeighborList,
    supports: Vec<AtomSupport>,
    overlaps: Vec<Overlap>,
    pairs: PairIndex,
    c_cells: Vec<u64>,
    mgrid: Vec<Vec<usize>>,
    centers: Vec<Vector3f64>,
    center_atoms: Vec<usize>,
}

impl AtomGrid {
    pub fn new(crystal: &Crystal, grid: &FFTGrid, nranks: usize, rank: usize) -> AtomGrid {
        let latt = crystal.get_latt();
        let pos = crystal.get_atom_positions_cart();

        let dist = AtomDistribution::new(crystal.get_n_atoms(), nranks, rank);

        let neighbors = NeighborList::new(crystal, &dist);

        let supports: Vec<AtomSupport> = dist
            .get_local_atoms()
            .map(|gc| AtomSupport::new(latt, grid, &pos[gc], crystal.get_atom_rcut(gc)))
            .collect();

        let mut overlaps = Vec::new();
        let mut entries = Vec::new();

        for (mc_an, gc_an) in dist.get_local_atoms().enumerate() {
            for (h_an, nb) in neighbors.get_neighbors(mc_an).iter().enumerate() {
                let sup_h = dist.get_local_index(nb.atom).map(|mh| &supports[mh]);

                overlaps.push(Overlap::new(
                    latt,
                    grid,
                    &supports[mc_an],
                    &pos[nb.atom],
                    crystal.get_atom_rcut(nb.atom),
                    nb.cell,
                    sup_h,
                ));

                entries.push(PairEntry {
                    mc_an,
                    h_an,
                    gc_an,
                    gh_an: nb.atom,
                    no0: crystal.get_atom_norb(gc_an),
                    no1: crystal.get_atom_norb(nb.atom),
                });
            }
        }

        let pairs = PairIndex::new(entries, dist.get_matomnum());

        // partition C: every cell touched by a local atom
        let c_cells: Vec<u64> = supports
            .iter()
            .flat_map(|s| s.get_cells().iter().copied())
            .sorted_unstable()
            .dedup()
            .collect();

        let mgrid: Vec<Vec<usize>> = supports
            .iter()
            .map(|s| {
                s.get_cells()
                    .iter()
                    .map(|gn| c_cells.binary_search(gn).unwrap_or_else(|mn| mn))
                    .collect()
            })
            .collect();

        // projection centers: local atoms, then foreign neighbors
        let foreign: Vec<usize> = (0..dist.get_matomnum())
            .flat_map(|mc_an| neighbors.get_neighbors(mc_an).iter().map(|nb| nb.atom))
            .filter(|&gh| !dist.is_local(gh))
            .sorted_unstable()
            .dedup()
            .collect();

        let center_atoms: Vec<usize> = dist.get_local_atoms().chain(foreign).collect();
        let centers = center_atoms.iter().map(|&ga| pos[ga]).collect();

        debug!(
            rank,
            matomnum = dist.get_matomnum(),
            npairs = pairs.get_npairs(),
            ncells = c_cells.len(),
            "atom grid built"
        );

        AtomGrid {
            dist,
            neighbors,
            supports,
            overlaps,
            pairs,
            c_cells,
            mgrid,
            centers,
            center_atoms,
        }
    }

    pub fn get_distribution(&self) -> &AtomDistribution {
        &self.dist
    }

    pub fn get_neighbors(&self) -> &NeighborList {
        &self.neighbors
    }

    pub fn get_support(&self, mc_an: usize) -> &AtomSupport {
        &self.supports[mc_an]
    }

    pub fn get_overlap(&self, mc_an: usize, h_an: usize) -> &Overlap {
        &self.overlaps[self.pair_position(mc_an, h_an)]
    }

    /// Overlaps in [`PairIndex`] order.
    pub fn get_overlaps(&self) -> &[Overlap] {
        &self.overlaps
    }

    pub fn get_pair_index(&self) -> &PairIndex {
        &self.pairs
    }

    /// Ascending global cells of partition C on this rank.
    pub fn get_c_cells(&self) -> &[u64] {
        &self.c_cells
    }

    /// `MGridListAtom`: C-local index of support point `nc` of `mc_an`.
    pub fn get_mgrid(&self, mc_an: usize) -> &[usize] {
        &self.mgrid[mc_an]
    }

    /// Positions of the projection centers, local atoms first.
    pub fn get_centers(&self) -> &[Vector3f64] {
        &self.centers
    }

    pub fn get_center_atoms(&self) -> &[usize] {
        &self.center_atoms
    }

    fn pair_position(&self, mc_an: usize, h_an: usize) -> usize {
        let offset: usize = (0..mc_an).map(|m| self.neighbors.get_neighbors(m).len()).sum();

        offset + h_an
    }
}
