use crystal::Crystal;
use itertools::iproduct;
use lattice::Lattice;
use vector3::Vector3f64;

use crate::AtomDistribution;

/// One entry of a neighbor list: global atom index and the lattice image it
/// sits in.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub atom: usize,
    pub cell: [i32; 3],
    pub dist: f64,
}

/// Neighbors of every local atom within the sum of the two cutoff radii.
/// Entry 0 of each list is the atom itself in the home cell.
#[derive(Debug, Clone)]
pub struct NeighborList {
    lists: Vec<Vec<Neighbor>>,
}

impl NeighborList {
    pub fn new(crystal: &Crystal, dist: &AtomDistribution) -> NeighborList {
        let latt = crystal.get_latt();
        let pos = crystal.get_atom_positions_cart();
        let natoms = crystal.get_n_atoms();

        let rcut_max = (0..natoms)
            .map(|iat| crystal.get_atom_rcut(iat))
            .fold(0.0, f64::max);

        let nimage = image_range(latt, 2.0 * rcut_max);

        let lists = dist
            .get_local_atoms()
            .map(|gc| {
                let rc = crystal.get_atom_rcut(gc);

                let mut list: Vec<Neighbor> = Vec::new();

                for (gh, i, j, k) in iproduct!(
                    0..natoms,
                    -nimage[0]..=nimage[0],
                    -nimage[1]..=nimage[1],
                    -nimage[2]..=nimage[2]
                ) {
                    if gh == gc && (i, j, k) == (0, 0, 0) {
                        continue;
                    }

                    let shift = latt.frac_to_cart(&Vector3f64::new(i as f64, j as f64, k as f64));
                    let d = (pos[gh] + shift - pos[gc]).norm2();

                    if d < rc + crystal.get_atom_rcut(gh) {
                        list.push(Neighbor {
                            atom: gh,
                            cell: [i, j, k],
                            dist: d,
                        });
                    }
                }

                list.sort_by(|a, b| {
                    a.dist
                        .total_cmp(&b.dist)
                        .then(a.atom.cmp(&b.atom))
                        .then(a.cell.cmp(&b.cell))
                });

                list.insert(
                    0,
                    Neighbor {
                        atom: gc,
                        cell: [0, 0, 0],
                        dist: 0.0,
                    },
                );

                list
            })
            .collect();

        NeighborList { lists }
    }

    pub fn get_natoms(&self) -> usize {
        self.lists.len()
    }

    /// `FNAN + 1` entries of local atom `mc_an`.
    pub fn get_neighbors(&self, mc_an: usize) -> &[Neighbor] {
        &self.lists[mc_an]
    }

    /// `FNAN`, the neighbor count without the atom itself.
    pub fn get_fnan(&self, mc_an: usize) -> usize {
        self.lists[mc_an].len() - 1
    }
}

/// Number of lattice images per axis needed to reach `range`.
pub(crate) fn image_range(latt: &Lattice, range: f64) -> [i32; 3] {
    let spacing = latt.plane_spacings();

    [
        (range / spacing[0]).ceil() as i32,
        (range / spacing[1]).ceil() as i32,
        (range / spacing[2]).ceil() as i32,
    ]
}
