use crate::{AtomGrid, AtomGridError, AtomicBasis};

use crystal::Crystal;
use rayon::prelude::*;
use vector3::Vector3f64;

/// Orbital values on the support points of local atoms, and on the overlap
/// points of neighbors held by other ranks.
pub trait OrbitalGrid: Sync {
    /// All orbitals of local atom `mc_an` at its support point `nc`.
    fn orbital_row(&self, mc_an: usize, nc: usize) -> &[f64];

    /// All orbitals of neighbor `h_an` of `mc_an` at overlap point `nog`.
    fn orbital_row_remote(&self, mc_an: usize, h_an: usize, nog: usize) -> &[f64];

    fn orbital_value(&self, mc_an: usize, nc: usize, i: usize) -> f64 {
        self.orbital_row(mc_an, nc)[i]
    }

    fn orbital_value_remote(&self, mc_an: usize, h_an: usize, nog: usize, j: usize) -> f64 {
        self.orbital_row_remote(mc_an, h_an, nog)[j]
    }
}

#[derive(Debug, Clone, Default)]
struct Table {
    norb: usize,
    values: Vec<f64>,
}

impl Table {
    fn new<B: AtomicBasis>(
        basis: &B,
        species: &crystal::Species,
        points: &[Vector3f64],
    ) -> Table {
        let norb = species.get_norb();
        let mut values = vec![0.0; norb * points.len()];

        for (row, r) in values.chunks_mut(norb).zip(points.iter()) {
            basis.evaluate(species, r, row);
        }

        Table { norb, values }
    }

    fn row(&self, n: usize) -> &[f64] {
        &self.values[n * self.norb..(n + 1) * self.norb]
    }
}

/// Tabulated [`OrbitalGrid`].
///
/// Atom positions are known on every rank, so the values of neighbors owned
/// elsewhere are evaluated here instead of being communicated.
#[derive(Debug, Clone)]
pub struct OrbitalTables {
    local: Vec<Table>,
    remote: Vec<Vec<Table>>,
}

impl OrbitalTables {
    pub fn new<B: AtomicBasis>(
        atomgrid: &AtomGrid,
        crystal: &Crystal,
        basis: &B,
    ) -> Result<OrbitalTables, AtomGridError> {
        for sp in crystal.get_unique_species() {
            if let Some(info) = crystal.get_species(&sp) {
                if info.get_norb() > basis.get_max_norb() {
                    return Err(AtomGridError::UnsupportedOrbitals {
                        species: sp,
                        norb: info.get_norb(),
                        max: basis.get_max_norb(),
                    });
                }
            }
        }

        let dist = atomgrid.get_distribution();

        let local: Vec<Table> = (0..dist.get_matomnum())
            .into_par_iter()
            .map(|mc_an| {
                let gc_an = dist.get_global_index(mc_an);
                Table::new(
                    basis,
                    crystal.get_atom_specie(gc_an),
                    atomgrid.get_support(mc_an).get_rel(),
                )
            })
            .collect();

        let remote: Vec<Vec<Table>> = (0..dist.get_matomnum())
            .into_par_iter()
            .map(|mc_an| {
                atomgrid
                    .get_neighbors()
                    .get_neighbors(mc_an)
                    .iter()
                    .enumerate()
                    .map(|(h_an, nb)| {
                        if dist.is_local(nb.atom) {
                            Table::default()
                        } else {
                            Table::new(
                                basis,
                                crystal.get_atom_specie(nb.atom),
                                &atomgrid.get_overlap(mc_an, h_an).rel_h,
                            )
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(OrbitalTables { local, remote })
    }
}

impl OrbitalGrid for OrbitalTables {
    fn orbital_row(&self, mc_an: usize, nc: usize) -> &[f64] {
        self.local[mc_an].row(nc)
    }

    fn orbital_row_remote(&self, mc_an: usize, h_an: usize, nog: usize) -> &[f64] {
        self.remote[mc_an][h_an].row(nog)
    }
}
