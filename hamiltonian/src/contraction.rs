use crate::HamiltonianError;

use atomgrid::PairIndex;
use crystal::Crystal;
use dwgrid::{Array2, PairBlocks, SpinBlocks};
use itertools::multizip;
use std::collections::HashMap;

/// Matrices expressed in a contracted basis.
#[derive(Debug, Clone, PartialEq)]
pub struct Contracted {
    pub h: SpinBlocks,
    pub olp: PairBlocks,
    pub ihnl: Option<SpinBlocks>,
}

/// Maps matrices from the primitive orbitals to a contracted basis.
pub trait BasisContraction {
    fn contract_hamiltonian(
        &self,
        h: &SpinBlocks,
        olp: &PairBlocks,
    ) -> Result<(SpinBlocks, PairBlocks), HamiltonianError>;

    fn contract_ihnl(&self, ihnl: &SpinBlocks) -> Result<SpinBlocks, HamiltonianError>;
}

/// Contraction by per-atom coefficient matrices: block `(c, h)` becomes
/// `C_c · B · C_hᵀ`, where `C_a` has one row per contracted orbital and one
/// column per primitive orbital of atom `a`.
#[derive(Debug, Clone)]
pub struct CoefficientContraction {
    pairs: PairIndex,
    coeffs: Vec<Array2<f64>>,
}

impl CoefficientContraction {
    /// `coeffs` is indexed by global atom.
    pub fn new(
        pairs: &PairIndex,
        coeffs: Vec<Array2<f64>>,
    ) -> Result<CoefficientContraction, HamiltonianError> {
        for e in pairs.get_entries() {
            for (atom, norb) in [(e.gc_an, e.no0), (e.gh_an, e.no1)] {
                let c = coeffs
                    .get(atom)
                    .ok_or(HamiltonianError::MissingCoefficients { atom })?;

                if c.ncols() != norb {
                    return Err(HamiltonianError::Coefficients {
                        atom,
                        expected: norb,
                        found: c.ncols(),
                    });
                }
            }
        }

        Ok(CoefficientContraction {
            pairs: pairs.clone(),
            coeffs,
        })
    }

    /// Same coefficients for every atom of a species.
    pub fn from_species(
        crystal: &Crystal,
        pairs: &PairIndex,
        by_species: &HashMap<String, Array2<f64>>,
    ) -> Result<CoefficientContraction, HamiltonianError> {
        let mut coeffs = Vec::with_capacity(crystal.get_n_atoms());

        for (atom, sp) in crystal.get_atom_species().iter().enumerate() {
            let c = by_species
                .get(sp)
                .ok_or(HamiltonianError::MissingCoefficients { atom })?;
            coeffs.push(c.clone());
        }

        CoefficientContraction::new(pairs, coeffs)
    }

    pub fn contract_blocks(&self, blocks: &PairBlocks) -> Result<PairBlocks, HamiltonianError> {
        self.pairs.check_blocks(blocks)?;

        let mut shapes: Vec<Vec<(usize, usize)>> = vec![Vec::new(); self.pairs.get_natoms()];

        for e in self.pairs.get_entries() {
            shapes[e.mc_an].push((self.coeffs[e.gc_an].nrows(), self.coeffs[e.gh_an].nrows()));
        }

        let mut out = PairBlocks::new(&shapes);

        for (o, e, b) in multizip((
            out.as_mut_slice().iter_mut(),
            self.pairs.get_entries().iter(),
            blocks.as_slice().iter(),
        )) {
            let cc = &self.coeffs[e.gc_an];
            let ch = &self.coeffs[e.gh_an];

            *o = cc.dot(b).dot(&ch.t());
        }

        Ok(out)
    }

    fn contract_spins(&self, spins: &SpinBlocks) -> Result<SpinBlocks, HamiltonianError> {
        let contracted = spins
            .iter()
            .map(|s| self.contract_blocks(s))
            .collect::<Result<Vec<PairBlocks>, HamiltonianError>>()?;

        Ok(SpinBlocks::from_vec(contracted)?)
    }
}

impl BasisContraction for CoefficientContraction {
    fn contract_hamiltonian(
        &self,
        h: &SpinBlocks,
        olp: &PairBlocks,
    ) -> Result<(SpinBlocks, PairBlocks), HamiltonianError> {
        Ok((self.contract_spins(h)?, self.contract_blocks(olp)?))
    }

    fn contract_ihnl(&self, ihnl: &SpinBlocks) -> Result<SpinBlocks, HamiltonianError> {
        self.contract_spins(ihnl)
    }
}
