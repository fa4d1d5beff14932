//! Matrix elements of a grid potential between atomic orbitals.

mod error;
pub use error::QuadratureError;

use atomgrid::{AtomGrid, OrbitalGrid, Overlap, PairEntry};
use dwgrid::{Array2, PairBlocks};
use itertools::multizip;
use rayon::prelude::*;
use tracing::debug;

/// Adds `<φ_i| V |φ_j>` for every (atom, neighbor) pair of this rank to
/// `hlr`, with `V` given on partition C as `field_c`.
///
/// Each overlap point contributes `ΔV·φ_i(Nc)·φ_j(Nh)` with
/// `ΔV = grid_volume·V(MN)`. Orbital values of neighbors owned by another
/// rank come from the remote cache of `orbs`. The existing block contents
/// are kept.
pub fn calc_matrix_elements_vlr<O: OrbitalGrid>(
    grid_volume: f64,
    atomgrid: &AtomGrid,
    orbs: &O,
    field_c: &[f64],
    hlr: &mut PairBlocks,
) -> Result<(), QuadratureError> {
    let pairs = atomgrid.get_pair_index();

    pairs.check_blocks(hlr)?;

    if field_c.len() != atomgrid.get_c_cells().len() {
        return Err(QuadratureError::FieldLength {
            expected: atomgrid.get_c_cells().len(),
            found: field_c.len(),
        });
    }

    let dist = atomgrid.get_distribution();

    hlr.as_mut_slice()
        .par_iter_mut()
        .zip(pairs.get_entries().par_iter())
        .zip(atomgrid.get_overlaps().par_iter())
        .for_each(|((block, e), ov)| {
            let mgrid = atomgrid.get_mgrid(e.mc_an);
            let mh_an = dist.get_local_index(e.gh_an);

            accumulate_pair(grid_volume, e, ov, mgrid, mh_an, orbs, field_c, block);
        });

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn accumulate_pair<O: OrbitalGrid>(
    grid_volume: f64,
    e: &PairEntry,
    ov: &Overlap,
    mgrid: &[usize],
    mh_an: Option<usize>,
    orbs: &O,
    field_c: &[f64],
    block: &mut Array2<f64>,
) {
    for nog in 0..ov.get_nolg() {
        let nc = ov.nc[nog];

        let dv = grid_volume * field_c[mgrid[nc]];

        let phi_c = orbs.orbital_row(e.mc_an, nc);

        let phi_h = match mh_an {
            Some(mh) => orbs.orbital_row(mh, ov.nh[nog]),
            None => orbs.orbital_row_remote(e.mc_an, e.h_an, nog),
        };

        for (i, &ci) in phi_c.iter().enumerate().take(e.no0) {
            let a = dv * ci;

            for (j, &hj) in phi_h.iter().enumerate().take(e.no1) {
                block[[i, j]] += a * hj;
            }
        }
    }
}

/// `Hlr[idx_P] += <φ| V_P |φ>` for every center that is a local atom.
///
/// `vlr_c` holds the C fields of all centers, local atoms first; `hlr`
/// holds one matrix per local atom.
pub fn set_hlr<O: OrbitalGrid>(
    grid_volume: f64,
    atomgrid: &AtomGrid,
    orbs: &O,
    vlr_c: &[Vec<f64>],
    hlr: &mut [PairBlocks],
) -> Result<(), QuadratureError> {
    let matomnum = atomgrid.get_distribution().get_matomnum();

    if hlr.len() != matomnum {
        return Err(QuadratureError::CenterCount {
            expected: matomnum,
            found: hlr.len(),
        });
    }

    if vlr_c.len() < matomnum {
        return Err(QuadratureError::CenterCount {
            expected: matomnum,
            found: vlr_c.len(),
        });
    }

    debug!(
        matomnum,
        npairs = atomgrid.get_pair_index().get_npairs(),
        "long-range matrix elements"
    );

    for (field_c, h) in multizip((vlr_c.iter(), hlr.iter_mut())) {
        calc_matrix_elements_vlr(grid_volume, atomgrid, orbs, field_c, h)?;
    }

    Ok(())
}

/// Overlap matrix `S = <φ_i|φ_j>` on the same grid quadrature.
pub fn calc_overlap<O: OrbitalGrid>(
    grid_volume: f64,
    atomgrid: &AtomGrid,
    orbs: &O,
    olp: &mut PairBlocks,
) -> Result<(), QuadratureError> {
    let unit = vec![1.0; atomgrid.get_c_cells().len()];

    olp.set_zero();

    calc_matrix_elements_vlr(grid_volume, atomgrid, orbs, &unit, olp)
}

#[cfg(test)]
mod tests;
