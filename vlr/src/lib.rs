//! Long-range screened potential of every projection center on the grid.

use dwconsts::*;
use dwmpi::Communicator;
use fftgrid::{GridContext, GridError};
use gvector::GVector;
use itertools::multizip;
use rayon::prelude::*;
use rgtransform::RGTransform;
use vector3::Vector3f64;

use std::time::Instant;
use tracing::{debug, info};

/// `(4π/Ω)·exp(−σ²G²/2)/G²`, zero at `G² = 0`.
pub fn screened_kernel(g2: f64, volume: f64) -> f64 {
    if g2 == 0.0 {
        return 0.0;
    }

    FOURPI / volume * (-0.5 * VLR_SIGMA * VLR_SIGMA * g2).exp() / g2
}

/// Evaluates the long-range potential of every center on this rank's B
/// slab and copies it to the rank's C cells.
///
/// `vlr_b[idx_P]` and `vlr_c[idx_P]` are overwritten for every center.
/// Collective over `comm`. Ranks may hold different numbers of centers;
/// a rank that runs out of centers keeps taking part in the transforms of
/// the others with a zero field. Returns the elapsed wall time in seconds.
pub fn calc_vlr<C: Communicator>(
    comm: &C,
    ctx: &GridContext,
    rgtrans: &RGTransform,
    centers: &[Vector3f64],
    vlr_b: &mut [Vec<f64>],
    vlr_c: &mut [Vec<f64>],
) -> Result<f64, GridError> {
    let stime = Instant::now();

    check_len("B center fields", centers.len(), vlr_b.len())?;
    check_len("C center fields", centers.len(), vlr_c.len())?;

    let part_b = ctx.get_partition_b();

    let gvec = GVector::new(ctx.get_lattice(), ctx.get_grid(), part_b);

    let volume = ctx.get_volume();

    // the kernel does not depend on the center

    let kernel: Vec<f64> = gvec
        .get_norm()
        .par_iter()
        .map(|g| screened_kernel(g * g, volume))
        .collect();

    let nlocal = part_b.get_num_local();

    let mut re = vec![0.0; nlocal];
    let mut im = vec![0.0; nlocal];

    let nrounds = comm
        .all_gather_v(&[centers.len() as u64])?
        .iter()
        .flatten()
        .copied()
        .max()
        .unwrap_or(0) as usize;

    debug!(ncenters = centers.len(), nrounds, nlocal, "computing long-range potential");

    for (center, field_b, field_c) in
        multizip((centers.iter(), vlr_b.iter_mut(), vlr_c.iter_mut()))
    {
        set_center_coefficients(&kernel, gvec.get_cart(), center, &mut re, &mut im);

        rgtrans.get_value_in_real(comm, part_b, &re, &im, field_b)?;

        gridcopy::data_grid_copy_b2c(comm, ctx, field_b.as_slice(), field_c)?;
    }

    if nrounds > centers.len() {
        re.fill(0.0);
        im.fill(0.0);

        let mut idle_b = vec![0.0; nlocal];
        let mut idle_c = vec![0.0; ctx.get_partition_c().get_num_local()];

        for _ in centers.len()..nrounds {
            rgtrans.get_value_in_real(comm, part_b, &re, &im, &mut idle_b)?;
            gridcopy::data_grid_copy_b2c(comm, ctx, &idle_b, &mut idle_c)?;
        }
    }

    let elapsed = stime.elapsed().as_secs_f64();

    info!(ncenters = centers.len(), elapsed, "long-range potential done");

    Ok(elapsed)
}

// V(G) = K(G)·e^{−iG·r_P}
fn set_center_coefficients(
    kernel: &[f64],
    gcart: &[Vector3f64],
    center: &Vector3f64,
    re: &mut [f64],
    im: &mut [f64],
) {
    re.par_iter_mut()
        .zip(im.par_iter_mut())
        .zip(kernel.par_iter().zip(gcart.par_iter()))
        .for_each(|((vr, vi), (k, g))| {
            let phase = g.dot_product(center);
            *vr = k * phase.cos();
            *vi = -k * phase.sin();
        });
}

fn check_len(field: &'static str, expected: usize, found: usize) -> Result<(), GridError> {
    if expected == found {
        Ok(())
    } else {
        Err(GridError::FieldLength {
            field,
            expected,
            found,
        })
    }
}
