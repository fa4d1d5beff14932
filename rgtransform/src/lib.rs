use dwfft3d::DWFFT3D;
use dwgrid::Array3;
use dwmpi::Communicator;
use fftgrid::{FFTGrid, GridError, PartitionB};
use types::c64;

use std::cell::RefCell;
use tracing::trace;

/// Reciprocal ↔ real transforms of fields distributed over partition B.
///
/// The distributed field is gathered on every rank and transformed as a
/// whole; each rank keeps its own slab of the result.
pub struct RGTransform {
    fftmesh: [usize; 3],
    pfft: DWFFT3D,
    fft_work: RefCell<Array3<c64>>,
}

impl RGTransform {
    pub fn new(grid: &FFTGrid) -> RGTransform {
        let fftmesh = grid.get_size();

        RGTransform {
            fftmesh,
            pfft: DWFFT3D::new(fftmesh[0], fftmesh[1], fftmesh[2]),
            fft_work: RefCell::new(Array3::new(fftmesh)),
        }
    }

    /// `out(r) = Re Σ_G V(G) e^{iG·r}` on this rank's slab, where the
    /// reciprocal coefficients are given on the same slab as real and
    /// imaginary parts. Collective over `comm`.
    pub fn get_value_in_real<C: Communicator>(
        &self,
        comm: &C,
        part_b: &PartitionB,
        re: &[f64],
        im: &[f64],
        out: &mut [f64],
    ) -> Result<(), GridError> {
        let nlocal = part_b.get_num_local();

        check_len("real part", nlocal, re.len())?;
        check_len("imaginary part", nlocal, im.len())?;
        check_len("real-space field", nlocal, out.len())?;

        let slab: Vec<c64> = re
            .iter()
            .zip(im.iter())
            .map(|(&x, &y)| c64::new(x, y))
            .collect();

        let slabs = comm.all_gather_v(&slab)?;

        // B slabs are contiguous and ordered by rank
        let full: Vec<c64> = slabs.into_iter().flatten().collect();

        let mut work = self.fft_work.borrow_mut();

        check_len("gathered field", work.len(), full.len())?;

        trace!(fftmesh = ?self.fftmesh, "inverse transform");

        self.pfft.ifft3d(&full, work.as_mut_slice());

        let start = part_b.get_global_index(0) as usize;

        for (o, v) in out.iter_mut().zip(work.as_slice()[start..start + nlocal].iter()) {
            *o = v.re;
        }

        Ok(())
    }

    /// Forward transform of a real slab, the inverse of
    /// [`RGTransform::get_value_in_real`] up to the factor `1/Ntot`.
    pub fn get_value_in_reciprocal<C: Communicator>(
        &self,
        comm: &C,
        part_b: &PartitionB,
        field: &[f64],
        re: &mut [f64],
        im: &mut [f64],
    ) -> Result<(), GridError> {
        let nlocal = part_b.get_num_local();

        check_len("real-space field", nlocal, field.len())?;
        check_len("real part", nlocal, re.len())?;
        check_len("imaginary part", nlocal, im.len())?;

        let slab: Vec<c64> = field.iter().map(|&x| c64::new(x, 0.0)).collect();

        let full: Vec<c64> = comm.all_gather_v(&slab)?.into_iter().flatten().collect();

        let mut work = self.fft_work.borrow_mut();

        check_len("gathered field", work.len(), full.len())?;

        self.pfft.fft3d(&full, work.as_mut_slice());

        let start = part_b.get_global_index(0) as usize;

        for (i, v) in work.as_slice()[start..start + nlocal].iter().enumerate() {
            re[i] = v.re;
            im[i] = v.im;
        }

        Ok(())
    }
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
