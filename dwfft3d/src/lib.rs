use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;
use types::c64;

/// Complex 3-D transform on an `n1 × n2 × n3` grid stored first-index-fastest.
///
/// `fft3d` uses `e^{-iGr}` and `ifft3d` uses `e^{+iGr}`; neither is
/// normalized.
pub struct DWFFT3D {
    n: [usize; 3],
    plan_fwd: [Arc<dyn Fft<f64>>; 3],
    plan_bwd: [Arc<dyn Fft<f64>>; 3],
}

impl DWFFT3D {
    pub fn new(n1: usize, n2: usize, n3: usize) -> DWFFT3D {
        let mut planner = FftPlanner::<f64>::new();

        let plan_fwd = [
            planner.plan_fft_forward(n1),
            planner.plan_fft_forward(n2),
            planner.plan_fft_forward(n3),
        ];

        let plan_bwd = [
            planner.plan_fft_inverse(n1),
            planner.plan_fft_inverse(n2),
            planner.plan_fft_inverse(n3),
        ];

        DWFFT3D {
            n: [n1, n2, n3],
            plan_fwd,
            plan_bwd,
        }
    }

    pub fn get_size(&self) -> [usize; 3] {
        self.n
    }

    pub fn fft3d(&self, slice_in: &[c64], slice_out: &mut [c64]) {
        slice_out.copy_from_slice(slice_in);
        self.execute(&self.plan_fwd, slice_out);
    }

    pub fn ifft3d(&self, slice_in: &[c64], slice_out: &mut [c64]) {
        slice_out.copy_from_slice(slice_in);
        self.execute(&self.plan_bwd, slice_out);
    }

    fn execute(&self, plans: &[Arc<dyn Fft<f64>>; 3], data: &mut [c64]) {
        let [n1, n2, n3] = self.n;
        let nplane = n1 * n2;

        assert_eq!(data.len(), nplane * n3);

        // axes 1 and 2 stay inside one k3 plane
        data.par_chunks_mut(nplane).for_each(|plane| {
            plans[0].process(plane);

            let mut line = vec![c64::new(0.0, 0.0); n2];
            for k1 in 0..n1 {
                for (k2, v) in line.iter_mut().enumerate() {
                    *v = plane[k2 * n1 + k1];
                }
                plans[1].process(&mut line);
                for (k2, v) in line.iter().enumerate() {
                    plane[k2 * n1 + k1] = *v;
                }
            }
        });

        let mut line = vec![c64::new(0.0, 0.0); n3];
        for k in 0..nplane {
            for (k3, v) in line.iter_mut().enumerate() {
                *v = data[k3 * nplane + k];
            }
            plans[2].process(&mut line);
            for (k3, v) in line.iter().enumerate() {
                data[k3 * nplane + k] = *v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_single_mode_backward() {
        let (n1, n2, n3) = (4, 3, 5);
        let fft = DWFFT3D::new(n1, n2, n3);

        let mut coef = vec![c64::new(0.0, 0.0); n1 * n2 * n3];
        // mode (1, 2, 3)
        coef[(3 * n2 + 2) * n1 + 1] = c64::new(1.0, 0.0);

        let mut field = vec![c64::new(0.0, 0.0); coef.len()];
        fft.ifft3d(&coef, &mut field);

        for k3 in 0..n3 {
            for k2 in 0..n2 {
                for k1 in 0..n1 {
                    let phase = 2.0
                        * PI
                        * (k1 as f64 / n1 as f64 + 2.0 * k2 as f64 / n2 as f64
                            + 3.0 * k3 as f64 / n3 as f64);
                    let v = field[(k3 * n2 + k2) * n1 + k1];
                    assert!((v.re - phase.cos()).abs() < 1e-12);
                    assert!((v.im - phase.sin()).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_forward_backward_scales_by_ntot() {
        let fft = DWFFT3D::new(6, 4, 2);
        let ntot = 48;

        let data: Vec<c64> = (0..ntot)
            .map(|i| c64::new(i as f64 * 0.5, 1.0 - i as f64))
            .collect();

        let mut g = vec![c64::new(0.0, 0.0); ntot];
        let mut r = vec![c64::new(0.0, 0.0); ntot];

        fft.fft3d(&data, &mut g);
        fft.ifft3d(&g, &mut r);

        for (a, b) in data.iter().zip(r.iter()) {
            assert!((a * ntot as f64 - b).norm() < 1e-9);
        }
    }
}
