use fftgrid::{FFTGrid, PartitionB};
use itertools::multizip;
use lattice::Lattice;
use vector3::Vector3f64;

/// Reciprocal vectors of the cells of one B slab, in B-local order.
///
/// Cell `(k1, k2, k3)` maps to `G = k̃1·b1 + k̃2·b2 + k̃3·b3` where `k̃` is the
/// wrapped frequency (`k` below `N/2`, `k − N` from `N/2` on).
#[derive(Debug, Clone)]
pub struct GVector {
    miller: Vec<[i64; 3]>,
    cart: Vec<Vector3f64>,
    norm: Vec<f64>,
}

impl GVector {
    pub fn new(latt: &Lattice, grid: &FFTGrid, part_b: &PartitionB) -> GVector {
        let blatt = latt.reciprocal();

        let [n1, n2, n3] = grid.get_size();

        let miller: Vec<[i64; 3]> = part_b
            .get_my_cells()
            .map(|gn| {
                let [k1, k2, k3] = grid.get_miller(gn);
                [
                    utility::fft_n2i(k1, n1),
                    utility::fft_n2i(k2, n2),
                    utility::fft_n2i(k3, n3),
                ]
            })
            .collect();

        let mut cart = vec![Vector3f64::zeros(); miller.len()];

        miller_to_cart(&mut cart, &miller, &blatt);

        let mut norm = vec![0.0; miller.len()];

        set_g_norm(&mut norm, &cart);

        GVector { miller, cart, norm }
    }

    pub fn get_miller(&self) -> &[[i64; 3]] {
        &self.miller
    }

    pub fn get_cart(&self) -> &[Vector3f64] {
        &self.cart
    }

    pub fn get_norm(&self) -> &[f64] {
        &self.norm
    }

    pub fn len(&self) -> usize {
        self.cart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }
}

fn set_g_norm(g: &mut [f64], cart: &[Vector3f64]) {
    for (x, y) in multizip((g.iter_mut(), cart.iter())) {
        *x = y.norm2();
    }
}

// G = i * b1 + j * b2 + k * b3
fn miller_to_cart(cart: &mut [Vector3f64], miller: &[[i64; 3]], blatt: &Lattice) {
    let a = blatt.get_vector_a();
    let b = blatt.get_vector_b();
    let c = blatt.get_vector_c();

    for (ct, mi) in multizip((cart.iter_mut(), miller.iter())) {
        *ct = a * mi[0] as f64 + b * mi[1] as f64 + c * mi[2] as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triclinic() -> Lattice {
        Lattice::new(&[6.0, 0.0, 0.0], &[1.5, 5.0, 0.0], &[0.5, 1.0, 7.0])
    }

    #[test]
    fn test_wrapped_frequencies() {
        let grid = FFTGrid::from_size(4, 5, 2);
        let part_b = PartitionB::new(&grid, 1, 0);
        let gvec = GVector::new(&Lattice::cubic(1.0), &grid, &part_b);

        let m = gvec.get_miller();
        assert_eq!(m[grid.get_index(2, 0, 0) as usize], [-2, 0, 0]);
        assert_eq!(m[grid.get_index(3, 2, 1) as usize], [-1, 2, -1]);
        assert_eq!(m[grid.get_index(1, 3, 0) as usize], [1, -2, 0]);
        assert_eq!(gvec.get_norm()[0], 0.0);
    }

    #[test]
    fn test_norm_symmetric_under_k_to_n_minus_k() {
        let grid = FFTGrid::from_size(6, 5, 4);
        let part_b = PartitionB::new(&grid, 1, 0);
        let gvec = GVector::new(&triclinic(), &grid, &part_b);

        let [n1, n2, n3] = grid.get_size();

        for k3 in 0..n3 {
            for k2 in 0..n2 {
                for k1 in 0..n1 {
                    let g = grid.get_index(k1, k2, k3) as usize;
                    let gm = grid.get_index((n1 - k1) % n1, (n2 - k2) % n2, (n3 - k3) % n3)
                        as usize;

                    // the Nyquist plane of an even axis maps onto itself
                    let even_edge = (2 * k1 == n1) || (2 * k2 == n2) || (2 * k3 == n3);
                    if !even_edge {
                        let d = gvec.get_norm()[g] - gvec.get_norm()[gm];
                        assert!(d.abs() < 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn test_slab_matches_full_grid() {
        let grid = FFTGrid::from_size(4, 3, 3);
        let latt = triclinic();
        let full = GVector::new(&latt, &grid, &PartitionB::new(&grid, 1, 0));

        for rank in 0..4 {
            let part_b = PartitionB::new(&grid, 4, rank);
            let slab = GVector::new(&latt, &grid, &part_b);
            let start = part_b.get_global_index(0) as usize;

            for (i, g) in slab.get_cart().iter().enumerate() {
                assert_eq!(*g, full.get_cart()[start + i]);
            }
        }
    }
}
