use crystal::Species;
use vector3::Vector3f64;

/// Evaluates atomic orbitals at a point given relative to the atom.
pub trait AtomicBasis: Sync {
    fn get_max_norb(&self) -> usize;

    /// Fills `out` with the first `out.len()` orbitals of `species`.
    fn evaluate(&self, species: &Species, r: &Vector3f64, out: &mut [f64]);
}

/// Cartesian Gaussians sharing one exponent: s, p (x, y, z) and d
/// (xy, yz, zx, x²−y², 3z²−r²), in that order.
#[derive(Debug, Clone)]
pub struct GaussianBasis {
    alpha: f64,
}

impl GaussianBasis {
    pub fn new(alpha: f64) -> GaussianBasis {
        GaussianBasis { alpha }
    }

    pub fn get_alpha(&self) -> f64 {
        self.alpha
    }
}

impl AtomicBasis for GaussianBasis {
    fn get_max_norb(&self) -> usize {
        9
    }

    fn evaluate(&self, _species: &Species, r: &Vector3f64, out: &mut [f64]) {
        let r2 = r.norm_sqr();
        let g = (-self.alpha * r2).exp();
        let (x, y, z) = (r.x, r.y, r.z);

        let angular = [
            1.0,
            x,
            y,
            z,
            x * y,
            y * z,
            z * x,
            x * x - y * y,
            3.0 * z * z - r2,
        ];

        for (o, a) in out.iter_mut().zip(angular.iter()) {
            *o = a * g;
        }
    }
}
