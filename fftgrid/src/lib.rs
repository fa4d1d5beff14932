//! Real-space grid, its two rank decompositions and the B → C transfer
//! schedule.

mod context;
pub use context::GridContext;

mod error;
pub use error::GridError;

mod partition;
pub use partition::{PartitionB, PartitionC};

mod schedule;
pub use schedule::{B2CSchedule, PeerTransfer};

use lattice::Lattice;
use std::{f64::consts, fmt};
use vector3::Vector3f64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FFTGrid {
    n1: usize,
    n2: usize,
    n3: usize,
}

impl FFTGrid {
    pub fn from_size(n1: usize, n2: usize, n3: usize) -> FFTGrid {
        FFTGrid { n1, n2, n3 }
    }

    /// Smallest FFT-friendly grid resolving `|G|²/2 ≤ ecutrho` (hartree).
    pub fn new(latt: &Lattice, ecutrho: f64) -> FFTGrid {
        let gmax = (2.0 * ecutrho).sqrt();

        let twopi = 2.0 * consts::PI;

        let n1 = (2.0 * gmax * latt.get_vector_a().norm2() / twopi).ceil() as usize;
        let n2 = (2.0 * gmax * latt.get_vector_b().norm2() / twopi).ceil() as usize;
        let n3 = (2.0 * gmax * latt.get_vector_c().norm2() / twopi).ceil() as usize;

        FFTGrid {
            n1: get_fft_size(n1),
            n2: get_fft_size(n2),
            n3: get_fft_size(n3),
        }
    }

    pub fn get_ntotf64(&self) -> f64 {
        (self.n1 * self.n2 * self.n3) as f64
    }

    pub fn get_ntot(&self) -> usize {
        self.n1 * self.n2 * self.n3
    }

    pub fn get_n1(&self) -> usize {
        self.n1
    }

    pub fn get_n2(&self) -> usize {
        self.n2
    }

    pub fn get_n3(&self) -> usize {
        self.n3
    }

    pub fn get_size(&self) -> [usize; 3] {
        [self.n1, self.n2, self.n3]
    }

    /// Number of `N1`-long rows, `N2·N3`.
    pub fn get_n2d(&self) -> usize {
        self.n2 * self.n3
    }

    // GN = k3·N2·N1 + k2·N1 + k1
    pub fn get_index(&self, k1: usize, k2: usize, k3: usize) -> u64 {
        ((k3 * self.n2 + k2) * self.n1 + k1) as u64
    }

    pub fn get_miller(&self, gn: u64) -> [usize; 3] {
        let gn = gn as usize;
        let k1 = gn % self.n1;
        let k2 = (gn / self.n1) % self.n2;
        let k3 = gn / (self.n1 * self.n2);

        [k1, k2, k3]
    }

    /// Fractional coordinates of the grid point of cell `gn`.
    pub fn get_frac(&self, gn: u64) -> Vector3f64 {
        let [k1, k2, k3] = self.get_miller(gn);

        Vector3f64::new(
            k1 as f64 / self.n1 as f64,
            k2 as f64 / self.n2 as f64,
            k3 as f64 / self.n3 as f64,
        )
    }
}

impl fmt::Display for FFTGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} x {} x {}", self.n1, self.n2, self.n3)
    }
}

fn get_fft_size(n: usize) -> usize {
    let mut tn = n.max(1);

    while !is_fft_friendly(tn) {
        tn += 1;
    }

    tn
}

fn is_fft_friendly(n_to_check: usize) -> bool {
    const FACTORS: [usize; 6] = [2, 3, 5, 7, 11, 13];

    let mut tn = n_to_check;

    for fi in FACTORS.iter() {
        while tn % fi == 0 && tn != 1 {
            tn /= fi;
        }
    }

    tn == 1
}
