use fftgrid::FFTGrid;
use itertools::iproduct;
use lattice::Lattice;
use vector3::Vector3f64;

use std::collections::HashMap;

/// Grid points within the cutoff sphere of one atom.
///
/// A point is kept by its unwrapped grid coordinates, so the periodic image
/// it belongs to is known; `cells` holds the wrapped global index.
#[derive(Debug, Clone)]
pub struct AtomSupport {
    miller: Vec<[i64; 3]>,
    cells: Vec<u64>,
    rel: Vec<Vector3f64>,
    lookup: HashMap<[i64; 3], usize>,
}

impl AtomSupport {
    pub fn new(latt: &Lattice, grid: &FFTGrid, center: &Vector3f64, rcut: f64) -> AtomSupport {
        let n = grid.get_size();
        let f = latt.cart_to_frac(center);
        let spacing = latt.plane_spacings();

        let fc = [f.x, f.y, f.z];

        let range = |a: usize| {
            let e = rcut / spacing[a];
            let lo = ((fc[a] - e) * n[a] as f64).ceil() as i64;
            let hi = ((fc[a] + e) * n[a] as f64).floor() as i64;
            lo..=hi
        };

        let mut miller = Vec::new();
        let mut cells = Vec::new();
        let mut rel = Vec::new();
        let mut lookup = HashMap::new();

        for (k3, k2, k1) in iproduct!(range(2), range(1), range(0)) {
            let k = [k1, k2, k3];
            let r = point_cart(latt, n, &k) - *center;

            if r.norm2() <= rcut {
                lookup.insert(k, miller.len());
                miller.push(k);
                cells.push(wrap_index(n, &k));
                rel.push(r);
            }
        }

        AtomSupport {
            miller,
            cells,
            rel,
            lookup,
        }
    }

    /// `GridN_Atom`
    pub fn get_npoints(&self) -> usize {
        self.miller.len()
    }

    pub fn get_miller(&self) -> &[[i64; 3]] {
        &self.miller
    }

    pub fn get_cells(&self) -> &[u64] {
        &self.cells
    }

    /// Point positions relative to the atom.
    pub fn get_rel(&self) -> &[Vector3f64] {
        &self.rel
    }

    pub fn find(&self, k: &[i64; 3]) -> Option<usize> {
        self.lookup.get(k).copied()
    }
}

/// Support points of atom `c` that also lie in the support of a neighbor
/// image (`GListTAtoms1` / `GListTAtoms2` with `NumOLG` entries).
#[derive(Debug, Clone, Default)]
pub struct Overlap {
    /// Index into the support of `c`.
    pub nc: Vec<usize>,
    /// Index into the support of the neighbor; empty for neighbors owned by
    /// another rank.
    pub nh: Vec<usize>,
    /// Point positions relative to the neighbor image.
    pub rel_h: Vec<Vector3f64>,
}

impl Overlap {
    pub fn new(
        latt: &Lattice,
        grid: &FFTGrid,
        sup_c: &AtomSupport,
        center_h: &Vector3f64,
        rcut_h: f64,
        cell: [i32; 3],
        sup_h: Option<&AtomSupport>,
    ) -> Overlap {
        let n = grid.get_size();

        let mut ov = Overlap::default();

        for (nc, k) in sup_c.get_miller().iter().enumerate() {
            // same point seen from the home cell of the neighbor
            let kh = [
                k[0] - cell[0] as i64 * n[0] as i64,
                k[1] - cell[1] as i64 * n[1] as i64,
                k[2] - cell[2] as i64 * n[2] as i64,
            ];

            let r = point_cart(latt, n, &kh) - *center_h;

            if r.norm2() > rcut_h {
                continue;
            }

            match sup_h {
                Some(sh) => {
                    if let Some(nh) = sh.find(&kh) {
                        ov.nc.push(nc);
                        ov.nh.push(nh);
                        ov.rel_h.push(r);
                    }
                }
                None => {
                    ov.nc.push(nc);
                    ov.rel_h.push(r);
                }
            }
        }

        ov
    }

    /// `NumOLG`
    pub fn get_nolg(&self) -> usize {
        self.nc.len()
    }
}

fn point_cart(latt: &Lattice, n: [usize; 3], k: &[i64; 3]) -> Vector3f64 {
    latt.frac_to_cart(&Vector3f64::new(
        k[0] as f64 / n[0] as f64,
        k[1] as f64 / n[1] as f64,
        k[2] as f64 / n[2] as f64,
    ))
}

fn wrap_index(n: [usize; 3], k: &[i64; 3]) -> u64 {
    let k1 = utility::fft_i2n(k[0], n[0]) as u64;
    let k2 = utility::fft_i2n(k[1], n[1]) as u64;
    let k3 = utility::fft_i2n(k[2], n[2]) as u64;

    (k3 * n[1] as u64 + k2) * n[0] as u64 + k1
}
