use vector3::*;

use std::{f64::consts, fmt};

/// Three cell vectors in bohr, stored as columns a, b, c.
#[derive(Debug, Default, Clone)]
pub struct Lattice {
    a: Vector3f64,
    b: Vector3f64,
    c: Vector3f64,
}

impl Lattice {
    pub fn new(a: &[f64], b: &[f64], c: &[f64]) -> Lattice {
        Lattice {
            a: Vector3f64::new(a[0], a[1], a[2]),
            b: Vector3f64::new(b[0], b[1], b[2]),
            c: Vector3f64::new(c[0], c[1], c[2]),
        }
    }

    pub fn cubic(alat: f64) -> Lattice {
        Lattice::new(&[alat, 0.0, 0.0], &[0.0, alat, 0.0], &[0.0, 0.0, alat])
    }

    // ( a x b ) . c
    pub fn volume(&self) -> f64 {
        self.a.cross_product(&self.b).dot_product(&self.c)
    }

    // ra = 2 x PI x (b x c) / volume
    // rb = 2 x PI x (c x a) / volume
    // rc = 2 x PI x (a x b) / volume
    pub fn reciprocal(&self) -> Lattice {
        let factor = 2.0 * consts::PI / self.volume();

        Lattice {
            a: self.b.cross_product(&self.c) * factor,
            b: self.c.cross_product(&self.a) * factor,
            c: self.a.cross_product(&self.b) * factor,
        }
    }

    pub fn get_vector_a(&self) -> Vector3f64 {
        self.a
    }

    pub fn get_vector_b(&self) -> Vector3f64 {
        self.b
    }

    pub fn get_vector_c(&self) -> Vector3f64 {
        self.c
    }

    pub fn scaled_by(&mut self, f: f64) {
        self.a = self.a * f;
        self.b = self.b * f;
        self.c = self.c * f;
    }

    pub fn frac_to_cart(&self, pos_f: &Vector3f64) -> Vector3f64 {
        self.a * pos_f.x + self.b * pos_f.y + self.c * pos_f.z
    }

    // rows of the inverse are the reciprocal vectors over 2 PI
    pub fn cart_to_frac(&self, pos_c: &Vector3f64) -> Vector3f64 {
        let blatt = self.reciprocal();
        let f = 1.0 / (2.0 * consts::PI);

        Vector3f64::new(
            blatt.a.dot_product(pos_c) * f,
            blatt.b.dot_product(pos_c) * f,
            blatt.c.dot_product(pos_c) * f,
        )
    }

    /// Distance between two parallel lattice planes spanned by the other
    /// two vectors, for each of a, b, c.
    pub fn plane_spacings(&self) -> [f64; 3] {
        let blatt = self.reciprocal();

        [
            2.0 * consts::PI / blatt.a.norm2(),
            2.0 * consts::PI / blatt.b.norm2(),
            2.0 * consts::PI / blatt.c.norm2(),
        ]
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (a, b, c) = (self.a, self.b, self.c);

        write!(
            f,
            "{}\n{:25.16}\t{:25.16}\t{:25.16}\n{:25.16}\t{:25.16}\t{:25.16}\n{:25.16}\t{:25.16}\t{:25.16}",
            "Lattice", a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z
        )
    }
}
