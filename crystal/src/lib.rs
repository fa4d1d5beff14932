mod error;
pub use error::CrystalError;

use dwconsts::*;
use itertools::Itertools;
use lattice::Lattice;
use vector3::*;

use std::fs;

/// Orbital count and cutoff radius of one atomic species.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    symbol: String,
    norb: usize,
    rcut: f64,
}

impl Species {
    pub fn new(symbol: &str, norb: usize, rcut: f64) -> Species {
        Species {
            symbol: symbol.to_string(),
            norb,
            rcut,
        }
    }

    pub fn get_symbol(&self) -> &str {
        &self.symbol
    }

    pub fn get_norb(&self) -> usize {
        self.norb
    }

    /// bohr
    pub fn get_rcut(&self) -> f64 {
        self.rcut
    }
}

// Crystal structure container.
//
// - lattice vectors stored in bohr
// - atomic positions stored in fractional coordinates
#[derive(Debug, Default, Clone)]
pub struct Crystal {
    scale: [f64; 3],
    latt: Lattice,
    atom_positions: Vec<Vector3f64>,
    atom_species: Vec<String>,
    species: Vec<Species>,
    atom_indices_by_specie: Vec<Vec<usize>>,
}

impl Crystal {
    pub fn new() -> Crystal {
        Crystal::default()
    }

    pub fn get_latt(&self) -> &Lattice {
        &self.latt
    }

    pub fn get_n_atoms(&self) -> usize {
        self.atom_positions.len()
    }

    pub fn get_atom_positions(&self) -> &[Vector3f64] {
        &self.atom_positions
    }

    pub fn get_atom_positions_cart(&self) -> Vec<Vector3f64> {
        self.atom_positions
            .iter()
            .map(|p| self.latt.frac_to_cart(p))
            .collect()
    }

    pub fn get_atom_species(&self) -> &[String] {
        &self.atom_species
    }

    pub fn get_unique_species(&self) -> Vec<String> {
        self.atom_species.iter().unique().cloned().collect()
    }

    pub fn get_n_unique_species(&self) -> usize {
        self.atom_species.iter().unique().count()
    }

    pub fn get_atom_indices_of_specie(&self, isp: usize) -> &[usize] {
        &self.atom_indices_by_specie[isp]
    }

    pub fn get_species(&self, symbol: &str) -> Option<&Species> {
        self.species.iter().find(|s| s.symbol == symbol)
    }

    /// Species data of atom `iat`; `read_*` guarantees it exists.
    pub fn get_atom_specie(&self, iat: usize) -> &Species {
        let sym = &self.atom_species[iat];

        &self.species[self
            .species
            .iter()
            .position(|s| &s.symbol == sym)
            .unwrap_or(0)]
    }

    pub fn get_atom_norb(&self, iat: usize) -> usize {
        self.get_atom_specie(iat).norb
    }

    pub fn get_atom_rcut(&self, iat: usize) -> f64 {
        self.get_atom_specie(iat).rcut
    }

    pub fn read_file(&mut self, inpfile: &str) -> Result<(), CrystalError> {
        let text = fs::read_to_string(inpfile).map_err(|e| CrystalError::Io {
            path: inpfile.to_string(),
            message: e.to_string(),
        })?;

        self.read_str(&text)
    }

    // line 1: scale_a scale_b scale_c
    // line 2-4: lattice vectors in angstrom (trailing tokens ignored)
    // then, in any order:
    //   species <symbol> <norb> <rcut in angstrom>
    //   <symbol> x y z (fractional)
    pub fn read_str(&mut self, text: &str) -> Result<(), CrystalError> {
        let mut vecs = [[0.0; 3]; 3];

        self.atom_positions = Vec::new();
        self.atom_species = Vec::new();
        self.species = Vec::new();

        let mut nheader = 0;

        for (iline, line) in text.lines().enumerate() {
            let s: Vec<&str> = line.split_whitespace().collect();

            if s.is_empty() {
                continue;
            }

            let lineno = iline + 1;

            match nheader {
                0 => {
                    let v = parse_floats(&s, 3, lineno)?;
                    self.scale = [v[0], v[1], v[2]];
                    nheader += 1;
                }

                1..=3 => {
                    let v = parse_floats(&s, 3, lineno)?;
                    let i = nheader - 1;
                    for iv in 0..3 {
                        vecs[i][iv] = v[iv] * self.scale[i] * ANG_TO_BOHR;
                    }
                    nheader += 1;
                }

                _ => {
                    if s[0] == "species" {
                        if s.len() < 4 {
                            return Err(parse_error(lineno, "species needs symbol, norb and rcut"));
                        }

                        let norb: usize = s[2]
                            .parse()
                            .map_err(|_| parse_error(lineno, "invalid orbital count"))?;
                        let rcut: f64 = s[3]
                            .parse()
                            .map_err(|_| parse_error(lineno, "invalid cutoff radius"))?;

                        if norb == 0 || rcut <= 0.0 {
                            return Err(parse_error(lineno, "norb and rcut must be positive"));
                        }

                        self.species.push(Species::new(s[1], norb, rcut * ANG_TO_BOHR));
                    } else {
                        let v = parse_floats(&s[1..], 3, lineno)?;
                        self.atom_species.push(s[0].to_string());
                        self.atom_positions.push(Vector3f64::new(
                            wrap_fraction(v[0]),
                            wrap_fraction(v[1]),
                            wrap_fraction(v[2]),
                        ));
                    }
                }
            }
        }

        if nheader < 4 {
            return Err(parse_error(text.lines().count(), "incomplete lattice header"));
        }

        self.latt = Lattice::new(&vecs[0], &vecs[1], &vecs[2]);

        if self.atom_positions.is_empty() {
            return Err(CrystalError::NoAtoms);
        }

        for sp in self.atom_species.iter() {
            if self.get_species(sp).is_none() {
                return Err(CrystalError::UnknownSpecies(sp.clone()));
            }
        }

        // specie -> atom indices

        let unique_species = self.get_unique_species();

        self.atom_indices_by_specie = unique_species
            .iter()
            .map(|sp| {
                self.atom_species
                    .iter()
                    .positions(|a| a == sp)
                    .collect::<Vec<usize>>()
            })
            .collect();

        Ok(())
    }

    pub fn display(&self) {
        println!("   {:-^80}", " crystal structure ");
        println!();

        println!("   lattice_vectors");
        println!();

        for (name, v) in [
            ("a", self.latt.get_vector_a()),
            ("b", self.latt.get_vector_b()),
            ("c", self.latt.get_vector_c()),
        ] {
            println!(
                "   {} = {:20.12}  {:20.12}  {:20.12}",
                name,
                v.x * BOHR_TO_ANG,
                v.y * BOHR_TO_ANG,
                v.z * BOHR_TO_ANG
            );
        }

        println!();
        println!("   natoms = {}", self.get_n_atoms());
        println!("   atom_positions\n");
        println!("                fractional                                                cartesian (A)");
        println!();

        for (i, atom) in self.atom_positions.iter().enumerate() {
            let pos_c = self.latt.frac_to_cart(atom);

            println!(
                "   {:<3} {:>4} : {:16.12}  {:16.12}  {:16.12}  {:20.12}  {:20.12}  {:20.12}",
                i + 1,
                self.atom_species[i],
                atom.x,
                atom.y,
                atom.z,
                pos_c.x * BOHR_TO_ANG,
                pos_c.y * BOHR_TO_ANG,
                pos_c.z * BOHR_TO_ANG
            );
        }

        println!();

        for (isp, sp) in self.get_unique_species().iter().enumerate() {
            if let Some(info) = self.get_species(sp) {
                println!(
                    "   {:>4} : norb = {:3}  rcut = {:8.4} A  atoms = {:?}",
                    sp,
                    info.norb,
                    info.rcut * BOHR_TO_ANG,
                    self.get_atom_indices_of_specie(isp)
                        .iter()
                        .map(|x| x + 1)
                        .collect::<Vec<usize>>()
                );
            }
        }

        println!();
    }
}

fn parse_error(line: usize, message: &str) -> CrystalError {
    CrystalError::Parse {
        line,
        message: message.to_string(),
    }
}

/// Maps a fractional coordinate into the home cell `[0, 1)`.
fn wrap_fraction(x: f64) -> f64 {
    let w = x.rem_euclid(1.0);

    // tiny negative inputs round up to exactly one
    if w >= 1.0 {
        0.0
    } else {
        w
    }
}

fn parse_floats(s: &[&str], n: usize, line: usize) -> Result<Vec<f64>, CrystalError> {
    if s.len() < n {
        return Err(parse_error(line, &format!("expected {} numbers", n)));
    }

    s[..n]
        .iter()
        .map(|x| {
            x.parse::<f64>()
                .map_err(|_| parse_error(line, &format!("'{}' is not a number", x)))
        })
        .collect()
}
