mod error;
pub use error::ControlError;

use dwconsts::*;

use std::fs;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Control {
    verbosity: String,

    nranks: usize,
    nthreads: usize,

    ngrid: Option<[usize; 3]>,
    ecut_rho: f64,

    spin_scheme: String, // nonspin, spin, ncl

    kinetic_flag: bool,
    nonlocal_flag: bool,
    vna_flag: bool,
    vna_expansion: bool,

    hubbard: bool,
    hubbard_flag: bool,
    constraint_ncs: i32,
    core_hole: bool,

    contraction: bool,
    spin_orbit: bool,

    basis_exponent: f64,
}

impl Default for Control {
    fn default() -> Self {
        Control {
            verbosity: "high".to_string(),
            nranks: 1,
            nthreads: 0,
            ngrid: None,
            ecut_rho: 1600.0 * EV_TO_HA,
            spin_scheme: "nonspin".to_string(),
            kinetic_flag: true,
            nonlocal_flag: true,
            vna_flag: true,
            vna_expansion: false,
            hubbard: false,
            hubbard_flag: true,
            constraint_ncs: 0,
            core_hole: false,
            contraction: false,
            spin_orbit: false,
            basis_exponent: 0.8,
        }
    }
}

impl Control {
    pub fn new() -> Control {
        Control::default()
    }

    pub fn get_verbosity(&self) -> &str {
        &self.verbosity
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == "high"
    }

    pub fn get_nranks(&self) -> usize {
        self.nranks
    }

    pub fn get_nthreads(&self) -> usize {
        self.nthreads
    }

    pub fn get_ngrid(&self) -> Option<[usize; 3]> {
        self.ngrid
    }

    /// Hartree.
    pub fn get_ecutrho(&self) -> f64 {
        self.ecut_rho
    }

    pub fn get_spin_scheme(&self) -> &str {
        &self.spin_scheme
    }

    /// 0 for nonspin, 1 for collinear spin, 3 for non-collinear.
    pub fn get_spinp_switch(&self) -> usize {
        match self.spin_scheme.as_str() {
            "spin" => 1,
            "ncl" => 3,
            _ => 0,
        }
    }

    pub fn is_spin(&self) -> bool {
        self.spin_scheme == "spin"
    }

    pub fn is_noncollinear(&self) -> bool {
        self.spin_scheme == "ncl"
    }

    pub fn get_kinetic_flag(&self) -> bool {
        self.kinetic_flag
    }

    pub fn get_nonlocal_flag(&self) -> bool {
        self.nonlocal_flag
    }

    pub fn get_vna_flag(&self) -> bool {
        self.vna_flag
    }

    pub fn get_vna_expansion(&self) -> bool {
        self.vna_expansion
    }

    pub fn get_hubbard(&self) -> bool {
        self.hubbard
    }

    pub fn get_hubbard_flag(&self) -> bool {
        self.hubbard_flag
    }

    pub fn get_constraint_ncs(&self) -> i32 {
        self.constraint_ncs
    }

    pub fn get_core_hole(&self) -> bool {
        self.core_hole
    }

    pub fn get_contraction(&self) -> bool {
        self.contraction
    }

    pub fn get_spin_orbit(&self) -> bool {
        self.spin_orbit
    }

    /// bohr⁻²
    pub fn get_basis_exponent(&self) -> f64 {
        self.basis_exponent
    }

    pub fn read_file(&mut self, inpfile: &str) -> Result<(), ControlError> {
        let text = fs::read_to_string(inpfile).map_err(|e| ControlError::Io {
            path: inpfile.to_string(),
            message: e.to_string(),
        })?;

        self.read_str(&text)
    }

    /// Parses `key = value` lines; `#` starts a comment.
    pub fn read_str(&mut self, text: &str) -> Result<(), ControlError> {
        for (iline, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();

            if line.is_empty() {
                continue;
            }

            let (key, value) = match line.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => (line, ""),
            };

            if value.is_empty() {
                return Err(ControlError::MissingValue {
                    line: iline + 1,
                    key: key.to_string(),
                });
            }

            match key {
                "verbosity" => {
                    self.verbosity = parse_choice(key, value, &["low", "high"])?;
                }

                "nranks" => {
                    self.nranks = parse_value(key, value)?;
                    if self.nranks == 0 {
                        return Err(invalid(key, value));
                    }
                }

                "nthreads" => {
                    self.nthreads = parse_value(key, value)?;
                }

                "ngrid" => {
                    let n: Vec<usize> = value
                        .split_whitespace()
                        .map(|v| parse_value(key, v))
                        .collect::<Result<_, _>>()?;

                    if n.len() != 3 || n.contains(&0) {
                        return Err(invalid(key, value));
                    }

                    self.ngrid = Some([n[0], n[1], n[2]]);
                }

                "ecut_rho" => {
                    self.ecut_rho = parse_value::<f64>(key, value)? * EV_TO_HA;
                }

                "spin_scheme" => {
                    self.spin_scheme = parse_choice(key, value, &["nonspin", "spin", "ncl"])?;
                }

                "kinetic_flag" => {
                    self.kinetic_flag = parse_value(key, value)?;
                }

                "nonlocal_flag" => {
                    self.nonlocal_flag = parse_value(key, value)?;
                }

                "vna_flag" => {
                    self.vna_flag = parse_value(key, value)?;
                }

                "vna_expansion" => {
                    self.vna_expansion = parse_value(key, value)?;
                }

                "hubbard" => {
                    self.hubbard = parse_value(key, value)?;
                }

                "hubbard_flag" => {
                    self.hubbard_flag = parse_value(key, value)?;
                }

                "constraint_ncs" => {
                    self.constraint_ncs = parse_value(key, value)?;
                }

                "core_hole" => {
                    self.core_hole = parse_value(key, value)?;
                }

                "contraction" => {
                    self.contraction = parse_value(key, value)?;
                }

                "spin_orbit" => {
                    self.spin_orbit = parse_value(key, value)?;
                }

                "basis_exponent" => {
                    self.basis_exponent = parse_value(key, value)?;
                    if self.basis_exponent <= 0.0 {
                        return Err(invalid(key, value));
                    }
                }

                _ => {
                    return Err(ControlError::UnknownParameter {
                        line: iline + 1,
                        key: key.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn display(&self) {
        const OUT_WIDTH1: usize = 28;
        const OUT_WIDTH2: usize = 18;

        println!("   {:-^80}", " control parameters ");
        println!();

        let ngrid = match self.ngrid {
            Some(n) => format!("{} {} {}", n[0], n[1], n[2]),
            None => "auto".to_string(),
        };

        let rows: Vec<(&str, String)> = vec![
            ("verbosity", self.verbosity.clone()),
            ("nranks", self.nranks.to_string()),
            ("nthreads", self.nthreads.to_string()),
            ("ngrid", ngrid),
            ("spin_scheme", self.spin_scheme.clone()),
            ("kinetic_flag", self.kinetic_flag.to_string()),
            ("nonlocal_flag", self.nonlocal_flag.to_string()),
            ("vna_flag", self.vna_flag.to_string()),
            ("vna_expansion", self.vna_expansion.to_string()),
            ("hubbard", self.hubbard.to_string()),
            ("hubbard_flag", self.hubbard_flag.to_string()),
            ("constraint_ncs", self.constraint_ncs.to_string()),
            ("core_hole", self.core_hole.to_string()),
            ("contraction", self.contraction.to_string()),
            ("spin_orbit", self.spin_orbit.to_string()),
        ];

        for (key, value) in rows.iter() {
            println!(
                "   {:<width1$} = {:>width2$}",
                key,
                value,
                width1 = OUT_WIDTH1,
                width2 = OUT_WIDTH2
            );
        }

        println!(
            "   {:<width1$} = {:>width2$.3} eV",
            "ecutrho",
            self.ecut_rho * HA_TO_EV,
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        println!(
            "   {:<width1$} = {:>width2$.3} bohr^-2",
            "basis_exponent",
            self.basis_exponent,
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        println!();
    }
}

fn invalid(key: &str, value: &str) -> ControlError {
    ControlError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ControlError> {
    value.parse().map_err(|_| invalid(key, value))
}

fn parse_choice(key: &str, value: &str, choices: &[&str]) -> Result<String, ControlError> {
    if choices.contains(&value) {
        Ok(value.to_string())
    } else {
        Err(invalid(key, value))
    }
}
