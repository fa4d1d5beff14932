use control::Control;

use std::fmt;

/// Spin layout of the Hamiltonian: `SpinP_switch` is 0 (unpolarized),
/// 1 (collinear) or 3 (non-collinear).
pub const SPINP_NONCOLLINEAR: usize = 3;

/// Switches that decide which contributions enter the Hamiltonian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyFlags {
    pub spinp_switch: usize,
    pub kinetic: bool,
    pub nonlocal: bool,
    pub vna: bool,
    pub vna_expansion: bool,
    pub hubbard: bool,
    pub hubbard_flag: bool,
    pub constraint_ncs: i32,
    pub core_hole: bool,
    pub contraction: bool,
    pub spin_orbit: bool,
}

impl Default for AssemblyFlags {
    fn default() -> Self {
        AssemblyFlags {
            spinp_switch: 0,
            kinetic: true,
            nonlocal: true,
            vna: true,
            vna_expansion: false,
            hubbard: false,
            hubbard_flag: true,
            constraint_ncs: 0,
            core_hole: false,
            contraction: false,
            spin_orbit: false,
        }
    }
}

impl AssemblyFlags {
    pub fn from_control(control: &Control) -> AssemblyFlags {
        AssemblyFlags {
            spinp_switch: control.get_spinp_switch(),
            kinetic: control.get_kinetic_flag(),
            nonlocal: control.get_nonlocal_flag(),
            vna: control.get_vna_flag(),
            vna_expansion: control.get_vna_expansion(),
            hubbard: control.get_hubbard(),
            hubbard_flag: control.get_hubbard_flag(),
            constraint_ncs: control.get_constraint_ncs(),
            core_hole: control.get_core_hole(),
            contraction: control.get_contraction(),
            spin_orbit: control.get_spin_orbit(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Kinetic,
    Vna,
    Nonlocal,
    Hubbard,
    CoreHole,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Term::Kinetic => "kinetic",
            Term::Vna => "vna",
            Term::Nonlocal => "nonlocal",
            Term::Hubbard => "hubbard",
            Term::CoreHole => "core-hole",
        };

        write!(f, "{}", name)
    }
}

/// The terms to sum for one SCF iteration, decided once before the loop
/// over matrix blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyPlan {
    terms: Vec<Term>,
    spinp_switch: usize,
    contraction: bool,
    spin_orbit: bool,
}

impl AssemblyPlan {
    pub fn new(flags: &AssemblyFlags, scf_iter: usize) -> AssemblyPlan {
        let mut terms = Vec::new();

        if flags.kinetic {
            terms.push(Term::Kinetic);
        }

        if flags.vna_expansion && flags.vna {
            terms.push(Term::Vna);
        }

        if flags.nonlocal {
            terms.push(Term::Nonlocal);
        }

        // Hubbard or constrained-spin potential, from the second iteration on
        if (flags.hubbard || flags.constraint_ncs >= 1) && flags.hubbard_flag && scf_iter >= 2 {
            terms.push(Term::Hubbard);
        }

        if flags.core_hole {
            terms.push(Term::CoreHole);
        }

        AssemblyPlan {
            terms,
            spinp_switch: flags.spinp_switch,
            contraction: flags.contraction,
            spin_orbit: flags.spin_orbit,
        }
    }

    pub fn get_terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_active(&self, term: Term) -> bool {
        self.terms.contains(&term)
    }

    pub fn is_noncollinear(&self) -> bool {
        self.spinp_switch == SPINP_NONCOLLINEAR
    }

    /// Spin components of the assembled Hamiltonian.
    pub fn get_nspin(&self) -> usize {
        if self.is_noncollinear() {
            4
        } else {
            self.spinp_switch + 1
        }
    }

    pub fn is_contracted(&self) -> bool {
        self.contraction
    }

    pub fn has_spin_orbit(&self) -> bool {
        self.spin_orbit
    }

    /// `(component of H, component of the source)` pairs a term is added
    /// with.
    pub fn get_components(&self, term: Term) -> Vec<(usize, usize)> {
        let spin_free = matches!(term, Term::Kinetic | Term::Vna);

        if self.is_noncollinear() {
            if spin_free {
                vec![(0, 0), (1, 0)]
            } else {
                vec![(0, 0), (1, 1), (2, 2)]
            }
        } else if spin_free {
            (0..self.get_nspin()).map(|s| (s, 0)).collect()
        } else {
            (0..self.get_nspin()).map(|s| (s, s)).collect()
        }
    }
}
