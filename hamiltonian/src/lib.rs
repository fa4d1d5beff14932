//! Assembly of the initial Hamiltonian from its precomputed contributions.

mod contraction;
pub use contraction::{BasisContraction, CoefficientContraction, Contracted};

mod error;
pub use error::HamiltonianError;

mod plan;
pub use plan::{AssemblyFlags, AssemblyPlan, Term, SPINP_NONCOLLINEAR};

use dwgrid::{LayoutError, PairBlocks, SpinBlocks};
use tracing::debug;

/// Contribution matrices available to the assembly. A term switched on by
/// the plan must be present.
#[derive(Debug, Clone, Copy, Default)]
pub struct Contributions<'a> {
    /// Kinetic part of `H0`.
    pub h0: Option<&'a PairBlocks>,
    /// Projector expansion of the neutral-atom potential.
    pub hvna: Option<&'a PairBlocks>,
    pub hnl: Option<&'a SpinBlocks>,
    pub hub: Option<&'a SpinBlocks>,
    pub hch: Option<&'a SpinBlocks>,
    /// Overlap matrix, needed only for contraction.
    pub olp: Option<&'a PairBlocks>,
    /// Imaginary nonlocal part, contracted when spin-orbit coupling is on.
    pub ihnl: Option<&'a SpinBlocks>,
}

/// Overwrites `h` with the sum of the active terms of `plan`.
///
/// In the non-collinear case component 3 stays zero and the spin-free
/// terms enter components 0 and 1 only. When the plan asks for
/// contraction, the assembled matrices are also returned in the contracted
/// basis.
pub fn set_initial_hamiltonian(
    plan: &AssemblyPlan,
    contrib: &Contributions,
    contraction: Option<&dyn BasisContraction>,
    h: &mut SpinBlocks,
) -> Result<Option<Contracted>, HamiltonianError> {
    if h.get_nspin() != plan.get_nspin() {
        return Err(LayoutError::SpinCount {
            expected: plan.get_nspin(),
            found: h.get_nspin(),
        }
        .into());
    }

    debug!(terms = ?plan.get_terms(), nspin = plan.get_nspin(), "assembling hamiltonian");

    h.set_zero();

    for &term in plan.get_terms() {
        for (out, src) in plan.get_components(term) {
            let source = get_source(contrib, term, src)?;

            h.get_spin_mut(out).add_scaled(source, 1.0)?;
        }
    }

    if !plan.is_contracted() {
        return Ok(None);
    }

    let scheme = contraction.ok_or(HamiltonianError::MissingContraction)?;
    let olp = contrib.olp.ok_or(HamiltonianError::MissingOverlap)?;

    let (cnt_h, cnt_olp) = scheme.contract_hamiltonian(h, olp)?;

    let cnt_ihnl = if plan.has_spin_orbit() {
        let ihnl = contrib
            .ihnl
            .ok_or(HamiltonianError::MissingContribution(Term::Nonlocal))?;

        Some(scheme.contract_ihnl(ihnl)?)
    } else {
        None
    };

    Ok(Some(Contracted {
        h: cnt_h,
        olp: cnt_olp,
        ihnl: cnt_ihnl,
    }))
}

fn get_source<'a>(
    contrib: &Contributions<'a>,
    term: Term,
    spin: usize,
) -> Result<&'a PairBlocks, HamiltonianError> {
    let missing = HamiltonianError::MissingContribution(term);

    let spins = match term {
        Term::Kinetic => return contrib.h0.ok_or(missing),
        Term::Vna => return contrib.hvna.ok_or(missing),
        Term::Nonlocal => contrib.hnl,
        Term::Hubbard => contrib.hub,
        Term::CoreHole => contrib.hch,
    }
    .ok_or(missing)?;

    if spin >= spins.get_nspin() {
        return Err(LayoutError::SpinCount {
            expected: spin + 1,
            found: spins.get_nspin(),
        }
        .into());
    }

    Ok(spins.get_spin(spin))
}

#[cfg(test)]
mod tests;
