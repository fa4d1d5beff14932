use super::*;
use atomgrid::{PairEntry, PairIndex};
use control::Control;
use dwgrid::Array2;
use std::collections::HashMap;

// two local atoms: atom 0 (2 orbitals) sees itself and atom 1 (1 orbital)
fn pair_index() -> PairIndex {
    let entries = [
        (0, 0, 0, 0, 2, 2),
        (0, 1, 0, 1, 2, 1),
        (1, 0, 1, 1, 1, 1),
        (1, 1, 1, 0, 1, 2),
    ]
    .iter()
    .map(|&(mc_an, h_an, gc_an, gh_an, no0, no1)| PairEntry {
        mc_an,
        h_an,
        gc_an,
        gh_an,
        no0,
        no1,
    })
    .collect();

    PairIndex::new(entries, 2)
}

fn filled(pairs: &PairIndex, seed: f64) -> PairBlocks {
    let mut b = pairs.new_blocks();

    for (ip, block) in b.as_mut_slice().iter_mut().enumerate() {
        for ((i, j), v) in block.indexed_iter_mut() {
            *v = seed + ip as f64 + 0.1 * i as f64 + 0.01 * j as f64;
        }
    }

    b
}

fn filled_spins(pairs: &PairIndex, nspin: usize, seed: f64) -> SpinBlocks {
    SpinBlocks::from_vec(
        (0..nspin)
            .map(|s| filled(pairs, seed + 10.0 * s as f64))
            .collect(),
    )
    .unwrap()
}

fn sum_of(parts: &[&PairBlocks]) -> PairBlocks {
    let mut out = parts[0].zeros_like();
    for p in parts {
        out.add_scaled(p, 1.0).unwrap();
    }
    out
}

#[test]
fn test_all_flags_off_gives_zero() {
    let pairs = pair_index();

    let flags = AssemblyFlags {
        kinetic: false,
        nonlocal: false,
        vna: false,
        ..Default::default()
    };
    let plan = AssemblyPlan::new(&flags, 5);
    assert!(plan.get_terms().is_empty());

    // stale values from a previous call must not survive
    let mut h = filled_spins(&pairs, 1, 3.0);

    let r = set_initial_hamiltonian(&plan, &Contributions::default(), None, &mut h).unwrap();

    assert!(r.is_none());
    assert_eq!(h.max_abs(), 0.0);
}

#[test]
fn test_hubbard_gating() {
    let mut flags = AssemblyFlags {
        hubbard: true,
        ..Default::default()
    };

    assert!(!AssemblyPlan::new(&flags, 1).is_active(Term::Hubbard));
    assert!(AssemblyPlan::new(&flags, 2).is_active(Term::Hubbard));

    flags.hubbard_flag = false;
    assert!(!AssemblyPlan::new(&flags, 3).is_active(Term::Hubbard));

    flags.hubbard = false;
    flags.hubbard_flag = true;
    flags.constraint_ncs = 1;
    assert!(AssemblyPlan::new(&flags, 2).is_active(Term::Hubbard));

    flags.constraint_ncs = 0;
    assert!(!AssemblyPlan::new(&flags, 2).is_active(Term::Hubbard));
}

#[test]
fn test_vna_needs_expansion() {
    let flags = AssemblyFlags::default();
    assert!(!AssemblyPlan::new(&flags, 1).is_active(Term::Vna));

    let flags = AssemblyFlags {
        vna_expansion: true,
        ..Default::default()
    };
    assert!(AssemblyPlan::new(&flags, 1).is_active(Term::Vna));
}

#[test]
fn test_collinear_spins() {
    let pairs = pair_index();

    let flags = AssemblyFlags {
        spinp_switch: 1,
        vna_expansion: true,
        core_hole: true,
        ..Default::default()
    };
    let plan = AssemblyPlan::new(&flags, 1);
    assert_eq!(plan.get_nspin(), 2);

    let h0 = filled(&pairs, 1.0);
    let hvna = filled(&pairs, -0.5);
    let hnl = filled_spins(&pairs, 2, 0.25);
    let hch = filled_spins(&pairs, 2, 2.0);

    let contrib = Contributions {
        h0: Some(&h0),
        hvna: Some(&hvna),
        hnl: Some(&hnl),
        hch: Some(&hch),
        ..Default::default()
    };

    let mut h = SpinBlocks::new(2, &h0);
    set_initial_hamiltonian(&plan, &contrib, None, &mut h).unwrap();

    for s in 0..2 {
        let expected = sum_of(&[&h0, &hvna, hnl.get_spin(s), hch.get_spin(s)]);
        assert_eq!(h.get_spin(s), &expected);
    }
}

#[test]
fn test_noncollinear_components() {
    let pairs = pair_index();

    let flags = AssemblyFlags {
        spinp_switch: SPINP_NONCOLLINEAR,
        hubbard: true,
        ..Default::default()
    };
    let plan = AssemblyPlan::new(&flags, 2);
    assert_eq!(plan.get_nspin(), 4);

    let h0 = filled(&pairs, 1.0);
    let hnl = filled_spins(&pairs, 3, 0.5);
    let hub = filled_spins(&pairs, 3, -4.0);

    let contrib = Contributions {
        h0: Some(&h0),
        hnl: Some(&hnl),
        hub: Some(&hub),
        ..Default::default()
    };

    let mut h = SpinBlocks::new(4, &h0);
    set_initial_hamiltonian(&plan, &contrib, None, &mut h).unwrap();

    assert_eq!(h.get_spin(0), &sum_of(&[&h0, hnl.get_spin(0), hub.get_spin(0)]));
    assert_eq!(h.get_spin(1), &sum_of(&[&h0, hnl.get_spin(1), hub.get_spin(1)]));
    assert_eq!(h.get_spin(2), &sum_of(&[hnl.get_spin(2), hub.get_spin(2)]));
    assert_eq!(h.get_spin(3).max_abs(), 0.0);
}

#[test]
fn test_missing_and_mismatched_contributions() {
    let pairs = pair_index();
    let plan = AssemblyPlan::new(&AssemblyFlags::default(), 1);

    let h0 = filled(&pairs, 1.0);
    let mut h = SpinBlocks::new(1, &h0);

    let contrib = Contributions {
        h0: Some(&h0),
        ..Default::default()
    };
    assert_eq!(
        set_initial_hamiltonian(&plan, &contrib, None, &mut h),
        Err(HamiltonianError::MissingContribution(Term::Nonlocal))
    );

    let other = PairBlocks::new(&[vec![(1, 1)]]);
    let hnl = SpinBlocks::new(1, &other);
    let contrib = Contributions {
        h0: Some(&h0),
        hnl: Some(&hnl),
        ..Default::default()
    };
    assert!(matches!(
        set_initial_hamiltonian(&plan, &contrib, None, &mut h),
        Err(HamiltonianError::Layout(_))
    ));

    let mut h2 = SpinBlocks::new(2, &h0);
    assert_eq!(
        set_initial_hamiltonian(&plan, &contrib, None, &mut h2),
        Err(HamiltonianError::Layout(LayoutError::SpinCount {
            expected: 1,
            found: 2
        }))
    );
}

#[test]
fn test_coefficient_contraction() {
    let pairs = pair_index();

    // atom 0: two primitives summed into one; atom 1: scaled by 2
    let coeffs = vec![
        Array2::from_shape_vec((1, 2), vec![1.0, 1.0]).unwrap(),
        Array2::from_shape_vec((1, 1), vec![2.0]).unwrap(),
    ];
    let scheme = CoefficientContraction::new(&pairs, coeffs).unwrap();

    let flags = AssemblyFlags {
        nonlocal: false,
        contraction: true,
        ..Default::default()
    };
    let plan = AssemblyPlan::new(&flags, 1);

    let h0 = filled(&pairs, 1.0);
    let olp = filled(&pairs, 0.0);
    let contrib = Contributions {
        h0: Some(&h0),
        olp: Some(&olp),
        ..Default::default()
    };

    let mut h = SpinBlocks::new(1, &h0);
    let cnt = set_initial_hamiltonian(&plan, &contrib, Some(&scheme), &mut h)
        .unwrap()
        .unwrap();

    assert!(cnt.ihnl.is_none());

    let hc = cnt.h.get_spin(0);
    let b = h0.get_block(0, 0);
    assert_eq!(hc.get_block(0, 0).dim(), (1, 1));
    assert!((hc.get_block(0, 0)[[0, 0]] - b.sum()).abs() < 1.0e-12);

    let b = h0.get_block(0, 1);
    assert!((hc.get_block(0, 1)[[0, 0]] - 2.0 * b.sum()).abs() < 1.0e-12);

    let b = h0.get_block(1, 0);
    assert!((hc.get_block(1, 0)[[0, 0]] - 2.0 * b.sum()).abs() < 1.0e-12);

    let b = h0.get_block(1, 1);
    assert!((hc.get_block(1, 1)[[0, 0]] - 4.0 * b[[0, 0]]).abs() < 1.0e-12);

    assert_eq!(cnt.olp.get_block(1, 1).dim(), (1, 1));

    // requested but no scheme given
    assert_eq!(
        set_initial_hamiltonian(&plan, &contrib, None, &mut h),
        Err(HamiltonianError::MissingContraction)
    );
}

#[test]
fn test_contraction_coefficients_checked() {
    let pairs = pair_index();

    let mut by_species = HashMap::new();
    by_species.insert("A".to_string(), Array2::eye(3));

    let mut crystal = crystal::Crystal::new();
    crystal
        .read_str("1.0 1.0 1.0\n3.0 0.0 0.0\n0.0 3.0 0.0\n0.0 0.0 3.0\nspecies A 2 1.0\nA 0.0 0.0 0.0\nA 0.5 0.5 0.5\n")
        .unwrap();

    assert_eq!(
        CoefficientContraction::from_species(&crystal, &pairs, &by_species).unwrap_err(),
        HamiltonianError::Coefficients {
            atom: 0,
            expected: 2,
            found: 3
        }
    );

    let r = CoefficientContraction::new(&pairs, vec![Array2::eye(2)]);
    assert_eq!(r.unwrap_err(), HamiltonianError::MissingCoefficients { atom: 1 });
}

#[test]
fn test_flags_from_control() {
    let mut control = Control::new();
    control
        .read_str("spin_scheme = ncl\nhubbard = true\ncore_hole = true\nkinetic_flag = false\n")
        .unwrap();

    let flags = AssemblyFlags::from_control(&control);

    assert_eq!(flags.spinp_switch, 3);
    assert!(flags.hubbard && flags.core_hole && !flags.kinetic);

    let plan = AssemblyPlan::new(&flags, 2);
    assert_eq!(plan.get_terms(), &[Term::Nonlocal, Term::Hubbard, Term::CoreHole]);
}
