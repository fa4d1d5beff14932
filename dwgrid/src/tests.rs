use super::*;

fn two_atom_layout() -> PairBlocks {
    PairBlocks::new(&[vec![(4, 4), (4, 1)], vec![(1, 1), (1, 4), (1, 1)]])
}

#[test]
fn test_array3_first_index_fastest() {
    let a = Array3::from_vec([2, 3, 2], (0..12).map(|v| v as f64).collect()).unwrap();

    assert_eq!(a[[1, 0, 0]], 1.0);
    assert_eq!(a[[0, 1, 0]], 2.0);
    assert_eq!(a[[0, 0, 1]], 6.0);
    assert_eq!(a[[1, 2, 1]], 11.0);
    assert_eq!(a.sum(), 66.0);
    assert_eq!(a.as_slice()[7], 7.0);
}

#[test]
fn test_array3_rejects_wrong_length() {
    let r = Array3::<f64>::from_vec([2, 2, 2], vec![0.0; 7]);

    assert_eq!(
        r.unwrap_err(),
        LayoutError::Length {
            expected: 8,
            found: 7
        }
    );
}

#[test]
fn test_pair_blocks_layout() {
    let mut h = two_atom_layout();

    assert_eq!(h.get_natoms(), 2);
    assert_eq!(h.get_npairs(), 5);
    assert_eq!(h.get_nneighbors(1), 3);
    assert_eq!(h.get_pair_offset(1), 2);
    assert_eq!(h.get_block(0, 1).dim(), (4, 1));

    h.get_block_mut(1, 1)[[0, 3]] = -2.5;
    assert_eq!(h.as_slice()[3][[0, 3]], -2.5);
    assert_eq!(h.max_abs(), 2.5);

    h.set_zero();
    assert_eq!(h.norm(), 0.0);
}

#[test]
fn test_add_scaled_and_mismatch() {
    let mut h = two_atom_layout();
    let mut t = h.zeros_like();

    t.get_block_mut(0, 0)[[2, 1]] = 1.5;
    h.add_scaled(&t, 2.0).unwrap();
    h.add_scaled(&t, 1.0).unwrap();
    assert_eq!(h.get_block(0, 0)[[2, 1]], 4.5);

    let other = PairBlocks::new(&[vec![(4, 4), (4, 4)], vec![(1, 1), (1, 4), (1, 1)]]);
    assert_eq!(
        h.add_scaled(&other, 1.0),
        Err(LayoutError::Block {
            pair: 1,
            expected: (4, 1),
            found: (4, 4)
        })
    );
}

#[test]
fn test_spin_blocks_checks() {
    let layout = two_atom_layout();
    let s = SpinBlocks::new(2, &layout);

    assert_eq!(s.get_nspin(), 2);
    assert!(s.check_layout(&layout, 2).is_ok());
    assert_eq!(
        s.check_layout(&layout, 4),
        Err(LayoutError::SpinCount {
            expected: 4,
            found: 2
        })
    );

    let bad = SpinBlocks::from_vec(vec![layout.clone(), PairBlocks::new(&[vec![(1, 1)]])]);
    assert!(bad.is_err());
}
