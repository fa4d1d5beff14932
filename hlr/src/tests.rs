use super::*;
use atomgrid::{GaussianBasis, OrbitalTables};
use crystal::Crystal;
use fftgrid::FFTGrid;

const THREE_ATOMS: &str = "\
1.0 1.0 1.0
4.0 0.0 0.0
0.0 4.0 0.0
0.0 0.0 4.0
species A 4 1.2
species B 1 1.0
A 0.00 0.00 0.00
B 0.00 0.30 0.00
A 0.25 0.00 0.00
";

const GRID_VOLUME: f64 = 64.0 / 1728.0;

fn three_atoms() -> Crystal {
    let mut crystal = Crystal::new();
    crystal.read_str(THREE_ATOMS).unwrap();
    crystal
}

fn setup(nranks: usize, rank: usize) -> (AtomGrid, OrbitalTables) {
    let crystal = three_atoms();
    let grid = FFTGrid::from_size(12, 12, 12);

    let ag = AtomGrid::new(&crystal, &grid, nranks, rank);
    let orbs = OrbitalTables::new(&ag, &crystal, &GaussianBasis::new(0.8)).unwrap();

    (ag, orbs)
}

fn field_of(ag: &AtomGrid, f: impl Fn(u64) -> f64) -> Vec<f64> {
    ag.get_c_cells().iter().map(|&gn| f(gn)).collect()
}

fn max_diff(a: &PairBlocks, b: &PairBlocks) -> f64 {
    let mut d = a.clone();
    d.add_scaled(b, -1.0).unwrap();
    d.max_abs()
}

#[test]
fn test_quadrature_is_linear_in_field() {
    let (ag, orbs) = setup(1, 0);

    let f = field_of(&ag, |gn| (gn as f64 * 0.37).sin());
    let g = field_of(&ag, |gn| 1.0 / (1.0 + gn as f64));
    let fg: Vec<f64> = f.iter().zip(g.iter()).map(|(x, y)| 2.0 * x - 0.5 * y).collect();

    let pairs = ag.get_pair_index();

    let mut hf = pairs.new_blocks();
    let mut hg = pairs.new_blocks();
    let mut hfg = pairs.new_blocks();

    calc_matrix_elements_vlr(GRID_VOLUME, &ag, &orbs, &f, &mut hf).unwrap();
    calc_matrix_elements_vlr(GRID_VOLUME, &ag, &orbs, &g, &mut hg).unwrap();
    calc_matrix_elements_vlr(GRID_VOLUME, &ag, &orbs, &fg, &mut hfg).unwrap();

    let mut combined = pairs.new_blocks();
    combined.add_scaled(&hf, 2.0).unwrap();
    combined.add_scaled(&hg, -0.5).unwrap();

    assert!(hf.max_abs() > 0.0);
    assert!(max_diff(&combined, &hfg) < 1.0e-12);
}

#[test]
fn test_quadrature_accumulates() {
    let (ag, orbs) = setup(1, 0);

    let f = field_of(&ag, |gn| (gn % 5) as f64 - 2.0);

    let mut once = ag.get_pair_index().new_blocks();
    calc_matrix_elements_vlr(GRID_VOLUME, &ag, &orbs, &f, &mut once).unwrap();

    let mut twice = once.clone();
    calc_matrix_elements_vlr(GRID_VOLUME, &ag, &orbs, &f, &mut twice).unwrap();

    let mut expected = once.zeros_like();
    expected.add_scaled(&once, 2.0).unwrap();

    assert!(max_diff(&twice, &expected) < 1.0e-12);
}

#[test]
fn test_overlap_is_symmetric_with_positive_diagonal() {
    let (ag, orbs) = setup(1, 0);

    let mut olp = ag.get_pair_index().new_blocks();
    calc_overlap(GRID_VOLUME, &ag, &orbs, &mut olp).unwrap();

    for c in 0..3 {
        let diag = olp.get_block(c, 0);
        for i in 0..diag.nrows() {
            assert!(diag[[i, i]] > 0.0);
        }

        for (h_an, nb) in ag.get_neighbors().get_neighbors(c).iter().enumerate() {
            let back = ag
                .get_neighbors()
                .get_neighbors(nb.atom)
                .iter()
                .position(|x| x.atom == c)
                .unwrap();

            let s = olp.get_block(c, h_an);
            let t = olp.get_block(nb.atom, back);

            assert_eq!(s.dim(), (t.ncols(), t.nrows()));
            for ((i, j), v) in s.indexed_iter() {
                assert!((v - t[[j, i]]).abs() < 1.0e-12);
            }
        }
    }
}

#[test]
fn test_remote_neighbors_match_single_rank() {
    let (all, all_orbs) = setup(1, 0);
    let (part, part_orbs) = setup(2, 1);

    let potential = |gn: u64| (gn as f64 * 0.11).cos();

    let mut h_all = all.get_pair_index().new_blocks();
    calc_matrix_elements_vlr(
        GRID_VOLUME,
        &all,
        &all_orbs,
        &field_of(&all, potential),
        &mut h_all,
    )
    .unwrap();

    let mut h_part = part.get_pair_index().new_blocks();
    calc_matrix_elements_vlr(
        GRID_VOLUME,
        &part,
        &part_orbs,
        &field_of(&part, potential),
        &mut h_part,
    )
    .unwrap();

    // atom 2 is the only local atom on rank 1 of 2
    for h_an in 0..h_part.get_nneighbors(0) {
        let a = h_part.get_block(0, h_an);
        let b = h_all.get_block(2, h_an);

        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1.0e-12);
        }
    }
}

#[test]
fn test_set_hlr_uses_local_centers() {
    let (ag, orbs) = setup(2, 0);

    let matomnum = ag.get_distribution().get_matomnum();
    let ncenters = ag.get_centers().len();
    assert!(ncenters > matomnum);

    let vlr_c: Vec<Vec<f64>> = (0..ncenters)
        .map(|p| field_of(&ag, |gn| (p + 1) as f64 * (gn % 3) as f64))
        .collect();

    let mut hlr = vec![ag.get_pair_index().new_blocks(); matomnum];
    set_hlr(GRID_VOLUME, &ag, &orbs, &vlr_c, &mut hlr).unwrap();

    for (p, h) in hlr.iter().enumerate() {
        let mut expected = ag.get_pair_index().new_blocks();
        calc_matrix_elements_vlr(GRID_VOLUME, &ag, &orbs, &vlr_c[p], &mut expected).unwrap();

        assert!(max_diff(h, &expected) < 1.0e-12);
    }

    let mut short = vec![ag.get_pair_index().new_blocks(); matomnum + 1];
    assert_eq!(
        set_hlr(GRID_VOLUME, &ag, &orbs, &vlr_c, &mut short),
        Err(QuadratureError::CenterCount {
            expected: matomnum,
            found: matomnum + 1
        })
    );
}

#[test]
fn test_contract_violations() {
    let (ag, orbs) = setup(1, 0);

    let mut hlr = ag.get_pair_index().new_blocks();
    let r = calc_matrix_elements_vlr(GRID_VOLUME, &ag, &orbs, &[0.0; 3], &mut hlr);
    assert_eq!(
        r,
        Err(QuadratureError::FieldLength {
            expected: ag.get_c_cells().len(),
            found: 3
        })
    );

    let mut wrong = PairBlocks::new(&[vec![(1, 1)]]);
    let f = vec![0.0; ag.get_c_cells().len()];
    let r = calc_matrix_elements_vlr(GRID_VOLUME, &ag, &orbs, &f, &mut wrong);
    assert!(matches!(r, Err(QuadratureError::Layout(_))));
}
