use super::*;
use dwmpi::{LocalComm, LocalUniverse};
use fftgrid::FFTGrid;
use lattice::Lattice;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn label(grid: &FFTGrid, gn: u64) -> f64 {
    let [k1, k2, k3] = grid.get_miller(gn);
    k1 as f64 + 1000.0 * k2 as f64 + 1.0e6 * k3 as f64
}

fn copy_labels(comm: &LocalComm, grid: &FFTGrid, cells: Vec<u64>) -> (Vec<u64>, Vec<f64>) {
    let ctx = GridContext::new(comm, grid.clone(), Lattice::cubic(1.0), cells).unwrap();

    let data_b: Vec<f64> = ctx
        .get_partition_b()
        .get_my_cells()
        .map(|gn| label(grid, gn))
        .collect();

    let mut data_c = vec![-1.0; ctx.get_partition_c().get_num_local()];
    data_grid_copy_b2c(comm, &ctx, &data_b, &mut data_c).unwrap();

    (ctx.get_partition_c().get_cells().to_vec(), data_c)
}

#[test]
fn test_copy_whole_grid_on_every_rank() {
    let grid = FFTGrid::from_size(4, 3, 5);
    let ntot = grid.get_ntot() as u64;

    for nranks in 1..6 {
        let results = LocalUniverse::run(nranks, |comm| {
            copy_labels(&comm, &grid, (0..ntot).collect())
        });

        for (cells, data_c) in results {
            for (mn, &gn) in cells.iter().enumerate() {
                assert_eq!(data_c[mn], label(&grid, gn));
            }
        }
    }
}

#[test]
fn test_copy_random_replicated_cells() {
    let grid = FFTGrid::from_size(5, 4, 3);
    let ntot = grid.get_ntot() as u64;

    for nranks in [2, 3, 4] {
        let results = LocalUniverse::run(nranks, |comm| {
            let mut rng = StdRng::seed_from_u64(17 + comm.rank() as u64);
            let cells: Vec<u64> = (0..ntot).filter(|_| rng.gen_bool(0.4)).collect();

            copy_labels(&comm, &grid, cells)
        });

        for (cells, data_c) in results {
            assert!(data_c.iter().all(|&v| v >= 0.0));

            for (mn, &gn) in cells.iter().enumerate() {
                assert_eq!(data_c[mn], label(&grid, gn));
            }
        }
    }
}

#[test]
fn test_copy_conserves_disjoint_sum() {
    let grid = FFTGrid::from_size(6, 4, 4);
    let ntot = grid.get_ntot() as u64;
    let nranks = 3;

    // integer values keep every partial sum exact
    let mut rng = StdRng::seed_from_u64(5);
    let full: Vec<f64> = (0..ntot)
        .map(|_| rng.gen_range(-1000i64..1000) as f64)
        .collect();

    let results = LocalUniverse::run(nranks, |comm| {
        // C cells dealt round-robin, so each cell lives on exactly one rank
        let cells: Vec<u64> = (0..ntot)
            .filter(|gn| (gn % nranks as u64) as usize == comm.rank())
            .collect();

        let ctx = GridContext::new(&comm, grid.clone(), Lattice::cubic(1.0), cells).unwrap();

        let data_b: Vec<f64> = ctx
            .get_partition_b()
            .get_my_cells()
            .map(|gn| full[gn as usize])
            .collect();

        let mut data_c = vec![0.0; ctx.get_partition_c().get_num_local()];
        data_grid_copy_b2c(&comm, &ctx, &data_b, &mut data_c).unwrap();

        let sum_b = comm.all_reduce_sum(data_b.iter().sum()).unwrap();
        let sum_c = comm.all_reduce_sum(data_c.iter().sum()).unwrap();

        let cells = comm
            .all_gather_v(ctx.get_partition_c().get_cells())
            .unwrap();
        let values = comm.all_gather_v(&data_c).unwrap();

        (sum_b, sum_c, cells, values)
    });

    for (sum_b, sum_c, cells, values) in results {
        assert_eq!(sum_b, sum_c);
        assert_eq!(sum_b, full.iter().sum::<f64>());

        // every global cell arrives once with its source value
        let mut seen = vec![0usize; ntot as usize];

        for (rank_cells, rank_values) in cells.iter().zip(values.iter()) {
            assert_eq!(rank_cells.len(), rank_values.len());

            for (&gn, &v) in rank_cells.iter().zip(rank_values.iter()) {
                assert_eq!(v, full[gn as usize]);
                seen[gn as usize] += 1;
            }
        }

        assert!(seen.iter().all(|&n| n == 1));
    }
}

#[test]
fn test_copy_with_empty_c_partition() {
    let grid = FFTGrid::from_size(2, 2, 2);

    let results = LocalUniverse::run(2, |comm| {
        let cells = if comm.rank() == 0 { vec![] } else { vec![0, 7] };
        copy_labels(&comm, &grid, cells)
    });

    assert!(results[0].1.is_empty());
    assert_eq!(results[1].1, vec![0.0, 1.0 + 1000.0 + 1.0e6]);
}

#[test]
fn test_copy_rejects_wrong_lengths() {
    let comm = LocalComm::solo();
    let grid = FFTGrid::from_size(2, 2, 2);
    let ctx = GridContext::new(&comm, grid, Lattice::cubic(1.0), vec![1, 2]).unwrap();

    let mut data_c = vec![0.0; 2];
    let err = data_grid_copy_b2c(&comm, &ctx, &[0.0; 3], &mut data_c).unwrap_err();
    assert_eq!(
        err,
        GridError::FieldLength {
            field: "B field",
            expected: 8,
            found: 3
        }
    );

    let mut data_c = vec![0.0; 5];
    let err = data_grid_copy_b2c(&comm, &ctx, &[0.0; 8], &mut data_c).unwrap_err();
    assert!(matches!(err, GridError::FieldLength { field: "C field", .. }));
}
