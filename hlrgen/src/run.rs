use crate::RunError;

use atomgrid::{AtomGrid, GaussianBasis, OrbitalTables};
use control::Control;
use crystal::Crystal;
use dwgrid::PairBlocks;
use dwmpi::Communicator;
use fftgrid::{FFTGrid, GridContext};
use hamiltonian::{AssemblyFlags, AssemblyPlan, Term};
use rgtransform::RGTransform;

use std::time::Instant;
use tracing::info;

/// Totals over all ranks; the timings are those of the calling rank.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub nranks: usize,
    pub natoms: usize,
    pub npairs: usize,
    pub ncells_c: usize,
    pub olp_norm: f64,
    pub hlr_norm: f64,
    pub time_olp: f64,
    pub time_vlr: f64,
    pub time_hlr: f64,
    /// Terms of the initial Hamiltonian selected by the control flags.
    pub terms: Vec<Term>,
    pub nspin: usize,
    pub contracted: bool,
}

impl RunReport {
    pub fn display(&self) {
        println!("   {:-^80}", " long-range matrix elements ");
        println!();
        println!("   {:<24} {:>16}", "nranks", self.nranks);
        println!("   {:<24} {:>16}", "natoms", self.natoms);
        println!("   {:<24} {:>16}", "pairs", self.npairs);
        println!("   {:<24} {:>16}", "cells in C (all ranks)", self.ncells_c);
        println!("   {:<24} {:>16.8E}", "|S|", self.olp_norm);
        println!("   {:<24} {:>16.8E}", "|Hlr|", self.hlr_norm);
        println!();

        let terms: Vec<String> = self.terms.iter().map(|t| t.to_string()).collect();

        println!("   {:<24} {:>16}", "initial H terms", terms.join(" + "));
        println!("   {:<24} {:>16}", "spin components", self.nspin);
        println!("   {:<24} {:>16}", "contracted basis", self.contracted);
        println!();
        println!("   {:<24} {:>16.3} s", "overlap", self.time_olp);
        println!("   {:<24} {:>16.3} s", "Calc_Vlr", self.time_vlr);
        println!("   {:<24} {:>16.3} s", "Set_Hlr", self.time_hlr);
        println!();
    }
}

/// Builds this rank's view of the grid and computes the overlap and the
/// long-range matrix elements of its atoms. Collective over `comm`.
/// Rank count of a thread run: the command line wins over `in.ctrl`.
pub fn resolve_nranks(cli: Option<usize>, control: &Control) -> Result<usize, RunError> {
    match cli {
        Some(0) => Err(RunError::InvalidRanks(0)),
        Some(n) => Ok(n),
        None => Ok(control.get_nranks()),
    }
}

pub fn run_rank<C: Communicator>(
    comm: &C,
    control: &Control,
    crystal: &Crystal,
    grid: &FFTGrid,
) -> Result<RunReport, RunError> {
    // terms of the first SCF iteration
    let plan = AssemblyPlan::new(&AssemblyFlags::from_control(control), 1);

    info!(
        terms = ?plan.get_terms(),
        nspin = plan.get_nspin(),
        "initial Hamiltonian plan"
    );

    let atomgrid = AtomGrid::new(crystal, grid, comm.size(), comm.rank());

    let ctx = GridContext::new(
        comm,
        grid.clone(),
        crystal.get_latt().clone(),
        atomgrid.get_c_cells().to_vec(),
    )?;

    let basis = GaussianBasis::new(control.get_basis_exponent());
    let orbs = OrbitalTables::new(&atomgrid, crystal, &basis)?;

    let rgtrans = RGTransform::new(grid);

    let grid_volume = ctx.get_grid_volume();
    let pairs = atomgrid.get_pair_index();

    // overlap

    let stime = Instant::now();

    let mut olp = pairs.new_blocks();
    hlr::calc_overlap(grid_volume, &atomgrid, &orbs, &mut olp)?;

    let time_olp = stime.elapsed().as_secs_f64();

    // long-range potential of every center

    let centers = atomgrid.get_centers();

    let nb = ctx.get_partition_b().get_num_local();
    let nc = ctx.get_partition_c().get_num_local();

    let mut vlr_b = vec![vec![0.0; nb]; centers.len()];
    let mut vlr_c = vec![vec![0.0; nc]; centers.len()];

    let time_vlr = vlr::calc_vlr(comm, &ctx, &rgtrans, centers, &mut vlr_b, &mut vlr_c)?;

    // matrix elements

    let stime = Instant::now();

    let matomnum = atomgrid.get_distribution().get_matomnum();
    let mut hlr_blocks: Vec<PairBlocks> = vec![pairs.new_blocks(); matomnum];

    hlr::set_hlr(grid_volume, &atomgrid, &orbs, &vlr_c, &mut hlr_blocks)?;

    let time_hlr = stime.elapsed().as_secs_f64();

    info!(rank = comm.rank(), time_olp, time_vlr, time_hlr, "rank done");

    let hlr_sq: f64 = hlr_blocks.iter().map(|h| h.norm().powi(2)).sum();

    Ok(RunReport {
        nranks: comm.size(),
        natoms: crystal.get_n_atoms(),
        npairs: comm.all_reduce_sum(pairs.get_npairs() as f64)? as usize,
        ncells_c: comm.all_reduce_sum(nc as f64)? as usize,
        olp_norm: comm.all_reduce_sum(olp.norm().powi(2))?.sqrt(),
        hlr_norm: comm.all_reduce_sum(hlr_sq)?.sqrt(),
        time_olp,
        time_vlr,
        time_hlr,
        terms: plan.get_terms().to_vec(),
        nspin: plan.get_nspin(),
        contracted: plan.is_contracted(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dwmpi::{LocalComm, LocalUniverse};

    const WATER_LIKE: &str = "\
1.0 1.0 1.0
5.0 0.0 0.0
0.0 5.0 0.0
0.0 0.0 5.0
species O 4 1.3
species H 1 1.0
O 0.50 0.50 0.50
H 0.65 0.55 0.50
H 0.40 0.62 0.50
";

    #[test]
    fn test_overlap_independent_of_rank_count() {
        let control = Control::new();

        let mut crystal = Crystal::new();
        crystal.read_str(WATER_LIKE).unwrap();

        let grid = FFTGrid::from_size(10, 10, 10);

        let serial = LocalUniverse::run(1, |comm| run_rank(&comm, &control, &crystal, &grid))
            .pop()
            .unwrap()
            .unwrap();

        assert!(serial.olp_norm > 0.0);
        assert!(serial.hlr_norm > 0.0);

        for nranks in [2, 3] {
            let reports = LocalUniverse::run(nranks, |comm| {
                run_rank(&comm, &control, &crystal, &grid)
            });

            for r in reports {
                let r = r.unwrap();

                assert_eq!(r.npairs, serial.npairs);
                assert!((r.olp_norm - serial.olp_norm).abs() < 1.0e-10 * serial.olp_norm);
                // each rank only sees the centers of its own atoms
                assert!(r.hlr_norm > 0.0 && r.hlr_norm.is_finite());
            }
        }
    }

    #[test]
    fn test_report_carries_assembly_plan() {
        let mut crystal = Crystal::new();
        crystal.read_str(WATER_LIKE).unwrap();

        let grid = FFTGrid::from_size(10, 10, 10);

        let control = Control::new();
        let report = run_rank(&LocalComm::solo(), &control, &crystal, &grid).unwrap();

        assert_eq!(report.terms, vec![Term::Kinetic, Term::Nonlocal]);
        assert_eq!(report.nspin, 1);
        assert!(!report.contracted);

        let mut control = Control::new();
        control
            .read_str("spin_scheme = spin\nkinetic_flag = false\ncore_hole = true\n")
            .unwrap();
        let report = run_rank(&LocalComm::solo(), &control, &crystal, &grid).unwrap();

        assert_eq!(report.terms, vec![Term::Nonlocal, Term::CoreHole]);
        assert_eq!(report.nspin, 2);
    }

    #[test]
    fn test_zero_ranks_rejected() {
        let control = Control::new();

        assert_eq!(resolve_nranks(Some(0), &control), Err(RunError::InvalidRanks(0)));
        assert_eq!(resolve_nranks(Some(3), &control), Ok(3));
        assert_eq!(resolve_nranks(None, &control), Ok(control.get_nranks()));
    }
}
