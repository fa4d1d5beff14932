mod args;
mod error;
mod run;

use args::Args;
use error::RunError;
use run::{resolve_nranks, run_rank, RunReport};

use clap::Parser;
use control::Control;
use crystal::Crystal;
use fftgrid::FFTGrid;
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let stopwatch_main = std::time::Instant::now();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // read in control parameters

    let mut control = Control::new();
    control.read_file(&args.control)?;

    // read in crystal

    let mut crystal = Crystal::new();
    crystal.read_file(&args.crystal)?;

    if control.get_nthreads() > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(control.get_nthreads())
            .build_global()?;
    }

    let grid = match control.get_ngrid() {
        Some([n1, n2, n3]) => FFTGrid::from_size(n1, n2, n3),
        None => FFTGrid::new(crystal.get_latt(), control.get_ecutrho()),
    };

    let report = execute(&args, &control, &crystal, &grid)?;

    if let Some(report) = report {
        report.display();

        println!(
            "   {:<24} {:>16.3} s",
            "total",
            stopwatch_main.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn display_inputs(control: &Control, crystal: &Crystal, grid: &FFTGrid) {
    control.display();

    if control.is_verbose() {
        crystal.display();
    }

    println!("   FFTGrid : {}", grid);
    println!();
}

/// Runs every rank and returns the report on the root rank.
#[cfg(not(feature = "mpi"))]
fn execute(
    args: &Args,
    control: &Control,
    crystal: &Crystal,
    grid: &FFTGrid,
) -> Result<Option<RunReport>, RunError> {
    let nranks = resolve_nranks(args.nranks, control)?;

    display_inputs(control, crystal, grid);

    let reports = dwmpi::LocalUniverse::run(nranks, |comm| run_rank(&comm, control, crystal, grid))
        .into_iter()
        .collect::<Result<Vec<RunReport>, RunError>>()?;

    // every rank holds the same totals
    Ok(reports.into_iter().next())
}

#[cfg(feature = "mpi")]
fn execute(
    _args: &Args,
    control: &Control,
    crystal: &Crystal,
    grid: &FFTGrid,
) -> Result<Option<RunReport>, RunError> {
    use dwmpi::Communicator;

    let world = dwmpi::MpiWorld::init()?;

    if world.is_root() {
        display_inputs(control, crystal, grid);
    }

    let report = run_rank(&world, control, crystal, grid)?;

    Ok(if world.is_root() { Some(report) } else { None })
}
