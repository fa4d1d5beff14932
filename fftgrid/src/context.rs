use crate::{B2CSchedule, FFTGrid, GridError, PartitionB, PartitionC};

use dwmpi::Communicator;
use lattice::Lattice;

/// Grid, cell and both decompositions of one rank, built once and shared
/// by reference afterwards.
#[derive(Debug, Clone)]
pub struct GridContext {
    grid: FFTGrid,
    latt: Lattice,
    part_b: PartitionB,
    part_c: PartitionC,
    schedule: B2CSchedule,
}

impl GridContext {
    /// Collective over `comm`.
    pub fn new<C: Communicator>(
        comm: &C,
        grid: FFTGrid,
        latt: Lattice,
        c_cells: Vec<u64>,
    ) -> Result<GridContext, GridError> {
        let part_b = PartitionB::new(&grid, comm.size(), comm.rank());
        let part_c = PartitionC::new(c_cells, &grid)?;
        let schedule = B2CSchedule::new(comm, &part_b, &part_c)?;

        Ok(GridContext {
            grid,
            latt,
            part_b,
            part_c,
            schedule,
        })
    }

    pub fn get_grid(&self) -> &FFTGrid {
        &self.grid
    }

    pub fn get_lattice(&self) -> &Lattice {
        &self.latt
    }

    pub fn get_partition_b(&self) -> &PartitionB {
        &self.part_b
    }

    pub fn get_partition_c(&self) -> &PartitionC {
        &self.part_c
    }

    pub fn get_schedule(&self) -> &B2CSchedule {
        &self.schedule
    }

    pub fn get_volume(&self) -> f64 {
        self.latt.volume()
    }

    /// Volume element of one cell, `Ω / Ntot`.
    pub fn get_grid_volume(&self) -> f64 {
        self.latt.volume() / self.grid.get_ntotf64()
    }
}
