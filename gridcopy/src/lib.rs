//! Copy of a grid field from partition B to partition C.

use dwmpi::{Communicator, Request};
use fftgrid::{GridContext, GridError};
use tracing::trace;

const TAG_B2C: i32 = 999;

/// Fills the C-local field `data_c` from the B-local field `data_b`
/// following the schedule of `ctx`. Collective over `comm`; blocks until
/// every transfer of this rank has completed.
pub fn data_grid_copy_b2c<C: Communicator>(
    comm: &C,
    ctx: &GridContext,
    data_b: &[f64],
    data_c: &mut [f64],
) -> Result<(), GridError> {
    let sched = ctx.get_schedule();
    let myid = comm.rank();

    check_len("B field", ctx.get_partition_b().get_num_local(), data_b.len())?;
    check_len("C field", ctx.get_partition_c().get_num_local(), data_c.len())?;

    let mut snd_buf = vec![0.0; sched.get_nsend()];
    let mut rcv_buf = vec![0.0; sched.get_nrecv()];

    // receives from remote peers, each into its own run of the buffer

    let mut rcv_requests: Vec<Request<'_, f64>> = Vec::new();

    let mut rest: &mut [f64] = &mut rcv_buf;
    for peer in sched.get_recv() {
        let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(peer.get_count());
        rest = tail;

        if peer.rank != myid {
            rcv_requests.push(comm.irecv(chunk, peer.rank, TAG_B2C)?);
        }
    }

    // pack every peer, self included; only remote peers go on the wire

    let mut snd_requests: Vec<Request<'_, f64>> = Vec::new();

    let mut rest: &mut [f64] = &mut snd_buf;
    for peer in sched.get_send() {
        let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(peer.get_count());
        rest = tail;

        for (v, &bn) in chunk.iter_mut().zip(peer.indices.iter()) {
            *v = data_b[bn];
        }

        if peer.rank != myid {
            let packed: &[f64] = chunk;
            snd_requests.push(comm.isend(packed, peer.rank, TAG_B2C)?);
        }
    }

    trace!(
        nsend = snd_requests.len(),
        nrecv = rcv_requests.len(),
        "waiting for B2C transfers"
    );

    comm.wait_all(snd_requests)?;
    comm.wait_all(rcv_requests)?;

    // scatter into partition C

    for peer in sched.get_recv() {
        let src = if peer.rank == myid {
            let offset = sched
                .get_self_send()
                .map(|s| s.offset)
                .unwrap_or_default();
            &snd_buf[offset..offset + peer.get_count()]
        } else {
            &rcv_buf[peer.offset..peer.offset + peer.get_count()]
        };

        for (&v, &mn) in src.iter().zip(peer.indices.iter()) {
            data_c[mn] = v;
        }
    }

    Ok(())
}

fn check_len(field: &'static str, expected: usize, found: usize) -> Result<(), GridError> {
    if expected == found {
        Ok(())
    } else {
        Err(GridError::FieldLength {
            field,
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests;
