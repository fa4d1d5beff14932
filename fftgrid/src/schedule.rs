use crate::{GridError, PartitionB, PartitionC};

use dwmpi::Communicator;
use tracing::debug;

/// Cells exchanged with one peer rank.
///
/// For a send transfer `indices` are B-local indices packed in order; for a
/// receive transfer they are the C-local indices the values are scattered
/// to. `offset` locates the peer's run in the staging buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerTransfer {
    pub rank: usize,
    pub offset: usize,
    pub indices: Vec<usize>,
}

impl PeerTransfer {
    pub fn get_count(&self) -> usize {
        self.indices.len()
    }
}

/// Who sends which B cells to whom so that every rank can fill its C cells.
///
/// Both lists are sorted by peer rank and may contain this rank itself; the
/// self transfer is a local copy. Within one peer, cells travel in ascending
/// global order on both sides, which is what pairs the send and receive
/// index lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct B2CSchedule {
    rank: usize,
    send: Vec<PeerTransfer>,
    recv: Vec<PeerTransfer>,
    nsend: usize,
    nrecv: usize,
}

impl B2CSchedule {
    /// Collective: every rank of `comm` must call it with its own C cells.
    pub fn new<C: Communicator>(
        comm: &C,
        part_b: &PartitionB,
        part_c: &PartitionC,
    ) -> Result<B2CSchedule, GridError> {
        let rank = comm.rank();

        let all_cells = comm.all_gather_v(part_c.get_cells())?;

        // what every peer needs from my slab
        let my_cells = part_b.get_my_cells();

        let mut send = Vec::new();
        let mut nsend = 0;

        for (peer, cells) in all_cells.iter().enumerate() {
            let indices: Vec<usize> = cells
                .iter()
                .filter(|&&gn| my_cells.contains(&gn))
                .map(|&gn| part_b.get_local_index(gn))
                .collect();

            if !indices.is_empty() {
                let count = indices.len();
                send.push(PeerTransfer {
                    rank: peer,
                    offset: nsend,
                    indices,
                });
                nsend += count;
            }
        }

        // what I need from every slab
        let mut by_owner: Vec<Vec<usize>> = vec![Vec::new(); comm.size()];

        for (mn, &gn) in part_c.get_cells().iter().enumerate() {
            by_owner[part_b.get_owner(gn)].push(mn);
        }

        let mut recv = Vec::new();
        let mut nrecv = 0;

        for (peer, indices) in by_owner.into_iter().enumerate() {
            if !indices.is_empty() {
                let count = indices.len();
                recv.push(PeerTransfer {
                    rank: peer,
                    offset: nrecv,
                    indices,
                });
                nrecv += count;
            }
        }

        debug!(
            rank,
            send_peers = send.len(),
            recv_peers = recv.len(),
            nsend,
            nrecv,
            "B2C schedule built"
        );

        Ok(B2CSchedule {
            rank,
            send,
            recv,
            nsend,
            nrecv,
        })
    }

    pub fn get_send(&self) -> &[PeerTransfer] {
        &self.send
    }

    pub fn get_recv(&self) -> &[PeerTransfer] {
        &self.recv
    }

    pub fn get_nsend(&self) -> usize {
        self.nsend
    }

    pub fn get_nrecv(&self) -> usize {
        self.nrecv
    }

    /// The transfer this rank sends to itself, if any.
    pub fn get_self_send(&self) -> Option<&PeerTransfer> {
        self.send.iter().find(|p| p.rank == self.rank)
    }
}
