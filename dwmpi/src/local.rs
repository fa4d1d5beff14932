use crate::{check_rank, CommError, Communicator, MPIDataType, Request, RequestKind};

use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::panic;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Barrier};
use std::thread;

use tracing::debug;

const TAG_ALLGATHER: i32 = -1;

type Payload = Box<dyn Any + Send>;

struct Packet {
    tag: i32,
    payload: Payload,
}

/// Runs a fixed number of ranks as threads of the current process.
///
/// Each pair of ranks is connected by a FIFO channel, so messages between
/// two ranks with the same tag arrive in the order they were sent, as with
/// MPI.
pub struct LocalUniverse;

impl LocalUniverse {
    /// Calls `f` once per rank, each on its own thread, and returns the
    /// results indexed by rank. A panic on any rank is re-raised here after
    /// all ranks have finished.
    pub fn run<F, R>(nranks: usize, f: F) -> Vec<R>
    where
        F: Fn(LocalComm) -> R + Sync,
        R: Send,
    {
        assert!(nranks > 0, "a universe needs at least one rank");

        debug!(nranks, "starting local universe");

        let comms = LocalUniverse::connect(nranks);

        thread::scope(|s| {
            let handles: Vec<_> = comms
                .into_iter()
                .map(|comm| {
                    let f = &f;
                    thread::Builder::new()
                        .name(format!("rank-{}", comm.rank))
                        .spawn_scoped(s, move || f(comm))
                        .expect("failed to spawn rank thread")
                })
                .collect();

            let mut results = Vec::with_capacity(nranks);
            let mut first_panic = None;

            for h in handles {
                match h.join() {
                    Ok(r) => results.push(r),
                    Err(e) => {
                        if first_panic.is_none() {
                            first_panic = Some(e);
                        }
                    }
                }
            }

            if let Some(e) = first_panic {
                panic::resume_unwind(e);
            }

            results
        })
    }

    fn connect(nranks: usize) -> Vec<LocalComm> {
        let barrier = Arc::new(Barrier::new(nranks));

        // senders[src][dst], receivers[dst][src]
        let mut senders: Vec<Vec<Sender<Packet>>> = (0..nranks).map(|_| Vec::new()).collect();
        let mut receivers: Vec<Vec<Option<Receiver<Packet>>>> =
            (0..nranks).map(|_| (0..nranks).map(|_| None).collect()).collect();

        for src in 0..nranks {
            for dst in 0..nranks {
                let (tx, rx) = channel();
                senders[src].push(tx);
                receivers[dst][src] = Some(rx);
            }
        }

        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (senders, receivers))| LocalComm {
                rank,
                size: nranks,
                senders,
                receivers: receivers.into_iter().flatten().collect(),
                mailbox: RefCell::new(HashMap::new()),
                barrier: Arc::clone(&barrier),
            })
            .collect()
    }
}

/// One rank of a [`LocalUniverse`].
pub struct LocalComm {
    rank: usize,
    size: usize,
    senders: Vec<Sender<Packet>>,
    receivers: Vec<Receiver<Packet>>,
    // messages that arrived while waiting for another tag
    mailbox: RefCell<HashMap<(usize, i32), VecDeque<Payload>>>,
    barrier: Arc<Barrier>,
}

impl LocalComm {
    /// A single-rank communicator, for serial runs.
    pub fn solo() -> LocalComm {
        LocalUniverse::connect(1)
            .pop()
            .expect("connect(1) returns one communicator")
    }

    fn post(&self, dest: usize, tag: i32, payload: Payload) -> Result<(), CommError> {
        check_rank(dest, self.size)?;

        self.senders[dest]
            .send(Packet { tag, payload })
            .map_err(|_| CommError::Disconnected { peer: dest })
    }

    fn take(&self, source: usize, tag: i32) -> Result<Payload, CommError> {
        if let Some(payload) = self
            .mailbox
            .borrow_mut()
            .get_mut(&(source, tag))
            .and_then(|q| q.pop_front())
        {
            return Ok(payload);
        }

        loop {
            let packet = self.receivers[source]
                .recv()
                .map_err(|_| CommError::Disconnected { peer: source })?;

            if packet.tag == tag {
                return Ok(packet.payload);
            }

            self.mailbox
                .borrow_mut()
                .entry((source, packet.tag))
                .or_default()
                .push_back(packet.payload);
        }
    }

    fn take_vec<T: MPIDataType>(&self, source: usize, tag: i32) -> Result<Vec<T>, CommError> {
        self.take(source, tag)?
            .downcast::<Vec<T>>()
            .map(|v| *v)
            .map_err(|_| CommError::TypeMismatch { peer: source })
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) -> Result<(), CommError> {
        self.barrier.wait();

        Ok(())
    }

    fn isend<'a, T: MPIDataType>(
        &self,
        buf: &'a [T],
        dest: usize,
        tag: i32,
    ) -> Result<Request<'a, T>, CommError> {
        // channels are unbounded, the copy is complete once posted
        self.post(dest, tag, Box::new(buf.to_vec()))?;

        Ok(Request::complete())
    }

    fn irecv<'a, T: MPIDataType>(
        &self,
        buf: &'a mut [T],
        source: usize,
        tag: i32,
    ) -> Result<Request<'a, T>, CommError> {
        check_rank(source, self.size)?;

        Ok(Request {
            kind: RequestKind::Recv { source, tag, buf },
        })
    }

    fn wait_all<T: MPIDataType>(&self, requests: Vec<Request<'_, T>>) -> Result<(), CommError> {
        for mut request in requests {
            if let RequestKind::Recv { source, tag, buf } = request.take_kind() {
                let data = self.take_vec::<T>(source, tag)?;

                if data.len() != buf.len() {
                    return Err(CommError::Truncated {
                        peer: source,
                        expected: buf.len(),
                        received: data.len(),
                    });
                }

                buf.copy_from_slice(&data);
            }
        }

        Ok(())
    }

    fn all_gather_v<T: MPIDataType>(&self, local: &[T]) -> Result<Vec<Vec<T>>, CommError> {
        for dest in (0..self.size).filter(|&d| d != self.rank) {
            self.post(dest, TAG_ALLGATHER, Box::new(local.to_vec()))?;
        }

        let mut gathered = Vec::with_capacity(self.size);

        for source in 0..self.size {
            if source == self.rank {
                gathered.push(local.to_vec());
            } else {
                gathered.push(self.take_vec::<T>(source, TAG_ALLGATHER)?);
            }
        }

        Ok(gathered)
    }

    fn all_reduce_sum(&self, local: f64) -> Result<f64, CommError> {
        // summed in rank order, identical on every rank
        let parts = self.all_gather_v(&[local])?;

        Ok(parts.iter().map(|p| p[0]).sum())
    }
}
