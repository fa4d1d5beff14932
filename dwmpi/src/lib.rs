//! Two-sided message passing between the ranks of one run.
//!
//! Every rank owns a [`Communicator`]. Two backends implement it:
//! [`LocalUniverse`] runs the ranks as threads of one process, and
//! `MpiWorld` (feature `mpi`) binds the MPICH library through `mpi_sys`.

mod error;
pub use error::CommError;

mod local;
pub use local::{LocalComm, LocalUniverse};

#[cfg(feature = "mpi")]
mod mpi;
#[cfg(feature = "mpi")]
pub use crate::mpi::MpiWorld;

use std::fmt::Debug;
use std::marker::PhantomData;
use types::c64;

pub const MPI_ROOT: usize = 0;

/// Element kinds that can travel through a communicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    F64,
    C64,
    I32,
    U64,
}

pub trait MPIDataType: Copy + Default + Debug + Send + 'static {
    const KIND: DataKind;
}

impl MPIDataType for f64 {
    const KIND: DataKind = DataKind::F64;
}

impl MPIDataType for c64 {
    const KIND: DataKind = DataKind::C64;
}

impl MPIDataType for i32 {
    const KIND: DataKind = DataKind::I32;
}

impl MPIDataType for u64 {
    const KIND: DataKind = DataKind::U64;
}

/// Handle of a posted non-blocking operation.
///
/// The borrowed buffer stays locked until the request is handed to
/// [`Communicator::wait_all`]. A request dropped before that blocks until
/// the operation has finished with the buffer.
pub struct Request<'a, T> {
    pub(crate) kind: RequestKind<'a, T>,
}

pub(crate) enum RequestKind<'a, T> {
    Complete(PhantomData<&'a T>),
    Recv {
        source: usize,
        tag: i32,
        buf: &'a mut [T],
    },
    #[cfg(feature = "mpi")]
    Mpi {
        handle: mpi_sys::MpiRequest,
        _buf: PhantomData<&'a mut [T]>,
    },
}

impl<'a, T> Request<'a, T> {
    pub(crate) fn complete() -> Self {
        Request {
            kind: RequestKind::Complete(PhantomData),
        }
    }

    /// Moves the pending operation out, leaving a completed request behind.
    pub(crate) fn take_kind(&mut self) -> RequestKind<'a, T> {
        std::mem::replace(&mut self.kind, RequestKind::Complete(PhantomData))
    }
}

#[cfg(feature = "mpi")]
impl<T> Drop for Request<'_, T> {
    fn drop(&mut self) {
        if let RequestKind::Mpi { handle, .. } = &mut self.kind {
            if *handle != mpi_sys::MPI_REQUEST_NULL {
                let mut status = mpi_sys::MPI_Status::default();

                // the borrow of the buffer ends with this request
                let code = unsafe { mpi_sys::MPI_Wait(handle, &mut status) };

                if code != mpi_sys::MPI_SUCCESS {
                    tracing::error!("MPI_Wait on a dropped request failed with code {}", code);
                }
            }
        }
    }
}

pub trait Communicator {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    fn is_root(&self) -> bool {
        self.rank() == MPI_ROOT
    }

    fn barrier(&self) -> Result<(), CommError>;

    fn isend<'a, T: MPIDataType>(
        &self,
        buf: &'a [T],
        dest: usize,
        tag: i32,
    ) -> Result<Request<'a, T>, CommError>;

    fn irecv<'a, T: MPIDataType>(
        &self,
        buf: &'a mut [T],
        source: usize,
        tag: i32,
    ) -> Result<Request<'a, T>, CommError>;

    /// Blocks until every request has completed. There is no timeout: a
    /// peer that never posts the matching operation stalls the caller.
    fn wait_all<T: MPIDataType>(&self, requests: Vec<Request<'_, T>>) -> Result<(), CommError>;

    /// Every rank receives the slices of all ranks, indexed by rank.
    fn all_gather_v<T: MPIDataType>(&self, local: &[T]) -> Result<Vec<Vec<T>>, CommError>;

    fn all_reduce_sum(&self, local: f64) -> Result<f64, CommError>;
}

pub(crate) fn check_rank(rank: usize, size: usize) -> Result<(), CommError> {
    if rank < size {
        Ok(())
    } else {
        Err(CommError::InvalidRank { rank, size })
    }
}
