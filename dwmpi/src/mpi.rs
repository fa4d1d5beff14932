use crate::{check_rank, CommError, Communicator, DataKind, MPIDataType, Request, RequestKind};

use mpi_sys::*;
use std::marker::PhantomData;
use std::os::raw::{c_int, c_void};
use std::ptr;

fn datatype_of(kind: DataKind) -> MpiDatatype {
    match kind {
        DataKind::F64 => MPI_DOUBLE,
        DataKind::C64 => MPI_DOUBLE_COMPLEX,
        DataKind::I32 => MPI_INT,
        DataKind::U64 => MPI_UNSIGNED_LONG_LONG,
    }
}

fn check(call: &'static str, code: c_int) -> Result<(), CommError> {
    if code == MPI_SUCCESS {
        Ok(())
    } else {
        Err(CommError::Mpi { call, code })
    }
}

/// `MPI_COMM_WORLD` of an MPICH run. Finalizes MPI when dropped.
pub struct MpiWorld {
    comm: MpiComm,
    rank: usize,
    size: usize,
}

impl MpiWorld {
    pub fn init() -> Result<MpiWorld, CommError> {
        let mut rank: c_int = 0;
        let mut size: c_int = 0;

        unsafe {
            check("MPI_Init", MPI_Init(ptr::null(), ptr::null()))?;
            check("MPI_Comm_rank", MPI_Comm_rank(MPI_COMM_WORLD, &mut rank))?;
            check("MPI_Comm_size", MPI_Comm_size(MPI_COMM_WORLD, &mut size))?;
        }

        Ok(MpiWorld {
            comm: MPI_COMM_WORLD,
            rank: rank as usize,
            size: size as usize,
        })
    }
}

impl Drop for MpiWorld {
    fn drop(&mut self) {
        unsafe {
            MPI_Finalize();
        }
    }
}

impl Communicator for MpiWorld {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) -> Result<(), CommError> {
        unsafe { check("MPI_Barrier", MPI_Barrier(self.comm)) }
    }

    fn isend<'a, T: MPIDataType>(
        &self,
        buf: &'a [T],
        dest: usize,
        tag: i32,
    ) -> Result<Request<'a, T>, CommError> {
        check_rank(dest, self.size)?;

        let mut handle: MpiRequest = MPI_REQUEST_NULL;

        unsafe {
            check(
                "MPI_Isend",
                MPI_Isend(
                    buf.as_ptr() as *const c_void,
                    buf.len() as c_int,
                    datatype_of(T::KIND),
                    dest as c_int,
                    tag,
                    self.comm,
                    &mut handle,
                ),
            )?;
        }

        Ok(Request {
            kind: RequestKind::Mpi {
                handle,
                _buf: PhantomData,
            },
        })
    }

    fn irecv<'a, T: MPIDataType>(
        &self,
        buf: &'a mut [T],
        source: usize,
        tag: i32,
    ) -> Result<Request<'a, T>, CommError> {
        check_rank(source, self.size)?;

        let mut handle: MpiRequest = MPI_REQUEST_NULL;

        unsafe {
            check(
                "MPI_Irecv",
                MPI_Irecv(
                    buf.as_mut_ptr() as *mut c_void,
                    buf.len() as c_int,
                    datatype_of(T::KIND),
                    source as c_int,
                    tag,
                    self.comm,
                    &mut handle,
                ),
            )?;
        }

        Ok(Request {
            kind: RequestKind::Mpi {
                handle,
                _buf: PhantomData,
            },
        })
    }

    fn wait_all<T: MPIDataType>(
        &self,
        mut requests: Vec<Request<'_, T>>,
    ) -> Result<(), CommError> {
        let mut handles: Vec<MpiRequest> = requests
            .iter()
            .filter_map(|r| match r.kind {
                RequestKind::Mpi { handle, .. } => Some(handle),
                _ => None,
            })
            .collect();

        if handles.is_empty() {
            return Ok(());
        }

        let mut statuses = vec![MPI_Status::default(); handles.len()];

        unsafe {
            check(
                "MPI_Waitall",
                MPI_Waitall(
                    handles.len() as c_int,
                    handles.as_mut_ptr(),
                    statuses.as_mut_ptr(),
                ),
            )?;
        }

        // MPI_Waitall has freed the handles, the requests must not wait again
        for request in requests.iter_mut() {
            if let RequestKind::Mpi { handle, .. } = &mut request.kind {
                *handle = MPI_REQUEST_NULL;
            }
        }

        Ok(())
    }

    fn all_gather_v<T: MPIDataType>(&self, local: &[T]) -> Result<Vec<Vec<T>>, CommError> {
        let nlocal = local.len() as c_int;
        let mut counts = vec![0 as c_int; self.size];

        unsafe {
            check(
                "MPI_Allgather",
                MPI_Allgather(
                    &nlocal as *const c_int as *const c_void,
                    1,
                    MPI_INT,
                    counts.as_mut_ptr() as *mut c_void,
                    1,
                    MPI_INT,
                    self.comm,
                ),
            )?;
        }

        let mut displs = vec![0 as c_int; self.size];
        for i in 1..self.size {
            displs[i] = displs[i - 1] + counts[i - 1];
        }

        let ntot: usize = counts.iter().map(|&c| c as usize).sum();
        let mut gathered = vec![T::default(); ntot];

        unsafe {
            check(
                "MPI_Allgatherv",
                MPI_Allgatherv(
                    local.as_ptr() as *const c_void,
                    nlocal,
                    datatype_of(T::KIND),
                    gathered.as_mut_ptr() as *mut c_void,
                    counts.as_ptr(),
                    displs.as_ptr(),
                    datatype_of(T::KIND),
                    self.comm,
                ),
            )?;
        }

        Ok((0..self.size)
            .map(|r| {
                let start = displs[r] as usize;
                gathered[start..start + counts[r] as usize].to_vec()
            })
            .collect())
    }

    fn all_reduce_sum(&self, local: f64) -> Result<f64, CommError> {
        let mut total = 0.0f64;

        unsafe {
            check(
                "MPI_Allreduce",
                MPI_Allreduce(
                    &local as *const f64 as *const c_void,
                    &mut total as *mut f64 as *mut c_void,
                    1,
                    MPI_DOUBLE,
                    MPI_SUM,
                    self.comm,
                ),
            )?;
        }

        Ok(total)
    }
}
