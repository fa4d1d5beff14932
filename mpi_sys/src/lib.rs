#![allow(non_snake_case, non_camel_case_types)]
use libc::{c_char, c_int, c_void};

// MPICH ABI: every handle is a plain integer.

pub type MpiComm = c_int;
pub type MpiDatatype = c_int;
pub type MpiOp = c_int;
pub type MpiRequest = c_int;

pub const MPI_SUCCESS: c_int = 0;

pub const MPI_SUM: MpiOp = 0x58000003;

pub const MPI_COMM_WORLD: MpiComm = 0x44000000;

pub const MPI_REQUEST_NULL: MpiRequest = 0x2c000000;

pub const MPI_INT: MpiDatatype = 0x4c000405;
pub const MPI_DOUBLE: MpiDatatype = 0x4c00080b;
pub const MPI_UNSIGNED_LONG_LONG: MpiDatatype = 0x4c000819;
pub const MPI_DOUBLE_COMPLEX: MpiDatatype = 1275072546;

#[repr(C)]
#[derive(Default, Debug, Clone, Copy)]
pub struct MPI_Status {
    pub count_lo: c_int,
    pub count_hi_and_cancelled: c_int,
    pub mpi_source: c_int,
    pub mpi_tag: c_int,
    pub mpi_error: c_int,
}

#[link(name = "mpich", kind = "dylib")]
extern "C" {
    pub fn MPI_Init(argc: *const c_int, argv: *const c_char) -> c_int;

    pub fn MPI_Finalize() -> c_int;

    pub fn MPI_Comm_rank(comm: MpiComm, rank: *mut c_int) -> c_int;

    pub fn MPI_Comm_size(comm: MpiComm, size: *mut c_int) -> c_int;

    pub fn MPI_Barrier(comm: MpiComm) -> c_int;

    pub fn MPI_Isend(
        buf: *const c_void,
        count: c_int,
        datatype: MpiDatatype,
        dest: c_int,
        tag: c_int,
        comm: MpiComm,
        request: *mut MpiRequest,
    ) -> c_int;

    pub fn MPI_Irecv(
        buf: *mut c_void,
        count: c_int,
        datatype: MpiDatatype,
        source: c_int,
        tag: c_int,
        comm: MpiComm,
        request: *mut MpiRequest,
    ) -> c_int;

    pub fn MPI_Wait(request: *mut MpiRequest, status: *mut MPI_Status) -> c_int;

    pub fn MPI_Waitall(
        count: c_int,
        requests: *mut MpiRequest,
        statuses: *mut MPI_Status,
    ) -> c_int;

    pub fn MPI_Allgather(
        sendbuf: *const c_void,
        sendcount: c_int,
        sendtype: MpiDatatype,
        recvbuf: *mut c_void,
        recvcount: c_int,
        recvtype: MpiDatatype,
        comm: MpiComm,
    ) -> c_int;

    pub fn MPI_Allgatherv(
        sendbuf: *const c_void,
        sendcount: c_int,
        sendtype: MpiDatatype,
        recvbuf: *mut c_void,
        recvcounts: *const c_int,
        displs: *const c_int,
        recvtype: MpiDatatype,
        comm: MpiComm,
    ) -> c_int;

    pub fn MPI_Allreduce(
        sendbuf: *const c_void,
        recvbuf: *mut c_void,
        count: c_int,
        datatype: MpiDatatype,
        op: MpiOp,
        comm: MpiComm,
    ) -> c_int;
}
