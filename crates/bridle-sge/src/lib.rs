//! Grid Engine backend.
//!
//! Submit via qsub, query the live listing via `qstat -xml`, fall back to
//! the qacct accounting store for jobs that have left the queue, and
//! drive qhold/qrls/qdel for the lifecycle operations.

pub mod adapter;
pub mod qacct;
pub mod qstat;
pub mod states;
pub mod submit;

pub use adapter::SgeAdapter;
