//! LSF backend.
//!
//! Submit via bsub, query via the bjobs wide listing, cancel via bkill.
//! LSF exposes no reachable accounting store here, so a job absent from
//! the live listing is reported as completed.

pub mod adapter;
pub mod bjobs;
pub mod states;
pub mod submit;

pub use adapter::LsfAdapter;
