//! The operation contract every backend implements.

use crate::error::AdapterError;
use crate::job::JobInfo;
use crate::status::JobStatus;

/// Uniform operations over one batch scheduler.
///
/// Every method maps to exactly one external tool invocation; the calling
/// task is suspended until that tool exits, with no internal concurrency,
/// timeout, or retry. Adapters hold only immutable configuration fixed at
/// construction, so one instance may serve concurrent callers.
///
/// `hold` and `release` default to a capability error; backends whose
/// tools support them override the defaults.
#[allow(async_fn_in_trait)]
pub trait BatchAdapter {
    /// Backend name used in capability errors.
    fn backend(&self) -> &'static str;

    /// Submit a job script, piped to the submission tool on stdin, and
    /// return the scheduler-assigned job id. `dependencies` are job ids
    /// this job must wait for.
    async fn submit(
        &self,
        script: &str,
        dependencies: &[String],
    ) -> Result<String, AdapterError>;

    /// Look up one job. Live listing first; a job absent from it is either
    /// reported from the backend's historical store, assumed completed
    /// when no such store exists, or `Ok(None)` when the store itself has
    /// no record.
    async fn info(&self, id: &str) -> Result<Option<JobInfo>, AdapterError>;

    /// Every job in the live listing.
    async fn info_all(&self) -> Result<Vec<JobInfo>, AdapterError>;

    /// Current canonical status, from the live listing only. A job the
    /// listing no longer reports is `Completed`; the historical store is
    /// never consulted on this path.
    async fn status(&self, id: &str) -> Result<JobStatus, AdapterError>;

    async fn hold(&self, _id: &str) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported {
            backend: self.backend(),
            operation: "hold",
        })
    }

    async fn release(&self, _id: &str) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported {
            backend: self.backend(),
            operation: "release",
        })
    }

    /// Remove the job from the scheduler.
    async fn delete(&self, id: &str) -> Result<(), AdapterError>;
}
