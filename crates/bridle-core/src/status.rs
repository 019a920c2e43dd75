//! Canonical job states.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Canonical job status.
///
/// Backends collapse their raw state codes into this set through their
/// state tables before a status is ever constructed; raw codes never leak
/// past the normalization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Eligible to run, waiting for dispatch.
    Queued,
    /// In the queue but held back (user hold, dependency hold, error hold).
    QueuedHeld,
    Running,
    /// Dispatched but currently stopped by the scheduler or a user.
    Suspended,
    /// No longer tracked by the scheduler, regardless of exit outcome.
    Completed,
    /// The backend reported a state this system cannot interpret.
    Undetermined,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::QueuedHeld => "queued_held",
            JobStatus::Running => "running",
            JobStatus::Suspended => "suspended",
            JobStatus::Completed => "completed",
            JobStatus::Undetermined => "undetermined",
        }
    }

    /// Whether the job has left the scheduler.
    pub fn is_final(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A symbol outside the canonical status set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a canonical job status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    /// Accepts exactly the canonical symbols. Raw backend codes must go
    /// through a state table instead; this never guesses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(JobStatus::Queued),
            "queued_held" => Ok(JobStatus::QueuedHeld),
            "running" => Ok(JobStatus::Running),
            "suspended" => Ok(JobStatus::Suspended),
            "completed" => Ok(JobStatus::Completed),
            "undetermined" => Ok(JobStatus::Undetermined),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
