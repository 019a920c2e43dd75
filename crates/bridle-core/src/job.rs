//! Backend-agnostic job description.

use crate::status::JobStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of an allocation with its processor share.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeAllocation {
    pub host: String,
    pub procs: u32,
}

/// Everything this system knows about one job, in backend-agnostic form.
///
/// Built fresh from each parsed scheduler response and never mutated.
/// Equality and hashing are derived over the full field set, so two
/// descriptions compare equal exactly when every field matches and equal
/// values always hash alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobInfo {
    /// Scheduler-assigned identifier, never empty.
    pub id: String,
    pub status: JobStatus,
    /// Nodes the job runs on, in scheduler order. Empty if unknown.
    pub allocated_nodes: Vec<NodeAllocation>,
    pub submit_host: Option<String>,
    pub job_name: Option<String>,
    pub job_owner: Option<String>,
    pub accounting_id: Option<String>,
    pub queue_name: Option<String>,
    /// Total allocated processors across all nodes.
    pub procs: Option<u32>,
    /// Elapsed wallclock seconds. For running jobs this is a snapshot that
    /// keeps accruing on the scheduler side.
    pub wallclock_time: Option<u64>,
    /// Requested wallclock limit in seconds.
    pub wallclock_limit: Option<u64>,
    /// Consumed CPU seconds.
    pub cpu_time: Option<u64>,
    pub submission_time: Option<DateTime<Utc>>,
    pub dispatch_time: Option<DateTime<Utc>>,
    /// Raw backend fields with no cross-backend meaning. Participates in
    /// structural equality like every other field.
    pub native: BTreeMap<String, String>,
}

impl JobInfo {
    /// Minimal description: the given status and nothing else known.
    pub fn with_status(id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            id: id.into(),
            status,
            allocated_nodes: Vec::new(),
            submit_host: None,
            job_name: None,
            job_owner: None,
            accounting_id: None,
            queue_name: None,
            procs: None,
            wallclock_time: None,
            wallclock_limit: None,
            cpu_time: None,
            submission_time: None,
            dispatch_time: None,
            native: BTreeMap::new(),
        }
    }

    /// The fallback value for a job the live listing no longer reports:
    /// canonical status completed, every other field absent.
    pub fn completed(id: impl Into<String>) -> Self {
        Self::with_status(id, JobStatus::Completed)
    }
}
