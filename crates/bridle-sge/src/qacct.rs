//! The qacct accounting record.
//!
//! One `qacct -j <id>` invocation prints a single `key: value` block for
//! a finished job, with timestamps in the tool's C-locale format.

use bridle_core::{JobInfo, JobStatus, NodeAllocation};
use bridle_parsers::{non_empty_field, parse_ctime, parse_seconds};
use std::collections::BTreeMap;

/// The accounting tool's own "no record" signal, printed to stderr.
pub const NOT_FOUND_MARKER: &str = "not found";

/// Map one parsed accounting record to a JobInfo.
///
/// Returns None when the record carries no job number. The record exists
/// because the job left the scheduler, so the canonical status is always
/// `Completed`; the raw failure/exit fields travel in the native payload.
pub fn job_from_record(fields: &BTreeMap<String, String>) -> Option<JobInfo> {
    let id = fields.get("jobnumber").cloned()?;

    let host = fields.get("hostname").and_then(|h| non_empty_field(h));
    let slots = fields.get("slots").and_then(|s| s.parse::<u32>().ok());
    let allocated_nodes = match &host {
        Some(host) => vec![NodeAllocation {
            host: host.clone(),
            procs: slots.unwrap_or(1),
        }],
        None => Vec::new(),
    };

    let mut native = BTreeMap::new();
    for key in ["failed", "exit_status", "end_time", "account"] {
        if let Some(value) = fields.get(key) {
            native.insert(key.to_string(), value.clone());
        }
    }

    Some(JobInfo {
        id,
        status: JobStatus::Completed,
        allocated_nodes,
        submit_host: None,
        job_name: fields.get("jobname").and_then(|v| non_empty_field(v)),
        job_owner: fields.get("owner").and_then(|v| non_empty_field(v)),
        accounting_id: fields.get("project").and_then(|v| non_empty_field(v)),
        queue_name: fields.get("qname").and_then(|v| non_empty_field(v)),
        procs: slots,
        wallclock_time: fields.get("ru_wallclock").and_then(|v| parse_seconds(v)),
        wallclock_limit: None,
        cpu_time: fields.get("cpu").and_then(|v| parse_seconds(v)),
        submission_time: fields.get("qsub_time").and_then(|v| parse_ctime(v)),
        dispatch_time: fields.get("start_time").and_then(|v| parse_ctime(v)),
        native,
    })
}
