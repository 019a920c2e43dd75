//! The `bjobs -W` wide listing.

use crate::states;
use bridle_core::{JobInfo, NodeAllocation};
use bridle_parsers::{TableSchema, parse_clock_duration, parse_slash_timestamp};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// The `bjobs -W` header, token for token. Any drift is a schema error;
/// the parser never adapts to a different column set.
pub const BJOBS_SCHEMA: TableSchema = TableSchema {
    tool: "bjobs",
    headers: &[
        "JOBID",
        "USER",
        "STAT",
        "QUEUE",
        "FROM_HOST",
        "EXEC_HOST",
        "JOB_NAME",
        "SUBMIT_TIME",
        "PROJ_NAME",
        "CPU_USED",
        "MEM",
        "SWAP",
        "PIDS",
        "START_TIME",
        "FINISH_TIME",
    ],
    // JOB_NAME is the only column that may contain whitespace.
    name_column: 6,
    empty_marker: "No unfinished job found",
};

const COL_JOBID: usize = 0;
const COL_USER: usize = 1;
const COL_STAT: usize = 2;
const COL_QUEUE: usize = 3;
const COL_FROM_HOST: usize = 4;
const COL_EXEC_HOST: usize = 5;
const COL_JOB_NAME: usize = 6;
const COL_SUBMIT_TIME: usize = 7;
const COL_PROJ_NAME: usize = 8;
const COL_CPU_USED: usize = 9;
const COL_MEM: usize = 10;
const COL_SWAP: usize = 11;
const COL_PIDS: usize = 12;
const COL_START_TIME: usize = 13;
const COL_FINISH_TIME: usize = 14;

fn field(row: &[Option<String>], idx: usize) -> Option<&str> {
    row.get(idx).and_then(|f| f.as_deref())
}

/// Expand an EXEC_HOST value ("4*node01:node02") into node allocations.
/// A host without a multiplier contributes one processor.
fn parse_exec_hosts(s: &str) -> Vec<NodeAllocation> {
    s.split(':')
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('*') {
            Some((count, host)) => NodeAllocation {
                host: host.to_string(),
                procs: count.parse().unwrap_or(1),
            },
            None => NodeAllocation {
                host: part.to_string(),
                procs: 1,
            },
        })
        .collect()
}

/// Map one parsed listing row to a JobInfo.
///
/// Returns None for a row without a job id (the all-absent row an empty
/// listing produces). The wide listing has no elapsed column, so for
/// dispatched jobs the wallclock is derived as `now` minus the start
/// time, a still-accruing duration for running jobs. `now` is a
/// parameter so the derivation is testable against a fixed clock.
pub fn job_from_row(row: &[Option<String>], now: DateTime<Utc>) -> Option<JobInfo> {
    let id = field(row, COL_JOBID)?.to_string();
    let status = states::normalize(field(row, COL_STAT).unwrap_or(""));

    let allocated_nodes = field(row, COL_EXEC_HOST)
        .map(parse_exec_hosts)
        .unwrap_or_default();
    let procs = if allocated_nodes.is_empty() {
        None
    } else {
        Some(allocated_nodes.iter().map(|n| n.procs).sum())
    };

    let submission_time = field(row, COL_SUBMIT_TIME).and_then(parse_slash_timestamp);
    let dispatch_time = field(row, COL_START_TIME).and_then(parse_slash_timestamp);
    let wallclock_time = dispatch_time.and_then(|started| {
        let elapsed = (now - started).num_seconds();
        (elapsed >= 0).then_some(elapsed as u64)
    });

    let mut native = BTreeMap::new();
    for (idx, key) in [
        (COL_MEM, "MEM"),
        (COL_SWAP, "SWAP"),
        (COL_PIDS, "PIDS"),
        (COL_FINISH_TIME, "FINISH_TIME"),
    ] {
        if let Some(value) = field(row, idx) {
            native.insert(key.to_string(), value.to_string());
        }
    }

    Some(JobInfo {
        id,
        status,
        allocated_nodes,
        submit_host: field(row, COL_FROM_HOST).map(str::to_string),
        job_name: field(row, COL_JOB_NAME).map(str::to_string),
        job_owner: field(row, COL_USER).map(str::to_string),
        accounting_id: field(row, COL_PROJ_NAME).map(str::to_string),
        queue_name: field(row, COL_QUEUE).map(str::to_string),
        procs,
        wallclock_time,
        wallclock_limit: None,
        cpu_time: field(row, COL_CPU_USED).and_then(parse_clock_duration),
        submission_time,
        dispatch_time,
        native,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridle_core::JobStatus;
    use chrono::{Datelike, TimeZone};

    const HEADER: &str = "JOBID USER STAT QUEUE FROM_HOST EXEC_HOST JOB_NAME \
                          SUBMIT_TIME PROJ_NAME CPU_USED MEM SWAP PIDS START_TIME FINISH_TIME";

    fn fixed_now() -> chrono::DateTime<Utc> {
        // Listing timestamps carry no year, so pin "now" to the current
        // year to keep the derivation stable.
        let year = Utc::now().year();
        Utc.with_ymd_and_hms(year, 10, 21, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_running_job_row() {
        let output = format!(
            "{HEADER}\n\
             4211 jdoe RUN normal login01 2*node01:node02 solve 10/21-17:00:00 \
             proj42 000:01:30.00 128 256 4211 10/21-17:30:00 -\n"
        );
        let rows = BJOBS_SCHEMA.parse(&output).unwrap();
        let job = job_from_row(&rows[0], fixed_now()).unwrap();

        assert_eq!(job.id, "4211");
        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.job_owner.as_deref(), Some("jdoe"));
        assert_eq!(job.queue_name.as_deref(), Some("normal"));
        assert_eq!(job.submit_host.as_deref(), Some("login01"));
        assert_eq!(job.accounting_id.as_deref(), Some("proj42"));
        assert_eq!(
            job.allocated_nodes,
            vec![
                NodeAllocation {
                    host: "node01".to_string(),
                    procs: 2,
                },
                NodeAllocation {
                    host: "node02".to_string(),
                    procs: 1,
                },
            ]
        );
        assert_eq!(job.procs, Some(3));
        assert_eq!(job.cpu_time, Some(90));
        // Started 17:30, now 18:00: the derived wallclock is the live gap.
        assert_eq!(job.wallclock_time, Some(1800));
        assert_eq!(job.native.get("MEM").map(String::as_str), Some("128"));
        assert!(!job.native.contains_key("FINISH_TIME"));
    }

    #[test]
    fn test_pending_job_has_no_wallclock() {
        let output = format!(
            "{HEADER}\n\
             4212 jdoe PEND normal login01 - queued_solve 10/21-17:00:00 \
             - - - - - - -\n"
        );
        let rows = BJOBS_SCHEMA.parse(&output).unwrap();
        let job = job_from_row(&rows[0], fixed_now()).unwrap();

        assert_eq!(job.status, JobStatus::Queued);
        assert!(job.allocated_nodes.is_empty());
        assert_eq!(job.procs, None);
        // No dispatch timestamp, no derived wallclock.
        assert_eq!(job.wallclock_time, None);
        assert_eq!(job.cpu_time, None);
    }

    #[test]
    fn test_multiword_name_round_trips() {
        let output = format!(
            "{HEADER}\n\
             4213 jdoe RUN normal login01 node03 solve the grid 10/21-17:00:00 \
             - 000:00:05.00 - - - 10/21-17:30:00 -\n"
        );
        let rows = BJOBS_SCHEMA.parse(&output).unwrap();
        let job = job_from_row(&rows[0], fixed_now()).unwrap();
        assert_eq!(job.job_name.as_deref(), Some("solve the grid"));
        assert_eq!(job.submit_host.as_deref(), Some("login01"));
    }

    #[test]
    fn test_marker_row_maps_to_none() {
        let rows = BJOBS_SCHEMA.parse("No unfinished job found\n").unwrap();
        assert!(job_from_row(&rows[0], fixed_now()).is_none());
    }

    #[test]
    fn test_exec_host_single() {
        assert_eq!(
            parse_exec_hosts("node05"),
            vec![NodeAllocation {
                host: "node05".to_string(),
                procs: 1,
            }]
        );
    }
}
