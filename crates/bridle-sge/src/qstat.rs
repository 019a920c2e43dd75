//! The `qstat -xml` live listing, consumed as a stream of markup events.
//!
//! A full-cluster listing can enumerate thousands of jobs, so the
//! document is never materialized as a tree: events are folded through a
//! small state machine and memory stays bounded by one job's worth of
//! accumulated fields.

use crate::states;
use bridle_core::{JobInfo, NodeAllocation};
use bridle_parsers::{non_empty_field, parse_iso_timestamp};
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QstatError {
    #[error("malformed qstat listing: {0}")]
    Malformed(String),
}

/// Element wrapping one job in the listing.
const JOB_ELEMENT: &[u8] = b"job_list";

/// Scanner states: between job elements, or inside one accumulating
/// leaf-element text keyed by element name.
enum Scan {
    Outside,
    InJob {
        fields: BTreeMap<String, String>,
        current: Option<String>,
    },
}

/// Fold the markup event stream into one field mapping per job element,
/// in document order. A job's mapping is flushed to the output the moment
/// its closing boundary is seen.
pub fn parse_listing(xml: &str) -> Result<Vec<BTreeMap<String, String>>, QstatError> {
    let mut reader = Reader::from_str(xml);
    let mut jobs = Vec::new();
    let mut state = Scan::Outside;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                match &mut state {
                    Scan::Outside if start.name().as_ref() == JOB_ELEMENT => {
                        state = Scan::InJob {
                            fields: BTreeMap::new(),
                            current: None,
                        };
                    }
                    Scan::InJob { current, .. } => *current = Some(name),
                    Scan::Outside => {}
                }
            }
            Ok(Event::End(end)) => match &mut state {
                Scan::InJob { fields, current } => {
                    if end.name().as_ref() == JOB_ELEMENT {
                        jobs.push(std::mem::take(fields));
                        state = Scan::Outside;
                    } else {
                        *current = None;
                    }
                }
                Scan::Outside => {}
            },
            Ok(Event::Text(text)) => {
                if let Scan::InJob {
                    fields,
                    current: Some(field),
                } = &mut state
                {
                    let value = text
                        .unescape()
                        .map_err(|e| QstatError::Malformed(e.to_string()))?;
                    let value = value.trim();
                    if !value.is_empty() {
                        fields.insert(field.clone(), value.to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(QstatError::Malformed(e.to_string())),
        }
    }

    Ok(jobs)
}

/// Map one accumulated job element to a JobInfo.
///
/// Returns None when the element carries no job number. The listing has
/// no elapsed field, so for dispatched jobs the wallclock is derived as
/// `now` minus the start time; `now` is a parameter so the derivation is
/// testable against a fixed clock.
pub fn job_from_fields(
    fields: &BTreeMap<String, String>,
    now: DateTime<Utc>,
) -> Option<JobInfo> {
    let id = fields.get("JB_job_number").cloned()?;

    let raw_state = fields.get("state").map(String::as_str).unwrap_or("");
    let status = states::normalize(raw_state);

    // queue_name is "queue@host"; the host carries the allocation.
    let (queue_name, exec_host) = match fields.get("queue_name") {
        Some(value) => match value.split_once('@') {
            Some((queue, host)) => (non_empty_field(queue), non_empty_field(host)),
            None => (non_empty_field(value), None),
        },
        None => (None, None),
    };

    let slots = fields.get("slots").and_then(|s| s.parse::<u32>().ok());
    let allocated_nodes = match &exec_host {
        Some(host) => vec![NodeAllocation {
            host: host.clone(),
            procs: slots.unwrap_or(1),
        }],
        None => Vec::new(),
    };
    let procs = slots.or_else(|| {
        if allocated_nodes.is_empty() {
            None
        } else {
            Some(1)
        }
    });

    let submission_time = fields
        .get("JB_submission_time")
        .and_then(|s| parse_iso_timestamp(s));
    let dispatch_time = fields
        .get("JAT_start_time")
        .and_then(|s| parse_iso_timestamp(s));
    let wallclock_time = dispatch_time.and_then(|started| {
        let elapsed = (now - started).num_seconds();
        (elapsed >= 0).then_some(elapsed as u64)
    });

    let mut native = BTreeMap::new();
    native.insert("state".to_string(), raw_state.to_string());
    if let Some(priority) = fields.get("JAT_prio") {
        native.insert("JAT_prio".to_string(), priority.clone());
    }

    Some(JobInfo {
        id,
        status,
        allocated_nodes,
        submit_host: None,
        job_name: fields.get("JB_name").cloned(),
        job_owner: fields.get("JB_owner").cloned(),
        accounting_id: None,
        queue_name,
        procs,
        wallclock_time,
        wallclock_limit: None,
        cpu_time: None,
        submission_time,
        dispatch_time,
        native,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridle_core::JobStatus;
    use chrono::TimeZone;

    const LISTING: &str = r#"<?xml version='1.0'?>
<job_info>
  <queue_info>
    <job_list state="running">
      <JB_job_number>3412</JB_job_number>
      <JAT_prio>0.55500</JAT_prio>
      <JB_name>solve the grid</JB_name>
      <JB_owner>jdoe</JB_owner>
      <state>r</state>
      <JAT_start_time>2024-03-14T13:10:02</JAT_start_time>
      <queue_name>all.q@node07</queue_name>
      <slots>4</slots>
    </job_list>
  </queue_info>
  <job_info>
    <job_list state="pending">
      <JB_job_number>3413</JB_job_number>
      <JAT_prio>0.00000</JAT_prio>
      <JB_name>queued_solve</JB_name>
      <JB_owner>jdoe</JB_owner>
      <state>hqw</state>
      <JB_submission_time>2024-03-14T13:15:00</JB_submission_time>
      <queue_name></queue_name>
      <slots>1</slots>
    </job_list>
  </job_info>
</job_info>
"#;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 13, 20, 2).unwrap()
    }

    #[test]
    fn test_one_mapping_per_job_in_document_order() {
        let records = parse_listing(LISTING).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].get("JB_job_number").map(String::as_str),
            Some("3412")
        );
        assert_eq!(
            records[1].get("JB_job_number").map(String::as_str),
            Some("3413")
        );
        // Fields never bleed across job boundaries.
        assert!(!records[1].contains_key("JAT_start_time"));
    }

    #[test]
    fn test_running_job_mapping() {
        let records = parse_listing(LISTING).unwrap();
        let job = job_from_fields(&records[0], fixed_now()).unwrap();

        assert_eq!(job.id, "3412");
        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.job_name.as_deref(), Some("solve the grid"));
        assert_eq!(job.job_owner.as_deref(), Some("jdoe"));
        assert_eq!(job.queue_name.as_deref(), Some("all.q"));
        assert_eq!(
            job.allocated_nodes,
            vec![NodeAllocation {
                host: "node07".to_string(),
                procs: 4,
            }]
        );
        assert_eq!(job.procs, Some(4));
        // Dispatched 13:10:02, fixed now 13:20:02.
        assert_eq!(job.wallclock_time, Some(600));
        assert_eq!(job.native.get("state").map(String::as_str), Some("r"));
    }

    #[test]
    fn test_held_job_mapping() {
        let records = parse_listing(LISTING).unwrap();
        let job = job_from_fields(&records[1], fixed_now()).unwrap();

        assert_eq!(job.status, JobStatus::QueuedHeld);
        assert!(job.allocated_nodes.is_empty());
        assert!(job.dispatch_time.is_none());
        assert_eq!(job.wallclock_time, None);
        assert!(job.submission_time.is_some());
    }

    #[test]
    fn test_empty_listing() {
        let xml = "<?xml version='1.0'?><job_info><queue_info></queue_info></job_info>";
        assert!(parse_listing(xml).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_document_is_malformed() {
        let xml = "<job_info><queue_info><job_list><JB_job_number>1</JB_job";
        assert!(parse_listing(xml).is_err());
    }

    #[test]
    fn test_fields_without_job_number_map_to_none() {
        let mut fields = BTreeMap::new();
        fields.insert("state".to_string(), "r".to_string());
        assert!(job_from_fields(&fields, fixed_now()).is_none());
    }
}
