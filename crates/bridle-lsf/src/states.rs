//! Raw LSF state codes mapped to canonical statuses.

use bridle_core::JobStatus;

/// Raw-to-canonical state table.
///
/// Many-to-one is expected: DONE and EXIT both collapse to Completed
/// because the canonical set tracks departure from the scheduler, not
/// exit outcome.
const STATE_TABLE: &[(&str, JobStatus)] = &[
    ("PEND", JobStatus::Queued),
    ("WAIT", JobStatus::Queued),
    ("PSUSP", JobStatus::QueuedHeld),
    ("RUN", JobStatus::Running),
    ("USUSP", JobStatus::Suspended),
    ("SSUSP", JobStatus::Suspended),
    ("DONE", JobStatus::Completed),
    ("EXIT", JobStatus::Completed),
    ("UNKWN", JobStatus::Undetermined),
    ("ZOMBI", JobStatus::Undetermined),
];

/// Collapse a raw state code to its canonical status.
///
/// Total by policy: a code missing from the table is `Undetermined`,
/// never an error.
pub fn normalize(raw: &str) -> JobStatus {
    STATE_TABLE
        .iter()
        .find(|(code, _)| *code == raw)
        .map(|(_, status)| *status)
        .unwrap_or(JobStatus::Undetermined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_entry_normalizes() {
        for (code, status) in STATE_TABLE {
            assert_eq!(normalize(code), *status, "code {code}");
        }
    }

    #[test]
    fn test_unknown_code_is_undetermined() {
        assert_eq!(normalize("FLOAT"), JobStatus::Undetermined);
        assert_eq!(normalize(""), JobStatus::Undetermined);
        // Lookup is case-exact; the tools emit upper case.
        assert_eq!(normalize("run"), JobStatus::Undetermined);
    }

    #[test]
    fn test_suspended_codes_collapse() {
        assert_eq!(normalize("USUSP"), JobStatus::Suspended);
        assert_eq!(normalize("SSUSP"), JobStatus::Suspended);
        assert_eq!(normalize("PSUSP"), JobStatus::QueuedHeld);
    }
}
