//! Raw Grid Engine state codes mapped to canonical statuses.

use bridle_core::JobStatus;

/// Raw-to-canonical state table.
///
/// Grid Engine composes state letters (hold, transfer, re-queue, error),
/// so the table enumerates the combinations the listing actually prints.
/// Error-held codes (`Eqw` family) sit in the queue and will not dispatch
/// until released, which is what `QueuedHeld` means to callers.
/// Deletion-pending codes are `Undetermined`: the job is neither reliably
/// running nor gone while the scheduler tears it down.
const STATE_TABLE: &[(&str, JobStatus)] = &[
    ("qw", JobStatus::Queued),
    ("w", JobStatus::Queued),
    ("hqw", JobStatus::QueuedHeld),
    ("hRwq", JobStatus::QueuedHeld),
    ("Eqw", JobStatus::QueuedHeld),
    ("Ehqw", JobStatus::QueuedHeld),
    ("EhRqw", JobStatus::QueuedHeld),
    ("r", JobStatus::Running),
    ("t", JobStatus::Running),
    ("Rr", JobStatus::Running),
    ("Rt", JobStatus::Running),
    ("s", JobStatus::Suspended),
    ("ts", JobStatus::Suspended),
    ("S", JobStatus::Suspended),
    ("tS", JobStatus::Suspended),
    ("T", JobStatus::Suspended),
    ("tT", JobStatus::Suspended),
    ("Rs", JobStatus::Suspended),
    ("Rts", JobStatus::Suspended),
    ("RS", JobStatus::Suspended),
    ("RtS", JobStatus::Suspended),
    ("RT", JobStatus::Suspended),
    ("RtT", JobStatus::Suspended),
    ("dr", JobStatus::Undetermined),
    ("dt", JobStatus::Undetermined),
    ("dRr", JobStatus::Undetermined),
    ("ds", JobStatus::Undetermined),
    ("dS", JobStatus::Undetermined),
    ("dT", JobStatus::Undetermined),
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
