//! Error taxonomy for adapter operations.

use thiserror::Error;

/// Failures surfaced by adapter operations.
///
/// `Unsupported` is a capability answer, not a runtime fault; callers can
/// branch on it instead of retrying. A missing historical record is not an
/// error at all; [`crate::BatchAdapter::info`] returns `Ok(None)` for it.
/// Nothing here is retried or recovered inside the core.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// External tool exited non-zero. Carries the captured stderr.
    #[error("{tool} failed: {stderr}")]
    Process { tool: String, stderr: String },

    /// Listing header drifted from the expected token sequence, usually a
    /// backend version change. Carries both sequences.
    #[error("{tool} header mismatch: expected {expected:?}, got {actual:?}")]
    SchemaMismatch {
        tool: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Output had the expected overall shape but could not be interpreted.
    #[error("failed to parse {tool} output: {detail}")]
    Parse { tool: String, detail: String },

    /// The operation is not provided by this backend.
    #[error("{operation} is not supported by the {backend} backend")]
    Unsupported {
        backend: &'static str,
        operation: &'static str,
    },
}
