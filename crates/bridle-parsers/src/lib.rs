//! Shared parsing machinery for scheduler command output.
//!
//! Process invocation plus the format-level parsers the backend crates
//! build on: fixed-header table listings, key-value record blocks, and
//! the timestamp/duration helpers.

pub mod command;
pub mod records;
pub mod table;
pub mod time;

pub use command::{CommandError, Invocation, RawOutput, Toolchain, invoke, invoke_raw};
pub use records::parse_record;
pub use table::{TableError, TableSchema};
pub use time::{
    parse_clock_duration, parse_ctime, parse_epoch_seconds, parse_iso_timestamp, parse_seconds,
    parse_slash_timestamp,
};

/// Filter helper for optional fields: empty strings and the `-`
/// placeholder become `None`, never the literal text.
pub fn non_empty_field(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" {
        None
    } else {
        Some(trimmed.to_string())
    }
}
