//! Key-value accounting record blocks.

use std::collections::BTreeMap;

/// Parse one `key: value` record block into a field mapping.
///
/// The first colon ends the key; everything after it, trimmed, is the
/// value, so values may themselves contain colons (timestamps do). Blank
/// lines and banner rules (runs of `=` or `-`) are skipped. A later
/// duplicate of a key overwrites the earlier one.
pub fn parse_record(block: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() || line.chars().all(|c| c == '=' || c == '-') {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    fields
}
