//! Fixed-header table listings.

use crate::non_empty_field;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    /// The header line does not match the expected schema token for
    /// token. Carries both sequences so the drift is visible.
    #[error("{tool} header mismatch: expected {expected:?}, got {actual:?}")]
    Schema {
        tool: &'static str,
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("{tool} row has {got} columns, expected {expected}: {line}")]
    Row {
        tool: &'static str,
        expected: usize,
        got: usize,
        line: String,
    },
}

/// Shape of one backend's whitespace-delimited listing.
///
/// `name_column` is the single free-text column that may itself contain
/// whitespace. Rows with surplus tokens keep the `name_column` leading
/// tokens and the fixed count of trailing tokens, and re-join everything
/// between with single spaces. The heuristic is only correct while no
/// other column ever embeds whitespace; that assumption comes from the
/// tools' own formats and is not checked here.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub tool: &'static str,
    /// Expected header tokens, in order. Any deviation is a hard failure;
    /// the parser never adapts to a different column set.
    pub headers: &'static [&'static str],
    pub name_column: usize,
    /// Marker line some tools print instead of a header when the listing
    /// is empty.
    pub empty_marker: &'static str,
}

impl TableSchema {
    /// Parse a full listing: header line, then zero or more data rows.
    ///
    /// The empty-listing marker yields exactly one all-absent row rather
    /// than zero rows; callers must tolerate a row with every field
    /// `None`. A lone `-` in any column is an absent value.
    pub fn parse(&self, output: &str) -> Result<Vec<Vec<Option<String>>>, TableError> {
        let mut lines = output.lines().filter(|line| !line.trim().is_empty());

        let Some(first) = lines.next() else {
            return Ok(Vec::new());
        };
        if first.trim() == self.empty_marker {
            return Ok(vec![vec![None; self.headers.len()]]);
        }

        let actual: Vec<&str> = first.split_whitespace().collect();
        if actual != self.headers {
            return Err(TableError::Schema {
                tool: self.tool,
                expected: self.headers.iter().map(|h| h.to_string()).collect(),
                actual: actual.iter().map(|t| t.to_string()).collect(),
            });
        }

        lines.map(|line| self.parse_row(line)).collect()
    }

    fn parse_row(&self, line: &str) -> Result<Vec<Option<String>>, TableError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let expected = self.headers.len();
        if tokens.len() < expected {
            return Err(TableError::Row {
                tool: self.tool,
                expected,
                got: tokens.len(),
                line: line.to_string(),
            });
        }

        let mut fields: Vec<String> = Vec::with_capacity(expected);
        if tokens.len() == expected {
            fields.extend(tokens.iter().map(|t| t.to_string()));
        } else {
            // Surplus tokens can only have come from whitespace inside the
            // name column: keep the fixed flanks, re-join the middle.
            let trailing = expected - self.name_column - 1;
            fields.extend(tokens[..self.name_column].iter().map(|t| t.to_string()));
            fields.push(tokens[self.name_column..tokens.len() - trailing].join(" "));
            fields.extend(
                tokens[tokens.len() - trailing..]
                    .iter()
                    .map(|t| t.to_string()),
            );
        }

        Ok(fields.iter().map(|f| non_empty_field(f)).collect())
    }
}
