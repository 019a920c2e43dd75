//! qsub submit-response parsing.

use once_cell::sync::Lazy;
use regex::Regex;

// qsub acknowledges with: Your job 3412 ("solve.sh") has been submitted
static SUBMIT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Your job (\d+)").expect("static pattern"));

/// Extract the new job id from a successful qsub response, if present.
pub fn parse_submit_response(stdout: &str) -> Option<String> {
    SUBMIT_ID
        .captures(stdout)
        .map(|captures| captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_id() {
        let stdout = "Your job 3412 (\"solve.sh\") has been submitted\n";
        assert_eq!(parse_submit_response(stdout), Some("3412".to_string()));
    }

    #[test]
    fn test_missing_id_is_none() {
        assert_eq!(parse_submit_response("submission accepted\n"), None);
        assert_eq!(parse_submit_response(""), None);
    }
}
