//! bsub submit-response parsing.

use once_cell::sync::Lazy;
use regex::Regex;

// bsub acknowledges with: Job <4211> is submitted to queue <normal>.
static SUBMIT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Job <(\d+)> is submitted").expect("static pattern"));

/// Extract the new job id from a successful bsub response, if present.
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
        let stdout = "Job <4211> is submitted to queue <normal>.\n";
        assert_eq!(parse_submit_response(stdout), Some("4211".to_string()));
    }

    #[test]
    fn test_tolerates_leading_noise() {
        let stdout = "Warning: project not set\nJob <97> is submitted to queue <short>.\n";
        assert_eq!(parse_submit_response(stdout), Some("97".to_string()));
    }

    #[test]
    fn test_missing_id_is_none() {
        assert_eq!(parse_submit_response("Request accepted\n"), None);
        assert_eq!(parse_submit_response(""), None);
    }
}
