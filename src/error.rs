// ⛔ Fatal errors - conditions that abort the run
// Anomalies (ambiguous ZIPs, unmapped areas, thin plan data) are NOT errors;
// they are counted and reported through the diagnostics sink instead.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlcspError {
    /// A CSV header row did not match the expected column names exactly.
    #[error("Invalid labels in {resource}, expected: {expected:?}, actual: {actual:?}")]
    HeaderMismatch {
        resource: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// A silver plan carried a rate that is not a non-negative number.
    #[error("Could not parse rate {rate:?} for plan {plan_id}")]
    InvalidRate { plan_id: String, rate: String },

    /// A template row had no zipcode column at all.
    #[error("Missing zipcode in {resource} at line {line}")]
    MissingZipCode { resource: String, line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_mismatch_message() {
        let err = SlcspError::HeaderMismatch {
            resource: "zips.csv".to_string(),
            expected: vec!["zipcode".to_string()],
            actual: vec!["zip".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("zips.csv"));
        assert!(message.contains("\"zipcode\""));
        assert!(message.contains("\"zip\""));
    }

    #[test]
    fn test_invalid_rate_message() {
        let err = SlcspError::InvalidRate {
            plan_id: "74449NR9870320".to_string(),
            rate: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Could not parse rate \"abc\" for plan 74449NR9870320"
        );
    }
}
