//! Error types for ireval-core.
//!
//! This module defines the errors raised while resolving measure
//! specifications, reading TREC text files and aggregating per-query values.

use thiserror::Error;

/// Errors that can occur while resolving measure specifications.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// Specification does not name a base measure or nickname
    #[error("Unsupported measure: {0}")]
    UnsupportedMeasure(String),
    /// Parameter list does not fit the measure's parameter grammar
    #[error("Invalid parameters in '{spec}': {reason}")]
    InvalidParameters { spec: String, reason: String },
    /// Parameters gathered from several specifications cannot be merged
    #[error("Conflicting parameters for '{measure}': {reason}")]
    ConflictingParameters { measure: String, reason: String },
    /// Relevance level must be at least 1
    #[error("Relevance level must be positive, got {0}")]
    InvalidRelevanceLevel(i64),
}

/// Errors that can occur while reading qrel and run files.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Underlying reader failed
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
    /// Line has the wrong number of whitespace-separated fields
    #[error("Line {line}: expected {expected} fields, found {found}")]
    MalformedLine {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// Numeric field could not be parsed
    #[error("Line {line}: invalid {field} '{value}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    /// The same item appears twice for one query
    #[error("Line {line}: duplicate item '{item}' for query '{query}'")]
    DuplicateItem {
        line: usize,
        query: String,
        item: String,
    },
}

/// Errors that can occur during cross-query aggregation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    /// No per-query values to average
    #[error("No data to aggregate for measure '{0}'")]
    NoData(String),
}

// Conversion implementations for error chaining

impl From<MeasureError> for String {
    fn from(err: MeasureError) -> String {
        err.to_string()
    }
}

impl From<ParseError> for String {
    fn from(err: ParseError) -> String {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_measure_names_spec() {
        let err = MeasureError::UnsupportedMeasure("ndcg_foo".to_string());
        assert_eq!(err.to_string(), "Unsupported measure: ndcg_foo");
    }

    #[test]
    fn test_duplicate_item_message() {
        let err = ParseError::DuplicateItem {
            line: 3,
            query: "q1".to_string(),
            item: "d2".to_string(),
        };
        let msg: String = err.into();
        assert_eq!(msg, "Line 3: duplicate item 'd2' for query 'q1'");
    }
}
