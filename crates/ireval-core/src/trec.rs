//! Readers for the TREC qrel and run text formats.
//!
//! Both formats are whitespace-delimited, one record per line:
//!
//! | File | Fields |
//! |------|--------|
//! | qrel | `query_id iteration item_id grade` |
//! | run  | `query_id Q0 item_id rank score tag` |
//!
//! Only the query id, item id and grade/score are kept. Run ranks are
//! ignored: the evaluator derives the ranking from the scores. Blank lines
//! are skipped and errors report 1-based line numbers.
//!
//! # Example
//!
//! ```
//! use ireval_core::trec::{parse_qrel, parse_run};
//!
//! let qrel = parse_qrel("q1 0 d1 1\nq1 0 d2 0\n".as_bytes()).unwrap();
//! let run = parse_run("q1 Q0 d1 1 2.5 bm25\n".as_bytes()).unwrap();
//!
//! assert_eq!(qrel["q1"]["d1"], 1);
//! assert_eq!(run["q1"]["d1"], 2.5);
//! ```

use crate::error::ParseError;
use crate::evaluation::types::{Qrel, Run};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, instrument};

const QREL_FIELDS: usize = 4;
const RUN_FIELDS: usize = 6;

// Column of the grade/score; query id and item id are always columns 0 and 2
const QREL_VALUE: usize = 3;
const RUN_VALUE: usize = 4;

/// Reads relevance judgments.
///
/// # Errors
///
/// Returns a [`ParseError`] for read failures, lines without exactly four
/// fields, non-integer grades, or an item judged twice for the same query.
pub fn parse_qrel<R: BufRead>(reader: R) -> Result<Qrel, ParseError> {
    parse_records(reader, QREL_FIELDS, QREL_VALUE, "grade")
}

/// Reads a ranked run.
///
/// # Errors
///
/// Returns a [`ParseError`] for read failures, lines without exactly six
/// fields, non-numeric scores, or an item retrieved twice for the same query.
pub fn parse_run<R: BufRead>(reader: R) -> Result<Run, ParseError> {
    parse_records(reader, RUN_FIELDS, RUN_VALUE, "score")
}

/// Reads a qrel file from disk.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_qrel_file<P: AsRef<Path>>(path: P) -> Result<Qrel, ParseError> {
    let qrel = parse_qrel(BufReader::new(File::open(path.as_ref())?))?;
    debug!(queries = qrel.len(), "Loaded qrel");
    Ok(qrel)
}

/// Reads a run file from disk.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_run_file<P: AsRef<Path>>(path: P) -> Result<Run, ParseError> {
    let run = parse_run(BufReader::new(File::open(path.as_ref())?))?;
    debug!(queries = run.len(), "Loaded run");
    Ok(run)
}

fn parse_records<R, T>(
    reader: R,
    expected: usize,
    value_column: usize,
    field: &'static str,
) -> Result<HashMap<String, HashMap<String, T>>, ParseError>
where
    R: BufRead,
    T: FromStr,
{
    let mut records: HashMap<String, HashMap<String, T>> = HashMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != expected {
            return Err(ParseError::MalformedLine {
                line: number,
                expected,
                found: fields.len(),
            });
        }

        let (query, item, raw) = (fields[0], fields[2], fields[value_column]);
        let value = raw.parse::<T>().map_err(|_| ParseError::InvalidNumber {
            line: number,
            field,
            value: raw.to_string(),
        })?;

        let items = records.entry(query.to_string()).or_default();
        if items.insert(item.to_string(), value).is_some() {
            return Err(ParseError::DuplicateItem {
                line: number,
                query: query.to_string(),
                item: item.to_string(),
            });
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qrel() {
        let input = "q1 0 d1 2\nq1 0 d2 0\n\nq2 0 d1 -1\n";
        let qrel = parse_qrel(input.as_bytes()).unwrap();

        assert_eq!(qrel.len(), 2);
        assert_eq!(qrel["q1"]["d1"], 2);
        assert_eq!(qrel["q1"]["d2"], 0);
        assert_eq!(qrel["q2"]["d1"], -1);
    }

    #[test]
    fn test_parse_run_tabs_and_spaces() {
        let input = "030  Q0\tZF08-175-870  0 \t 4238   prise1\n030 Q0 ZF08-306-044 1 4223 prise1";
        let run = parse_run(input.as_bytes()).unwrap();

        assert_eq!(run["030"].len(), 2);
        assert_eq!(run["030"]["ZF08-175-870"], 4238.0);
        assert_eq!(run["030"]["ZF08-306-044"], 4223.0);
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse_qrel("q1 0 d1 1\nq1 d2 1\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedLine {
                line: 2,
                expected: 4,
                found: 3
            }
        ));
    }

    #[test]
    fn test_invalid_grade() {
        let err = parse_qrel("q1 0 d1 1.5\n".as_bytes()).unwrap_err();
        match err {
            ParseError::InvalidNumber { line, field, value } => {
                assert_eq!(line, 1);
                assert_eq!(field, "grade");
                assert_eq!(value, "1.5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_score() {
        let err = parse_run("q1 Q0 d1 1 high run\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { field: "score", .. }));
    }

    #[test]
    fn test_duplicate_item_rejected() {
        let input = "q1 Q0 d1 1 0.9 r\nq2 Q0 d1 1 0.9 r\n\nq1 Q0 d1 2 0.5 r\n";
        let err = parse_run(input.as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Line 4: duplicate item 'd1' for query 'q1'"
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_qrel("".as_bytes()).unwrap().is_empty());
        assert!(parse_run("\n\n".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = read_qrel_file("/nonexistent/ireval/qrels.txt").unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
