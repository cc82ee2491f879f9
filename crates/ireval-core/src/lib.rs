//! # ireval Core
//!
//! TREC-style evaluation of ranked retrieval results.
//!
//! This crate resolves measure specification strings (`"map"`, `"P.5,10"`,
//! `"ndcg_cut_5"`, nicknames such as `"official"`) into a compiled measure
//! set, scores runs against relevance judgments query by query, and reduces
//! per-query values to corpus-level summaries.
//!
//! ## Modules
//!
//! - [`measures`] - Measure registry, nicknames and specification resolver
//! - [`evaluation`] - Per-query evaluator, measure formulas and aggregation
//! - [`trec`] - Readers for the TREC qrel and run text formats
//! - [`config`] - Default parameters and evaluation options
//! - [`error`] - Error types for resolution, parsing and aggregation
//!
//! ## Example
//!
//! ```
//! use ireval_core::{aggregate_results, trec, Evaluator};
//!
//! let qrel = trec::parse_qrel("q1 0 d1 1\nq1 0 d2 0\nq2 0 d3 2\n".as_bytes()).unwrap();
//! let run = trec::parse_run("q1 Q0 d1 1 0.9 r\nq1 Q0 d2 2 0.4 r\nq2 Q0 d3 1 0.7 r\n".as_bytes()).unwrap();
//!
//! let evaluator = Evaluator::from_specs(&qrel, ["official"], 1).unwrap();
//! let results = evaluator.evaluate(&run);
//!
//! let summary = aggregate_results(&results);
//! assert_eq!(summary["num_q"], 2.0);
//! assert_eq!(summary["map"], 1.0);
//! ```

pub mod config;
pub mod error;
pub mod evaluation;
pub mod measures;
pub mod trec;

pub use config::EvalOptions;
pub use error::{AggregateError, MeasureError, ParseError};
pub use evaluation::{
    aggregate_results, compute_aggregated_measure, Evaluation, Evaluator, MeasureValue, Qrel,
    QueryMeasures, Run,
};
pub use measures::{resolve_measures, supported_measures, CompiledMeasureSet};
