//! Evaluation framework for measuring retrieval quality.
//!
//! This module scores system rankings ("runs") against relevance judgments
//! ("qrels") with the standard TREC measures: precision and recall at
//! cutoffs, MAP, NDCG, bpref, reciprocal rank, interpolated precision and
//! the set-based measures.
//!
//! # Overview
//!
//! - **Graded relevance**: grades are integers; NDCG uses them as gains,
//!   binary measures compare them against a relevance level
//! - **Deterministic ranking**: items are ordered by score descending, ties by
//!   item id descending
//! - **Parallel**: queries are independent and evaluated on the rayon pool
//!
//! # Example
//!
//! ```
//! use ireval_core::evaluation::{aggregate_results, Evaluator, Qrel, Run};
//!
//! let mut qrel = Qrel::new();
//! let judged = qrel.entry("q1".to_string()).or_default();
//! judged.insert("d1".to_string(), 0);
//! judged.insert("d2".to_string(), 1);
//!
//! let mut run = Run::new();
//! let scores = run.entry("q1".to_string()).or_default();
//! scores.insert("d1".to_string(), 1.0);
//! scores.insert("d2".to_string(), 0.5);
//!
//! let evaluator = Evaluator::from_specs(&qrel, ["map", "P.1,2"], 1).unwrap();
//! let results = evaluator.evaluate(&run);
//! assert_eq!(results["q1"]["P_1"].as_f64(), Some(0.0));
//!
//! let summary = aggregate_results(&results);
//! assert_eq!(summary["map"], 0.5);
//! ```
//!
//! # Measures Reference
//!
//! | Measure | Description |
//! |---------|-------------|
//! | `P_k` | Fraction of the top k that is relevant |
//! | `recall_k` | Fraction of relevant items found in the top k |
//! | `map` | Mean of precision at each relevant item's rank |
//! | `ndcg`, `ndcg_cut_k` | Graded, position-discounted gain, normalized by the ideal ranking |
//! | `G`, `binG` | Undiscounted gain of the retrieved set, normalized by all judged gain |
//! | `recip_rank` | 1 / rank of the first relevant item |
//! | `bpref` | Preference of relevant over judged non-relevant items |
//! | `iprec_at_recall_l` | Interpolated precision at recall level l |
//! | `Rprec_mult_m` | Precision at rank m·R |

pub mod aggregate;
pub mod evaluator;
pub mod metrics;
pub mod ranking;
pub mod types;

pub use aggregate::{aggregate_results, compute_aggregated_measure};
pub use evaluator::Evaluator;
pub use ranking::{rank_items, Judgment, RankedQuery};
pub use types::{Evaluation, MeasureValue, Qrel, QueryMeasures, Run};
