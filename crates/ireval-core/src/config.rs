//! Evaluation configuration: default measure parameters and evaluator options.
//!
//! The constants in this module are the parameter defaults applied when a
//! measure is requested without an explicit parameter list (e.g. `P` rather
//! than `P.5,10`). They follow the conventions of `trec_eval`, so that scores
//! are comparable with published TREC results.
//!
//! # Usage
//!
//! ```
//! use ireval_core::config::{EvalOptions, DEFAULT_CUTOFFS};
//!
//! let options = EvalOptions::default();
//! assert_eq!(options.relevance_level, 1);
//! assert_eq!(DEFAULT_CUTOFFS[0], 5);
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Measure Parameter Defaults
// =============================================================================

/// Minimum grade counted as relevant by binary-relevance measures.
pub const DEFAULT_RELEVANCE_LEVEL: i64 = 1;

/// Rank cutoffs for `P`, `recall`, `relative_P`, `map_cut` and `ndcg_cut`.
pub const DEFAULT_CUTOFFS: &[usize] = &[5, 10, 15, 20, 30, 100, 200, 500, 1000];

/// Rank cutoffs for `success`.
pub const DEFAULT_SUCCESS_CUTOFFS: &[usize] = &[1, 5, 10];

/// Recall levels for `iprec_at_recall` and `11pt_avg`.
pub const DEFAULT_RECALL_LEVELS: &[f64] = &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];

/// Multiples of R (the number of relevant items) for `Rprec_mult`.
pub const DEFAULT_RPREC_MULTIPLIERS: &[f64] = &[0.2, 0.4, 0.6, 0.8, 1.0, 1.5, 2.0];

/// Number of ranks rendered by `relstring`.
pub const DEFAULT_RELSTRING_DEPTH: usize = 10;

/// Precision/recall trade-off for `set_F` (1.0 weighs them equally).
pub const DEFAULT_F_BETA: f64 = 1.0;

/// Contingency weights for `utility`: rel_ret, nonrel_ret, rel_nonret, nonrel_nonret.
pub const DEFAULT_UTILITY_WEIGHTS: [f64; 4] = [1.0, -1.0, 0.0, 0.0];

/// Floor applied before taking the log for `gm_*` measures.
///
/// Keeps a single zero-scoring query from driving the geometric mean to 0.
pub const MIN_GEO_MEAN: f64 = 0.00001;

/// Smoothing constant used by `infAP`.
pub const INFAP_EPSILON: f64 = 0.00001;

// =============================================================================
// Evaluator Options
// =============================================================================

/// Options for building an [`Evaluator`](crate::evaluation::Evaluator).
///
/// Deserializable so callers can keep evaluation settings alongside their
/// experiment configuration. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    /// Minimum grade counted as relevant
    pub relevance_level: i64,
    /// Measure specifications and nicknames
    pub measures: Vec<String>,
    /// Evaluate queries on the rayon thread pool
    pub parallel: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            relevance_level: DEFAULT_RELEVANCE_LEVEL,
            measures: vec!["official".to_string()],
            parallel: true,
        }
    }
}

impl EvalOptions {
    /// Creates options for the given measure specifications.
    pub fn with_measures<I, S>(measures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            measures: measures.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the relevance level.
    pub fn relevance_level(mut self, level: i64) -> Self {
        self.relevance_level = level;
        self
    }

    /// Enables or disables parallel query evaluation.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
