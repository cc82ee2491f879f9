//! Per-query evaluation of a run against relevance judgments.

use super::metrics;
use super::ranking::RankedQuery;
use super::types::{Evaluation, MeasureValue, Qrel, QueryMeasures, Run};
use crate::config::EvalOptions;
use crate::error::MeasureError;
use crate::measures::kind::{cutoff_name, level_name};
use crate::measures::{resolve_measures, CompiledMeasureSet, MeasureKind};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Evaluates runs against one set of relevance judgments.
///
/// The evaluator borrows the qrel and owns a compiled measure set; it holds
/// no other state, so one instance can score any number of runs, from any
/// number of threads.
///
/// # Example
///
/// ```
/// use ireval_core::evaluation::{Evaluator, Qrel, Run};
///
/// let mut qrel = Qrel::new();
/// qrel.entry("q1".to_string()).or_default().insert("d2".to_string(), 1);
///
/// let mut run = Run::new();
/// let scores = run.entry("q1".to_string()).or_default();
/// scores.insert("d1".to_string(), 2.0);
/// scores.insert("d2".to_string(), 1.0);
///
/// let evaluator = Evaluator::from_specs(&qrel, ["recip_rank"], 1).unwrap();
/// let results = evaluator.evaluate(&run);
/// assert_eq!(results["q1"]["recip_rank"].as_f64(), Some(0.5));
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator<'q> {
    qrel: &'q Qrel,
    measures: CompiledMeasureSet,
    parallel: bool,
}

impl<'q> Evaluator<'q> {
    /// Creates an evaluator from an already compiled measure set.
    pub fn new(qrel: &'q Qrel, measures: CompiledMeasureSet) -> Self {
        debug!(
            "Evaluator created: {} measures, {} judged queries",
            measures.len(),
            qrel.len()
        );
        Self {
            qrel,
            measures,
            parallel: true,
        }
    }

    /// Resolves measure specifications and creates an evaluator.
    ///
    /// # Errors
    ///
    /// Fails if any specification cannot be resolved or the relevance level
    /// is below 1.
    pub fn from_specs<I, S>(
        qrel: &'q Qrel,
        specs: I,
        relevance_level: i64,
    ) -> Result<Self, MeasureError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let measures = resolve_measures(specs, relevance_level)?;
        Ok(Self::new(qrel, measures))
    }

    /// Creates an evaluator from [`EvalOptions`].
    pub fn from_options(qrel: &'q Qrel, options: &EvalOptions) -> Result<Self, MeasureError> {
        let evaluator = Self::from_specs(qrel, &options.measures, options.relevance_level)?;
        Ok(evaluator.with_parallel(options.parallel))
    }

    /// Enables or disables evaluating queries on the rayon thread pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns the compiled measure set.
    pub fn measures(&self) -> &CompiledMeasureSet {
        &self.measures
    }

    /// Evaluates a run.
    ///
    /// Returns one entry per query present in both the run and the qrel. A
    /// query whose run entry is empty still gets an entry, with every measure
    /// at its zero value. Queries missing from the qrel are skipped.
    #[instrument(skip_all, fields(run_queries = run.len()))]
    pub fn evaluate(&self, run: &Run) -> Evaluation {
        if run.is_empty() {
            return Evaluation::new();
        }

        let judged: Vec<(&String, &HashMap<String, f64>, &HashMap<String, i64>)> = run
            .iter()
            .filter_map(|(qid, scores)| {
                self.qrel
                    .get(qid)
                    .map(|grades| (qid, scores, grades))
            })
            .collect();

        let skipped = run.len() - judged.len();
        if skipped > 0 {
            debug!("Skipping {} run queries without judgments", skipped);
        }

        let evaluate_one = |(qid, scores, grades): &(
            &String,
            &HashMap<String, f64>,
            &HashMap<String, i64>,
        )| {
            ((*qid).clone(), self.evaluate_query(scores, grades))
        };

        let results: Evaluation = if self.parallel {
            judged.par_iter().map(evaluate_one).collect()
        } else {
            judged.iter().map(evaluate_one).collect()
        };

        debug!("Evaluated {} queries", results.len());
        results
    }

    /// Computes every requested measure for one query.
    pub fn evaluate_query(
        &self,
        scores: &HashMap<String, f64>,
        grades: &HashMap<String, i64>,
    ) -> QueryMeasures {
        let query = RankedQuery::build(scores, grades, self.measures.relevance_level());
        let mut values = QueryMeasures::new();

        for measure in self.measures.measures() {
            compute_measure(measure, &query, &mut values);
        }

        values
    }
}

/// Computes one measure instance and inserts its values.
fn compute_measure(measure: &MeasureKind, query: &RankedQuery, out: &mut QueryMeasures) {
    let name = measure.base().name();
    let mut put = |key: String, value: f64| {
        out.insert(key, MeasureValue::Number(value));
    };

    match measure {
        MeasureKind::NumQ => put(name.to_string(), 1.0),
        MeasureKind::NumRet => put(name.to_string(), query.num_ret() as f64),
        MeasureKind::NumRel => put(name.to_string(), query.num_rel() as f64),
        MeasureKind::NumRelRet => put(name.to_string(), query.num_rel_ret() as f64),
        MeasureKind::NumNonrelJudgedRet => {
            put(name.to_string(), query.num_nonrel_judged_ret() as f64)
        }
        MeasureKind::Map => put(name.to_string(), metrics::average_precision(query)),
        MeasureKind::GmMap => put(
            name.to_string(),
            metrics::geometric_log(metrics::average_precision(query)),
        ),
        MeasureKind::Rprec => put(name.to_string(), metrics::r_precision(query)),
        MeasureKind::RprecMult(multipliers) => {
            let values = metrics::r_precision_mult(query, multipliers);
            for (multiplier, value) in multipliers.iter().zip(values) {
                put(level_name(name, *multiplier), value);
            }
        }
        MeasureKind::Bpref => put(name.to_string(), metrics::bpref(query)),
        MeasureKind::GmBpref => put(
            name.to_string(),
            metrics::geometric_log(metrics::bpref(query)),
        ),
        MeasureKind::RecipRank => put(name.to_string(), metrics::reciprocal_rank(query)),
        MeasureKind::InfAp => put(
            name.to_string(),
            metrics::inferred_average_precision(query),
        ),
        MeasureKind::IprecAtRecall(levels) => {
            let values = metrics::interpolated_precision(query, levels);
            for (level, value) in levels.iter().zip(values) {
                put(level_name(name, *level), value);
            }
        }
        MeasureKind::ElevenPtAvg(levels) => {
            put(name.to_string(), metrics::eleven_point_average(query, levels))
        }
        MeasureKind::P(cutoffs) => {
            for k in cutoffs {
                put(cutoff_name(name, *k), metrics::precision_at_k(query, *k));
            }
        }
        MeasureKind::Recall(cutoffs) => {
            for k in cutoffs {
                put(cutoff_name(name, *k), metrics::recall_at_k(query, *k));
            }
        }
        MeasureKind::RelativeP(cutoffs) => {
            for k in cutoffs {
                put(
                    cutoff_name(name, *k),
                    metrics::relative_precision_at_k(query, *k),
                );
            }
        }
        MeasureKind::MapCut(cutoffs) => {
            for k in cutoffs {
                put(
                    cutoff_name(name, *k),
                    metrics::average_precision_at_k(query, *k),
                );
            }
        }
        MeasureKind::Ndcg => put(name.to_string(), metrics::ndcg(query)),
        MeasureKind::NdcgCut(cutoffs) => {
            for k in cutoffs {
                put(cutoff_name(name, *k), metrics::ndcg_at_k(query, *k));
            }
        }
        MeasureKind::Rndcg => put(name.to_string(), metrics::rndcg(query)),
        MeasureKind::NdcgRel => put(name.to_string(), metrics::ndcg_rel(query)),
        MeasureKind::G => put(name.to_string(), metrics::normalized_gain(query)),
        MeasureKind::BinG => put(name.to_string(), metrics::binary_normalized_gain(query)),
        MeasureKind::Success(cutoffs) => {
            for k in cutoffs {
                put(cutoff_name(name, *k), metrics::success_at_k(query, *k));
            }
        }
        MeasureKind::Relstring(depth) => {
            out.insert(
                name.to_string(),
                MeasureValue::Text(metrics::relstring(query, *depth)),
            );
        }
        MeasureKind::Utility(weights) => put(name.to_string(), metrics::utility(query, *weights)),
        MeasureKind::SetP => put(name.to_string(), metrics::set_precision(query)),
        MeasureKind::SetRecall => put(name.to_string(), metrics::set_recall(query)),
        MeasureKind::SetRelativeP => put(name.to_string(), metrics::set_relative_precision(query)),
        MeasureKind::SetMap => put(name.to_string(), metrics::set_map(query)),
        MeasureKind::SetF(beta) => put(name.to_string(), metrics::set_f(query, *beta)),
    }
}
