//! Cross-query aggregation of per-query measure values.
//!
//! The reduction is chosen from the measure name:
//!
//! | Prefix | Reduction |
//! |--------|-----------|
//! | `num_` | sum |
//! | `gm_`  | `exp(mean)`: the stored values are already logs |
//! | other  | arithmetic mean |

use super::types::Evaluation;
use crate::error::AggregateError;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Reduces one measure's per-query values to a corpus-level value.
///
/// # Errors
///
/// Returns [`AggregateError::NoData`] for an empty series of a mean-based
/// measure. An empty `num_*` series sums to 0.
///
/// # Example
///
/// ```
/// use ireval_core::evaluation::compute_aggregated_measure;
///
/// assert_eq!(compute_aggregated_measure("num_rel", &[2.0, 3.0, 5.0]).unwrap(), 10.0);
/// assert_eq!(compute_aggregated_measure("map", &[0.5, 1.0]).unwrap(), 0.75);
/// ```
pub fn compute_aggregated_measure(measure: &str, values: &[f64]) -> Result<f64, AggregateError> {
    if measure.starts_with("num_") {
        return Ok(values.iter().sum());
    }

    if values.is_empty() {
        return Err(AggregateError::NoData(measure.to_string()));
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if measure.starts_with("gm_") {
        Ok(mean.exp())
    } else {
        Ok(mean)
    }
}

/// Aggregates every numeric measure of an evaluation.
///
/// Values are collected per measure name across queries and reduced with
/// [`compute_aggregated_measure`]. Text measures (`relstring`) are omitted.
pub fn aggregate_results(results: &Evaluation) -> BTreeMap<String, f64> {
    let mut series: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

    for measures in results.values() {
        for (name, value) in measures {
            if let Some(value) = value.as_f64() {
                series.entry(name.as_str()).or_default().push(value);
            }
        }
    }

    series
        .into_par_iter()
        .filter_map(|(name, values)| {
            compute_aggregated_measure(name, &values)
                .ok()
                .map(|value| (name.to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::types::{MeasureValue, QueryMeasures};

    #[test]
    fn test_num_measures_sum() {
        assert_eq!(
            compute_aggregated_measure("num_rel", &[2.0, 3.0, 5.0]),
            Ok(10.0)
        );
        assert_eq!(compute_aggregated_measure("num_q", &[]), Ok(0.0));
    }

    #[test]
    fn test_other_measures_mean() {
        assert_eq!(compute_aggregated_measure("map", &[0.5, 1.0]), Ok(0.75));
        assert_eq!(compute_aggregated_measure("P_10", &[0.2]), Ok(0.2));
    }

    #[test]
    fn test_gm_measures_exp_mean() {
        let logs = [0.25f64.ln(), 1.0f64.ln()];
        let gm = compute_aggregated_measure("gm_map", &logs).unwrap();
        assert!((gm - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_series_reports_no_data() {
        assert_eq!(
            compute_aggregated_measure("ndcg", &[]),
            Err(AggregateError::NoData("ndcg".to_string()))
        );
        assert!(compute_aggregated_measure("gm_bpref", &[]).is_err());
    }

    #[test]
    fn test_aggregate_results_skips_text() {
        let mut results = Evaluation::new();
        for (qid, map, rel) in [("q1", 0.5, 2.0), ("q2", 1.0, 3.0)] {
            let mut measures = QueryMeasures::new();
            measures.insert("map".to_string(), MeasureValue::Number(map));
            measures.insert("num_rel".to_string(), MeasureValue::Number(rel));
            measures.insert("relstring".to_string(), MeasureValue::Text("1".to_string()));
            results.insert(qid.to_string(), measures);
        }

        let aggregated = aggregate_results(&results);
        assert_eq!(aggregated.len(), 2);
        assert_eq!(aggregated["map"], 0.75);
        assert_eq!(aggregated["num_rel"], 5.0);
    }

    #[test]
    fn test_aggregate_empty_evaluation() {
        assert!(aggregate_results(&Evaluation::new()).is_empty());
    }
}
