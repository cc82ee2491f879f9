//! End-to-end tests for the evaluation pipeline.
//!
//! These tests exercise the full workflow:
//! 1. Reading: TREC qrel and run text → judgment and score maps
//! 2. Resolution: measure specifications → compiled measure set
//! 3. Evaluation: per-query measure values → corpus-level aggregates

use ireval_core::config::EvalOptions;
use ireval_core::evaluation::{aggregate_results, compute_aggregated_measure, Evaluation};
use ireval_core::measures::{resolve_measures, supported_measures};
use ireval_core::{trec, Evaluator, MeasureError, Qrel, Run};
use std::collections::BTreeSet;

// ============================================================================
// Fixtures
// ============================================================================

const QRELS: &str = "\
q1 0 d1 0
q1 0 d2 1
q1 0 d3 0
q2 0 d2 1
q2 0 d3 1
";

const RUN: &str = "\
q1 Q0 d1 2 1.0 test
q1 Q0 d2 3 0.0 test
q1 Q0 d3 1 1.5 test
q2 Q0 d1 1 1.5 test
q2 Q0 d2 3 0.2 test
q2 Q0 d3 2 0.5 test
";

const EPSILON: f64 = 1e-12;

fn fixture() -> (Qrel, Run) {
    let qrel = trec::parse_qrel(QRELS.as_bytes()).unwrap();
    let run = trec::parse_run(RUN.as_bytes()).unwrap();
    (qrel, run)
}

fn value(results: &Evaluation, qid: &str, measure: &str) -> f64 {
    results[qid][measure]
        .as_f64()
        .unwrap_or_else(|| panic!("{qid}/{measure} is not numeric"))
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_nickname_union_output_names() {
    let (qrel, run) = fixture();
    let evaluator = Evaluator::from_specs(&qrel, ["official", "set", "ndcg"], 1).unwrap();
    let results = evaluator.evaluate(&run);

    let mut expected = BTreeSet::new();
    for nickname in ["official", "set", "ndcg"] {
        expected.extend(resolve_measures([nickname], 1).unwrap().output_names());
    }
    assert!(expected.contains("set_relative_P"));

    for measures in results.values() {
        let produced: BTreeSet<String> = measures.keys().cloned().collect();
        assert_eq!(produced, expected);
    }

    let q1 = &results["q1"];
    for name in [
        "num_q",
        "map",
        "gm_map",
        "Rprec",
        "bpref",
        "recip_rank",
        "iprec_at_recall_0.00",
        "iprec_at_recall_1.00",
        "P_5",
        "P_1000",
        "num_nonrel_judged_ret",
        "set_P",
        "set_F",
        "ndcg",
    ] {
        assert!(q1.contains_key(name), "missing {name}");
    }
    assert!(!q1.contains_key("ndcg_cut_5"));
}

#[test]
fn test_cutoff_params_merge_across_specs() {
    let set = resolve_measures(["ndcg_cut.1,4", "ndcg_cut_20,4", "ndcg_cut_15"], 1).unwrap();
    let expected: BTreeSet<String> = ["ndcg_cut_1", "ndcg_cut_4", "ndcg_cut_15", "ndcg_cut_20"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(set.output_names(), expected);
}

#[test]
fn test_all_trec_covers_supported_measures() {
    let set = resolve_measures(["all_trec"], 1).unwrap();
    let bases: BTreeSet<&str> = set.measures().map(|m| m.base().name()).collect();
    assert_eq!(bases, supported_measures());
}

#[test]
fn test_unsupported_measure_fails_before_evaluation() {
    let (qrel, _) = fixture();
    let err = Evaluator::from_specs(&qrel, ["official", "ndcg_foo"], 1).unwrap_err();
    assert_eq!(err, MeasureError::UnsupportedMeasure("ndcg_foo".to_string()));
}

#[test]
fn test_invalid_relevance_level() {
    let (qrel, _) = fixture();
    let err = Evaluator::from_specs(&qrel, ["map"], 0).unwrap_err();
    assert_eq!(err, MeasureError::InvalidRelevanceLevel(0));
}

// ============================================================================
// Per-query values
// ============================================================================

#[test]
fn test_ndcg_reference_examples() {
    let mut qrel = Qrel::new();
    let q1 = qrel.entry("q1".to_string()).or_default();
    q1.insert("d1".to_string(), 0);
    q1.insert("d2".to_string(), 1);
    q1.insert("d3".to_string(), 0);

    let evaluator = Evaluator::from_specs(&qrel, ["ndcg"], 1).unwrap();
    let cases = [
        ([1.0, 0.0, 1.5], 0.5),
        ([1.0, 2.0, 1.5], 1.0),
        ([4.0, 2.0, 1.5], 0.6309297535714575),
    ];

    for (scores, expected) in cases {
        let mut run = Run::new();
        let ranked = run.entry("q1".to_string()).or_default();
        for (item, score) in ["d1", "d2", "d3"].iter().zip(scores) {
            ranked.insert(item.to_string(), score);
        }
        let results = evaluator.evaluate(&run);
        assert_close(value(&results, "q1", "ndcg"), expected);
    }
}

#[test]
fn test_fixture_per_query_values() {
    let (qrel, run) = fixture();
    let evaluator =
        Evaluator::from_specs(&qrel, ["map", "P.5", "recip_rank", "Rprec", "num_rel_ret", "ndcg"], 1)
            .unwrap();
    let results = evaluator.evaluate(&run);

    // q1 ranks d3, d1, d2; q2 ranks d1 (not judged), d3, d2
    assert_close(value(&results, "q1", "map"), 1.0 / 3.0);
    assert_close(value(&results, "q2", "map"), (0.5 + 2.0 / 3.0) / 2.0);
    assert_close(value(&results, "q1", "P_5"), 0.2);
    assert_close(value(&results, "q2", "P_5"), 0.4);
    assert_close(value(&results, "q1", "recip_rank"), 1.0 / 3.0);
    assert_close(value(&results, "q2", "recip_rank"), 0.5);
    assert_close(value(&results, "q1", "Rprec"), 0.0);
    assert_close(value(&results, "q2", "Rprec"), 0.5);
    assert_close(value(&results, "q2", "num_rel_ret"), 2.0);

    let dcg = 1.0 / 3f64.log2() + 1.0 / 4f64.log2();
    let idcg = 1.0 + 1.0 / 3f64.log2();
    assert_close(value(&results, "q1", "ndcg"), 0.5);
    assert_close(value(&results, "q2", "ndcg"), dcg / idcg);
}

#[test]
fn test_fixture_rank_multiple_and_gain_values() {
    let (qrel, run) = fixture();
    let evaluator = Evaluator::from_specs(
        &qrel,
        ["Rprec_mult", "Rndcg", "ndcg_rel", "G", "binG", "set_relative_P", "utility.1,-1,0,1"],
        1,
    )
    .unwrap();
    let results = evaluator.evaluate(&run);

    // q1: R = 1, relevant d2 at rank 3. q2: R = 2, relevant at ranks 2 and 3.
    assert_close(value(&results, "q1", "Rprec_mult_2.00"), 0.0);
    assert_close(value(&results, "q2", "Rprec_mult_0.20"), 0.0);
    assert_close(value(&results, "q2", "Rprec_mult_1.00"), 0.5);
    assert_close(value(&results, "q2", "Rprec_mult_2.00"), 0.5);
    assert_eq!(
        results["q2"].keys().filter(|k| k.starts_with("Rprec_mult_")).count(),
        7
    );

    let at_two = (1.0 / 3f64.log2()) / (1.0 + 1.0 / 3f64.log2());
    let at_three = (1.0 / 3f64.log2() + 0.5) / (1.0 + 1.0 / 3f64.log2());
    assert_close(value(&results, "q1", "Rndcg"), 0.0);
    assert_close(value(&results, "q2", "Rndcg"), at_two);
    assert_close(value(&results, "q2", "ndcg_rel"), (at_two + at_three) / 2.0);
    assert_close(value(&results, "q1", "ndcg_rel"), 0.5);

    for qid in ["q1", "q2"] {
        assert_close(value(&results, qid, "G"), 1.0);
        assert_close(value(&results, qid, "binG"), 1.0);
        assert_close(value(&results, qid, "set_relative_P"), 1.0);
    }

    // 2 - 1 + 0 + (2 - 3 - 2)
    assert_close(value(&results, "q2", "utility"), -2.0);
}

#[test]
fn test_colliding_level_names_fail_before_evaluation() {
    let (qrel, _) = fixture();
    let err = Evaluator::from_specs(&qrel, ["iprec_at_recall.0.1,0.104"], 1).unwrap_err();
    assert!(matches!(err, MeasureError::InvalidParameters { .. }));
}

#[test]
fn test_score_ties_break_on_item_id_descending() {
    let qrel = trec::parse_qrel("q 0 a 1\nq 0 b 0\nq 0 c 0\n".as_bytes()).unwrap();
    let run = trec::parse_run("q Q0 a 1 1.0 t\nq Q0 b 2 1.0 t\nq Q0 c 3 1.0 t\n".as_bytes())
        .unwrap();

    let evaluator =
        Evaluator::from_specs(&qrel, ["relstring", "recip_rank", "success.1,5"], 1).unwrap();
    let results = evaluator.evaluate(&run);

    // Ranked c, b, a
    assert_eq!(results["q"]["relstring"].as_str(), Some("001"));
    assert_close(value(&results, "q", "recip_rank"), 1.0 / 3.0);
    assert_close(value(&results, "q", "success_1"), 0.0);
    assert_close(value(&results, "q", "success_5"), 1.0);
}

#[test]
fn test_relevance_level_applies_to_binary_measures_only() {
    let qrel = trec::parse_qrel("q 0 a 1\nq 0 b 2\n".as_bytes()).unwrap();
    let run = trec::parse_run("q Q0 a 1 2.0 t\nq Q0 b 2 1.0 t\n".as_bytes()).unwrap();

    let level_one = Evaluator::from_specs(&qrel, ["P.1", "ndcg"], 1).unwrap();
    let level_two = Evaluator::from_specs(&qrel, ["P.1", "ndcg"], 2).unwrap();
    let one = level_one.evaluate(&run);
    let two = level_two.evaluate(&run);

    assert_close(value(&one, "q", "P_1"), 1.0);
    assert_close(value(&two, "q", "P_1"), 0.0);
    assert_close(value(&one, "q", "ndcg"), value(&two, "q", "ndcg"));
}

#[test]
fn test_query_without_judgments_is_skipped() {
    let (qrel, mut run) = fixture();
    run.entry("q9".to_string())
        .or_default()
        .insert("d1".to_string(), 1.0);

    let evaluator = Evaluator::from_specs(&qrel, ["official"], 1).unwrap();
    let results = evaluator.evaluate(&run);
    assert_eq!(results.keys().collect::<Vec<_>>(), vec!["q1", "q2"]);
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_aggregate_fixture() {
    let (qrel, run) = fixture();
    let evaluator = Evaluator::from_specs(&qrel, ["official", "set_P", "relstring"], 1).unwrap();
    let summary = aggregate_results(&evaluator.evaluate(&run));

    assert_close(summary["num_q"], 2.0);
    assert_close(summary["num_ret"], 6.0);
    assert_close(summary["num_rel"], 3.0);
    assert_close(summary["num_rel_ret"], 3.0);
    assert_close(summary["map"], (1.0 / 3.0 + 7.0 / 12.0) / 2.0);
    assert_close(summary["gm_map"], (1.0f64 / 3.0 * 7.0 / 12.0).sqrt());
    assert_close(summary["P_5"], 0.3);
    assert_close(summary["set_P"], 0.5);
    assert!(!summary.contains_key("relstring"));
}

#[test]
fn test_aggregation_rules() {
    assert_eq!(compute_aggregated_measure("num_rel", &[2.0, 3.0, 5.0]), Ok(10.0));
    assert_eq!(compute_aggregated_measure("map", &[0.5, 1.0]), Ok(0.75));
    assert!(compute_aggregated_measure("ndcg", &[]).is_err());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_options_from_json() {
    let (qrel, run) = fixture();
    let options: EvalOptions =
        serde_json::from_str(r#"{"measures": ["recip_rank"], "relevance_level": 1, "parallel": false}"#)
            .unwrap();

    let evaluator = Evaluator::from_options(&qrel, &options).unwrap();
    let results = evaluator.evaluate(&run);
    assert_eq!(results["q1"].len(), 1);
    assert_close(value(&results, "q2", "recip_rank"), 0.5);
}

#[test]
fn test_evaluator_is_reusable_across_runs() {
    let (qrel, run) = fixture();
    let evaluator = Evaluator::from_specs(&qrel, ["all_trec"], 1).unwrap();

    let first = evaluator.evaluate(&run);
    let second = evaluator.evaluate(&run);
    assert_eq!(first, second);
    assert!(evaluator.evaluate(&Run::new()).is_empty());
}
