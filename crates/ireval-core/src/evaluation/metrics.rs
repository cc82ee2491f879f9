//! Standard Information Retrieval measures over a ranked judgment list.
//!
//! Every function takes a [`RankedQuery`] (retrieved items in rank order,
//! replaced by their judgments) and returns the measure's value for that
//! query. Degenerate inputs (no relevant items, nothing retrieved, zero ideal
//! gain) return 0.0 rather than NaN.
//!
//! # References
//!
//! - Järvelin & Kekäläinen (2002). "Cumulated gain-based evaluation of IR techniques"
//! - Buckley & Voorhees (2004). "Retrieval evaluation with incomplete information"
//! - Yilmaz & Aslam (2006). "Estimating average precision with incomplete and imperfect judgments"
//! - Voorhees & Harman (2005). "TREC: Experiment and Evaluation in Information Retrieval"

use super::ranking::{Judgment, RankedQuery};
use crate::config::{INFAP_EPSILON, MIN_GEO_MEAN};

#[inline]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

// ============================================================================
// Cutoff Measures: P@k, Recall@k, Relative P@k, Success@k
// ============================================================================

/// Computes Precision@k.
///
/// ```text
/// P@k = |relevant ∩ top_k| / k
/// ```
///
/// The denominator is always `k`, even when fewer than `k` items were
/// retrieved.
pub fn precision_at_k(query: &RankedQuery, k: usize) -> f64 {
    ratio(query.relevant_in_top(k), k)
}

/// Computes Recall@k.
///
/// ```text
/// R@k = |relevant ∩ top_k| / |relevant|
/// ```
///
/// Returns 0.0 if the query has no relevant items.
pub fn recall_at_k(query: &RankedQuery, k: usize) -> f64 {
    ratio(query.relevant_in_top(k), query.num_rel())
}

/// Computes relative precision at k: P@k divided by the best P@k achievable.
///
/// ```text
/// relative_P@k = |relevant ∩ top_k| / min(k, |relevant|)
/// ```
pub fn relative_precision_at_k(query: &RankedQuery, k: usize) -> f64 {
    ratio(query.relevant_in_top(k), k.min(query.num_rel()))
}

/// Returns 1.0 if a relevant item appears in the top k, else 0.0.
pub fn success_at_k(query: &RankedQuery, k: usize) -> f64 {
    if query.relevant_in_top(k) > 0 {
        1.0
    } else {
        0.0
    }
}

// ============================================================================
// MAP (Mean Average Precision) and variants
// ============================================================================

/// Computes Average Precision for a single query.
///
/// ```text
/// AP = (1 / |relevant|) * Σ P(i) * rel(i)
/// ```
///
/// Relevant items that were not retrieved contribute 0. Returns 0.0 if the
/// query has no relevant items.
pub fn average_precision(query: &RankedQuery) -> f64 {
    average_precision_at_k(query, query.num_ret())
}

/// Computes Average Precision over the top k ranks only (`map_cut`).
pub fn average_precision_at_k(query: &RankedQuery, k: usize) -> f64 {
    if query.num_rel() == 0 {
        return 0.0;
    }

    let mut precision_sum = 0.0;
    let mut relevant_found = 0;

    for (i, judgment) in query.judgments().iter().take(k).enumerate() {
        if query.is_relevant(*judgment) {
            relevant_found += 1;
            precision_sum += relevant_found as f64 / (i + 1) as f64;
        }
    }

    precision_sum / query.num_rel() as f64
}

/// Log-transforms a per-query value for geometric mean aggregation.
///
/// The value is floored at [`MIN_GEO_MEAN`] so that a zero does not send
/// the geometric mean to zero. Aggregating with `exp(mean)` recovers the
/// geometric mean of the floored values.
pub fn geometric_log(value: f64) -> f64 {
    value.max(MIN_GEO_MEAN).ln()
}

/// Computes R-Precision: precision at rank R, where R is the number of
/// relevant items for the query.
pub fn r_precision(query: &RankedQuery) -> f64 {
    let r = query.num_rel();
    ratio(query.relevant_in_top(r), r)
}

/// Computes precision at rank `m·R` for each multiplier `m`.
///
/// Each multiplier is converted to a cutoff `max(1, floor(m·R + 0.9))`. The
/// denominator is the cutoff even when fewer items were retrieved. Returns
/// 0.0 for every multiplier when the query has no relevant items.
///
/// Returns one value per multiplier, in the order given.
pub fn r_precision_mult(query: &RankedQuery, multipliers: &[f64]) -> Vec<f64> {
    let num_rel = query.num_rel();
    if num_rel == 0 {
        return vec![0.0; multipliers.len()];
    }

    multipliers
        .iter()
        .map(|m| {
            let cutoff = ((m * num_rel as f64 + 0.9) as usize).max(1);
            ratio(query.relevant_in_top(cutoff), cutoff)
        })
        .collect()
}

// ============================================================================
// MRR (Mean Reciprocal Rank)
// ============================================================================

/// Computes Reciprocal Rank: 1 / rank of the first relevant item, 0.0 if
/// none was retrieved.
pub fn reciprocal_rank(query: &RankedQuery) -> f64 {
    query
        .judgments()
        .iter()
        .position(|j| query.is_relevant(*j))
        .map(|i| 1.0 / (i + 1) as f64)
        .unwrap_or(0.0)
}

// ============================================================================
// Incomplete-judgment measures: bpref, infAP
// ============================================================================

/// Computes bpref (binary preference).
///
/// ```text
/// bpref = (1/R) Σ_r (1 - min(|n ranked above r|, R) / min(R, N))
/// ```
///
/// where `r` ranges over retrieved relevant items, `n` over judged
/// non-relevant items, R is the number of relevant and N the number of
/// judged non-relevant items in the qrel. Unjudged items are ignored.
pub fn bpref(query: &RankedQuery) -> f64 {
    let num_rel = query.num_rel();
    if num_rel == 0 {
        return 0.0;
    }
    let denominator = num_rel.min(query.num_nonrel());

    let mut nonrel_so_far = 0usize;
    let mut total = 0.0;

    for judgment in query.judgments() {
        if query.is_relevant(*judgment) {
            if nonrel_so_far > 0 {
                total += 1.0 - nonrel_so_far.min(num_rel) as f64 / denominator as f64;
            } else {
                total += 1.0;
            }
        } else if query.is_judged_nonrelevant(*judgment) {
            nonrel_so_far += 1;
        }
    }

    total / num_rel as f64
}

/// Computes inferred Average Precision for sampled judgments.
///
/// Items absent from the qrel are outside the pool and skipped. Items with a
/// negative grade are in the pool but unjudged. For a relevant item at rank
/// k > 1 the expected precision is estimated as
///
/// ```text
/// 1/k + ((k-1)/k) * (pool_above / (k-1)) * ((rel_above + ε) / (rel_above + nonrel_above + 2ε))
/// ```
///
/// With complete judgments this equals average precision up to ε.
pub fn inferred_average_precision(query: &RankedQuery) -> f64 {
    if query.num_rel() == 0 {
        return 0.0;
    }

    let mut inf_ap = 0.0;
    let mut rel_above = 0usize;
    let mut nonrel_above = 0usize;
    let mut unjudged_above = 0usize;

    for (i, judgment) in query.judgments().iter().enumerate() {
        match judgment {
            Judgment::NotInPool => {}
            Judgment::Unjudged => unjudged_above += 1,
            Judgment::Graded(_) if query.is_relevant(*judgment) => {
                if i == 0 {
                    inf_ap += 1.0;
                } else {
                    let above = i as f64;
                    let pool_above = (rel_above + nonrel_above + unjudged_above) as f64;
                    let judged_above = (rel_above + nonrel_above) as f64;
                    inf_ap += 1.0 / (above + 1.0)
                        + (above / (above + 1.0))
                            * (pool_above / above)
                            * ((rel_above as f64 + INFAP_EPSILON)
                                / (judged_above + 2.0 * INFAP_EPSILON));
                }
                rel_above += 1;
            }
            Judgment::Graded(_) => nonrel_above += 1,
        }
    }

    inf_ap / query.num_rel() as f64
}

// ============================================================================
// Interpolated precision
// ============================================================================

/// Computes interpolated precision at each recall level.
///
/// Interpolated precision at recall `l` is the highest precision reached at
/// any rank whose recall is at least `l`. Each level is first converted to a
/// number of relevant items, `floor(l * R + 0.9)`; levels needing more
/// relevant items than were retrieved score 0.0.
///
/// Returns one value per level, in the order given.
pub fn interpolated_precision(query: &RankedQuery, levels: &[f64]) -> Vec<f64> {
    let num_ret = query.num_ret();
    let num_rel_ret = query.num_rel_ret();
    let num_rel = query.num_rel() as f64;

    let needed: Vec<usize> = levels
        .iter()
        .map(|level| (level * num_rel + 0.9) as usize)
        .collect();

    // Visit levels from the highest requirement down.
    let mut order: Vec<usize> = (0..levels.len()).collect();
    order.sort_by(|a, b| needed[*a].cmp(&needed[*b]));

    let mut values = vec![0.0; levels.len()];
    let mut remaining = order.len();

    while remaining > 0 && needed[order[remaining - 1]] > num_rel_ret {
        remaining -= 1;
    }

    let judgments = query.judgments();
    let mut best = ratio(num_rel_ret, num_ret);
    let mut rel_so_far = num_rel_ret;
    let mut rank = num_ret;

    while rank > 0 && rel_so_far > 0 {
        best = best.max(rel_so_far as f64 / rank as f64);
        if query.is_relevant(judgments[rank - 1]) {
            while remaining > 0 && needed[order[remaining - 1]] == rel_so_far {
                values[order[remaining - 1]] = best;
                remaining -= 1;
            }
            rel_so_far -= 1;
        }
        rank -= 1;
    }

    for idx in &order[..remaining] {
        values[*idx] = best;
    }

    values
}

/// Computes the mean interpolated precision over the recall levels
/// (11-point average for the default levels).
pub fn eleven_point_average(query: &RankedQuery, levels: &[f64]) -> f64 {
    if levels.is_empty() {
        return 0.0;
    }
    interpolated_precision(query, levels).iter().sum::<f64>() / levels.len() as f64
}

// ============================================================================
// NDCG (Normalized Discounted Cumulative Gain)
// ============================================================================

/// Computes NDCG over the full ranking.
///
/// ```text
/// DCG  = Σ gain(i) / log₂(i + 1)   for rank i = 1..n
/// IDCG = DCG of all judged grades sorted descending
/// NDCG = DCG / IDCG
/// ```
///
/// Gain is the raw grade (not binarized, not exponentiated); unjudged items
/// gain 0. Returns 0.0 when IDCG is 0.
pub fn ndcg(query: &RankedQuery) -> f64 {
    normalized(
        dcg(query.judgments().iter().map(Judgment::gain), usize::MAX),
        dcg(query.ideal_gains().iter().copied(), usize::MAX),
    )
}

/// Computes NDCG@k: DCG and IDCG both truncated to the top k ranks.
pub fn ndcg_at_k(query: &RankedQuery, k: usize) -> f64 {
    normalized(
        dcg(query.judgments().iter().map(Judgment::gain), k),
        dcg(query.ideal_gains().iter().copied(), k),
    )
}

/// Computes NDCG truncated at rank R, the number of relevant items.
pub fn rndcg(query: &RankedQuery) -> f64 {
    ndcg_at_k(query, query.num_rel())
}

/// Computes NDCG averaged over the ranks of the retrieved relevant items.
///
/// ```text
/// ndcg_rel = (1/R) Σ_{i : rel(i)} NDCG@i
/// ```
///
/// Relevant items that were not retrieved contribute 0.
pub fn ndcg_rel(query: &RankedQuery) -> f64 {
    let num_rel = query.num_rel();
    if num_rel == 0 {
        return 0.0;
    }

    let ideal = query.ideal_gains();
    let mut dcg = 0.0;
    let mut idcg = 0.0;
    let mut total = 0.0;

    for (i, judgment) in query.judgments().iter().enumerate() {
        let d = discount(i + 1);
        let gain = judgment.gain();
        if gain > 0.0 {
            dcg += gain / d;
        }
        if let Some(best) = ideal.get(i).filter(|g| **g > 0.0) {
            idcg += best / d;
        }
        if query.is_relevant(*judgment) {
            total += normalized(dcg, idcg);
        }
    }

    total / num_rel as f64
}

/// Computes undiscounted normalized gain over the whole ranking.
///
/// ```text
/// G = Σ gain(retrieved) / Σ gain(judged)
/// ```
pub fn normalized_gain(query: &RankedQuery) -> f64 {
    normalized(
        query.judgments().iter().map(Judgment::gain).sum(),
        query.ideal_gains().iter().sum(),
    )
}

/// Normalized gain with every relevant item gaining 1, so
/// `num_rel_ret / num_rel`.
pub fn binary_normalized_gain(query: &RankedQuery) -> f64 {
    ratio(query.num_rel_ret(), query.num_rel())
}

/// Discounted cumulative gain of the first `k` gains.
fn dcg(gains: impl Iterator<Item = f64>, k: usize) -> f64 {
    gains
        .take(k)
        .enumerate()
        .filter(|(_, gain)| *gain > 0.0)
        .map(|(i, gain)| gain / discount(i + 1))
        .sum()
}

/// Computes the discount factor for position (1-indexed): log₂(position + 1).
#[inline]
fn discount(position: usize) -> f64 {
    (position as f64 + 1.0).log2()
}

#[inline]
fn normalized(dcg: f64, idcg: f64) -> f64 {
    if idcg > 0.0 {
        dcg / idcg
    } else {
        0.0
    }
}

// ============================================================================
// Diagnostics and contingency measures
// ============================================================================

/// Renders the grades of the top `depth` retrieved items, in rank order.
///
/// Grades 0-9 render as the digit, higher grades as `+`, unjudged items and
/// items outside the qrel as `-`.
pub fn relstring(query: &RankedQuery, depth: usize) -> String {
    query
        .judgments()
        .iter()
        .take(depth)
        .map(|judgment| match judgment {
            Judgment::Graded(g) => u32::try_from(*g)
                .ok()
                .and_then(|g| char::from_digit(g, 10))
                .unwrap_or('+'),
            Judgment::Unjudged | Judgment::NotInPool => '-',
        })
        .collect()
}

/// Computes contingency-table utility.
///
/// ```text
/// utility = a·rel_ret + b·nonrel_ret + c·rel_nonret + d·nonrel_nonret
/// nonrel_nonret = num_docs - num_ret - rel_nonret
/// ```
///
/// The collection size `num_docs` is taken as 0, so `nonrel_nonret` is
/// `rel_ret - num_ret - num_rel` and goes negative.
pub fn utility(query: &RankedQuery, weights: [f64; 4]) -> f64 {
    let rel_ret = query.num_rel_ret() as f64;
    let num_ret = query.num_ret() as f64;
    let num_rel = query.num_rel() as f64;

    let nonrel_ret = num_ret - rel_ret;
    let rel_nonret = num_rel - rel_ret;
    let nonrel_nonret = rel_ret - num_ret - num_rel;

    let [a, b, c, d] = weights;
    a * rel_ret + b * nonrel_ret + c * rel_nonret + d * nonrel_nonret
}

// ============================================================================
// Set-Based Measures
// ============================================================================

/// Precision of the whole retrieved set.
pub fn set_precision(query: &RankedQuery) -> f64 {
    ratio(query.num_rel_ret(), query.num_ret())
}

/// Recall of the whole retrieved set.
pub fn set_recall(query: &RankedQuery) -> f64 {
    ratio(query.num_rel_ret(), query.num_rel())
}

/// Set precision relative to the best achievable for the set size.
pub fn set_relative_precision(query: &RankedQuery) -> f64 {
    ratio(query.num_rel_ret(), query.num_ret().min(query.num_rel()))
}

/// Product of set precision and set recall.
pub fn set_map(query: &RankedQuery) -> f64 {
    set_precision(query) * set_recall(query)
}

/// Computes the set F-measure.
///
/// ```text
/// F = (1 + β²) · P · R / (β² · P + R)
/// ```
///
/// Returns 0.0 if both precision and recall are 0.
pub fn set_f(query: &RankedQuery, beta: f64) -> f64 {
    let precision = set_precision(query);
    let recall = set_recall(query);
    let beta2 = beta * beta;
    let denominator = beta2 * precision + recall;

    if denominator == 0.0 {
        0.0
    } else {
        (1.0 + beta2) * precision * recall / denominator
    }
}

// ============================================================================
// Tests
// ============================================================================
