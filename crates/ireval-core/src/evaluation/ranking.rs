//! Ranked judgment lists.
//!
//! A [`RankedQuery`] is the per-query input to every measure: the retrieved
//! items in rank order, each replaced by its judgment, plus the counts taken
//! from the qrel that normalise the measures.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Judgment of one retrieved item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgment {
    /// Judged with a non-negative grade
    Graded(i64),
    /// Present in the qrel with a negative grade (pooled, not judged)
    Unjudged,
    /// Absent from the qrel
    NotInPool,
}

impl Judgment {
    fn from_grade(grade: Option<i64>) -> Self {
        match grade {
            Some(g) if g >= 0 => Judgment::Graded(g),
            Some(_) => Judgment::Unjudged,
            None => Judgment::NotInPool,
        }
    }

    /// Non-negative gain used by NDCG.
    pub fn gain(&self) -> f64 {
        match self {
            Judgment::Graded(g) => *g as f64,
            _ => 0.0,
        }
    }
}

/// Orders retrieved items by score descending, ties by item id descending.
///
/// Scores are compared with `total_cmp`, so the order is total even for NaN.
/// The item id fallback follows trec_eval, which breaks score ties on the
/// document number in reverse lexicographic order.
pub fn rank_items(scores: &HashMap<String, f64>) -> Vec<(&str, f64)> {
    let mut ranked: Vec<(&str, f64)> = scores
        .iter()
        .map(|(item, score)| (item.as_str(), *score))
        .collect();
    ranked.sort_by(|a, b| compare_ranked(a, b));
    ranked
}

fn compare_ranked(a: &(&str, f64), b: &(&str, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| b.0.cmp(a.0))
}

/// Retrieved items of one query in rank order, with qrel-derived counts.
#[derive(Debug, Clone)]
pub struct RankedQuery {
    judgments: Vec<Judgment>,
    relevance_level: i64,
    num_rel: usize,
    num_nonrel: usize,
    /// Positive qrel grades, descending (the ideal ranking's gains)
    ideal_gains: Vec<f64>,
}

impl RankedQuery {
    /// Builds the ranked judgment list for one query.
    ///
    /// # Arguments
    ///
    /// * `scores` - Retrieved item ids and their scores
    /// * `grades` - The query's relevance judgments
    /// * `relevance_level` - Minimum grade counted as relevant
    pub fn build(
        scores: &HashMap<String, f64>,
        grades: &HashMap<String, i64>,
        relevance_level: i64,
    ) -> Self {
        let judgments = rank_items(scores)
            .into_iter()
            .map(|(item, _)| Judgment::from_grade(grades.get(item).copied()))
            .collect();

        let num_rel = grades.values().filter(|g| **g >= relevance_level).count();
        let num_nonrel = grades
            .values()
            .filter(|g| **g >= 0 && **g < relevance_level)
            .count();

        let mut ideal_gains: Vec<f64> = grades
            .values()
            .filter(|g| **g > 0)
            .map(|g| *g as f64)
            .collect();
        ideal_gains.sort_by(|a, b| b.total_cmp(a));

        Self {
            judgments,
            relevance_level,
            num_rel,
            num_nonrel,
            ideal_gains,
        }
    }

    /// Judgments in rank order (index 0 is rank 1).
    pub fn judgments(&self) -> &[Judgment] {
        &self.judgments
    }

    /// Gains of the ideal ranking, descending.
    pub fn ideal_gains(&self) -> &[f64] {
        &self.ideal_gains
    }

    /// Returns true if the judgment counts as relevant.
    pub fn is_relevant(&self, judgment: Judgment) -> bool {
        matches!(judgment, Judgment::Graded(g) if g >= self.relevance_level)
    }

    /// Returns true if the judgment is a judged non-relevant grade.
    pub fn is_judged_nonrelevant(&self, judgment: Judgment) -> bool {
        matches!(judgment, Judgment::Graded(g) if g < self.relevance_level)
    }

    /// Number of retrieved items.
    pub fn num_ret(&self) -> usize {
        self.judgments.len()
    }

    /// Number of relevant items in the qrel.
    pub fn num_rel(&self) -> usize {
        self.num_rel
    }

    /// Number of judged non-relevant items in the qrel.
    pub fn num_nonrel(&self) -> usize {
        self.num_nonrel
    }

    /// Number of relevant items retrieved.
    pub fn num_rel_ret(&self) -> usize {
        self.relevant_in_top(self.num_ret())
    }

    /// Number of judged non-relevant items retrieved.
    pub fn num_nonrel_judged_ret(&self) -> usize {
        self.judgments
            .iter()
            .filter(|j| self.is_judged_nonrelevant(**j))
            .count()
    }

    /// Number of relevant items in the top `k` ranks.
    pub fn relevant_in_top(&self, k: usize) -> usize {
        self.judgments
            .iter()
            .take(k)
            .filter(|j| self.is_relevant(**j))
            .count()
    }
}
