//! Concrete measure instances with their parameters applied.

use super::registry::BaseMeasure;

/// A base measure together with its resolved parameters.
///
/// This is the closed set of formulas the evaluator knows how to compute;
/// matching on it is exhaustive, so adding a measure here forces the
/// evaluator to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureKind {
    NumQ,
    NumRet,
    NumRel,
    NumRelRet,
    NumNonrelJudgedRet,
    Map,
    GmMap,
    Rprec,
    /// Precision at rank `m·R` for each multiplier `m`
    RprecMult(Vec<f64>),
    Bpref,
    GmBpref,
    RecipRank,
    InfAp,
    /// Interpolated precision at each recall level
    IprecAtRecall(Vec<f64>),
    /// Mean interpolated precision over the recall levels
    ElevenPtAvg(Vec<f64>),
    /// Precision at each cutoff
    P(Vec<usize>),
    /// Recall at each cutoff
    Recall(Vec<usize>),
    /// Relative precision at each cutoff
    RelativeP(Vec<usize>),
    /// Average precision truncated at each cutoff
    MapCut(Vec<usize>),
    Ndcg,
    /// NDCG truncated at each cutoff
    NdcgCut(Vec<usize>),
    Rndcg,
    NdcgRel,
    G,
    BinG,
    /// Success at each cutoff
    Success(Vec<usize>),
    /// Relevance string over the top `depth` items
    Relstring(usize),
    /// Utility with (rel_ret, nonrel_ret, rel_nonret, nonrel_nonret) weights
    Utility([f64; 4]),
    SetP,
    SetRecall,
    SetRelativeP,
    SetMap,
    /// Set F-measure with the given beta
    SetF(f64),
}

impl MeasureKind {
    /// Returns the base measure this instance was built from.
    pub fn base(&self) -> BaseMeasure {
        match self {
            MeasureKind::NumQ => BaseMeasure::NumQ,
            MeasureKind::NumRet => BaseMeasure::NumRet,
            MeasureKind::NumRel => BaseMeasure::NumRel,
            MeasureKind::NumRelRet => BaseMeasure::NumRelRet,
            MeasureKind::NumNonrelJudgedRet => BaseMeasure::NumNonrelJudgedRet,
            MeasureKind::Map => BaseMeasure::Map,
            MeasureKind::GmMap => BaseMeasure::GmMap,
            MeasureKind::Rprec => BaseMeasure::Rprec,
            MeasureKind::RprecMult(_) => BaseMeasure::RprecMult,
            MeasureKind::Bpref => BaseMeasure::Bpref,
            MeasureKind::GmBpref => BaseMeasure::GmBpref,
            MeasureKind::RecipRank => BaseMeasure::RecipRank,
            MeasureKind::InfAp => BaseMeasure::InfAp,
            MeasureKind::IprecAtRecall(_) => BaseMeasure::IprecAtRecall,
            MeasureKind::ElevenPtAvg(_) => BaseMeasure::ElevenPtAvg,
            MeasureKind::P(_) => BaseMeasure::P,
            MeasureKind::Recall(_) => BaseMeasure::Recall,
            MeasureKind::RelativeP(_) => BaseMeasure::RelativeP,
            MeasureKind::MapCut(_) => BaseMeasure::MapCut,
            MeasureKind::Ndcg => BaseMeasure::Ndcg,
            MeasureKind::NdcgCut(_) => BaseMeasure::NdcgCut,
            MeasureKind::Rndcg => BaseMeasure::Rndcg,
            MeasureKind::NdcgRel => BaseMeasure::NdcgRel,
            MeasureKind::G => BaseMeasure::G,
            MeasureKind::BinG => BaseMeasure::BinG,
            MeasureKind::Success(_) => BaseMeasure::Success,
            MeasureKind::Relstring(_) => BaseMeasure::Relstring,
            MeasureKind::Utility(_) => BaseMeasure::Utility,
            MeasureKind::SetP => BaseMeasure::SetP,
            MeasureKind::SetRecall => BaseMeasure::SetRecall,
            MeasureKind::SetRelativeP => BaseMeasure::SetRelativeP,
            MeasureKind::SetMap => BaseMeasure::SetMap,
            MeasureKind::SetF(_) => BaseMeasure::SetF,
        }
    }

    /// Returns the concrete result names this instance produces.
    ///
    /// Cutoff families produce one name per cutoff (`P_10`), recall-level and
    /// multiplier families one per value with two decimals
    /// (`iprec_at_recall_0.10`, `Rprec_mult_0.20`), everything else the bare
    /// base name.
    pub fn output_names(&self) -> Vec<String> {
        let name = self.base().name();
        match self {
            MeasureKind::P(cutoffs)
            | MeasureKind::Recall(cutoffs)
            | MeasureKind::RelativeP(cutoffs)
            | MeasureKind::MapCut(cutoffs)
            | MeasureKind::NdcgCut(cutoffs)
            | MeasureKind::Success(cutoffs) => cutoffs
                .iter()
                .map(|k| cutoff_name(name, *k))
                .collect(),
            MeasureKind::IprecAtRecall(levels) | MeasureKind::RprecMult(levels) => levels
                .iter()
                .map(|level| level_name(name, *level))
                .collect(),
            _ => vec![name.to_string()],
        }
    }
}

/// Formats a cutoff result name, e.g. `ndcg_cut_10`.
pub fn cutoff_name(base: &str, cutoff: usize) -> String {
    format!("{}_{}", base, cutoff)
}

/// Formats a recall-level or multiplier result name, e.g. `iprec_at_recall_0.10`.
pub fn level_name(base: &str, level: f64) -> String {
    format!("{}_{:.2}", base, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutoff_output_names() {
        let kind = MeasureKind::NdcgCut(vec![1, 4, 15]);
        assert_eq!(
            kind.output_names(),
            vec!["ndcg_cut_1", "ndcg_cut_4", "ndcg_cut_15"]
        );
    }

    #[test]
    fn test_level_output_names() {
        let kind = MeasureKind::IprecAtRecall(vec![0.0, 0.1, 1.0]);
        assert_eq!(
            kind.output_names(),
            vec![
                "iprec_at_recall_0.00",
                "iprec_at_recall_0.10",
                "iprec_at_recall_1.00"
            ]
        );
    }

    #[test]
    fn test_multiplier_output_names() {
        let kind = MeasureKind::RprecMult(vec![0.2, 1.5]);
        assert_eq!(kind.output_names(), vec!["Rprec_mult_0.20", "Rprec_mult_1.50"]);
    }

    #[test]
    fn test_single_output_names() {
        assert_eq!(MeasureKind::Ndcg.output_names(), vec!["ndcg"]);
        assert_eq!(MeasureKind::ElevenPtAvg(vec![0.5]).output_names(), vec!["11pt_avg"]);
        assert_eq!(MeasureKind::Relstring(3).output_names(), vec!["relstring"]);
        assert_eq!(MeasureKind::NdcgRel.output_names(), vec!["ndcg_rel"]);
        assert_eq!(MeasureKind::SetRelativeP.output_names(), vec!["set_relative_P"]);
    }
}
