//! Static table of supported measures and nicknames.
//!
//! The registry is a compile-time constant: [`BaseMeasure::ALL`] lists every
//! supported base measure, [`BaseMeasure::param_kind`] describes how each one
//! is parameterized, and [`NICKNAMES`] maps group names to base measures.

use crate::config::{
    DEFAULT_CUTOFFS, DEFAULT_F_BETA, DEFAULT_RECALL_LEVELS, DEFAULT_RELSTRING_DEPTH,
    DEFAULT_RPREC_MULTIPLIERS, DEFAULT_SUCCESS_CUTOFFS, DEFAULT_UTILITY_WEIGHTS,
};
use std::collections::BTreeSet;
use std::fmt;

/// A supported base measure, before parameters are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseMeasure {
    NumQ,
    NumRet,
    NumRel,
    NumRelRet,
    NumNonrelJudgedRet,
    Map,
    GmMap,
    Rprec,
    RprecMult,
    Bpref,
    GmBpref,
    RecipRank,
    InfAp,
    IprecAtRecall,
    ElevenPtAvg,
    P,
    Recall,
    RelativeP,
    MapCut,
    Ndcg,
    NdcgCut,
    Rndcg,
    NdcgRel,
    G,
    BinG,
    Success,
    Relstring,
    Utility,
    SetP,
    SetRecall,
    SetRelativeP,
    SetMap,
    SetF,
}

/// Parameter grammar of a base measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Takes no parameters
    None,
    /// List of positive integer rank cutoffs
    Cutoffs(&'static [usize]),
    /// List of non-negative recall levels
    Levels(&'static [f64]),
    /// List of non-negative multiples of R
    Multipliers(&'static [f64]),
    /// A single positive integer depth
    Depth(usize),
    /// A single non-negative weight
    Beta(f64),
    /// Exactly four positional weights
    Weights([f64; 4]),
}

impl ParamKind {
    /// Returns true if the measure accepts a parameter list.
    pub fn accepts_params(&self) -> bool {
        !matches!(self, ParamKind::None)
    }
}

impl BaseMeasure {
    /// Every supported base measure, in registry order.
    pub const ALL: &'static [BaseMeasure] = &[
        BaseMeasure::NumQ,
        BaseMeasure::NumRet,
        BaseMeasure::NumRel,
        BaseMeasure::NumRelRet,
        BaseMeasure::NumNonrelJudgedRet,
        BaseMeasure::Map,
        BaseMeasure::GmMap,
        BaseMeasure::Rprec,
        BaseMeasure::RprecMult,
        BaseMeasure::Bpref,
        BaseMeasure::GmBpref,
        BaseMeasure::RecipRank,
        BaseMeasure::InfAp,
        BaseMeasure::IprecAtRecall,
        BaseMeasure::ElevenPtAvg,
        BaseMeasure::P,
        BaseMeasure::Recall,
        BaseMeasure::RelativeP,
        BaseMeasure::MapCut,
        BaseMeasure::Ndcg,
        BaseMeasure::NdcgCut,
        BaseMeasure::Rndcg,
        BaseMeasure::NdcgRel,
        BaseMeasure::G,
        BaseMeasure::BinG,
        BaseMeasure::Success,
        BaseMeasure::Relstring,
        BaseMeasure::Utility,
        BaseMeasure::SetP,
        BaseMeasure::SetRecall,
        BaseMeasure::SetRelativeP,
        BaseMeasure::SetMap,
        BaseMeasure::SetF,
    ];

    /// Returns the trec_eval name of the measure.
    pub fn name(&self) -> &'static str {
        match self {
            BaseMeasure::NumQ => "num_q",
            BaseMeasure::NumRet => "num_ret",
            BaseMeasure::NumRel => "num_rel",
            BaseMeasure::NumRelRet => "num_rel_ret",
            BaseMeasure::NumNonrelJudgedRet => "num_nonrel_judged_ret",
            BaseMeasure::Map => "map",
            BaseMeasure::GmMap => "gm_map",
            BaseMeasure::Rprec => "Rprec",
            BaseMeasure::RprecMult => "Rprec_mult",
            BaseMeasure::Bpref => "bpref",
            BaseMeasure::GmBpref => "gm_bpref",
            BaseMeasure::RecipRank => "recip_rank",
            BaseMeasure::InfAp => "infAP",
            BaseMeasure::IprecAtRecall => "iprec_at_recall",
            BaseMeasure::ElevenPtAvg => "11pt_avg",
            BaseMeasure::P => "P",
            BaseMeasure::Recall => "recall",
            BaseMeasure::RelativeP => "relative_P",
            BaseMeasure::MapCut => "map_cut",
            BaseMeasure::Ndcg => "ndcg",
            BaseMeasure::NdcgCut => "ndcg_cut",
            BaseMeasure::Rndcg => "Rndcg",
            BaseMeasure::NdcgRel => "ndcg_rel",
            BaseMeasure::G => "G",
            BaseMeasure::BinG => "binG",
            BaseMeasure::Success => "success",
            BaseMeasure::Relstring => "relstring",
            BaseMeasure::Utility => "utility",
            BaseMeasure::SetP => "set_P",
            BaseMeasure::SetRecall => "set_recall",
            BaseMeasure::SetRelativeP => "set_relative_P",
            BaseMeasure::SetMap => "set_map",
            BaseMeasure::SetF => "set_F",
        }
    }

    /// Looks up a base measure by its exact name.
    pub fn from_name(name: &str) -> Option<BaseMeasure> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// Returns the parameter grammar and defaults of the measure.
    pub fn param_kind(&self) -> ParamKind {
        match self {
            BaseMeasure::P
            | BaseMeasure::Recall
            | BaseMeasure::RelativeP
            | BaseMeasure::MapCut
            | BaseMeasure::NdcgCut => ParamKind::Cutoffs(DEFAULT_CUTOFFS),
            BaseMeasure::Success => ParamKind::Cutoffs(DEFAULT_SUCCESS_CUTOFFS),
            BaseMeasure::IprecAtRecall | BaseMeasure::ElevenPtAvg => {
                ParamKind::Levels(DEFAULT_RECALL_LEVELS)
            }
            BaseMeasure::RprecMult => ParamKind::Multipliers(DEFAULT_RPREC_MULTIPLIERS),
            BaseMeasure::Relstring => ParamKind::Depth(DEFAULT_RELSTRING_DEPTH),
            BaseMeasure::SetF => ParamKind::Beta(DEFAULT_F_BETA),
            BaseMeasure::Utility => ParamKind::Weights(DEFAULT_UTILITY_WEIGHTS),
            _ => ParamKind::None,
        }
    }

    /// Returns a one-line description of the measure.
    pub fn description(&self) -> &'static str {
        match self {
            BaseMeasure::NumQ => "Number of evaluated queries",
            BaseMeasure::NumRet => "Number of retrieved items",
            BaseMeasure::NumRel => "Number of relevant items in the judgments",
            BaseMeasure::NumRelRet => "Number of relevant items retrieved",
            BaseMeasure::NumNonrelJudgedRet => "Number of judged non-relevant items retrieved",
            BaseMeasure::Map => "Mean average precision",
            BaseMeasure::GmMap => "Log of average precision, for geometric mean aggregation",
            BaseMeasure::Rprec => "Precision at rank R, R = number of relevant items",
            BaseMeasure::RprecMult => "Precision at multiples of rank R",
            BaseMeasure::Bpref => "Binary preference over judged items",
            BaseMeasure::GmBpref => "Log of bpref, for geometric mean aggregation",
            BaseMeasure::RecipRank => "Reciprocal rank of the first relevant item",
            BaseMeasure::InfAp => "Inferred average precision for sampled judgments",
            BaseMeasure::IprecAtRecall => "Interpolated precision at recall levels",
            BaseMeasure::ElevenPtAvg => "Mean interpolated precision over recall levels",
            BaseMeasure::P => "Precision at rank cutoffs",
            BaseMeasure::Recall => "Recall at rank cutoffs",
            BaseMeasure::RelativeP => "Precision relative to the best achievable at rank cutoffs",
            BaseMeasure::MapCut => "Average precision truncated at rank cutoffs",
            BaseMeasure::Ndcg => "Normalized discounted cumulative gain",
            BaseMeasure::NdcgCut => "NDCG truncated at rank cutoffs",
            BaseMeasure::Rndcg => "NDCG truncated at rank R",
            BaseMeasure::NdcgRel => "NDCG averaged over the ranks of relevant items",
            BaseMeasure::G => "Undiscounted gain, normalized by the ideal gain",
            BaseMeasure::BinG => "Undiscounted normalized gain with binary relevance",
            BaseMeasure::Success => "Whether a relevant item appears above rank cutoffs",
            BaseMeasure::Relstring => "Relevance grades of the top ranked items",
            BaseMeasure::Utility => "Weighted contingency table utility",
            BaseMeasure::SetP => "Precision of the whole retrieved set",
            BaseMeasure::SetRecall => "Recall of the whole retrieved set",
            BaseMeasure::SetRelativeP => "Set precision relative to the best achievable",
            BaseMeasure::SetMap => "Product of set precision and set recall",
            BaseMeasure::SetF => "F-measure of set precision and set recall",
        }
    }
}

impl fmt::Display for BaseMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named group of base measures.
#[derive(Debug, Clone, Copy)]
pub struct Nickname {
    pub name: &'static str,
    pub measures: &'static [BaseMeasure],
}

/// The measures conventionally reported in published comparisons.
const OFFICIAL: &[BaseMeasure] = &[
    BaseMeasure::NumQ,
    BaseMeasure::NumRet,
    BaseMeasure::NumRel,
    BaseMeasure::NumRelRet,
    BaseMeasure::Map,
    BaseMeasure::GmMap,
    BaseMeasure::Rprec,
    BaseMeasure::Bpref,
    BaseMeasure::RecipRank,
    BaseMeasure::IprecAtRecall,
    BaseMeasure::P,
];

/// Unranked measures over the retrieved set.
const SET: &[BaseMeasure] = &[
    BaseMeasure::NumQ,
    BaseMeasure::NumRet,
    BaseMeasure::NumRel,
    BaseMeasure::NumRelRet,
    BaseMeasure::NumNonrelJudgedRet,
    BaseMeasure::SetP,
    BaseMeasure::SetRecall,
    BaseMeasure::SetRelativeP,
    BaseMeasure::SetMap,
    BaseMeasure::SetF,
];

/// Nickname table.
pub const NICKNAMES: &[Nickname] = &[
    Nickname {
        name: "official",
        measures: OFFICIAL,
    },
    Nickname {
        name: "set",
        measures: SET,
    },
    Nickname {
        name: "all_trec",
        measures: BaseMeasure::ALL,
    },
];

/// Looks up a nickname by name.
pub fn nickname(name: &str) -> Option<&'static Nickname> {
    NICKNAMES.iter().find(|n| n.name == name)
}

/// Returns the names of every supported base measure.
pub fn supported_measures() -> BTreeSet<&'static str> {
    BaseMeasure::ALL.iter().map(BaseMeasure::name).collect()
}
