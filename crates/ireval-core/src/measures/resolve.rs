//! Measure specification resolution.
//!
//! Turns user-supplied specification strings into a [`CompiledMeasureSet`].
//!
//! # Grammar
//!
//! ```text
//! spec     := nickname | base | base sep params
//! sep      := "." | "_"
//! params   := number ("," number)*
//! ```
//!
//! Nicknames expand to their base measures. Parameters given for the same
//! base measure by several strings are merged, so `ndcg_cut.1,4`,
//! `ndcg_cut_20,4` and `ndcg_cut_15` resolve to a single `ndcg_cut` instance
//! with cutoffs `1,4,15,20`.

use super::kind::{level_name, MeasureKind};
use super::registry::{nickname, BaseMeasure, ParamKind};
use crate::error::MeasureError;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// A resolved, deduplicated set of measure instances.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledMeasureSet {
    measures: Vec<CompiledMeasure>,
    relevance_level: i64,
}

/// One resolved measure and its canonical specification.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledMeasure {
    /// Canonical form, `base` or `base.p1,p2,...`
    pub canonical: String,
    pub kind: MeasureKind,
}

impl CompiledMeasureSet {
    /// Returns the resolved measure instances, in registry order.
    pub fn measures(&self) -> impl Iterator<Item = &MeasureKind> {
        self.measures.iter().map(|m| &m.kind)
    }

    /// Returns the canonical specification of every instance.
    pub fn canonical_names(&self) -> Vec<String> {
        self.measures.iter().map(|m| m.canonical.clone()).collect()
    }

    /// Returns every concrete result name an evaluation will produce.
    pub fn output_names(&self) -> BTreeSet<String> {
        self.measures
            .iter()
            .flat_map(|m| m.kind.output_names())
            .collect()
    }

    /// Minimum grade counted as relevant.
    pub fn relevance_level(&self) -> i64 {
        self.relevance_level
    }

    pub fn len(&self) -> usize {
        self.measures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }
}

/// Parameters collected for one base measure across specification strings.
#[derive(Debug, Default)]
struct Collected {
    /// (originating spec, parameter list) pairs
    lists: Vec<(String, Vec<f64>)>,
}

/// Resolves measure specifications into a compiled measure set.
///
/// # Arguments
///
/// * `specs` - Measure names, parameterized specifications and nicknames
/// * `relevance_level` - Minimum grade counted as relevant (must be >= 1)
///
/// # Errors
///
/// Returns [`MeasureError::UnsupportedMeasure`] naming the first string that
/// matches no base measure or nickname, and [`MeasureError::InvalidParameters`]
/// or [`MeasureError::ConflictingParameters`] when parameters do not fit the
/// measure.
///
/// # Example
///
/// ```
/// use ireval_core::measures::resolve_measures;
///
/// let set = resolve_measures(["ndcg_cut.1,4", "ndcg_cut_20,4", "map"], 1).unwrap();
/// assert_eq!(set.canonical_names(), vec!["map", "ndcg_cut.1,4,20"]);
/// ```
pub fn resolve_measures<I, S>(
    specs: I,
    relevance_level: i64,
) -> Result<CompiledMeasureSet, MeasureError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if relevance_level < 1 {
        return Err(MeasureError::InvalidRelevanceLevel(relevance_level));
    }

    let mut collected: BTreeMap<BaseMeasure, Collected> = BTreeMap::new();

    for spec in specs {
        let spec = spec.as_ref().trim();

        if let Some(nick) = nickname(spec) {
            for measure in nick.measures {
                collected.entry(*measure).or_default();
            }
            continue;
        }

        let (base, params) =
            split_spec(spec).ok_or_else(|| MeasureError::UnsupportedMeasure(spec.to_string()))?;
        let entry = collected.entry(base).or_default();

        if let Some(params) = params {
            if !base.param_kind().accepts_params() {
                return Err(MeasureError::InvalidParameters {
                    spec: spec.to_string(),
                    reason: format!("{} takes no parameters", base),
                });
            }
            entry.lists.push((spec.to_string(), params));
        }
    }

    let measures = collected
        .into_iter()
        .map(|(base, params)| compile(base, params))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Resolved {} measure instances (relevance level {})",
        measures.len(),
        relevance_level
    );

    Ok(CompiledMeasureSet {
        measures,
        relevance_level,
    })
}

/// Splits a specification into its base measure and optional parameter list.
///
/// An exact base name wins. Otherwise every `.`/`_` position is tried from
/// the left; the first whose prefix is a base measure and whose suffix is a
/// number list is used. `ndcg_cut_10` first tries `ndcg` + `cut_10` (not a
/// number list) and then `ndcg_cut` + `10`.
fn split_spec(spec: &str) -> Option<(BaseMeasure, Option<Vec<f64>>)> {
    if let Some(base) = BaseMeasure::from_name(spec) {
        return Some((base, None));
    }

    spec.char_indices()
        .filter(|(_, c)| *c == '.' || *c == '_')
        .find_map(|(i, _)| {
            let base = BaseMeasure::from_name(&spec[..i])?;
            let params = parse_param_list(&spec[i + 1..])?;
            Some((base, Some(params)))
        })
}

/// Parses a non-empty comma-separated list of finite numbers.
fn parse_param_list(params: &str) -> Option<Vec<f64>> {
    params
        .split(',')
        .map(|p| {
            let p = p.trim();
            if p.is_empty() || !p.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.')
            {
                return None;
            }
            p.parse::<f64>().ok().filter(|v| v.is_finite())
        })
        .collect()
}

fn compile(base: BaseMeasure, params: Collected) -> Result<CompiledMeasure, MeasureError> {
    let name = base.name();

    // No explicit parameters: registry defaults, bare canonical name.
    if params.lists.is_empty() {
        let kind = with_defaults(base);
        return Ok(CompiledMeasure {
            canonical: name.to_string(),
            kind,
        });
    }

    let (canonical_params, kind) = match base.param_kind() {
        ParamKind::None => unreachable!("parameters rejected during collection"),
        ParamKind::Cutoffs(_) => {
            let mut cutoffs = BTreeSet::new();
            for (spec, list) in &params.lists {
                for value in list {
                    cutoffs.insert(positive_integer(spec, *value)?);
                }
            }
            let cutoffs: Vec<usize> = cutoffs.into_iter().collect();
            (join(cutoffs.iter()), cutoff_kind(base, cutoffs))
        }
        ParamKind::Levels(_) | ParamKind::Multipliers(_) => {
            let mut values = Vec::new();
            for (spec, list) in &params.lists {
                for value in list {
                    if *value < 0.0 {
                        return Err(invalid(spec, "values must be non-negative"));
                    }
                    values.push(*value);
                }
            }
            values.sort_by(f64::total_cmp);
            values.dedup();

            let kind = fractional_kind(base, values.clone());
            if base != BaseMeasure::ElevenPtAvg {
                distinct_names(&params, name, &values)?;
            }
            (join(values.iter()), kind)
        }
        ParamKind::Depth(_) => {
            let mut depths = BTreeSet::new();
            for (spec, list) in &params.lists {
                let value = single(spec, list)?;
                depths.insert(positive_integer(spec, value)?);
            }
            let depth = agree(name, depths)?;
            (depth.to_string(), MeasureKind::Relstring(depth))
        }
        ParamKind::Beta(_) => {
            let mut betas: Vec<f64> = Vec::new();
            for (spec, list) in &params.lists {
                let value = single(spec, list)?;
                if value < 0.0 {
                    return Err(invalid(spec, "beta must be non-negative"));
                }
                betas.push(value);
            }
            betas.sort_by(f64::total_cmp);
            betas.dedup();
            let beta = agree(name, betas)?;
            (beta.to_string(), MeasureKind::SetF(beta))
        }
        ParamKind::Weights(_) => {
            let mut weights: Vec<[f64; 4]> = Vec::new();
            for (spec, list) in &params.lists {
                let parsed: [f64; 4] = list
                    .as_slice()
                    .try_into()
                    .map_err(|_| invalid(spec, "utility takes exactly four weights"))?;
                if !weights.contains(&parsed) {
                    weights.push(parsed);
                }
            }
            let weights = agree(name, weights)?;
            (join(weights.iter()), MeasureKind::Utility(weights))
        }
    };

    Ok(CompiledMeasure {
        canonical: format!("{}.{}", name, canonical_params),
        kind,
    })
}

/// Builds an instance carrying the registry defaults.
fn with_defaults(base: BaseMeasure) -> MeasureKind {
    match base.param_kind() {
        ParamKind::Cutoffs(cutoffs) => cutoff_kind(base, cutoffs.to_vec()),
        ParamKind::Levels(values) | ParamKind::Multipliers(values) => {
            fractional_kind(base, values.to_vec())
        }
        ParamKind::Depth(depth) => MeasureKind::Relstring(depth),
        ParamKind::Beta(beta) => MeasureKind::SetF(beta),
        ParamKind::Weights(weights) => MeasureKind::Utility(weights),
        ParamKind::None => match base {
            BaseMeasure::NumQ => MeasureKind::NumQ,
            BaseMeasure::NumRet => MeasureKind::NumRet,
            BaseMeasure::NumRel => MeasureKind::NumRel,
            BaseMeasure::NumRelRet => MeasureKind::NumRelRet,
            BaseMeasure::NumNonrelJudgedRet => MeasureKind::NumNonrelJudgedRet,
            BaseMeasure::Map => MeasureKind::Map,
            BaseMeasure::GmMap => MeasureKind::GmMap,
            BaseMeasure::Rprec => MeasureKind::Rprec,
            BaseMeasure::Bpref => MeasureKind::Bpref,
            BaseMeasure::GmBpref => MeasureKind::GmBpref,
            BaseMeasure::RecipRank => MeasureKind::RecipRank,
            BaseMeasure::InfAp => MeasureKind::InfAp,
            BaseMeasure::Ndcg => MeasureKind::Ndcg,
            BaseMeasure::Rndcg => MeasureKind::Rndcg,
            BaseMeasure::NdcgRel => MeasureKind::NdcgRel,
            BaseMeasure::G => MeasureKind::G,
            BaseMeasure::BinG => MeasureKind::BinG,
            BaseMeasure::SetP => MeasureKind::SetP,
            BaseMeasure::SetRecall => MeasureKind::SetRecall,
            BaseMeasure::SetRelativeP => MeasureKind::SetRelativeP,
            BaseMeasure::SetMap => MeasureKind::SetMap,
            other => unreachable!("{} has parameters", other),
        },
    }
}

fn cutoff_kind(base: BaseMeasure, cutoffs: Vec<usize>) -> MeasureKind {
    match base {
        BaseMeasure::P => MeasureKind::P(cutoffs),
        BaseMeasure::Recall => MeasureKind::Recall(cutoffs),
        BaseMeasure::RelativeP => MeasureKind::RelativeP(cutoffs),
        BaseMeasure::MapCut => MeasureKind::MapCut(cutoffs),
        BaseMeasure::NdcgCut => MeasureKind::NdcgCut(cutoffs),
        BaseMeasure::Success => MeasureKind::Success(cutoffs),
        other => unreachable!("{} does not take cutoffs", other),
    }
}

fn fractional_kind(base: BaseMeasure, values: Vec<f64>) -> MeasureKind {
    match base {
        BaseMeasure::IprecAtRecall => MeasureKind::IprecAtRecall(values),
        BaseMeasure::ElevenPtAvg => MeasureKind::ElevenPtAvg(values),
        BaseMeasure::RprecMult => MeasureKind::RprecMult(values),
        other => unreachable!("{} does not take fractional parameters", other),
    }
}

/// Rejects values that would share a result name once formatted.
fn distinct_names(params: &Collected, name: &str, values: &[f64]) -> Result<(), MeasureError> {
    for pair in values.windows(2) {
        let (a, b) = (level_name(name, pair[0]), level_name(name, pair[1]));
        if a == b {
            let spec = params
                .lists
                .iter()
                .find(|(_, list)| list.contains(&pair[1]))
                .map(|(spec, _)| spec.as_str())
                .unwrap_or(name);
            return Err(invalid(
                spec,
                &format!("{} and {} both report as {}", pair[0], pair[1], a),
            ));
        }
    }
    Ok(())
}

fn positive_integer(spec: &str, value: f64) -> Result<usize, MeasureError> {
    if value < 1.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(invalid(
            spec,
            &format!("'{}' is not a positive integer cutoff", value),
        ));
    }
    Ok(value as usize)
}

fn single(spec: &str, list: &[f64]) -> Result<f64, MeasureError> {
    match list {
        [value] => Ok(*value),
        _ => Err(invalid(spec, "expected a single parameter")),
    }
}

/// Requires that every specification agreed on one value.
fn agree<T, C>(measure: &str, values: C) -> Result<T, MeasureError>
where
    C: IntoIterator<Item = T>,
{
    let mut values = values.into_iter();
    match (values.next(), values.next()) {
        (Some(value), None) => Ok(value),
        _ => Err(MeasureError::ConflictingParameters {
            measure: measure.to_string(),
            reason: "specifications disagree on its parameter".to_string(),
        }),
    }
}

fn invalid(spec: &str, reason: &str) -> MeasureError {
    MeasureError::InvalidParameters {
        spec: spec.to_string(),
        reason: reason.to_string(),
    }
}

fn join<T: ToString>(values: impl Iterator<Item = T>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}
