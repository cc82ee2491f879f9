//! Measure registry and specification resolution.
//!
//! - `registry`: the fixed table of base measures, parameter grammars and nicknames
//! - `kind`: [`MeasureKind`], a base measure with its parameters applied
//! - `resolve`: turns specification strings into a [`CompiledMeasureSet`]
//!
//! # Nicknames
//!
//! | Nickname | Expands to |
//! |----------|------------|
//! | `official` | num_q, num_ret, num_rel, num_rel_ret, map, gm_map, Rprec, bpref, recip_rank, iprec_at_recall, P |
//! | `set` | num_q, num_ret, num_rel, num_rel_ret, num_nonrel_judged_ret, set_P, set_recall, set_relative_P, set_map, set_F |
//! | `all_trec` | every supported measure |

pub mod kind;
pub mod registry;
pub mod resolve;

pub use kind::MeasureKind;
pub use registry::{nickname, supported_measures, BaseMeasure, Nickname, ParamKind, NICKNAMES};
pub use resolve::{resolve_measures, CompiledMeasure, CompiledMeasureSet};
