use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Relevance judgments: query id → item id → integer grade.
///
/// Grade 0 means judged not relevant. Negative grades mark items that were
/// pooled but left unjudged.
pub type Qrel = HashMap<String, HashMap<String, i64>>;

/// System output: query id → item id → retrieval score.
pub type Run = HashMap<String, HashMap<String, f64>>;

/// Measure values for one query, keyed by concrete measure name.
pub type QueryMeasures = BTreeMap<String, MeasureValue>;

/// Evaluation output, keyed by query id.
pub type Evaluation = BTreeMap<String, QueryMeasures>;

/// Value of one measure for one query.
///
/// Every measure is numeric except `relstring`, which renders the grades of
/// the top ranked items as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasureValue {
    Number(f64),
    Text(String),
}

impl MeasureValue {
    /// Returns the numeric value, or `None` for text measures.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MeasureValue::Number(value) => Some(*value),
            MeasureValue::Text(_) => None,
        }
    }

    /// Returns the text value, or `None` for numeric measures.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MeasureValue::Number(_) => None,
            MeasureValue::Text(text) => Some(text),
        }
    }
}

impl From<f64> for MeasureValue {
    fn from(value: f64) -> Self {
        MeasureValue::Number(value)
    }
}

impl From<String> for MeasureValue {
    fn from(text: String) -> Self {
        MeasureValue::Text(text)
    }
}

impl fmt::Display for MeasureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureValue::Number(value) => write!(f, "{:.4}", value),
            MeasureValue::Text(text) => f.write_str(text),
        }
    }
}
