//! Core types for the query system

use serde::{Deserialize, Serialize};

/// Where a filter lands inside a boolean clause set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occur {
    /// Clause must match (AND)
    #[default]
    Must,
    /// At least one should-clause must match (OR)
    Should,
    /// Clause must not match (NOT)
    MustNot,
}

/// Default operator for combining terms in a free-text query
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultOperator {
    /// All terms must match (AND)
    And,
    /// At least one term must match (OR)
    #[default]
    Or,
}

impl DefaultOperator {
    /// Parse from the declarative specification value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "and" => Some(DefaultOperator::And),
            "or" => Some(DefaultOperator::Or),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultOperator::And => "and",
            DefaultOperator::Or => "or",
        }
    }
}

/// Value type for range bounds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeValue {
    /// 64-bit integer
    Long(i64),
    /// 64-bit floating point
    Double(f64),
}

impl RangeValue {
    /// Convert to f64
    pub fn as_f64(&self) -> f64 {
        match self {
            RangeValue::Long(v) => *v as f64,
            RangeValue::Double(v) => *v,
        }
    }
}

/// Bounds for a range filter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeBounds {
    /// Greater than or equal to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<RangeValue>,
    /// Greater than
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<RangeValue>,
    /// Less than or equal to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<RangeValue>,
    /// Less than
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<RangeValue>,
    /// Boost factor for scoring
    #[serde(default = "default_boost")]
    pub boost: f32,
}

fn default_boost() -> f32 {
    1.0
}

impl Default for RangeBounds {
    fn default() -> Self {
        Self {
            gte: None,
            gt: None,
            lte: None,
            lt: None,
            boost: 1.0,
        }
    }
}

impl RangeBounds {
    /// Whether any bound is set
    pub fn is_bounded(&self) -> bool {
        self.gte.is_some() || self.gt.is_some() || self.lte.is_some() || self.lt.is_some()
    }
}

/// Fuzziness of an approximate text match
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Fuzziness {
    /// Edit distance chosen by the engine from the term length
    #[default]
    Auto,
    /// Fixed maximum edit distance
    Distance(u32),
}

impl Fuzziness {
    /// Wire representation: `"AUTO"` or the bare distance
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Fuzziness::Auto => serde_json::Value::String("AUTO".to_string()),
            Fuzziness::Distance(d) => serde_json::Value::from(*d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_operator_parse() {
        assert_eq!(DefaultOperator::parse("and"), Some(DefaultOperator::And));
        assert_eq!(DefaultOperator::parse("or"), Some(DefaultOperator::Or));
        assert_eq!(DefaultOperator::parse("xor"), None);
    }

    #[test]
    fn test_range_bounds_serialization_skips_unset() {
        let bounds = RangeBounds {
            gte: Some(RangeValue::Long(10)),
            ..RangeBounds::default()
        };
        let json = serde_json::to_value(&bounds).unwrap();
        assert_eq!(json["gte"], 10);
        assert!(json.get("lt").is_none());
        assert_eq!(json["boost"], 1.0);
    }

    #[test]
    fn test_fuzziness_wire_values() {
        assert_eq!(Fuzziness::Auto.to_value(), serde_json::json!("AUTO"));
        assert_eq!(Fuzziness::Distance(2).to_value(), serde_json::json!(2));
    }
}
