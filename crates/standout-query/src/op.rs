//! Filter operators.
//!
//! The [`Op`] enum lists the tokens accepted as keys of an operator-map
//! filter, e.g. `age[GTE]=18&age[LT]=65`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operator token of an operator-map filter.
///
/// - **Comparison**: `Gt`, `Gte`, `Lt`, `Lte` - always a single value
/// - **Negation**: `Not` - a single value or a list of excluded values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Op {
    /// Greater than.
    #[serde(rename = "GT")]
    Gt,
    /// Greater than or equal.
    #[serde(rename = "GTE")]
    Gte,
    /// Less than.
    #[serde(rename = "LT")]
    Lt,
    /// Less than or equal.
    #[serde(rename = "LTE")]
    Lte,
    /// Not equal to (any of) the given value(s).
    #[serde(rename = "NOT")]
    Not,
}

impl Op {
    /// All operators, in declaration order.
    pub const ALL: [Op; 5] = [Op::Gt, Op::Gte, Op::Lt, Op::Lte, Op::Not];

    /// Returns `true` if this operator is a single-value comparison.
    pub fn is_comparison(self) -> bool {
        matches!(self, Op::Gt | Op::Gte | Op::Lt | Op::Lte)
    }

    /// Returns `true` if this operator may hold a list of values.
    pub fn accepts_many(self) -> bool {
        matches!(self, Op::Not)
    }

    /// Returns the query-string token of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Gt => "GT",
            Op::Gte => "GTE",
            Op::Lt => "LT",
            Op::Lte => "LTE",
            Op::Not => "NOT",
        }
    }
}

impl FromStr for Op {
    type Err = String;

    /// Parses an operator token. Tokens are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GT" => Ok(Op::Gt),
            "GTE" => Ok(Op::Gte),
            "LT" => Ok(Op::Lt),
            "LTE" => Ok(Op::Lte),
            "NOT" => Ok(Op::Not),
            other => Err(other.to_string()),
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
