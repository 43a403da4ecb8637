//! Error types for the query crate.

use thiserror::Error;

use crate::op::Op;

/// Errors that abort a parse call.
///
/// There are exactly two kinds: pagination errors and filter errors. Both are
/// fatal to the call that raised them; no partial request is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// `page` or `pageSize` was supplied in a form that is not a positive integer.
    #[error("{field} {rule}")]
    Pagination {
        field: &'static str,
        rule: PaginationRule,
    },

    /// A filter value shaped like an operator map broke the operator rules.
    #[error("invalid filter '{field}': {rule}")]
    Filter { field: String, rule: FilterRule },

    /// Options could not be loaded from a configuration document.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl QueryError {
    pub(crate) fn pagination(field: &'static str, rule: PaginationRule) -> Self {
        QueryError::Pagination { field, rule }
    }

    pub(crate) fn filter(field: impl Into<String>, rule: FilterRule) -> Self {
        QueryError::Filter {
            field: field.into(),
            rule,
        }
    }

    /// Returns `true` for pagination errors.
    pub fn is_pagination(&self) -> bool {
        matches!(self, QueryError::Pagination { .. })
    }

    /// Returns `true` for filter errors.
    pub fn is_filter(&self) -> bool {
        matches!(self, QueryError::Filter { .. })
    }
}

/// The pagination rule that was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationRule {
    /// The key occurred more than once, or carried a nested value.
    #[error("must be a single value")]
    MultipleValues,
    /// The value is not a plain integer.
    #[error("must be an integer")]
    NotAnInteger,
    /// The value is zero or negative.
    #[error("must be an integer greater than 0")]
    NotPositive,
    /// The value does not fit in 64 bits.
    #[error("is too large")]
    OutOfRange,
}

/// The operator-map rule that was violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterRule {
    /// A key that is not one of `GT`, `GTE`, `LT`, `LTE`, `NOT`.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    /// A single-value comparison operator received several values.
    #[error("operator {0} accepts a single value")]
    MultipleValues(Op),
    /// The operator value is neither a string nor a list of strings.
    #[error("operator {0} has an unsupported value")]
    UnsupportedValue(Op),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
