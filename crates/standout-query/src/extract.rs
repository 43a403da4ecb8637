//! Field extractors.
//!
//! One extractor per dedicated output field. Each reads its own key from the
//! decoded query, falls back to the caller default and validates or coerces
//! the raw value. Keys read here are [reserved](RESERVED_KEYS) and never
//! reach the filter tree.

use crate::decode::QueryValue;
use crate::error::{PaginationRule, QueryError, Result};
use crate::ordering::OrderBy;
use crate::value::is_integer_like;

pub const PAGE: &str = "page";
pub const PAGE_SIZE: &str = "pageSize";
pub const SEARCH: &str = "q";
pub const SORT: &str = "sort";
pub const INCLUDE: &str = "include";
pub const ATTRIBUTES: &str = "attributes";

/// Keys claimed by dedicated fields, excluded from filters whatever their shape.
pub const RESERVED_KEYS: [&str; 6] = [PAGE, PAGE_SIZE, SEARCH, SORT, INCLUDE, ATTRIBUTES];

/// Returns `true` if `key` belongs to a dedicated field.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

// ============================================================================
// Pagination
// ============================================================================

/// Parses an integer-like string that must be at least 1.
fn parse_positive(text: &str) -> std::result::Result<u64, PaginationRule> {
    if !is_integer_like(text) {
        return Err(PaginationRule::NotAnInteger);
    }

    let (negative, digits) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    if negative || digits.bytes().all(|b| b == b'0') {
        return Err(PaginationRule::NotPositive);
    }

    digits.parse().map_err(|_| PaginationRule::OutOfRange)
}

/// Resolves one positive-integer field.
///
/// An absent or empty raw value falls back to `default` when that is at
/// least 1, otherwise `None`. A present value must be a single
/// integer-like string of at least 1.
pub fn positive_integer(
    field: &'static str,
    raw: Option<&QueryValue>,
    default: Option<u64>,
) -> Result<Option<u64>> {
    let raw = match raw {
        Some(value) if !value.is_empty_str() => value,
        _ => return Ok(default.filter(|n| *n >= 1)),
    };

    let text = raw
        .as_str()
        .ok_or_else(|| QueryError::pagination(field, PaginationRule::MultipleValues))?;

    parse_positive(text)
        .map(Some)
        .map_err(|rule| QueryError::pagination(field, rule))
}

/// Resolves `page` and `pageSize`.
///
/// When a page size is known but no page is, the page defaults to 1.
pub fn pagination(
    page: Option<&QueryValue>,
    page_size: Option<&QueryValue>,
    default_page: Option<u64>,
    default_page_size: Option<u64>,
) -> Result<(Option<u64>, Option<u64>)> {
    let page_size = positive_integer(PAGE_SIZE, page_size, default_page_size)?;
    let page = positive_integer(PAGE, page, default_page)?;

    match (page, page_size) {
        (None, Some(size)) => Ok((Some(1), Some(size))),
        resolved => Ok(resolved),
    }
}

// ============================================================================
// Search term
// ============================================================================

/// Resolves the free-text search term. Never fails.
///
/// A repeated `q` uses its first non-empty plain occurrence.
pub fn search_term(raw: Option<&QueryValue>, default: Option<&str>) -> String {
    let sent = match raw {
        Some(raw @ QueryValue::Str(_)) | Some(raw @ QueryValue::List(_)) => {
            non_empty_strings(raw).into_iter().next()
        }
        _ => None,
    };

    sent.or(default).unwrap_or("").trim().to_string()
}

// ============================================================================
// Lists and sort
// ============================================================================

/// Flattens a raw value into its non-empty plain strings, in order.
fn non_empty_strings(raw: &QueryValue) -> Vec<&str> {
    let items = match raw {
        QueryValue::List(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };
    items
        .iter()
        .filter_map(QueryValue::as_str)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Resolves a list field such as `include` or `attributes`.
///
/// The default applies only when the key is absent; a key present with
/// nothing but empty values yields an empty list.
pub fn string_list(raw: Option<&QueryValue>, default: &[String]) -> Vec<String> {
    match raw {
        None => default.to_vec(),
        Some(raw) => non_empty_strings(raw)
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

/// Resolves the sort directives, keeping input order.
pub fn sort(raw: Option<&QueryValue>, default: &[OrderBy]) -> Vec<OrderBy> {
    match raw {
        None => default.to_vec(),
        Some(raw) => non_empty_strings(raw)
            .into_iter()
            .map(OrderBy::parse)
            .collect(),
    }
}
