//! Query - Structured search requests from URL query strings.
//!
//! Turns the query string of a search or listing endpoint into a validated
//! [`SearchRequest`] instead of ad-hoc string scraping. It extracts:
//!
//! - Pagination: `page`, `pageSize` (positive integers)
//! - Free-text search: `q`
//! - Field selection: `include`, `attributes`
//! - Ordering: `sort=name&sort=-createdAt`
//! - Filters: every other key, with `GT`, `GTE`, `LT`, `LTE` and `NOT` operators
//!
//! # Quick Start
//!
//! ```rust
//! use standout_query::{parse, Dir, FilterValue, Op};
//!
//! let request = parse("q=castelo&pageSize=20&sort=-age&name=maria&name=jose&age[GTE]=18")?;
//!
//! assert_eq!(request.page, Some(1));
//! assert_eq!(request.page_size, Some(20));
//! assert_eq!(request.q, "castelo");
//! assert_eq!(request.sort[0].field, "age");
//! assert_eq!(request.sort[0].dir, Dir::Desc);
//!
//! let names = request.filters.get("name").and_then(FilterValue::as_many).unwrap();
//! assert_eq!(names.len(), 2);
//!
//! let age = request.filters.get("age").and_then(FilterValue::as_ops).unwrap();
//! assert!(age.get(Op::Gte).is_some());
//! # Ok::<(), standout_query::QueryError>(())
//! ```
//!
//! # Defaults
//!
//! [`Options`] supplies a default for every field. Defaults apply when the
//! key is absent; for `include`, `attributes` and `sort` a key that is
//! present but empty (`include=`) yields an empty list, not the default.
//! Default filters come first and decoded filters override them per key.
//!
//! ```rust
//! use standout_query::{parse_with, OrderBy, Options};
//!
//! let options = Options::new()
//!     .page_size(50)
//!     .include(["author"])
//!     .sort([OrderBy::desc("createdAt")])
//!     .filter("status", "published");
//!
//! let request = parse_with("include=", &options)?;
//! assert_eq!(request.page_size, Some(50));
//! assert!(request.include.is_empty());
//! assert_eq!(request.sort, vec![OrderBy::desc("createdAt")]);
//! assert!(request.filters.contains_key("status"));
//! # Ok::<(), standout_query::QueryError>(())
//! ```
//!
//! # Filter Shapes
//!
//! | Query | Filter |
//! |-------|--------|
//! | `name=maria` | `Scalar("maria")` |
//! | `name=maria&name=jose` | `Many(["maria", "jose"])` |
//! | `age[GTE]=10&age[LT]=20` | `Ops({GTE: "10", LT: "20"})` |
//! | `age[NOT]=10&age[NOT]=12` | `Ops({NOT: ["10", "12"]})` |
//! | `age[LT]=10&age[LT]=20` | error: `LT` accepts a single value |
//! | `age[EQ]=10` | error: unknown operator |
//!
//! Values that fit none of these shapes (for example a list mixing plain
//! and bracketed occurrences, `a=1&a[GT]=2`) are dropped without error,
//! together with any default filter for the same key.
//!
//! # Errors
//!
//! A [`QueryError`] aborts the whole parse. Pagination errors cover
//! repeated, non-integer, zero or negative `page`/`pageSize`; filter errors
//! cover operator maps that break the operator rules.

mod decode;
mod error;
mod extract;
mod filter;
mod op;
mod options;
mod ordering;
mod request;
mod value;

// Re-export public API
pub use decode::{decode, DecodedQuery, DecoderConfig, QueryValue};
pub use error::{FilterRule, PaginationRule, QueryError, Result};
pub use extract::{is_reserved, RESERVED_KEYS};
pub use filter::{FilterValue, Filters, Operand, OperatorMap};
pub use op::Op;
pub use options::Options;
pub use ordering::{Dir, OrderBy};
pub use request::{Parser, SearchRequest};
pub use value::{is_integer_like, Number, Scalar};

/// Parses a query string with no defaults.
pub fn parse(query: &str) -> Result<SearchRequest> {
    Parser::new().parse(query, &Options::default())
}

/// Parses a query string, applying the defaults in `options`.
pub fn parse_with(query: &str, options: &Options) -> Result<SearchRequest> {
    Parser::new().parse(query, options)
}
