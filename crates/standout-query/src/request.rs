//! The parsed search request and the parser that assembles it.
//!
//! [`Parser`] runs the pipeline:
//!
//! ```text
//! raw query ─ decode ─┬─ pagination ─┐
//!                     ├─ q           │
//!                     ├─ include     ├─ SearchRequest
//!                     ├─ attributes  │
//!                     ├─ sort        │
//!                     └─ filters ────┘
//! ```
//!
//! Every step is a plain function over the decoded query; nothing is kept
//! between calls, so a single `Parser` can be shared freely.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::decode::{decode, DecodedQuery, DecoderConfig};
use crate::error::Result;
use crate::extract::{self, is_reserved, ATTRIBUTES, INCLUDE, PAGE, PAGE_SIZE, SEARCH, SORT};
use crate::filter::{build_filters, FilterValue, Filters, Operand};
use crate::options::Options;
use crate::ordering::OrderBy;
use crate::value::Scalar;

/// A validated search request.
///
/// Always fully populated: absent data is `None` or an empty collection.
///
/// Serializes to the JSON shape API layers usually return:
///
/// ```
/// let request = standout_query::parse("pageSize=10&sort=-age&age[GT]=10").unwrap();
/// let json = serde_json::to_string(&request).unwrap();
/// assert_eq!(
///     json,
///     r#"{"page":1,"pageSize":10,"q":"","filters":{"age":{"GT":"10"}},"include":[],"attributes":[],"sort":[{"field":"age","direction":"DESC"}]}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// 1-based page number.
    pub page: Option<u64>,
    /// Results per page.
    pub page_size: Option<u64>,
    /// Free-text search term, trimmed.
    pub q: String,
    /// Filter tree built from every non-reserved key.
    pub filters: Filters,
    /// Relations to include.
    pub include: Vec<String>,
    /// Attributes to select.
    pub attributes: Vec<String>,
    /// Sort directives, in order of precedence.
    pub sort: Vec<OrderBy>,
}

impl SearchRequest {
    /// Assembles a request from an already-decoded query.
    ///
    /// Use this when the query string was decoded elsewhere, e.g. by a web
    /// framework's extractor.
    pub fn from_decoded(decoded: &DecodedQuery, options: &Options) -> Result<Self> {
        let (page, page_size) = extract::pagination(
            decoded.get(PAGE),
            decoded.get(PAGE_SIZE),
            options.get_page(),
            options.get_page_size(),
        )?;

        let filters = build_filters(
            options.get_filters(),
            decoded
                .iter()
                .filter(|(key, _)| !is_reserved(key))
                .map(|(key, value)| (key.as_str(), value)),
        )?;

        let request = SearchRequest {
            page,
            page_size,
            q: extract::search_term(decoded.get(SEARCH), options.get_q()),
            filters,
            include: extract::string_list(decoded.get(INCLUDE), options.get_include()),
            attributes: extract::string_list(decoded.get(ATTRIBUTES), options.get_attributes()),
            sort: extract::sort(decoded.get(SORT), options.get_sort()),
        };

        tracing::trace!(
            page = ?request.page,
            page_size = ?request.page_size,
            filters = request.filters.len(),
            sort = request.sort.len(),
            "assembled search request"
        );

        Ok(request)
    }

    /// Serializes the request back into a canonical query string.
    ///
    /// Parsing the result without defaults yields an equal request for any
    /// request that was itself produced by parsing without defaults.
    /// Single-element lists are written as `key[]=v` so they stay lists.
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());

        if let Some(page) = self.page {
            out.append_pair(PAGE, &page.to_string());
        }
        if let Some(page_size) = self.page_size {
            out.append_pair(PAGE_SIZE, &page_size.to_string());
        }
        if !self.q.is_empty() {
            out.append_pair(SEARCH, &self.q);
        }

        for (key, value) in self.filters.iter() {
            match value {
                FilterValue::Scalar(scalar) => {
                    out.append_pair(key, &scalar.to_string());
                }
                FilterValue::Many(values) => append_all(&mut out, key, values),
                FilterValue::Ops(ops) => {
                    for (op, operand) in ops.iter() {
                        let op_key = format!("{}[{}]", key, op);
                        match operand {
                            Operand::One(scalar) => {
                                out.append_pair(&op_key, &scalar.to_string());
                            }
                            Operand::Many(values) => append_all(&mut out, &op_key, values),
                        }
                    }
                }
            }
        }

        for field in &self.include {
            out.append_pair(INCLUDE, field);
        }
        for field in &self.attributes {
            out.append_pair(ATTRIBUTES, field);
        }
        for order in &self.sort {
            out.append_pair(SORT, &order.to_string());
        }

        out.finish()
    }
}

fn append_all(out: &mut form_urlencoded::Serializer<'_, String>, key: &str, values: &[Scalar]) {
    if let [single] = values {
        out.append_pair(&format!("{}[]", key), &single.to_string());
        return;
    }
    for value in values {
        out.append_pair(key, &value.to_string());
    }
}

/// Parses query strings into [`SearchRequest`]s.
///
/// A parser only carries decoder limits; defaults are passed per call.
///
/// # Example
///
/// ```
/// use standout_query::{Options, Parser};
///
/// let parser = Parser::new().depth(2).parameter_limit(200);
/// let options = Options::new().page_size(20);
///
/// let request = parser.parse("q=castelo&name=maria", &options).unwrap();
/// assert_eq!(request.page, Some(1));
/// assert_eq!(request.page_size, Some(20));
/// assert_eq!(request.q, "castelo");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Parser {
    decoder: DecoderConfig,
}

impl Parser {
    /// Creates a parser with default decoder limits.
    pub fn new() -> Self {
        Parser::default()
    }

    /// Creates a parser with the given decoder configuration.
    pub fn with_decoder(decoder: DecoderConfig) -> Self {
        Parser { decoder }
    }

    /// Sets the bracket depth limit of the decoder.
    pub fn depth(mut self, depth: usize) -> Self {
        self.decoder = self.decoder.depth(depth);
        self
    }

    /// Sets the pair limit of the decoder.
    pub fn parameter_limit(mut self, limit: usize) -> Self {
        self.decoder = self.decoder.parameter_limit(limit);
        self
    }

    /// Returns the decoder configuration.
    pub fn decoder(&self) -> &DecoderConfig {
        &self.decoder
    }

    /// Decodes `query` and assembles a request, applying `options` defaults.
    pub fn parse(&self, query: &str, options: &Options) -> Result<SearchRequest> {
        let decoded = decode(query, &self.decoder);
        SearchRequest::from_decoded(&decoded, options)
    }
}
