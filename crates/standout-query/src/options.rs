//! Caller-supplied defaults.
//!
//! [`Options`] holds an optional default for every output field. Defaults
//! can be built in code or loaded from a JSON document shaped like the
//! parsed output:
//!
//! ```
//! use standout_query::{Dir, Options};
//!
//! let options = Options::from_json(r#"{
//!     "pageSize": 20,
//!     "sort": [{ "field": "createdAt", "direction": "DESC" }],
//!     "filters": { "status": "active", "age": { "GTE": 18 } }
//! }"#).unwrap();
//!
//! assert_eq!(options.get_page_size(), Some(20));
//! assert_eq!(options.get_sort()[0].dir, Dir::Desc);
//! ```

use serde::Deserialize;

use crate::error::{QueryError, Result};
use crate::filter::{FilterValue, Filters};
use crate::ordering::OrderBy;

/// Defaults applied when the query string leaves a field out.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    page: Option<u64>,
    page_size: Option<u64>,
    q: Option<String>,
    filters: Filters,
    include: Vec<String>,
    attributes: Vec<String>,
    sort: Vec<OrderBy>,
}

impl Options {
    /// Creates options with no defaults.
    pub fn new() -> Self {
        Options::default()
    }

    /// Loads options from JSON.
    ///
    /// Operator-map filters are held to the same rules as parsed ones; a
    /// list under `GT` fails here rather than at parse time.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| QueryError::InvalidOptions(e.to_string()))
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Sets the default page. Values below 1 are ignored at parse time.
    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the default page size. Values below 1 are ignored at parse time.
    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sets the default search term.
    pub fn q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    /// Adds a default filter.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(key, value);
        self
    }

    /// Replaces all default filters.
    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Sets the default `include` list.
    pub fn include<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the default `attributes` list.
    pub fn attributes<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the default sort directives.
    pub fn sort<I>(mut self, orderings: I) -> Self
    where
        I: IntoIterator<Item = OrderBy>,
    {
        self.sort = orderings.into_iter().collect();
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the default page, if set.
    pub fn get_page(&self) -> Option<u64> {
        self.page
    }

    /// Returns the default page size, if set.
    pub fn get_page_size(&self) -> Option<u64> {
        self.page_size
    }

    /// Returns the default search term, if set.
    pub fn get_q(&self) -> Option<&str> {
        self.q.as_deref()
    }

    /// Returns the default filters.
    pub fn get_filters(&self) -> &Filters {
        &self.filters
    }

    /// Returns the default `include` list.
    pub fn get_include(&self) -> &[String] {
        &self.include
    }

    /// Returns the default `attributes` list.
    pub fn get_attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Returns the default sort directives.
    pub fn get_sort(&self) -> &[OrderBy] {
        &self.sort
    }
}
