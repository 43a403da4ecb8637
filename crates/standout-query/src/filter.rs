//! Filter tree types and classification.
//!
//! Every decoded key that is not claimed by a dedicated field becomes a
//! filter. Its value is classified in a fixed order:
//!
//! ```text
//! "maria"                    -> FilterValue::Scalar
//! ["maria", "jose"]          -> FilterValue::Many
//! {GTE: "10", LT: "20"}      -> FilterValue::Ops   (validated, may fail)
//! anything else              -> dropped, default included
//! ```
//!
//! Maps are always held to the operator rules: an unknown operator token, a
//! list under `GT`/`GTE`/`LT`/`LTE` or a nested value fails the whole parse.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::decode::QueryValue;
use crate::error::{FilterRule, QueryError, Result};
use crate::op::Op;
use crate::value::Scalar;

/// The value held by an operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    /// A single comparison value.
    One(Scalar),
    /// Several values, only valid under [`Op::Not`].
    Many(Vec<Scalar>),
}

impl Operand {
    /// Iterates over the value(s) of this operand.
    pub fn values(&self) -> impl Iterator<Item = &Scalar> {
        match self {
            Operand::One(value) => std::slice::from_ref(value).iter(),
            Operand::Many(values) => values.iter(),
        }
    }
}

impl From<Scalar> for Operand {
    fn from(value: Scalar) -> Self {
        Operand::One(value)
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::One(value.into())
    }
}

impl From<String> for Operand {
    fn from(value: String) -> Self {
        Operand::One(value.into())
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::One(value.into())
    }
}

impl From<Vec<Scalar>> for Operand {
    fn from(values: Vec<Scalar>) -> Self {
        Operand::Many(values)
    }
}

/// An operator-keyed filter such as `age[GTE]=10&age[LT]=20`.
///
/// Only [`Op::Not`] may hold several values; [`OperatorMap::insert`]
/// rejects anything else, so every `OperatorMap` is valid.
///
/// # Example
///
/// ```
/// use standout_query::{Op, OperatorMap};
///
/// let range = OperatorMap::new()
///     .with(Op::Gte, "10")
///     .and_then(|m| m.with(Op::Lt, "20"))
///     .unwrap();
/// assert_eq!(range.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "IndexMap<Op, Operand>")]
pub struct OperatorMap {
    entries: IndexMap<Op, Operand>,
}

impl OperatorMap {
    /// Creates an empty operator map.
    pub fn new() -> Self {
        OperatorMap::default()
    }

    /// Sets the operand of `op`, replacing any previous one.
    ///
    /// Fails with [`FilterRule::MultipleValues`] when a comparison operator
    /// receives a list.
    pub fn insert(
        &mut self,
        op: Op,
        operand: impl Into<Operand>,
    ) -> std::result::Result<(), FilterRule> {
        let operand = operand.into();
        if matches!(operand, Operand::Many(_)) && !op.accepts_many() {
            return Err(FilterRule::MultipleValues(op));
        }
        self.entries.insert(op, operand);
        Ok(())
    }

    /// Builder form of [`OperatorMap::insert`].
    pub fn with(
        mut self,
        op: Op,
        operand: impl Into<Operand>,
    ) -> std::result::Result<Self, FilterRule> {
        self.insert(op, operand)?;
        Ok(self)
    }

    /// Returns the operand of `op`, if set.
    pub fn get(&self, op: Op) -> Option<&Operand> {
        self.entries.get(&op)
    }

    /// Iterates over operators in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Op, &Operand)> {
        self.entries.iter().map(|(op, operand)| (*op, operand))
    }

    /// Returns the number of operators.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no operator is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for OperatorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl TryFrom<IndexMap<Op, Operand>> for OperatorMap {
    type Error = FilterRule;

    fn try_from(entries: IndexMap<Op, Operand>) -> std::result::Result<Self, Self::Error> {
        entries
            .into_iter()
            .try_fold(OperatorMap::new(), |map, (op, operand)| map.with(op, operand))
    }
}

/// A classified filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// `name=maria`
    Scalar(Scalar),
    /// `name=maria&name=jose`
    Many(Vec<Scalar>),
    /// `age[GT]=10`
    Ops(OperatorMap),
}

impl FilterValue {
    /// Extracts the scalar, if this is a single-value filter.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FilterValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Extracts the values, if this is a multi-value filter.
    pub fn as_many(&self) -> Option<&[Scalar]> {
        match self {
            FilterValue::Many(values) => Some(values),
            _ => None,
        }
    }

    /// Extracts the operator map, if this is an operator filter.
    pub fn as_ops(&self) -> Option<&OperatorMap> {
        match self {
            FilterValue::Ops(map) => Some(map),
            _ => None,
        }
    }
}

impl From<Scalar> for FilterValue {
    fn from(value: Scalar) -> Self {
        FilterValue::Scalar(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Scalar(value.into())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Scalar(value.into())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Scalar(value.into())
    }
}

impl From<Vec<Scalar>> for FilterValue {
    fn from(values: Vec<Scalar>) -> Self {
        FilterValue::Many(values)
    }
}

impl From<OperatorMap> for FilterValue {
    fn from(map: OperatorMap) -> Self {
        FilterValue::Ops(map)
    }
}

/// The filter tree: filter key to classified value, in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters {
    entries: IndexMap<String, FilterValue>,
}

impl Filters {
    /// Creates an empty filter tree.
    pub fn new() -> Self {
        Filters::default()
    }

    /// Sets a filter, replacing any previous value but keeping its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Removes the filter for `key`, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.entries.shift_remove(key)
    }

    /// Returns the filter for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.get(key)
    }

    /// Returns `true` if a filter exists for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over filters in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Iterates over filter keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of filters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no filters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        for (key, value) in iter {
            filters.insert(key, value);
        }
        filters
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Classifies one decoded value.
///
/// Returns `Ok(None)` for shapes that are silently dropped.
pub fn classify(key: &str, value: &QueryValue) -> Result<Option<FilterValue>> {
    match value {
        QueryValue::Str(s) => Ok(Some(FilterValue::Scalar(Scalar::from(s.as_str())))),
        QueryValue::List(items) => Ok(scalars(items).map(FilterValue::Many)),
        QueryValue::Map(entries) => {
            operator_map(key, entries).map(|map| Some(FilterValue::Ops(map)))
        }
    }
}

fn scalars(items: &[QueryValue]) -> Option<Vec<Scalar>> {
    items
        .iter()
        .map(|item| item.as_str().map(Scalar::from))
        .collect()
}

fn operator_map(key: &str, entries: &IndexMap<String, QueryValue>) -> Result<OperatorMap> {
    let mut map = OperatorMap::new();
    for (token, value) in entries {
        let op: Op = token
            .parse()
            .map_err(|token| QueryError::filter(key, FilterRule::UnknownOperator(token)))?;

        let operand = match value {
            QueryValue::Str(s) => Operand::One(Scalar::from(s.as_str())),
            QueryValue::List(items) => match scalars(items) {
                Some(values) => Operand::Many(values),
                None => return Err(QueryError::filter(key, FilterRule::UnsupportedValue(op))),
            },
            QueryValue::Map(_) => {
                return Err(QueryError::filter(key, FilterRule::UnsupportedValue(op)));
            }
        };

        map.insert(op, operand)
            .map_err(|rule| QueryError::filter(key, rule))?;
    }
    Ok(map)
}

/// Builds the filter tree from non-reserved decoded entries layered over
/// caller defaults.
///
/// Defaults come first; a decoded value for the same key replaces the
/// default in place. A decoded value that classifies as dropped removes
/// the default as well, so the key ends up absent.
pub fn build_filters<'a, I>(defaults: &Filters, decoded: I) -> Result<Filters>
where
    I: IntoIterator<Item = (&'a str, &'a QueryValue)>,
{
    let mut filters = defaults.clone();
    for (key, value) in decoded {
        match classify(key, value)? {
            Some(filter) => filters.insert(key, filter),
            None => {
                tracing::debug!(
                    filter = key,
                    shape = value.kind(),
                    "dropping filter with unsupported value shape"
                );
                filters.remove(key);
            }
        }
    }
    Ok(filters)
}
