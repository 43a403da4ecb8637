//! Query-string decoding.
//!
//! Turns `a=1&a=2&age[GT]=10` into an ordered mapping of field names to
//! [`QueryValue`]s, following the usual nested query-string convention:
//!
//! - repeated keys produce a list in appearance order
//! - `key[SEG]=v` produces a nested map keyed by `SEG`
//! - `key[]=v` appends to a list
//! - a map whose keys are all small decimal indices becomes a list
//! - a pair without `=` decodes to the empty string
//!
//! Percent-encoding and `+` are resolved by `url::form_urlencoded` before
//! brackets are interpreted, so `age%5BGT%5D=10` is the same as `age[GT]=10`.

use indexmap::map::Entry;
use indexmap::IndexMap;
use url::form_urlencoded;

/// A decoded query: field name to value, in first-appearance order.
pub type DecodedQuery = IndexMap<String, QueryValue>;

/// A decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// A single value, possibly empty.
    Str(String),
    /// Repeated occurrences, or `key[]` appends.
    List(Vec<QueryValue>),
    /// Bracketed sub-keys.
    Map(IndexMap<String, QueryValue>),
}

impl QueryValue {
    /// Extracts the string value, if this is a single value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` if this is the empty string.
    pub fn is_empty_str(&self) -> bool {
        matches!(self, QueryValue::Str(s) if s.is_empty())
    }

    /// Short name of the value's shape, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryValue::Str(_) => "string",
            QueryValue::List(_) => "list",
            QueryValue::Map(_) => "map",
        }
    }

    /// Combines a later occurrence of the same key into this value.
    ///
    /// An index-keyed map meeting a plain value or a list is read as the
    /// list it spells, so `x[0]=a&x=b` flattens to `[a, b]`.
    fn merge(self, incoming: QueryValue, array_limit: usize) -> QueryValue {
        match (self, incoming) {
            (QueryValue::Map(mut existing), QueryValue::Map(incoming)) => {
                for (key, value) in incoming {
                    merge_into(&mut existing, key, value, array_limit);
                }
                QueryValue::Map(existing)
            }
            (QueryValue::Map(existing), incoming) => match index_list(existing, array_limit) {
                Ok(items) => QueryValue::List(items).merge(incoming, array_limit),
                Err(existing) => QueryValue::Map(existing).merge_item(incoming),
            },
            (existing, QueryValue::Map(incoming)) => match index_list(incoming, array_limit) {
                Ok(items) => existing.merge(QueryValue::List(items), array_limit),
                Err(incoming) => existing.merge_item(QueryValue::Map(incoming)),
            },
            (existing, incoming) => existing.merge_item(incoming),
        }
    }

    /// Appends `incoming` as a single element, flattening lists.
    fn merge_item(self, incoming: QueryValue) -> QueryValue {
        match (self, incoming) {
            (QueryValue::List(mut existing), QueryValue::List(incoming)) => {
                existing.extend(incoming);
                QueryValue::List(existing)
            }
            (QueryValue::List(mut existing), incoming) => {
                existing.push(incoming);
                QueryValue::List(existing)
            }
            (existing, QueryValue::List(incoming)) => {
                let mut items = Vec::with_capacity(incoming.len() + 1);
                items.push(existing);
                items.extend(incoming);
                QueryValue::List(items)
            }
            (existing, incoming) => QueryValue::List(vec![existing, incoming]),
        }
    }

    /// Turns index-keyed maps (`k[0]=a&k[1]=b`) into lists, bottom-up.
    fn compact(self, array_limit: usize) -> QueryValue {
        match self {
            QueryValue::Str(s) => QueryValue::Str(s),
            QueryValue::List(items) => QueryValue::List(
                items
                    .into_iter()
                    .map(|item| item.compact(array_limit))
                    .collect(),
            ),
            QueryValue::Map(map) => {
                let map: IndexMap<String, QueryValue> = map
                    .into_iter()
                    .map(|(key, value)| (key, value.compact(array_limit)))
                    .collect();

                match index_list(map, array_limit) {
                    Ok(items) => QueryValue::List(items),
                    Err(map) => QueryValue::Map(map),
                }
            }
        }
    }
}

/// Reads a map keyed only by indices up to `array_limit` as a list in index
/// order. Any other map, including an empty one, is handed back unchanged.
fn index_list(
    map: IndexMap<String, QueryValue>,
    array_limit: usize,
) -> Result<Vec<QueryValue>, IndexMap<String, QueryValue>> {
    let indices: Option<Vec<usize>> = map
        .keys()
        .map(|key| parse_index(key).filter(|index| *index <= array_limit))
        .collect();

    match indices {
        Some(indices) if !indices.is_empty() => {
            let mut indexed: Vec<(usize, QueryValue)> =
                indices.into_iter().zip(map.into_values()).collect();
            indexed.sort_by_key(|(index, _)| *index);
            Ok(indexed.into_iter().map(|(_, value)| value).collect())
        }
        _ => Err(map),
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Str(s.to_string())
    }
}

fn merge_into(
    target: &mut IndexMap<String, QueryValue>,
    key: String,
    value: QueryValue,
    array_limit: usize,
) {
    match target.entry(key) {
        Entry::Occupied(mut entry) => {
            let existing = std::mem::replace(entry.get_mut(), QueryValue::List(Vec::new()));
            *entry.get_mut() = existing.merge(value, array_limit);
        }
        Entry::Vacant(entry) => {
            entry.insert(value);
        }
    }
}

fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Decoder limits.
///
/// # Example
///
/// ```
/// use standout_query::DecoderConfig;
///
/// let config = DecoderConfig::new().depth(2).parameter_limit(100);
/// assert_eq!(config.get_depth(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    depth: usize,
    parameter_limit: usize,
    array_limit: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            depth: 5,
            parameter_limit: 1000,
            array_limit: 20,
        }
    }
}

impl DecoderConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        DecoderConfig::default()
    }

    /// Sets the maximum number of bracket segments interpreted per key.
    ///
    /// Segments past the limit are kept as one literal sub-key. A depth of
    /// zero disables bracket parsing entirely.
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the maximum number of `key=value` pairs read.
    pub fn parameter_limit(mut self, limit: usize) -> Self {
        self.parameter_limit = limit;
        self
    }

    /// Sets the largest index (`k[20]=v`) still turned into a list position.
    pub fn array_limit(mut self, limit: usize) -> Self {
        self.array_limit = limit;
        self
    }

    /// Returns the bracket depth limit.
    pub fn get_depth(&self) -> usize {
        self.depth
    }

    /// Returns the pair limit.
    pub fn get_parameter_limit(&self) -> usize {
        self.parameter_limit
    }

    /// Returns the list index limit.
    pub fn get_array_limit(&self) -> usize {
        self.array_limit
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Append,
}

/// Splits `root[a][b]` into `root` and its bracket segments.
fn split_key(key: &str, depth: usize) -> (&str, Vec<Segment>) {
    let Some(open) = key.find('[') else {
        return (key, Vec::new());
    };
    if depth == 0 || open == 0 {
        return (key, Vec::new());
    }

    let root = &key[..open];
    let mut segments = Vec::new();
    let mut rest = &key[open..];

    while segments.len() < depth {
        let Some(inner) = rest.strip_prefix('[') else {
            break;
        };
        let Some(close) = inner.find(']') else {
            break;
        };
        let content = &inner[..close];
        if content.contains('[') {
            break;
        }
        segments.push(if content.is_empty() {
            Segment::Append
        } else {
            Segment::Key(content.to_string())
        });
        rest = &inner[close + 1..];
    }

    if segments.is_empty() {
        return (key, Vec::new());
    }
    if !rest.is_empty() {
        segments.push(Segment::Key(rest.to_string()));
    }
    (root, segments)
}

fn nest(segments: &[Segment], leaf: QueryValue) -> QueryValue {
    segments.iter().rev().fold(leaf, |value, segment| match segment {
        Segment::Append => QueryValue::List(vec![value]),
        Segment::Key(key) => {
            let mut map = IndexMap::new();
            map.insert(key.clone(), value);
            QueryValue::Map(map)
        }
    })
}

/// Decodes a raw query string.
///
/// A leading `?` is ignored. Pairs with an empty key are skipped.
///
/// # Example
///
/// ```
/// use standout_query::{decode, DecoderConfig, QueryValue};
///
/// let decoded = decode("name=maria&name=jose&age[GT]=10", &DecoderConfig::default());
/// assert_eq!(
///     decoded["name"],
///     QueryValue::List(vec!["maria".into(), "jose".into()])
/// );
/// assert!(matches!(decoded["age"], QueryValue::Map(_)));
/// ```
pub fn decode(query: &str, config: &DecoderConfig) -> DecodedQuery {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut decoded = DecodedQuery::new();

    for (index, (key, value)) in form_urlencoded::parse(query.as_bytes()).enumerate() {
        if index >= config.parameter_limit {
            tracing::debug!(
                limit = config.parameter_limit,
                "query string exceeds parameter limit, ignoring remaining pairs"
            );
            break;
        }
        if key.is_empty() {
            continue;
        }

        let (root, segments) = split_key(&key, config.depth);
        let value = nest(&segments, QueryValue::Str(value.into_owned()));
        merge_into(&mut decoded, root.to_string(), value, config.array_limit);
    }

    decoded
        .into_iter()
        .map(|(key, value)| (key, value.compact(config.array_limit)))
        .collect()
}
