//! Sort directives.
//!
//! Provides [`Dir`] for sort direction and [`OrderBy`] for a single
//! field-based sort directive, parsed from `sort=name` / `sort=-created`.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    /// Descending order (largest first).
    #[serde(rename = "DESC")]
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "ASC",
            Dir::Desc => "DESC",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single sort directive: a field and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    #[serde(rename = "direction")]
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a new ascending directive for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy {
            field: field.into(),
            dir: Dir::Asc,
        }
    }

    /// Creates a new descending directive for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy {
            field: field.into(),
            dir: Dir::Desc,
        }
    }

    /// Creates a new directive with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Parses a sort token.
    ///
    /// A leading `-` selects descending order and every leading `-` is
    /// stripped from the field name (`--name` sorts `name` descending).
    /// Anything else is an ascending sort on the token unchanged.
    pub fn parse(token: &str) -> Self {
        if token.starts_with('-') {
            OrderBy::desc(token.trim_start_matches('-'))
        } else {
            OrderBy::asc(token)
        }
    }
}

/// Formats the directive back into its sort token (`name` or `-name`).
impl std::fmt::Display for OrderBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.dir {
            Dir::Asc => write!(f, "{}", self.field),
            Dir::Desc => write!(f, "-{}", self.field),
        }
    }
}
