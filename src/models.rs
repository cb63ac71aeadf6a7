use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

use crate::filtering::FilterOp;

/// Parameter mapping as produced by the web framework's query parser.
///
/// Keys iterate in sorted order, which makes filter emission and query-string
/// encoding deterministic.
pub type Params = BTreeMap<String, ParamValue>;

/// A single scalar parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

impl Scalar {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Value side of a REST parameter.
///
/// `Map` covers operator nesting (`starts_at[gte]=...` parsed as
/// `{"starts_at": {"gte": "..."}}`) and the repeated-bracket list encoding
/// `{"": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    Map(Params),
}

impl ParamValue {
    /// Text value, the common case for decoded query strings
    pub fn text(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Text(value.into()))
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => write!(f, "{scalar}"),
            Self::List(items) => {
                let joined: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", joined.join(","))
            }
            Self::Map(entries) => {
                let joined: Vec<String> = entries.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", joined.join(", "))
            }
        }
    }
}

impl From<Scalar> for ParamValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Integer(value))
    }
}

impl From<Vec<Scalar>> for ParamValue {
    fn from(value: Vec<Scalar>) -> Self {
        Self::List(value)
    }
}

/// One canonical filter condition.
///
/// Several filters may target the same field, e.g. both bounds of a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Filter {
    pub field: String,
    /// Canonical operator symbol, or the REST token verbatim when unrecognized
    #[schema(value_type = String, example = ">=")]
    pub op: FilterOp,
    #[schema(value_type = Object)]
    pub value: ParamValue,
}

impl Filter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<ParamValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

/// Which pagination scheme a set of parameters (or a canonical record) uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaginationMode {
    CursorForward,
    CursorBackward,
    Page,
    Offset,
    None,
}

/// Sparse canonical pagination record.
///
/// Forward transformation populates the fields of exactly one mode. Absent fields
/// stay `None` and are not serialized.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub first: Option<i64>,
    pub after: Option<String>,
    pub last: Option<i64>,
    pub before: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    /// Re-derive the mode from the populated fields.
    ///
    /// Priority is cursor-forward, cursor-backward, page, offset, so a record
    /// carrying fields of several modes resolves to exactly one.
    #[must_use]
    pub fn mode(&self) -> PaginationMode {
        if self.first.is_some() || self.after.is_some() {
            PaginationMode::CursorForward
        } else if self.last.is_some() || self.before.is_some() {
            PaginationMode::CursorBackward
        } else if self.page.is_some() || self.page_size.is_some() {
            PaginationMode::Page
        } else if self.offset.is_some() || self.limit.is_some() {
            PaginationMode::Offset
        } else {
            PaginationMode::None
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mode() == PaginationMode::None
    }
}

/// Sort direction, including the nulls-ordering variants the query engine accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
    AscNullsFirst,
    AscNullsLast,
    DescNullsFirst,
    DescNullsLast,
}

impl SortDirection {
    #[must_use]
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::Desc | Self::DescNullsFirst | Self::DescNullsLast)
    }
}

/// Canonical sort record: two index-aligned sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Sort {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<String>,
    /// Shorter than `order_by` means ascending for the missing tail
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_directions: Vec<SortDirection>,
}

impl Sort {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order_by.is_empty()
    }

    /// Direction for the field at `index`, ascending when none was recorded
    #[must_use]
    pub fn direction_at(&self, index: usize) -> SortDirection {
        self.order_directions.get(index).copied().unwrap_or_default()
    }
}

/// The schema consumed by the downstream query engine.
///
/// Serializes flat: `filters`, `order_by`, `order_directions` and the keys of the
/// populated pagination mode, each present only when non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CanonicalQuery {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(flatten)]
    pub pagination: Pagination,
    #[serde(flatten)]
    pub sort: Sort,
}

impl CanonicalQuery {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.pagination.is_empty() && self.sort.is_empty()
    }

    /// Whether serializing this query would emit `key` at the top level
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        let p = &self.pagination;
        match key {
            "filters" => !self.filters.is_empty(),
            "order_by" => !self.sort.order_by.is_empty(),
            "order_directions" => !self.sort.order_directions.is_empty(),
            "first" => p.first.is_some(),
            "after" => p.after.is_some(),
            "last" => p.last.is_some(),
            "before" => p.before.is_some(),
            "page" => p.page.is_some(),
            "page_size" => p.page_size.is_some(),
            "offset" => p.offset.is_some(),
            "limit" => p.limit.is_some(),
            _ => false,
        }
    }
}

/// Output of [`normalize`](crate::normalize): the canonical query plus any
/// parameters that were neither reserved nor filterable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Normalized {
    #[serde(flatten)]
    pub query: CanonicalQuery,
    #[serde(flatten)]
    pub extras: Params,
}

impl Normalized {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.extras.is_empty()
    }

    #[must_use]
    pub fn into_query(self) -> CanonicalQuery {
        self.query
    }
}

/// Anything that carries a canonical query, such as the metadata wrapper the
/// query engine returns alongside results.
pub trait AsCanonicalQuery {
    fn canonical_query(&self) -> &CanonicalQuery;
}

impl AsCanonicalQuery for CanonicalQuery {
    fn canonical_query(&self) -> &CanonicalQuery {
        self
    }
}

impl AsCanonicalQuery for Normalized {
    fn canonical_query(&self) -> &CanonicalQuery {
        &self.query
    }
}

impl<T: AsCanonicalQuery + ?Sized> AsCanonicalQuery for &T {
    fn canonical_query(&self) -> &CanonicalQuery {
        (**self).canonical_query()
    }
}
