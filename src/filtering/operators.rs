//! REST operator tokens and their canonical symbols.
//!
//! `starts_at[gte]=2024-01-01` carries the REST token `gte`; the query engine
//! expects the symbol `>=`. The table is closed: tokens outside it are carried
//! through verbatim as [`FilterOp::Unknown`] for the engine to accept or reject.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Known filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    Search,
    Empty,
    NotEmpty,
    In,
    NotIn,
    Contains,
    NotContains,
    Like,
    NotLike,
    LikeAnd,
    LikeOr,
    Ilike,
    NotIlike,
    IlikeAnd,
    IlikeOr,
}

impl Operator {
    pub const ALL: [Self; 21] = [
        Self::Eq,
        Self::NotEq,
        Self::Lt,
        Self::Lte,
        Self::Gt,
        Self::Gte,
        Self::Search,
        Self::Empty,
        Self::NotEmpty,
        Self::In,
        Self::NotIn,
        Self::Contains,
        Self::NotContains,
        Self::Like,
        Self::NotLike,
        Self::LikeAnd,
        Self::LikeOr,
        Self::Ilike,
        Self::NotIlike,
        Self::IlikeAnd,
        Self::IlikeOr,
    ];

    /// Token used inside the REST bracket suffix
    #[must_use]
    pub const fn rest_token(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::NotEq => "ne",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Search => "search",
            Self::Empty => "empty",
            Self::NotEmpty => "not_empty",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::Like => "like",
            Self::NotLike => "not_like",
            Self::LikeAnd => "like_and",
            Self::LikeOr => "like_or",
            Self::Ilike => "ilike",
            Self::NotIlike => "not_ilike",
            Self::IlikeAnd => "ilike_and",
            Self::IlikeOr => "ilike_or",
        }
    }

    /// Symbol used in the canonical schema
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Search => "=~",
            other => other.rest_token(),
        }
    }

    #[must_use]
    pub fn from_rest_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.rest_token() == token)
    }

    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

/// Operator of a canonical filter: a known operator, or an unrecognized token
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterOp {
    Known(Operator),
    Unknown(String),
}

impl FilterOp {
    /// Canonical textual form
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(op) => op.symbol(),
            Self::Unknown(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Known(Operator::Eq))
    }
}

impl From<Operator> for FilterOp {
    fn from(op: Operator) -> Self {
        Self::Known(op)
    }
}

impl FromStr for FilterOp {
    type Err = Infallible;

    /// Parses a canonical symbol; anything else becomes `Unknown`
    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        Ok(Operator::from_symbol(symbol).map_or_else(|| Self::Unknown(symbol.to_string()), Self::Known))
    }
}

impl From<String> for FilterOp {
    fn from(symbol: String) -> Self {
        match Operator::from_symbol(&symbol) {
            Some(op) => Self::Known(op),
            None => Self::Unknown(symbol),
        }
    }
}

impl From<FilterOp> for String {
    fn from(op: FilterOp) -> Self {
        match op {
            FilterOp::Known(op) => op.symbol().to_string(),
            FilterOp::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a REST token to its canonical operator, passing unknown tokens through.
#[must_use]
pub fn to_canonical(token: &str) -> FilterOp {
    Operator::from_rest_token(token).map_or_else(
        || {
            tracing::debug!(token, "Passing unknown filter operator through");
            FilterOp::Unknown(token.to_string())
        },
        FilterOp::Known,
    )
}

/// REST token for a canonical operator.
///
/// `None` for equality: an equality filter renders as a bare `field=value`
/// parameter rather than `field[eq]=value`.
#[must_use]
pub fn to_rest(op: &FilterOp) -> Option<&str> {
    match op {
        FilterOp::Known(Operator::Eq) => None,
        FilterOp::Known(op) => Some(op.rest_token()),
        FilterOp::Unknown(raw) => Some(raw),
    }
}
