//! Reserved REST key names and transformation policy.

use serde::{Deserialize, Serialize};

/// Page size for cursor and offset pagination
pub const LIMIT_KEY: &str = "limit";
/// Forward cursor marker
pub const AFTER_KEY: &str = "after";
/// Backward cursor marker
pub const BEFORE_KEY: &str = "before";
pub const PAGE_KEY: &str = "page";
pub const PAGE_SIZE_KEY: &str = "page_size";
pub const OFFSET_KEY: &str = "offset";
/// Comma-separated sort string
pub const SORT_KEY: &str = "sort";

/// How a `limit` supplied without any other pagination marker is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BareLimitPolicy {
    /// `limit=20` becomes `first: 20`
    #[default]
    CursorForward,
    /// `limit=20` becomes `limit: 20` with no offset
    Offset,
}

/// Transformation settings shared by every call on a [`QueryTransformer`](crate::QueryTransformer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub bare_limit: BareLimitPolicy,
}

impl QueryConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bare_limit: BareLimitPolicy::CursorForward,
        }
    }

    #[must_use]
    pub const fn with_bare_limit(mut self, policy: BareLimitPolicy) -> Self {
        self.bare_limit = policy;
        self
    }
}
