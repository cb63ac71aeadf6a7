use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::filtering::pagination;
use crate::models::{AsCanonicalQuery, CanonicalQuery, Pagination, PaginationMode};
use crate::query_string::{decode_query, encode_query};

/// Result metadata returned by the query engine next to a page of results.
///
/// Carries the canonical query that produced the page, so links to adjacent pages
/// can be derived from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QueryMeta {
    pub query: CanonicalQuery,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
    /// Cursor of the first item on the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    /// Cursor of the last item on the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_cursor: Option<String>,
}

impl AsCanonicalQuery for QueryMeta {
    fn canonical_query(&self) -> &CanonicalQuery {
        &self.query
    }
}

impl QueryMeta {
    fn with_pagination(&self, pagination: Pagination) -> CanonicalQuery {
        CanonicalQuery {
            pagination,
            ..self.query.clone()
        }
    }

    /// Canonical query for the page after this one, in the same pagination mode.
    ///
    /// `None` when there is no next page or the current pagination cannot be advanced
    /// (no end cursor, no positive offset limit, or a position that would overflow).
    #[must_use]
    pub fn next_query(&self) -> Option<CanonicalQuery> {
        if !self.has_next_page {
            return None;
        }
        let current = &self.query.pagination;

        let pagination = match current.mode() {
            PaginationMode::CursorForward | PaginationMode::CursorBackward => Pagination {
                first: current.first.or(current.last),
                after: Some(self.end_cursor.clone()?),
                ..Pagination::default()
            },
            PaginationMode::Page => Pagination {
                page: Some(current.page.unwrap_or(1).checked_add(1)?),
                page_size: current.page_size,
                ..Pagination::default()
            },
            PaginationMode::Offset => {
                let limit = current.limit.filter(|limit| *limit > 0)?;
                Pagination {
                    offset: Some(current.offset.unwrap_or(0).checked_add(limit)?),
                    limit: Some(limit),
                    ..Pagination::default()
                }
            }
            PaginationMode::None => return None,
        };

        Some(self.with_pagination(pagination))
    }

    /// Canonical query for the page before this one, in the same pagination mode.
    ///
    /// Offsets are floored at zero. `None` when there is no previous page or the
    /// current pagination is already at the start.
    #[must_use]
    pub fn previous_query(&self) -> Option<CanonicalQuery> {
        if !self.has_previous_page {
            return None;
        }
        let current = &self.query.pagination;

        let pagination = match current.mode() {
            PaginationMode::CursorForward | PaginationMode::CursorBackward => Pagination {
                last: current.last.or(current.first),
                before: Some(self.start_cursor.clone()?),
                ..Pagination::default()
            },
            PaginationMode::Page => {
                let page = current.page.unwrap_or(1);
                if page <= 1 {
                    return None;
                }
                Pagination {
                    page: Some(page - 1),
                    page_size: current.page_size,
                    ..Pagination::default()
                }
            }
            PaginationMode::Offset => {
                let offset = current.offset.unwrap_or(0);
                let limit = current.limit.filter(|limit| *limit > 0)?;
                if offset <= 0 {
                    return None;
                }
                Pagination {
                    offset: Some(offset.saturating_sub(limit).max(0)),
                    limit: Some(limit),
                    ..Pagination::default()
                }
            }
            PaginationMode::None => return None,
        };

        Some(self.with_pagination(pagination))
    }

    /// Link to the next page, keeping unrelated parameters on `path`.
    ///
    /// Pagination keys already on `path` are dropped first, so a stale `before`
    /// or `page` cannot outrank the new position.
    #[must_use]
    pub fn next_path(&self, path: &str) -> Option<String> {
        self.next_query()
            .map(|query| crate::build_path(&without_pagination(path), &query))
    }

    /// Link to the previous page, keeping unrelated parameters on `path`.
    ///
    /// Pagination keys already on `path` are dropped first.
    #[must_use]
    pub fn previous_path(&self, path: &str) -> Option<String> {
        self.previous_query()
            .map(|query| crate::build_path(&without_pagination(path), &query))
    }
}

fn without_pagination(path: &str) -> String {
    let Some((base, query)) = path.split_once('?') else {
        return path.to_string();
    };

    let mut existing = decode_query(query);
    existing.retain(|key, _| !pagination::reserved_keys().contains(&key.as_str()));
    if existing.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", encode_query(&existing))
    }
}
