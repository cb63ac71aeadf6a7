use tracing::{debug, warn};

use crate::config::{
    AFTER_KEY, BEFORE_KEY, BareLimitPolicy, LIMIT_KEY, OFFSET_KEY, PAGE_KEY, PAGE_SIZE_KEY,
    QueryConfig,
};
use crate::errors::ParamError;
use crate::models::{Pagination, PaginationMode, ParamValue, Params, Scalar};

const RESERVED_KEYS: [&str; 6] = [LIMIT_KEY, AFTER_KEY, BEFORE_KEY, PAGE_KEY, PAGE_SIZE_KEY, OFFSET_KEY];

/// Every REST key claimed by pagination; these never become filters
#[must_use]
pub const fn reserved_keys() -> &'static [&'static str] {
    &RESERVED_KEYS
}

/// Detect the pagination mode implied by a parameter set.
///
/// Priority: a cursor key (`before` wins over `after`), then `page`/`page_size`,
/// then `offset`, then a bare `limit` resolved through [`BareLimitPolicy`].
#[must_use]
pub fn detect_mode(params: &Params, config: &QueryConfig) -> PaginationMode {
    let has = |key: &str| params.contains_key(key);

    let mode = if has(BEFORE_KEY) {
        PaginationMode::CursorBackward
    } else if has(AFTER_KEY) {
        PaginationMode::CursorForward
    } else if has(PAGE_KEY) || has(PAGE_SIZE_KEY) {
        PaginationMode::Page
    } else if has(OFFSET_KEY) {
        PaginationMode::Offset
    } else if has(LIMIT_KEY) {
        match config.bare_limit {
            BareLimitPolicy::CursorForward => PaginationMode::CursorForward,
            BareLimitPolicy::Offset => PaginationMode::Offset,
        }
    } else {
        PaginationMode::None
    };

    let markers = [
        has(AFTER_KEY) || has(BEFORE_KEY),
        has(PAGE_KEY) || has(PAGE_SIZE_KEY),
        has(OFFSET_KEY),
    ];
    if markers.iter().filter(|present| **present).count() > 1 {
        warn!(?mode, "Conflicting pagination parameters, using one mode only");
    }

    mode
}

fn int_param(params: &Params, key: &str) -> Result<Option<i64>, ParamError> {
    let Some(value) = params.get(key) else {
        return Ok(None);
    };
    match value {
        ParamValue::Scalar(Scalar::Integer(number)) => Ok(Some(*number)),
        ParamValue::Scalar(Scalar::Text(text)) => text
            .parse()
            .map(Some)
            .map_err(|_| ParamError::malformed_number(key, text.as_str())),
        other => Err(ParamError::malformed_number(key, other.to_string())),
    }
}

fn cursor_param(params: &Params, key: &str) -> Option<String> {
    match params.get(key)? {
        ParamValue::Scalar(scalar) => Some(scalar.to_string()),
        other => {
            debug!(key, value = %other, "Ignoring non-scalar cursor");
            None
        }
    }
}

/// Build the canonical pagination record for a parameter set.
///
/// Only keys that are present get populated. Integer fields that do not parse fail
/// with [`ParamError::MalformedNumber`].
pub fn from_params(params: &Params, config: &QueryConfig) -> Result<Pagination, ParamError> {
    let mode = detect_mode(params, config);
    debug!(?mode, "Detected pagination mode");

    let pagination = match mode {
        PaginationMode::CursorForward => Pagination {
            first: int_param(params, LIMIT_KEY)?,
            after: cursor_param(params, AFTER_KEY),
            ..Pagination::default()
        },
        PaginationMode::CursorBackward => Pagination {
            last: int_param(params, LIMIT_KEY)?,
            before: cursor_param(params, BEFORE_KEY),
            ..Pagination::default()
        },
        PaginationMode::Page => Pagination {
            page: int_param(params, PAGE_KEY)?,
            page_size: int_param(params, PAGE_SIZE_KEY)?,
            ..Pagination::default()
        },
        PaginationMode::Offset => Pagination {
            offset: int_param(params, OFFSET_KEY)?,
            limit: int_param(params, LIMIT_KEY)?,
            ..Pagination::default()
        },
        PaginationMode::None => Pagination::default(),
    };

    Ok(pagination)
}

/// Render a canonical pagination record as REST parameters.
///
/// The mode is re-derived with [`Pagination::mode`], so only one mode's fields are
/// emitted even if the record carries several.
#[must_use]
pub fn to_rest(pagination: &Pagination) -> Params {
    let entries: [(&str, Option<ParamValue>); 2] = match pagination.mode() {
        PaginationMode::CursorForward => [
            (LIMIT_KEY, pagination.first.map(ParamValue::from)),
            (AFTER_KEY, pagination.after.clone().map(ParamValue::from)),
        ],
        PaginationMode::CursorBackward => [
            (LIMIT_KEY, pagination.last.map(ParamValue::from)),
            (BEFORE_KEY, pagination.before.clone().map(ParamValue::from)),
        ],
        PaginationMode::Page => [
            (PAGE_KEY, pagination.page.map(ParamValue::from)),
            (PAGE_SIZE_KEY, pagination.page_size.map(ParamValue::from)),
        ],
        PaginationMode::Offset => [
            (OFFSET_KEY, pagination.offset.map(ParamValue::from)),
            (LIMIT_KEY, pagination.limit.map(ParamValue::from)),
        ],
        PaginationMode::None => [(LIMIT_KEY, None), (OFFSET_KEY, None)],
    };

    entries
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key.to_string(), value)))
        .collect()
}
