use std::collections::HashSet;

use tracing::{debug, trace};

use crate::config::QueryConfig;
use crate::errors::ParamError;
use crate::filtering::{conditions, pagination, sort};
use crate::models::{AsCanonicalQuery, CanonicalQuery, Normalized, Params};
use crate::query_string::{decode_query, encode_query};

/// Runs the filter, pagination and sort transformations against one input.
///
/// Holds configuration only; every method is a pure function of its arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryTransformer {
    config: QueryConfig,
}

impl QueryTransformer {
    #[must_use]
    pub const fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Convert REST parameters into the canonical schema.
    ///
    /// With a filterable set, parameters outside it come back as extras at the top
    /// level of the output. An extra that would shadow a populated canonical key is
    /// dropped.
    ///
    /// # Errors
    ///
    /// [`ParamError::MalformedNumber`] when an integer-typed pagination parameter does
    /// not parse.
    pub fn normalize(
        &self,
        params: &Params,
        filterable: Option<&HashSet<String>>,
    ) -> Result<Normalized, ParamError> {
        let (filters, mut extras) = conditions::extract_partitioned(params, filterable);
        let pagination = pagination::from_params(params, &self.config)?;
        let sort = sort::from_params(params);

        let query = CanonicalQuery {
            filters,
            pagination,
            sort,
        };

        extras.retain(|key, _| {
            let shadowed = query.has_key(key);
            if shadowed {
                debug!(key = %key, "Dropping extra parameter shadowed by canonical key");
            }
            !shadowed
        });

        Ok(Normalized { query, extras })
    }

    /// Render a canonical query, or any wrapper around one, as REST parameters.
    #[must_use]
    pub fn to_query(&self, query: &impl AsCanonicalQuery) -> Params {
        let query = query.canonical_query();
        let mut params = conditions::to_rest(&query.filters);
        params.extend(sort::to_rest(&query.sort));
        params.extend(pagination::to_rest(&query.pagination));
        params
    }

    /// Build a link path for `query`, keeping unrelated parameters already on `path`.
    ///
    /// Parameters computed from `query` replace existing ones with the same key. The
    /// result carries at most one `?` and none when there is nothing to encode.
    #[must_use]
    pub fn build_path(&self, path: &str, query: &impl AsCanonicalQuery) -> String {
        let (base, existing) = path.split_once('?').unwrap_or((path, ""));

        let mut merged = decode_query(existing);
        for (key, value) in self.to_query(query) {
            if let Some(previous) = merged.insert(key.clone(), value) {
                trace!(key = %key, previous = %previous, "Replacing existing query parameter");
            }
        }

        if merged.is_empty() {
            base.to_string()
        } else {
            format!("{base}?{}", encode_query(&merged))
        }
    }
}

/// [`QueryTransformer::normalize`] with the default configuration.
///
/// # Errors
///
/// [`ParamError::MalformedNumber`] when an integer-typed pagination parameter does
/// not parse.
pub fn normalize(
    params: &Params,
    filterable: Option<&HashSet<String>>,
) -> Result<Normalized, ParamError> {
    QueryTransformer::default().normalize(params, filterable)
}

/// [`QueryTransformer::to_query`] with the default configuration.
#[must_use]
pub fn to_query(query: &impl AsCanonicalQuery) -> Params {
    QueryTransformer::default().to_query(query)
}

/// [`QueryTransformer::build_path`] with the default configuration.
#[must_use]
pub fn build_path(path: &str, query: &impl AsCanonicalQuery) -> String {
    QueryTransformer::default().build_path(path, query)
}
