//! Translate REST-style query parameters to and from a canonical filter, sort and
//! pagination schema.
//!
//! ```rust,ignore
//! // GET /events?status=published&starts_at[gte]=2024-01-01&sort=-starts_at&limit=20&after=abc123
//! let normalized = querycrate::normalize(&params, None)?;
//! // {"filters": [...], "order_by": ["starts_at"], "order_directions": ["desc"],
//! //  "first": 20, "after": "abc123"}
//!
//! // Link to the same listing with the canonical state applied
//! let link = querycrate::build_path("/events?species=dog", &normalized);
//! ```

pub mod config;
pub mod errors;
pub mod extractor;
pub mod filtering;
pub mod meta;
pub mod models;
pub mod query_string;
pub mod transform;

pub use config::{BareLimitPolicy, QueryConfig};
pub use errors::ParamError;
pub use extractor::RestParams;
pub use filtering::{FilterOp, Operator};
pub use meta::QueryMeta;
pub use models::{
    AsCanonicalQuery, CanonicalQuery, Filter, Normalized, Pagination, PaginationMode, ParamValue,
    Params, Scalar, Sort, SortDirection,
};
pub use query_string::{decode_query, encode_query};
pub use transform::{QueryTransformer, build_path, normalize, to_query};
