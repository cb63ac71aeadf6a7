//! # Filtering, Sorting & Pagination Parameters
//!
//! Translates between REST-style query parameters and the canonical query schema
//! the query engine consumes, in both directions.
//!
//! ## Query Parameter Examples
//!
//! ### Filters
//! ```rust,ignore
//! // Bare value: equality
//! GET /events?status=published
//!
//! // Bracketed operator
//! GET /events?starts_at[gte]=2024-01-01&starts_at[lt]=2025-01-01
//!
//! // Lists via repeated brackets
//! GET /events?status[in][]=draft&status[in][]=published
//! ```
//!
//! ### Sorting
//! ```rust,ignore
//! // Comma-separated, `-` for descending
//! GET /events?sort=-starts_at,name
//! ```
//!
//! ### Pagination
//! ```rust,ignore
//! GET /events?limit=20&after=abc123   // cursor, forward
//! GET /events?limit=20&before=abc123  // cursor, backward
//! GET /events?page=2&page_size=25     // page
//! GET /events?offset=40&limit=20      // offset
//! ```
//!
//! ## Main Components
//!
//! - **[`operators`]**: REST token to canonical operator table
//! - **[`extract`]**: parameters to canonical filters, with optional filterable set
//! - **[`pagination`]**: mode detection and the sparse pagination record
//! - **[`sort`]**: sort string parsing and serialization
//!
//! Nothing here validates: unknown operators and conflicting pagination markers are
//! passed on for the query engine to judge.

pub mod conditions;
pub mod operators;
pub mod pagination;
pub mod sort;

// Re-export commonly used items
pub use conditions::{base_field, extract, extract_partitioned, normalize_value};
pub use operators::{FilterOp, Operator, to_canonical};
pub use pagination::{detect_mode, reserved_keys};
pub use sort::{format_sort, parse as parse_sort};
