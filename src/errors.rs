//! # Parameter Errors
//!
//! Transformation is permissive by design: unknown operators, conflicting pagination
//! markers and odd nested shapes are all passed through for a downstream validator.
//! The single hard failure is an integer-typed pagination parameter that does not
//! parse as an integer.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use querycrate::{ParamError, RestParams};
//!
//! async fn list_events(RestParams(params): RestParams) -> Result<Json<Value>, ParamError> {
//!     // A malformed `limit` becomes a 400 Bad Request
//!     let normalized = querycrate::normalize(&params, None)?;
//!     Ok(Json(serde_json::to_value(normalized).unwrap_or_default()))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// Error raised while turning REST parameters into canonical pagination fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// An integer-typed pagination parameter could not be parsed
    MalformedNumber {
        /// REST key that carried the value (e.g. `limit`, `page`)
        key: String,
        /// The offending value as received
        value: String,
    },
}

impl ParamError {
    /// Create a malformed numeric parameter error
    pub fn malformed_number(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MalformedNumber {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The REST key the error refers to
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::MalformedNumber { key, .. } => key,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedNumber { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::MalformedNumber { key, value } => {
                format!("malformed numeric parameter '{key}': '{value}' is not an integer")
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    parameter: String,
}

impl IntoResponse for ParamError {
    fn into_response(self) -> Response {
        tracing::debug!(
            parameter = %self.key(),
            status = %self.status_code(),
            "Rejecting request parameters"
        );

        let body = ErrorResponse {
            error: self.user_message(),
            parameter: self.key().to_string(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ParamError {}
