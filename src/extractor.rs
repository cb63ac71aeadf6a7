use std::convert::Infallible;
use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::models::Params;
use crate::query_string::decode_query;

/// Raw REST parameters of a request, decoded from its query string.
///
/// Bracketed keys stay flat (`starts_at[gte]`) and repeated `key[]` pairs become
/// lists; [`normalize`](crate::normalize) understands both.
///
/// ```rust,ignore
/// async fn list_events(RestParams(params): RestParams) -> Result<Json<Normalized>, ParamError> {
///     Ok(Json(querycrate::normalize(&params, None)?))
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestParams(pub Params);

impl<S> FromRequestParts<S> for RestParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.uri.query().map(decode_query).unwrap_or_default()))
    }
}

impl Deref for RestParams {
    type Target = Params;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<RestParams> for Params {
    fn from(params: RestParams) -> Self {
        params.0
    }
}
