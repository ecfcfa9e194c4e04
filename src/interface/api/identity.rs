//! Request identity extraction
//!
//! Authentication happens upstream (gateway / identity provider); requests
//! arrive here with an already-authenticated principal in the
//! `x-principal` header. This extractor only lifts it into a typed value
//! for the authorization checks in the application layer.

use super::dto::ApiResponse;
use crate::domain::shared::value_objects::PrincipalId;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};

/// Header carrying the authenticated principal identifier
pub const PRINCIPAL_HEADER: &str = "x-principal";

/// The authenticated principal of the current request
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub PrincipalId);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ApiResponse<()>>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        match principal {
            Some(value) => Ok(AuthenticatedPrincipal(PrincipalId::new(value))),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error(format!(
                    "missing or empty {} header",
                    PRINCIPAL_HEADER
                ))),
            )),
        }
    }
}
