//! Token authentication for protected routes.

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{Identity, TokenService};
use crate::web::error::ApiError;

/// Header carrying the session token.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Extractor for authenticated callers.
///
/// Reads the `x-auth-token` header and verifies it with the
/// [`TokenService`] placed in the request extensions by [`token_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTH_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::unauthorized("No token, authorization denied"))?;

        let tokens = parts
            .extensions
            .get::<Arc<TokenService>>()
            .ok_or_else(|| ApiError::internal("Token service not configured"))?;

        let identity = tokens.verify(token).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            ApiError::unauthorized("Token is not valid")
        })?;

        Ok(AuthUser(identity))
    }
}

/// Middleware function to inject the token service into request extensions.
pub async fn token_auth(
    tokens: Arc<TokenService>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(tokens);
    next.run(request).await
}
