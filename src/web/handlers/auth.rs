//! Authentication handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use crate::auth::{authorize, Operation};
use crate::web::dto::{AuthResponse, LoginRequest, MeResponse, RegisterRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;
use crate::EstateError;

/// POST /api/auth/register - Create an account and return a session token.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state.credentials.create(&req.into()).await?;
    let token = state
        .tokens
        .issue(&user.id, user.role)
        .map_err(EstateError::from)?;

    Ok(Json(AuthResponse {
        token,
        role: user.role,
    }))
}

/// POST /api/auth/login - Exchange credentials for a session token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state
        .credentials
        .authenticate(&req.email, &req.password)
        .await?;
    let token = state
        .tokens
        .issue(&user.id, user.role)
        .map_err(EstateError::from)?;

    tracing::info!("User {} logged in", user.id);
    Ok(Json(AuthResponse {
        token,
        role: user.role,
    }))
}

/// GET /api/auth/me - The caller's own profile.
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    authorize(Operation::ReadOwnProfile, Some(&identity)).map_err(EstateError::from)?;

    let profile = state
        .credentials
        .find_by_id(&identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(profile.into()))
}
