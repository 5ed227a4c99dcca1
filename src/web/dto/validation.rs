//! Boundary checks for JSON request bodies.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::web::error::ApiError;

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON is a `BAD_REQUEST`; rule violations are a
/// `VALIDATION_ERROR` with per-field `details`. Business rules (missing
/// fields, duplicate email) are left to the credential store.
///
/// ```ignore
/// async fn login(
///     State(state): State<Arc<AppState>>,
///     ValidatedJson(req): ValidatedJson<LoginRequest>,
/// ) -> Result<Json<AuthResponse>, ApiError> {
///     let user = state.credentials.authenticate(&req.email, &req.password).await?;
///     // ...
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => body,
            Err(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection);
                return Err(ApiError::bad_request(rejection.body_text()));
            }
        };

        match body.validate() {
            Ok(()) => Ok(Self(body)),
            Err(errors) => Err(ApiError::from_validation_errors(errors)),
        }
    }
}

/// A name shown on listings must be one printable line.
pub fn single_line(value: &str) -> Result<(), ValidationError> {
    match value.chars().find(|c| c.is_control()) {
        None => Ok(()),
        Some(_) => Err(ValidationError::new("single_line")
            .with_message("Must be a single line without control characters".into())),
    }
}
