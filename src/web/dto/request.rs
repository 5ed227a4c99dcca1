//! Request DTOs for the web API.

use serde::Deserialize;
use validator::Validate;

use super::validation::single_line;
use crate::auth::Registration;

/// Registration request.
///
/// Missing fields deserialize as empty strings so that the credential store
/// can report them uniformly.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(
        length(max = 100, message = "Name must be at most 100 characters"),
        custom(function = "single_line")
    )]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 254, message = "Email must be at most 254 characters"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(max = 128, message = "Password must be at most 128 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration::new(req.name, req.email, req.phone, req.password, req.role)
    }
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(max = 254, message = "Email must be at most 254 characters"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 128, message = "Password must be at most 128 characters"))]
    pub password: String,
}
