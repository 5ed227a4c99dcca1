//! Authentication and authorization for Estate.
//!
//! This module provides secret hashing, the credential store, session
//! tokens and the role-based access policy.

mod credentials;
mod password;
pub mod policy;
mod token;
pub mod validation;

pub use credentials::{CredentialStore, Registration, INVALID_CREDENTIALS};
pub use password::{
    check_password, validate_password, verify_password, PasswordError, SecretHasher,
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
pub use policy::{authorize, Operation, PolicyError};
pub use token::{Identity, TokenClaims, TokenError, TokenService};
pub use validation::ValidationError;
