//! Session tokens for Estate.
//!
//! Tokens are HS256 JWTs carrying the account id and role. They are not
//! persisted anywhere; expiry is the only way a token stops working.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;
use crate::db::Role;

/// Token errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token's expiry time has passed.
    #[error("token has expired")]
    Expired,

    /// Bad signature, malformed token or unexpected claims.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Encode(String),
}

/// The authenticated caller carried inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub role: Role,
}

/// JWT claims: `{ "user": { "id", "role" }, "iat", "exp" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user: Identity,
    /// Issued at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies signed session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenService {
    /// Default token lifetime (1 hour).
    pub const DEFAULT_LIFETIME_SECS: i64 = 3600;

    /// Longest lifetime a `chrono::Duration` can hold in whole seconds.
    pub const MAX_LIFETIME_SECS: i64 = i64::MAX / 1000;

    /// Create a token service from a signing secret and a lifetime in seconds.
    ///
    /// The lifetime is clamped to `1..=MAX_LIFETIME_SECS`.
    pub fn new(secret: &str, lifetime_secs: i64) -> Self {
        let lifetime = Duration::try_seconds(lifetime_secs.clamp(1, Self::MAX_LIFETIME_SECS))
            .unwrap_or_else(|| Duration::seconds(Self::DEFAULT_LIFETIME_SECS));

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
        }
    }

    /// Create a token service from the `[auth]` configuration section.
    pub fn from_config(config: &AuthConfig) -> Self {
        let lifetime =
            i64::try_from(config.token_expiry_secs).unwrap_or(Self::MAX_LIFETIME_SECS);
        Self::new(&config.jwt_secret, lifetime)
    }

    /// Token lifetime.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token valid from now.
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, TokenError> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issue a token as if it had been issued at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let iat = issued_at.timestamp();
        let claims = TokenClaims {
            user: Identity {
                id: user_id.to_string(),
                role,
            },
            iat,
            exp: iat.saturating_add(self.lifetime.num_seconds()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Verify a token and return the identity it carries.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.user)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}
