//! User model for Estate.
//!
//! Defines the stored credential record and the closed set of roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account role.
///
/// The role is chosen at registration and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tenant,
    Landlord,
    Broker,
    Admin,
}

impl Role {
    /// All roles accepted at registration.
    pub const ALL: [Role; 4] = [Role::Tenant, Role::Landlord, Role::Broker, Role::Admin];

    /// Convert role to its wire and database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tenant => "tenant",
            Role::Landlord => "landlord",
            Role::Broker => "broker",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role names are matched exactly; `"Landlord"` is not a valid role.
impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tenant" => Ok(Role::Tenant),
            "landlord" => Ok(Role::Landlord),
            "broker" => Ok(Role::Broker),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Stored account record, including the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address (unique, case-insensitive).
    pub email: String,
    /// Password hash (Argon2 PHC string).
    pub password: String,
    /// Contact phone.
    pub phone: String,
    /// Account role.
    #[sqlx(try_from = "String")]
    pub role: Role,
    /// Account creation timestamp (RFC 3339).
    pub created_at: String,
}

impl User {
    /// Public view of the account, without the password hash.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Password hash (must be pre-hashed).
    pub password: String,
    pub phone: String,
    pub role: Role,
}

impl NewUser {
    /// Create a new user record from already validated fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        phone: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password_hash.into(),
            phone: phone.into(),
            role,
        }
    }
}

/// Account profile as exposed to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!(Role::from_str("tenant").unwrap(), Role::Tenant);
        assert_eq!(Role::from_str("landlord").unwrap(), Role::Landlord);
        assert_eq!(Role::from_str("broker").unwrap(), Role::Broker);
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert!(Role::from_str("Landlord").is_err());
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn test_role_as_str_round_trips() {
        for role in Role::ALL {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Landlord).unwrap(), "\"landlord\"");
        let role: Role = serde_json::from_str("\"broker\"").unwrap();
        assert_eq!(role, Role::Broker);
    }

    #[test]
    fn test_profile_omits_password() {
        let user = User {
            id: "u-1".to_string(),
            name: "Amina".to_string(),
            email: "amina@example.com".to_string(),
            password: "$argon2id$hash".to_string(),
            phone: "+256700000000".to_string(),
            role: Role::Landlord,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        };

        let json = serde_json::to_value(user.profile()).unwrap();
        assert_eq!(json["role"], "landlord");
        assert!(json.get("password").is_none());
    }
}
