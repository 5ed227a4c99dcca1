//! Credential store for Estate.
//!
//! Owns account creation and secret verification. Hashing runs on the
//! blocking thread pool so it never stalls the async runtime.

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::password::{verify_password, SecretHasher};
use super::validation::{validate_email, validate_name, validate_phone, validate_role, ValidationError};
use crate::db::{NewUser, User, UserProfile, UserRepository};
use crate::{EstateError, Result};

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registration input as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// Role name; parsed and checked during creation.
    pub role: String,
}

impl Registration {
    /// Create a registration request.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        password: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            password: password.into(),
            role: role.into(),
        }
    }

    fn any_blank(&self) -> bool {
        [&self.name, &self.email, &self.phone, &self.password, &self.role]
            .iter()
            .any(|f| f.trim().is_empty())
    }
}

/// Account persistence plus secret hashing.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
    hasher: SecretHasher,
}

impl CredentialStore {
    /// Create a credential store over a pool.
    pub fn new(pool: SqlitePool, hasher: SecretHasher) -> Self {
        Self { pool, hasher }
    }

    /// Register a new account.
    ///
    /// Fails with `Validation` for missing or malformed fields and with
    /// `Conflict` when the email is already taken.
    pub async fn create(&self, registration: &Registration) -> Result<User> {
        if registration.any_blank() {
            return Err(ValidationError::MissingFields.into());
        }
        validate_name(&registration.name)?;
        validate_email(&registration.email)?;
        validate_phone(&registration.phone)?;
        let role = validate_role(&registration.role)?;

        let repo = UserRepository::new(&self.pool);
        if repo.email_exists(&registration.email).await? {
            return Err(EstateError::Conflict("User already exists".to_string()));
        }

        let hasher = self.hasher.clone();
        let secret = registration.password.clone();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| EstateError::Internal(format!("hashing task failed: {e}")))??;

        let new_user = NewUser::new(
            registration.name.trim(),
            registration.email.trim(),
            hash,
            registration.phone.trim(),
            role,
        );
        let user = repo.create(&new_user).await?;

        info!("Registered user {} as {}", user.id, user.role);
        Ok(user)
    }

    /// Find an account by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        UserRepository::new(&self.pool).get_by_email(email).await
    }

    /// Find an account's public profile by id.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>> {
        let user = UserRepository::new(&self.pool).get_by_id(id).await?;
        Ok(user.map(|u| u.profile()))
    }

    /// Check a candidate secret against a stored hash.
    pub async fn verify_secret(&self, candidate: &str, stored_hash: &str) -> Result<bool> {
        let candidate = candidate.to_string();
        let stored_hash = stored_hash.to_string();
        tokio::task::spawn_blocking(move || verify_password(&candidate, &stored_hash))
            .await
            .map_err(|e| EstateError::Internal(format!("verification task failed: {e}")))
    }

    /// Resolve an email and secret to an account.
    ///
    /// Unknown emails and wrong secrets fail identically.
    pub async fn authenticate(&self, email: &str, secret: &str) -> Result<User> {
        if email.trim().is_empty() || secret.is_empty() {
            return Err(EstateError::Validation(
                ValidationError::MissingFields.to_string(),
            ));
        }

        let Some(user) = self.find_by_email(email.trim()).await? else {
            debug!("Login attempt for unknown email");
            return Err(EstateError::Validation(INVALID_CREDENTIALS.to_string()));
        };

        if !self.verify_secret(secret, &user.password).await? {
            debug!("Login attempt with wrong secret for user {}", user.id);
            return Err(EstateError::Validation(INVALID_CREDENTIALS.to_string()));
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Role;
    use crate::Database;

    async fn setup() -> (Database, CredentialStore) {
        let db = Database::open_in_memory().await.unwrap();
        let store = CredentialStore::new(db.pool().clone(), SecretHasher::new(1024, 1, 1).unwrap());
        (db, store)
    }

    fn landlord() -> Registration {
        Registration::new(
            "Amina",
            "amina@example.com",
            "+256700000000",
            "secret123",
            "landlord",
        )
    }

    #[tokio::test]
    async fn test_create_hashes_secret() {
        let (_db, store) = setup().await;

        let user = store.create(&landlord()).await.unwrap();

        assert_eq!(user.role, Role::Landlord);
        assert_ne!(user.password, "secret123");
        assert!(user.password.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_create_missing_fields() {
        let (_db, store) = setup().await;

        let mut reg = landlord();
        reg.phone = "  ".to_string();

        let err = store.create(&reg).await.unwrap_err();
        assert!(matches!(err, EstateError::Validation(msg) if msg == "All fields are required"));
    }

    #[tokio::test]
    async fn test_create_invalid_role() {
        let (_db, store) = setup().await;

        let mut reg = landlord();
        reg.role = "owner".to_string();

        let err = store.create(&reg).await.unwrap_err();
        assert!(matches!(err, EstateError::Validation(msg) if msg == "Invalid role"));
    }

    #[tokio::test]
    async fn test_create_short_secret() {
        let (_db, store) = setup().await;

        let mut reg = landlord();
        reg.password = "12345".to_string();

        assert!(matches!(store.create(&reg).await, Err(EstateError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let (_db, store) = setup().await;

        store.create(&landlord()).await.unwrap();

        let mut again = landlord();
        again.email = "AMINA@example.com".to_string();
        let err = store.create(&again).await.unwrap_err();
        assert!(matches!(err, EstateError::Conflict(msg) if msg == "User already exists"));
    }

    #[tokio::test]
    async fn test_find_by_id_projection() {
        let (_db, store) = setup().await;
        let user = store.create(&landlord()).await.unwrap();

        let profile = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(profile.email, "amina@example.com");
        assert_eq!(profile.role, Role::Landlord);

        assert!(store.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let (_db, store) = setup().await;
        let created = store.create(&landlord()).await.unwrap();

        let user = store.authenticate("Amina@Example.com", "secret123").await.unwrap();
        assert_eq!(user.id, created.id);
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_indistinguishable() {
        let (_db, store) = setup().await;
        store.create(&landlord()).await.unwrap();

        let wrong = store.authenticate("amina@example.com", "secret124").await.unwrap_err();
        let unknown = store.authenticate("nobody@example.com", "secret123").await.unwrap_err();

        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, EstateError::Validation(msg) if msg == INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_verify_secret_malformed_hash() {
        let (_db, store) = setup().await;
        assert!(!store.verify_secret("secret123", "garbage").await.unwrap());
    }
}
