//! User repository for Estate.
//!
//! This module provides persistence for credential records.

use sqlx::SqlitePool;
use uuid::Uuid;

use super::user::{NewUser, User};
use crate::{EstateError, Result};

const USER_COLUMNS: &str = "id, name, email, password, phone, role, created_at";

/// Repository for user records.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user and return the stored record.
    ///
    /// A duplicate email (compared case-insensitively) yields `Conflict`.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO users (id, name, email, password, phone, role)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password)
        .bind(&new_user.phone)
        .bind(new_user.role.as_str())
        .execute(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                EstateError::Conflict("User already exists".to_string())
            }
            other => EstateError::Database(other.to_string()),
        })?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| EstateError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    /// Get a user by email (case-insensitive).
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? COLLATE NOCASE");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    /// Check if an email is already registered (case-insensitive).
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? COLLATE NOCASE)")
                .bind(email)
                .fetch_one(self.pool)
                .await?;
        Ok(exists.0)
    }

    /// Count registered users.
    #[cfg(test)]
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Role;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn sample(email: &str) -> NewUser {
        NewUser::new("Amina", email, "hashedpw", "+256700000000", Role::Landlord)
    }

    #[tokio::test]
    async fn test_create_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&sample("amina@example.com")).await.unwrap();

        assert!(Uuid::parse_str(&user.id).is_ok());
        assert_eq!(user.name, "Amina");
        assert_eq!(user.email, "amina@example.com");
        assert_eq!(user.role, Role::Landlord);
        assert!(!user.created_at.is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_email_is_conflict() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&sample("amina@example.com")).await.unwrap();
        let result = repo.create(&sample("AMINA@example.com")).await;

        assert!(matches!(result, Err(EstateError::Conflict(_))));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let created = repo.create(&sample("amina@example.com")).await.unwrap();

        let found = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.email, "amina@example.com");

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_email_case_insensitive() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&sample("Amina@Example.com")).await.unwrap();

        let found = repo.get_by_email("amina@example.com").await.unwrap();
        assert!(found.is_some());
        assert!(repo.email_exists("AMINA@EXAMPLE.COM").await.unwrap());
        assert!(!repo.email_exists("other@example.com").await.unwrap());
    }
}
