//! Credential store backed by the `users` table

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use super::models::User;
use crate::auth::error::{AuthError, IdentityField};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::common::safe_email_log;

const USER_COLUMNS: &str =
    "id, username, email, hashed_password, is_active, is_superuser, created_at, updated_at";

#[derive(Clone)]
pub struct UserStore {
    db: SqlitePool,
    bcrypt_cost: u32,
}

impl UserStore {
    pub fn new(db: SqlitePool, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// Register a new user, storing only a bcrypt hash of the password
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let existing: Option<(String, String)> = sqlx::query_as(
            "SELECT username, email FROM users WHERE email = ? OR username = ? ORDER BY email = ? DESC LIMIT 1",
        )
        .bind(email)
        .bind(username)
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        if let Some((_, existing_email)) = existing {
            let field = if existing_email == email {
                IdentityField::Email
            } else {
                IdentityField::Username
            };
            debug!(field = %field, "Registration rejected: identity already exists");
            return Err(AuthError::DuplicateIdentity(field));
        }

        let hashed = hash_password_blocking(password.to_string(), self.bcrypt_cost).await?;
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, hashed_password, is_active, is_superuser, created_at, updated_at)
            VALUES (?, ?, ?, 1, 0, ?, ?)
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(&hashed)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(map_unique_violation)?;

        let id = result.last_insert_rowid();
        info!(
            user_id = id,
            username = %username,
            email = %safe_email_log(email),
            "Created user"
        );

        self.find_by_id(id)
            .await?
            .ok_or(AuthError::UnknownSubject)
    }

    /// Check a username/password pair
    ///
    /// Unknown user and wrong password produce the same error.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let Some(user) = self.find_by_username(username).await? else {
            debug!(username = %username, "Login failed: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        let matches =
            verify_password_blocking(password.to_string(), user.hashed_password.clone()).await?;
        if !matches {
            debug!(user_id = user.id, "Login failed: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn set_active(&self, id: i64, active: bool) -> Result<User, AuthError> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(active)
            .bind(&now)
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UnknownSubject);
        }

        info!(user_id = id, is_active = active, "Updated user active flag");
        self.find_by_id(id).await?.ok_or(AuthError::UnknownSubject)
    }

    pub async fn set_password(&self, id: i64, password: &str) -> Result<User, AuthError> {
        let hashed = hash_password_blocking(password.to_string(), self.bcrypt_cost).await?;
        let now = chrono::Utc::now().to_rfc3339();
        let result =
            sqlx::query("UPDATE users SET hashed_password = ?, updated_at = ? WHERE id = ?")
                .bind(&hashed)
                .bind(&now)
                .bind(id)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UnknownSubject);
        }

        info!(user_id = id, "Updated user password");
        self.find_by_id(id).await?.ok_or(AuthError::UnknownSubject)
    }

    /// Seeds the demo account used by the web client during development
    pub async fn ensure_demo_user(&self) -> Result<(), AuthError> {
        if self.find_by_username("testuser").await?.is_some() {
            debug!("Demo user already present");
            return Ok(());
        }

        match self.create("testuser", "test@example.com", "Password123").await {
            Ok(user) => {
                info!(user_id = user.id, "Demo user created (username: testuser)");
                warn!("Demo user has a well-known password; do not enable SEED_DEMO_USER in production");
                Ok(())
            }
            Err(AuthError::DuplicateIdentity(field)) => {
                warn!(field = %field, "Skipping demo user: identity already taken");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Turns a UNIQUE violation from a racing insert into `DuplicateIdentity`
fn map_unique_violation(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let field = if db_err.message().contains("users.email") {
                IdentityField::Email
            } else {
                IdentityField::Username
            };
            return AuthError::DuplicateIdentity(field);
        }
    }
    AuthError::Database(err)
}
