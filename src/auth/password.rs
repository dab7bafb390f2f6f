//! Password hashing with bcrypt

use bcrypt::{hash, verify};

use super::error::AuthError;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// Returns `Ok(false)` on mismatch and `Err` only if the stored hash is unreadable.
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AuthError> {
    verify(password, hashed).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Runs `hash_password` on the blocking pool.
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
}

/// Runs `verify_password` on the blocking pool.
pub async fn verify_password_blocking(password: String, hashed: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hashed))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
}
