//! Authentication and authorization error types

use std::fmt;
use thiserror::Error;
use tracing::error;

use crate::common::ApiError;

/// Which unique field collided during registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    Username,
    Email,
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityField::Username => write!(f, "username"),
            IdentityField::Email => write!(f, "email"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0} already exists")]
    DuplicateIdentity(IdentityField),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no token presented")]
    MissingToken,

    #[error("token is malformed or its signature is invalid")]
    TokenMalformed,

    #[error("token has expired")]
    TokenExpired,

    #[error("token has no subject")]
    TokenSubjectMissing,

    #[error("token subject does not exist")]
    UnknownSubject,

    #[error("account is inactive")]
    InactiveAccount,

    #[error("password hashing error: {0}")]
    Hashing(String),

    #[error("token signing error: {0}")]
    Signing(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateIdentity(IdentityField::Email) => {
                ApiError::BadRequest("Email already registered".to_string())
            }
            AuthError::DuplicateIdentity(IdentityField::Username) => {
                ApiError::BadRequest("Username already taken".to_string())
            }
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Incorrect username or password".to_string())
            }
            AuthError::MissingToken => ApiError::Unauthorized("Not authenticated".to_string()),
            AuthError::TokenMalformed
            | AuthError::TokenExpired
            | AuthError::TokenSubjectMissing
            | AuthError::UnknownSubject => {
                ApiError::Unauthorized("Could not validate credentials".to_string())
            }
            AuthError::InactiveAccount => ApiError::Forbidden("Inactive user".to_string()),
            AuthError::Hashing(msg) => {
                error!(error = %msg, "Password hashing failed");
                ApiError::InternalServer("password processing failed".to_string())
            }
            AuthError::Signing(msg) => {
                error!(error = %msg, "JWT encoding failed");
                ApiError::InternalServer("jwt error".to_string())
            }
            AuthError::Database(e) => ApiError::DatabaseError(e),
        }
    }
}
