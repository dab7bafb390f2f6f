//! User data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User database model
///
/// `hashed_password` is never serialized.
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Registration payload for `POST /api/v1/users/`
#[derive(Deserialize, Debug)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Payload for `PATCH /api/v1/users/me`
#[derive(Deserialize, Debug, Default)]
pub struct UserUpdate {
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

/// Public view of a user
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_active: user.is_active,
        }
    }
}
