use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::info;

use super::models::{UserCreate, UserResponse, UserUpdate};
use crate::auth::AuthedUser;
use crate::common::{safe_email_log, ApiError, AppState, Validator};

/// POST /api/v1/users/ - Register a new user
pub async fn create_user(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<UserCreate>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate().into_result()?;

    let user = state
        .users
        .create(&request.username, &request.email, &request.password)
        .await?;

    info!(
        user_id = user.id,
        email = %safe_email_log(&user.email),
        "User registered"
    );

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /api/v1/users/me - Current user
pub async fn read_current_user(
    AuthedUser(user): AuthedUser,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(user.into()))
}

/// PATCH /api/v1/users/me - Change password and/or active flag
pub async fn update_current_user(
    Extension(state): Extension<Arc<AppState>>,
    AuthedUser(user): AuthedUser,
    Json(request): Json<UserUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    request.validate().into_result()?;

    let mut updated = user;
    if let Some(password) = &request.password {
        updated = state.users.set_password(updated.id, password).await?;
    }
    if let Some(active) = request.is_active {
        if active != updated.is_active {
            updated = state.users.set_active(updated.id, active).await?;
        }
    }

    Ok(Json(updated.into()))
}
