//! Authentication handlers

use axum::extract::{Extension, Form, Json};
use std::sync::Arc;
use tracing::{info, warn};

use super::error::AuthError;
use super::models::{LoginForm, TokenResponse};
use crate::common::{ApiError, AppState};

/// POST /api/v1/auth/login
/// OAuth2-style password login, returns a bearer token for later requests
///
/// # Request Body (form-urlencoded)
/// `username=<name>&password=<password>`
///
/// # Response
/// ```json
/// {
///   "access_token": "<jwt token>",
///   "token_type": "bearer"
/// }
/// ```
pub async fn login_handler(
    Extension(state): Extension<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    info!(username = %form.username, "🔐 Received login request");

    let user = match state.users.authenticate(&form.username, &form.password).await {
        Ok(u) => u,
        Err(AuthError::InvalidCredentials) => {
            warn!(username = %form.username, "Login rejected: incorrect username or password");
            return Err(AuthError::InvalidCredentials.into());
        }
        Err(e) => return Err(e.into()),
    };

    let token = state
        .tokens
        .issue(user.id, state.config.access_token_ttl())?;

    info!(user_id = user.id, "User login successful");

    Ok(Json(TokenResponse::bearer(token.into_string())))
}
