//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
};
use std::sync::Arc;
use tracing::warn;

use super::guard::extract_token;
use crate::common::{ApiError, AppState};
use crate::users::User;

/// Authenticated user extractor
///
/// Runs the access guard for every protected handler: token extraction,
/// signature and expiry validation, user lookup and the active check.
#[derive(Debug)]
pub struct AuthedUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let token = match extract_token(
            &parts.headers,
            app_state.config.accept_legacy_token_header,
        ) {
            Some(t) => t,
            None => {
                warn!(uri = %parts.uri, "Authentication failed: missing bearer token");
                return Err(super::AuthError::MissingToken.into());
            }
        };

        let user = app_state.guard.authenticate_request(&token).await?;
        Ok(AuthedUser(user))
    }
}
