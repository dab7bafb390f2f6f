//! Request-time access guard

use axum::http::{header::AUTHORIZATION, HeaderMap};
use std::sync::Arc;
use tracing::{debug, warn};

use super::error::AuthError;
use super::token::TokenService;
use crate::common::safe_token_log;
use crate::users::{User, UserStore};

/// Legacy raw-token header some older clients still send
pub const LEGACY_TOKEN_HEADER: &str = "token";

/// Pulls the presented token out of the request headers
///
/// Only `Authorization: Bearer <token>` is read unless `accept_legacy` is set,
/// in which case a raw `token` header is used as a fallback.
pub fn extract_token(headers: &HeaderMap, accept_legacy: bool) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| {
            let (scheme, rest) = s.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| rest.trim())
        })
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    if bearer.is_some() || !accept_legacy {
        return bearer;
    }

    let legacy = headers
        .get(LEGACY_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    if legacy.is_some() {
        debug!("Token taken from legacy header");
    }
    legacy
}

/// The single authorization checkpoint for protected handlers
#[derive(Clone)]
pub struct AccessGuard {
    tokens: Arc<TokenService>,
    users: UserStore,
}

impl AccessGuard {
    pub fn new(tokens: Arc<TokenService>, users: UserStore) -> Self {
        Self { tokens, users }
    }

    pub async fn authenticate_request(&self, presented_token: &str) -> Result<User, AuthError> {
        let user_id = self.tokens.validate(presented_token).map_err(|e| {
            warn!(
                error = %e,
                token = %safe_token_log(presented_token),
                "Token rejected"
            );
            e
        })?;

        let user = match self.users.find_by_id(user_id).await? {
            Some(u) => u,
            None => {
                warn!(user_id = user_id, "Authentication failed: user not found in database");
                return Err(AuthError::UnknownSubject);
            }
        };

        if !user.is_active {
            warn!(user_id = user.id, "Authentication refused: inactive account");
            return Err(AuthError::InactiveAccount);
        }

        debug!(user_id = user.id, username = %user.username, "Request authenticated");
        Ok(user)
    }
}
