//! Tests for auth module
//!
//! These tests verify core authentication functionality including:
//! - Token extraction from request headers
//! - The access guard decisions
//! - The login endpoint and protected-route rejections

#[cfg(test)]
mod tests {
    use super::super::guard::{extract_token, LEGACY_TOKEN_HEADER};
    use super::super::*;
    use crate::common::test_support::*;
    use axum::body::Body;
    use axum::http::{header, HeaderMap, HeaderValue, Request, StatusCode};
    use chrono::{Duration, Utc};

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_extract_bearer_token() {
        let h = headers(&[("authorization", "Bearer abc.def.ghi")]);
        assert_eq!(extract_token(&h, false).as_deref(), Some("abc.def.ghi"));

        let lower = headers(&[("authorization", "bearer abc")]);
        assert_eq!(extract_token(&lower, false).as_deref(), Some("abc"));
    }

    #[test]
    fn test_extract_rejects_other_schemes_and_empty() {
        assert!(extract_token(&headers(&[("authorization", "Basic Zm9vOmJhcg==")]), false).is_none());
        assert!(extract_token(&headers(&[("authorization", "Bearer ")]), false).is_none());
        assert!(extract_token(&HeaderMap::new(), true).is_none());
    }

    #[test]
    fn test_legacy_header_only_when_enabled() {
        let h = headers(&[(LEGACY_TOKEN_HEADER, "raw-token")]);
        assert!(extract_token(&h, false).is_none());
        assert_eq!(extract_token(&h, true).as_deref(), Some("raw-token"));

        // Bearer wins when both are present
        let both = headers(&[
            ("authorization", "Bearer from-bearer"),
            (LEGACY_TOKEN_HEADER, "raw-token"),
        ]);
        assert_eq!(extract_token(&both, true).as_deref(), Some("from-bearer"));
    }

    #[tokio::test]
    async fn test_guard_accepts_active_user() {
        let state = test_state().await;
        let (user_id, token) = register_and_token(&state, "alice").await;

        let user = state.guard.authenticate_request(&token).await.unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_guard_rejections() {
        let state = test_state().await;
        let (user_id, token) = register_and_token(&state, "alice").await;

        let garbage = state.guard.authenticate_request("not-a-token").await;
        assert!(matches!(garbage, Err(AuthError::TokenMalformed)));

        let legacy = state
            .guard
            .authenticate_request(&format!("alice:{user_id}:1700000000"))
            .await;
        assert!(matches!(legacy, Err(AuthError::TokenMalformed)));

        let expired = state
            .tokens
            .issue_at(user_id, Duration::minutes(30), Utc::now() - Duration::minutes(31))
            .unwrap();
        let result = state.guard.authenticate_request(expired.as_str()).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));

        let unknown = state.tokens.issue(user_id + 1000, Duration::minutes(30)).unwrap();
        let result = state.guard.authenticate_request(unknown.as_str()).await;
        assert!(matches!(result, Err(AuthError::UnknownSubject)));

        state.users.set_active(user_id, false).await.unwrap();
        let result = state.guard.authenticate_request(&token).await;
        assert!(matches!(result, Err(AuthError::InactiveAccount)));
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let state = test_state().await;
        register_and_token(&state, "alice").await;
        let app = test_app(state);

        let (status, body) = send(&app, login_request("alice", "Password123")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "bearer");
        let token = body["access_token"].as_str().unwrap().to_string();

        let (status, me) = send(&app, get_request("/api/v1/users/me", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["username"], "alice");
        assert!(me.get("hashed_password").is_none());
    }

    #[tokio::test]
    async fn test_login_with_oversized_token_lifetime() {
        let mut config = test_config();
        config.access_token_expire_minutes = 1_000_000_000_000_000;
        let state = test_state_with(config).await;
        register_and_token(&state, "alice").await;
        let app = test_app(state);

        let (status, body) = send(&app, login_request("alice", "Password123")).await;
        assert_eq!(status, StatusCode::OK);
        let token = body["access_token"].as_str().unwrap().to_string();

        let (status, _) = send(&app, get_request("/api/v1/users/me", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let state = test_state().await;
        register_and_token(&state, "alice").await;
        let app = test_app(state);

        let wrong_password = login_with_challenge(&app, "alice", "WrongPassword1").await;
        let unknown_user = login_with_challenge(&app, "nobody", "Password123").await;

        for (status, challenge, detail) in [wrong_password, unknown_user] {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(challenge.as_deref(), Some("Bearer"));
            assert_eq!(detail, "Incorrect username or password");
        }
    }

    #[tokio::test]
    async fn test_protected_route_rejects_bad_tokens() {
        let state = test_state().await;
        let (user_id, _) = register_and_token(&state, "alice").await;
        let expired = state
            .tokens
            .issue_at(user_id, Duration::minutes(30), Utc::now() - Duration::hours(2))
            .unwrap();
        let app = test_app(state);

        let (status, body) = send(&app, get_request("/api/v1/users/me", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Not authenticated");

        for token in ["garbage", expired.as_str()] {
            let (status, body) = send(&app, get_request("/api/v1/users/me", Some(token))).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["detail"], "Could not validate credentials");
        }
    }

    #[tokio::test]
    async fn test_legacy_header_route_behavior() {
        let mut config = test_config();
        config.accept_legacy_token_header = true;
        let enabled = test_state_with(config).await;
        let (_, token) = register_and_token(&enabled, "alice").await;
        let disabled = test_state().await;
        let (_, other_token) = register_and_token(&disabled, "alice").await;

        let legacy_request = |t: &str| {
            Request::builder()
                .method("GET")
                .uri("/api/v1/users/me")
                .header(LEGACY_TOKEN_HEADER, t)
                .body(Body::empty())
                .unwrap()
        };

        let (status, _) = send(&test_app(enabled), legacy_request(&token)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&test_app(disabled), legacy_request(&other_token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    /// Login that keeps the challenge header around
    async fn login_with_challenge(
        app: &axum::Router,
        username: &str,
        password: &str,
    ) -> (StatusCode, Option<String>, String) {
        use tower::ServiceExt;

        let response = app
            .clone()
            .oneshot(login_request(username, password))
            .await
            .unwrap();
        let status = response.status();
        let challenge = response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let detail = body["detail"].as_str().unwrap_or_default().to_string();
        (status, challenge, detail)
    }
}
