// src/logging_middleware.rs
//! Middleware for logging request and response bodies in debug mode

use axum::body::to_bytes;
use axum::{
    body::Body,
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::debug;

const REDACTED: &str = "***";

/// Middleware to log request and response bodies in debug mode
///
/// Only JSON bodies are logged, with every `password` field masked.
/// Form-encoded bodies carry login credentials and are never logged.
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();

    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if let Some(logged) = loggable_body(&parts.headers, &bytes) {
        debug!(
            method = %parts.method,
            uri = %parts.uri,
            request_body = %logged,
            "📥 Request"
        );
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if let Some(logged) = loggable_body(&parts.headers, &bytes) {
        debug!(
            status = %parts.status,
            response_body = %logged,
            "📤 Response"
        );
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}

fn loggable_body(headers: &HeaderMap, bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }

    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false);
    if !is_json {
        return None;
    }

    let mut json: Value = serde_json::from_slice(bytes).ok()?;
    redact_passwords(&mut json);
    serde_json::to_string_pretty(&json).ok()
}

fn redact_passwords(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if key.to_ascii_lowercase().contains("password") {
                    *v = Value::String(REDACTED.to_string());
                } else {
                    redact_passwords(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_passwords),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn test_password_fields_are_masked() {
        let body = json!({
            "username": "alice",
            "password": "Password123",
            "nested": [{"new_password": "Secret999"}]
        })
        .to_string();

        let logged = loggable_body(&json_headers(), body.as_bytes()).unwrap();
        assert!(logged.contains("alice"));
        assert!(!logged.contains("Password123"));
        assert!(!logged.contains("Secret999"));
    }

    #[test]
    fn test_form_bodies_are_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        assert!(loggable_body(&headers, b"username=alice&password=Password123").is_none());
        assert!(loggable_body(&json_headers(), b"").is_none());
    }
}
