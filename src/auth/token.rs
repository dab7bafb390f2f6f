//! Signed bearer token issuance and validation (HS256 JWT)

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::fmt;
use tracing::debug;

use super::error::AuthError;
use super::models::Claims;

/// An issued bearer token
///
/// Always the signed variant. Unsigned `username:id:timestamp` strings are
/// never produced and fail validation as malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stateless token service keyed by the process-wide secret
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against an explicit clock in `validate_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, user_id: i64, ttl: Duration) -> Result<Token, AuthError> {
        self.issue_at(user_id, ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: i64,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<Token, AuthError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Signing("token expiry out of range".to_string()))?;

        let claims = Claims {
            sub: Some(user_id.to_string()),
            exp: expires_at.timestamp(),
            iat: Some(now.timestamp()),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        debug!(user_id = user_id, exp = claims.exp, "Issued access token");
        Ok(Token(token))
    }

    pub fn validate(&self, token: &str) -> Result<i64, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Verifies signature and expiry and returns the subject user id
    ///
    /// Does not touch the credential store.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<i64, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "JWT token validation failed");
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenMalformed,
            }
        })?;

        let expires_at = Utc
            .timestamp_opt(data.claims.exp, 0)
            .single()
            .ok_or(AuthError::TokenMalformed)?;
        if now > expires_at {
            return Err(AuthError::TokenExpired);
        }

        let sub = data.claims.sub.ok_or(AuthError::TokenSubjectMissing)?;
        sub.parse::<i64>().map_err(|_| AuthError::TokenMalformed)
    }
}
