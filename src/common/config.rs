// src/common/config.rs
//! Process-wide configuration loaded once from the environment

use std::env;
use std::str::FromStr;

/// Upper bound on token lifetime (one year)
pub const MAX_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 60 * 24 * 365;

/// Upper bound on correction attempts per tweet
pub const MAX_OPENAI_RETRIES: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration
///
/// Read at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub bcrypt_cost: u32,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub openai_max_retries: u32,
    pub cors_origins: Vec<String>,
    pub port: u16,
    pub reset_db: bool,
    pub seed_demo_user: bool,
    pub accept_legacy_token_header: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("SECRET_KEY")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("SECRET_KEY"))?;

        let openai_api_key = lookup("OPENAI_API_KEY").filter(|s| !s.trim().is_empty());

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,https://twinglish.vercel.app".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let access_token_expire_minutes: i64 =
            parse_var(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", 30)?;
        if !(1..=MAX_ACCESS_TOKEN_EXPIRE_MINUTES).contains(&access_token_expire_minutes) {
            return Err(ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                value: access_token_expire_minutes.to_string(),
            });
        }

        let openai_max_retries: u32 = parse_var(&lookup, "OPENAI_MAX_RETRIES", 3)?;
        if !(1..=MAX_OPENAI_RETRIES).contains(&openai_max_retries) {
            return Err(ConfigError::Invalid {
                key: "OPENAI_MAX_RETRIES",
                value: openai_max_retries.to_string(),
            });
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://twinglish.db".to_string()),
            secret_key,
            access_token_expire_minutes,
            bcrypt_cost: parse_var(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            openai_api_key,
            openai_model: lookup("OPENAI_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            openai_max_retries,
            cors_origins,
            port: parse_var(&lookup, "PORT", 8000)?,
            reset_db: flag(&lookup, "RESET_DB"),
            seed_demo_user: flag(&lookup, "SEED_DEMO_USER"),
            accept_legacy_token_header: flag(&lookup, "ACCEPT_LEGACY_TOKEN_HEADER"),
        })
    }

    /// Token lifetime, kept within 1 minute and one year even for hand-built configs
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(
            self.access_token_expire_minutes
                .clamp(1, MAX_ACCESS_TOKEN_EXPIRE_MINUTES),
        )
    }
}

fn flag<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str) -> bool {
    lookup(key)
        .map(|v| v.trim().eq_ignore_ascii_case("true") || v.trim() == "1")
        .unwrap_or(false)
}

fn parse_var<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        _ => Ok(default),
    }
}
