// src/services/correction.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::common::config::{AppConfig, MAX_OPENAI_RETRIES};

const SYSTEM_PROMPT: &str = "You are a language correction assistant that helps non-native English speakers improve their writing.";
const NOT_CONFIGURED_EXPLANATION: &str =
    "No grammar correction available (API key not configured).";
const MISSING_EXPLANATION: &str = "No explanation provided.";
const MAX_RETRY_DELAY_MS: u64 = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum CorrectionError {
    #[error("API key not configured")]
    NotConfigured,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Result of a correction call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub corrected_text: String,
    pub explanation: String,
}

impl Correction {
    /// Echoes the input with an explanation, used whenever the model is unavailable
    pub fn fallback(original_text: &str, explanation: impl Into<String>) -> Self {
        Self {
            corrected_text: original_text.to_string(),
            explanation: explanation.into(),
        }
    }
}

/// External correction collaborator
///
/// Implementations never fail: on any error they echo the input.
#[async_trait]
pub trait Corrector: Send + Sync {
    async fn correct(&self, text: &str) -> Correction;
}

#[derive(Debug, Clone)]
pub struct CorrectionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

impl CorrectionConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            model: config.openai_model.clone(),
            max_retries: config.openai_max_retries.clamp(1, MAX_OPENAI_RETRIES),
            retry_base_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CorrectionPayload {
    corrected_text: Option<String>,
    explanation: Option<String>,
}

#[derive(Debug)]
pub struct OpenAICorrector {
    config: CorrectionConfig,
    client: Client,
}

impl OpenAICorrector {
    pub fn new(config: CorrectionConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn try_correct(&self, original_text: &str) -> Result<Correction, CorrectionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(CorrectionError::NotConfigured)?;

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(original_text),
                },
            ],
            temperature: 0.3,
            max_tokens: 1000,
            response_format: serde_json::json!({"type": "json_object"}),
        };

        debug!(model = %self.config.model, "Sending correction request");

        let response = self.make_request_with_retry(api_key, &request).await?;

        if let Some(usage) = &response.usage {
            info!(
                model = %self.config.model,
                tokens_used = usage.total_tokens,
                "Correction request completed"
            );
        }

        let content = response
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| CorrectionError::InvalidResponse("No choices in response".to_string()))?;

        parse_correction(content, original_text)
    }

    /// Make API request with retry logic
    async fn make_request_with_retry(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, CorrectionError> {
        let max_retries = self.config.max_retries.clamp(1, MAX_OPENAI_RETRIES);
        let mut last_error = None;

        for attempt in 1..=max_retries {
            match self.make_request(api_key, request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    warn!(
                        attempt = attempt,
                        max_retries = max_retries,
                        error = %e,
                        "Correction request failed"
                    );
                    last_error = Some(e);

                    // Exponential backoff
                    if attempt < max_retries {
                        tokio::time::sleep(retry_delay(self.config.retry_base_delay_ms, attempt))
                            .await;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| CorrectionError::RequestFailed("Unknown error".to_string())))
    }

    /// Make a single API request
    async fn make_request(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, CorrectionError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| CorrectionError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CorrectionError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Correction API request failed");
            return Err(CorrectionError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| CorrectionError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl Corrector for OpenAICorrector {
    async fn correct(&self, text: &str) -> Correction {
        match self.try_correct(text).await {
            Ok(correction) => correction,
            Err(CorrectionError::NotConfigured) => {
                warn!("No OpenAI API key configured; echoing text");
                Correction::fallback(text, NOT_CONFIGURED_EXPLANATION)
            }
            Err(e) => {
                error!(error = %e, "Correction failed; echoing text");
                Correction::fallback(text, format!("Could not process correction: {}", e))
            }
        }
    }
}

/// Exponential backoff after the given failed attempt, capped at `MAX_RETRY_DELAY_MS`
fn retry_delay(base_delay_ms: u64, attempt: u32) -> std::time::Duration {
    let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
    std::time::Duration::from_millis(base_delay_ms.saturating_mul(factor).min(MAX_RETRY_DELAY_MS))
}

fn build_prompt(original_text: &str) -> String {
    format!(
        "Correct the following English text, fixing any grammar, spelling, or punctuation errors. \
         Then explain the corrections you made.\n\n\
         Original text: \"{original_text}\"\n\n\
         Respond in JSON with two fields:\n\
         1. corrected_text: the corrected version\n\
         2. explanation: a friendly explanation of the changes and why they improve the text\n\n\
         Keep the original meaning and style. If the text is already correct, say so in the explanation."
    )
}

/// Parses the model's JSON reply, filling absent fields from the original
fn parse_correction(content: &str, original_text: &str) -> Result<Correction, CorrectionError> {
    let payload: CorrectionPayload = serde_json::from_str(content.trim())
        .map_err(|e| CorrectionError::InvalidResponse(e.to_string()))?;

    Ok(Correction {
        corrected_text: payload
            .corrected_text
            .unwrap_or_else(|| original_text.to_string()),
        explanation: payload
            .explanation
            .unwrap_or_else(|| MISSING_EXPLANATION.to_string()),
    })
}
