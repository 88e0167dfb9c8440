pub mod fallback;
pub mod gemini;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Turn author as the provider understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTurn {
    pub role: ProviderRole,
    pub text: String,
}

impl ProviderTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: ProviderRole::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: ProviderRole::Model, text: text.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 2000,
            temperature: 0.5,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transient overload or rate limit. The next model may succeed.
    #[error("model {model} is unavailable ({}): {message}", status_label(.status))]
    Retryable {
        model: String,
        status: Option<u16>,
        message: String,
    },
    #[error("model {model} failed ({}): {message}", status_label(.status))]
    Fatal {
        model: String,
        status: Option<u16>,
        message: String,
    },
    #[error("request to model {model} failed: {source}")]
    Transport {
        model: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("model {model} returned no text")]
    EmptyResponse {
        model: String,
    },
    #[error("All models failed")]
    AllModelsFailed,
}

fn status_label(status: &Option<u16>) -> String {
    status.map(|s| s.to_string()).unwrap_or_else(|| "no status".to_string())
}

impl ProviderError {
    /// Sorts a failed provider call into retryable or fatal.
    /// 503, 429 and any "overloaded" message are transient.
    pub fn classify(model: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        let transient =
            matches!(status, Some(503) | Some(429)) ||
            message.to_lowercase().contains("overloaded");

        if transient {
            ProviderError::Retryable { model: model.to_string(), status, message }
        } else {
            ProviderError::Fatal { model: model.to_string(), status, message }
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Retryable { .. })
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Starts a conversation on `model` seeded with `history` and submits `message` as the next user turn.
    async fn send_message(
        &self,
        model: &str,
        history: &[ProviderTurn],
        message: &str,
        generation: &GenerationConfig
    ) -> Result<String, ProviderError>;

    fn provider_name(&self) -> &'static str;
}
