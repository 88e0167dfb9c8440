use async_trait::async_trait;
use log::{ debug, info };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE } };
use serde::{ Deserialize, Serialize };
use std::error::Error as StdError;

use super::{ ChatClient, GenerationConfig, ProviderError, ProviderRole, ProviderTurn };

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: ProviderRole,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
}

#[derive(Deserialize)]
struct GoogleCandidate {
    content: Option<GoogleContent>,
}

#[derive(Deserialize)]
struct GoogleContent {
    #[serde(default)]
    parts: Vec<GooglePart>,
}

#[derive(Deserialize)]
struct GooglePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

fn build_payload<'a>(
    history: &'a [ProviderTurn],
    message: &'a str,
    generation: &GenerationConfig
) -> GenerateContentRequest<'a> {
    let mut contents: Vec<GeminiContent<'a>> = history
        .iter()
        .map(|turn| GeminiContent {
            role: turn.role,
            parts: vec![GeminiPart { text: &turn.text }],
        })
        .collect();
    contents.push(GeminiContent {
        role: ProviderRole::User,
        parts: vec![GeminiPart { text: message }],
    });

    GenerateContentRequest {
        contents,
        generation_config: GeminiGenerationConfig {
            max_output_tokens: generation.max_output_tokens,
            temperature: generation.temperature,
        },
    }
}

/// Pulls a readable message out of an error body, falling back to the raw text.
fn parse_error_body(body: &str) -> String {
    match serde_json::from_str::<GoogleErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(status) => format!("{} {}", status, envelope.error.message),
            None => envelope.error.message,
        },
        Err(_) => body.trim().to_string(),
    }
}

fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let text: String = candidate.content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    if text.is_empty() { None } else { Some(text) }
}

pub struct GeminiChatClient {
    http: HttpClient,
    base_url: String,
}

impl GeminiChatClient {
    pub fn new(
        api_key: &str,
        base_url: &str
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| format!("Invalid API key format: {}", e))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn send_message(
        &self,
        model: &str,
        history: &[ProviderTurn],
        message: &str,
        generation: &GenerationConfig
    ) -> Result<String, ProviderError> {
        let url = self.endpoint(model);
        info!(
            "GeminiChatClient::send_message() → model={} history_turns={}",
            model,
            history.len()
        );

        let payload = build_payload(history, message, generation);
        let resp = self.http
            .post(&url)
            .json(&payload)
            .send().await
            .map_err(|source| ProviderError::Transport { model: model.to_string(), source })?;

        let status = resp.status();
        let body = resp
            .text().await
            .map_err(|source| ProviderError::Transport { model: model.to_string(), source })?;
        debug!("Gemini {} responded with status {}", model, status);

        if !status.is_success() {
            return Err(ProviderError::classify(model, Some(status.as_u16()), parse_error_body(&body)));
        }

        let parsed: GenerateContentResponse = serde_json
            ::from_str(&body)
            .map_err(|e|
                ProviderError::Fatal {
                    model: model.to_string(),
                    status: Some(status.as_u16()),
                    message: format!("Failed to parse response: {}", e),
                }
            )?;

        extract_text(parsed).ok_or_else(|| ProviderError::EmptyResponse { model: model.to_string() })
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
