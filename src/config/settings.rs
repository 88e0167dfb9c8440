use axum::http::HeaderValue;
use thiserror::Error;

use crate::cli::Args;
use crate::llm::GenerationConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GOOGLE_API_KEY environment variable is required")]
    MissingApiKey,
    #[error("at least one chat model must be configured")]
    NoModels,
    #[error("invalid CORS origin '{0}'")]
    InvalidOrigin(String),
    #[error("both --tls-cert-path and --tls-key-path must be provided to enable TLS")]
    IncompleteTls,
}

#[derive(Debug, Clone)]
pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

/// Immutable service configuration, validated once at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub api_key: String,
    pub base_url: String,
    pub models: Vec<String>,
    pub generation: GenerationConfig,
    pub server_addr: String,
    pub cors_origins: Vec<HeaderValue>,
    pub rate_limit_per_second: u32,
    pub tls: Option<TlsPaths>,
}

impl ServiceConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let api_key = args.google_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?
            .to_string();

        let models: Vec<String> = args.chat_models
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(str::to_owned)
            .collect();
        if models.is_empty() {
            return Err(ConfigError::NoModels);
        }

        let cors_origins = args.cors_origins
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(|o| HeaderValue::from_str(o).map_err(|_| ConfigError::InvalidOrigin(o.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        let tls = if args.enable_tls {
            match (&args.tls_cert_path, &args.tls_key_path) {
                (Some(cert_path), Some(key_path)) =>
                    Some(TlsPaths { cert_path: cert_path.clone(), key_path: key_path.clone() }),
                _ => {
                    return Err(ConfigError::IncompleteTls);
                }
            }
        } else {
            None
        };

        Ok(Self {
            api_key,
            base_url: args.chat_base_url.trim_end_matches('/').to_string(),
            models,
            generation: GenerationConfig {
                max_output_tokens: args.max_output_tokens,
                temperature: args.temperature,
            },
            server_addr: args.server_addr.clone(),
            cors_origins,
            rate_limit_per_second: args.rate_limit_per_second,
            tls,
        })
    }
}
