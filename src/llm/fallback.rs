use log::{ info, warn };
use std::sync::Arc;

use super::{ ChatClient, GenerationConfig, ProviderError, ProviderTurn };

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackOutcome {
    pub model: String,
    pub text: String,
}

/// Tries each configured model in priority order until one answers.
///
/// A retryable failure moves on to the next model straight away (no delay);
/// any other failure stops the run and is returned as-is. When every model is
/// overloaded the last error is returned.
#[derive(Clone)]
pub struct ModelFallbackRunner {
    client: Arc<dyn ChatClient>,
    models: Arc<[String]>,
    generation: GenerationConfig,
}

impl ModelFallbackRunner {
    pub fn new(client: Arc<dyn ChatClient>, models: Vec<String>, generation: GenerationConfig) -> Self {
        Self { client, models: models.into(), generation }
    }

    pub async fn run(
        &self,
        history: &[ProviderTurn],
        message: &str
    ) -> Result<FallbackOutcome, ProviderError> {
        let mut last_error: Option<ProviderError> = None;

        for model in self.models.iter() {
            info!("Trying model: {} ({})", model, self.client.provider_name());
            match self.client.send_message(model, history, message, &self.generation).await {
                Ok(text) => {
                    info!("Success with model: {}", model);
                    return Ok(FallbackOutcome { model: model.clone(), text });
                }
                Err(e) if e.is_retryable() => {
                    warn!("Model {} failed (retryable): {}", model, e);
                    last_error = Some(e);
                }
                Err(e) => {
                    warn!("Model {} failed (fatal): {}", model, e);
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or(ProviderError::AllModelsFailed))
    }
}
