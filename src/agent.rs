use crate::config::prompt::build_system_prompt;
use crate::config::tables::off_topic_response;
use crate::history::adapt_history;
use crate::llm::fallback::ModelFallbackRunner;
use crate::llm::ProviderError;
use crate::models::chat::{ ChatRequest, ChatResponse };
use crate::rag::select_knowledge;
use crate::topic::{ self, TopicVerdict };

use log::{ debug, error, info };
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message is required")]
    MissingMessage,
    #[error("Chat failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Runs one chat request end to end. Holds no per-conversation state.
#[derive(Clone)]
pub struct ChatAgent {
    runner: ModelFallbackRunner,
}

impl ChatAgent {
    pub fn new(runner: ModelFallbackRunner) -> Self {
        Self { runner }
    }

    pub async fn process_message(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        if request.message.is_empty() {
            return Err(ChatError::MissingMessage);
        }
        let conversation_id = request.resolve_conversation_id();

        match topic::classify(&request.message) {
            TopicVerdict::Blocked { pattern } => {
                info!(
                    "Conversation {}: blocked off-topic message (pattern {})",
                    conversation_id,
                    pattern
                );
                return Ok(ChatResponse {
                    message: off_topic_response(request.language).to_string(),
                    conversation_id,
                });
            }
            TopicVerdict::Allowed(reason) => {
                debug!("Conversation {}: message allowed ({:?})", conversation_id, reason);
            }
        }

        let knowledge = select_knowledge(&request.message);
        let system_prompt = build_system_prompt(&knowledge, request.language);
        let history = adapt_history(&request.history, &system_prompt);
        debug!(
            "Conversation {}: {} history turns, language {:?}",
            conversation_id,
            history.len(),
            request.language
        );

        match self.runner.run(&history, &request.message).await {
            Ok(outcome) => {
                info!("Conversation {}: answered by {}", conversation_id, outcome.model);
                Ok(ChatResponse { message: outcome.text, conversation_id })
            }
            Err(e) => {
                error!("Chat error in conversation {}: {}", conversation_id, e);
                Err(ChatError::Provider(e))
            }
        }
    }
}
