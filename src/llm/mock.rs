//! Scripted provider for tests. Replies are consumed in order, one per call.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ ChatClient, GenerationConfig, ProviderError, ProviderTurn };

#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(&'static str),
    Status(u16, &'static str),
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub history: Vec<ProviderTurn>,
    pub message: String,
    pub generation: GenerationConfig,
}

#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<ScriptedReply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Model names in call order.
    pub fn calls(&self) -> Vec<String> {
        self.recorded().into_iter().map(|c| c.model).collect()
    }

    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn send_message(
        &self,
        model: &str,
        history: &[ProviderTurn],
        message: &str,
        generation: &GenerationConfig
    ) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            history: history.to_vec(),
            message: message.to_string(),
            generation: *generation,
        });

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(ScriptedReply::Text(text)) => Ok(text.to_string()),
            Some(ScriptedReply::Status(status, message)) =>
                Err(ProviderError::classify(model, Some(status), message)),
            None => Err(ProviderError::EmptyResponse { model: model.to_string() }),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}
