use chrono::Utc;
use serde::{ Deserialize, Serialize };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ChatRole {
    User,
    Assistant,
}

impl From<String> for ChatRole {
    /// Anything that is not "assistant" is treated as the user.
    fn from(role: String) -> Self {
        match role.as_str() {
            "assistant" => ChatRole::Assistant,
            _ => ChatRole::User,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Language {
    English,
    Tagalog,
    #[default]
    Taglish,
}

impl From<String> for Language {
    /// Exact match on the code; unrecognised codes fall back to Taglish.
    fn from(code: String) -> Self {
        match code.as_str() {
            "english" => Language::English,
            "tagalog" => Language::Tagalog,
            _ => Language::Taglish,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

impl ChatRequest {
    /// Echoes the caller's correlation token, or mints one from the current time in milliseconds.
    pub fn resolve_conversation_id(&self) -> String {
        self.conversation_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| Utc::now().timestamp_millis().to_string())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    pub conversation_id: String,
}
