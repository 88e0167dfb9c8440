use crate::config::prompt::SYSTEM_ACKNOWLEDGEMENT;
use crate::llm::{ ProviderRole, ProviderTurn };
use crate::models::chat::{ ChatRole, ChatTurn };

/// Reshapes client history into provider turns and seeds it with the system prompt.
///
/// `assistant` becomes `model`, everything else `user`. A leading model turn is
/// dropped because the provider wants the user to speak first. The system
/// prompt and a canned acknowledgement are then prepended on every request.
pub fn adapt_history(history: &[ChatTurn], system_prompt: &str) -> Vec<ProviderTurn> {
    let mut turns: Vec<ProviderTurn> = history
        .iter()
        .map(|turn| {
            let role = match turn.role {
                ChatRole::Assistant => ProviderRole::Model,
                ChatRole::User => ProviderRole::User,
            };
            ProviderTurn { role, text: turn.content.clone() }
        })
        .collect();

    if turns.first().map(|t| t.role) == Some(ProviderRole::Model) {
        turns.remove(0);
    }

    let mut adapted = Vec::with_capacity(turns.len() + 2);
    adapted.push(ProviderTurn::user(system_prompt));
    adapted.push(ProviderTurn::model(SYSTEM_ACKNOWLEDGEMENT));
    adapted.extend(turns);
    adapted
}
