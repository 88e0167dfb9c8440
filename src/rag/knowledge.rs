use crate::config::tables::{ GENERAL_KNOWLEDGE, KNOWLEDGE_GROUPS };

/// Picks the canned snippets whose keywords occur in `query`.
///
/// Matching is a case-insensitive substring test. Snippets come back in table
/// order, newline separated; with no match the general fallback sentence is
/// returned on its own.
pub fn select_knowledge(query: &str) -> String {
    let lower_query = query.to_lowercase();

    let matched: Vec<&str> = KNOWLEDGE_GROUPS
        .iter()
        .filter(|group| group.keywords.iter().any(|kw| lower_query.contains(kw)))
        .map(|group| group.text)
        .collect();

    if matched.is_empty() {
        GENERAL_KNOWLEDGE.to_string()
    } else {
        matched.join("\n")
    }
}
