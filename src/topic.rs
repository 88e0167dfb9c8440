//! Loose topic gate. Only clearly unrelated messages are blocked; everything
//! else reaches the model, whose system prompt does the real topic policing.

use crate::config::tables::{
    CONVERSATIONAL_REGEX,
    DOMAIN_KEYWORDS,
    OFF_TOPIC_PATTERNS,
    OFF_TOPIC_REGEXES,
};

/// Messages with this many words or fewer are assumed to be follow-ups.
pub const SHORT_MESSAGE_WORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    Conversational,
    ShortFollowUp,
    DomainKeyword,
    NoDenyMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicVerdict {
    Allowed(AllowReason),
    Blocked {
        pattern: &'static str,
    },
}

/// Rules are checked top to bottom and the first hit decides.
pub fn classify(query: &str) -> TopicVerdict {
    let lower_query = query.to_lowercase();

    if CONVERSATIONAL_REGEX.is_match(&lower_query) {
        return TopicVerdict::Allowed(AllowReason::Conversational);
    }

    if lower_query.split_whitespace().count() <= SHORT_MESSAGE_WORDS {
        return TopicVerdict::Allowed(AllowReason::ShortFollowUp);
    }

    if DOMAIN_KEYWORDS.iter().any(|kw| lower_query.contains(kw)) {
        return TopicVerdict::Allowed(AllowReason::DomainKeyword);
    }

    OFF_TOPIC_REGEXES
        .iter()
        .zip(OFF_TOPIC_PATTERNS.iter())
        .find(|(re, _)| re.is_match(&lower_query))
        .map(|(_, pattern)| TopicVerdict::Blocked { pattern: *pattern })
        .unwrap_or(TopicVerdict::Allowed(AllowReason::NoDenyMatch))
}
