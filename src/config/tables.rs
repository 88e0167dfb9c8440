//! Static lookup tables for the malunggay assistant.
//!
//! Everything here is read-only data: keyword groups for knowledge selection,
//! the topic gate's allow and deny lists, and the per-language text blocks.
//! Regexes are compiled once on first use.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::chat::Language;

/// A canned fact attached to the prompt when any of its keywords appears in the query.
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeGroup {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub text: &'static str,
}

/// Declaration order is the order snippets are emitted in.
pub static KNOWLEDGE_GROUPS: &[KnowledgeGroup] = &[
    KnowledgeGroup {
        name: "planting",
        keywords: &["plant", "grow", "tanim", "itanim", "seedling", "cutting"],
        text: "PLANTING: Cut 12-18 inch branch, plant at 45° angle, 6 inches deep. Water daily first week. Roots in 7-14 days.",
    },
    KnowledgeGroup {
        name: "harvesting",
        keywords: &["harvest", "ani", "pag-aani", "pick", "putas"],
        text: "HARVEST: Early morning 6-8 AM. When 1.5-2m tall. Every 2-4 weeks. Max 30% at once.",
    },
    KnowledgeGroup {
        name: "disease",
        keywords: &["disease", "yellow", "sakit", "dilaw", "sick", "problem"],
        text: "YELLOW LEAVES: Usually overwatering or nitrogen deficiency. Check soil moisture first.",
    },
    KnowledgeGroup {
        name: "pricing",
        keywords: &["price", "presyo", "sell", "bentahan", "cost", "magkano"],
        text: "PRICES: Fresh leaves ₱50-80/bundle, Powder ₱120-200/100g, Capsules ₱250-400.",
    },
    KnowledgeGroup {
        name: "nutrition",
        keywords: &["nutrition", "vitamin", "benefit", "benepisyo", "healthy", "good for"],
        text: "NUTRITION per 100g: Vit A 6,780μg, Vit C 51.7mg, Iron 4mg, Protein 9.4g. Boosts immunity, prevents anemia.",
    },
    KnowledgeGroup {
        name: "watering",
        keywords: &["water", "tubig", "dilig", "irrigat"],
        text: "WATERING: Young plants every 2-3 days. Mature plants 1-2x per week. Drought tolerant. Better to underwater.",
    },
    KnowledgeGroup {
        name: "fertilizing",
        keywords: &["fertilizer", "pataba", "compost", "manure", "abono"],
        text: "FERTILIZER: Organic compost every 4-6 weeks (2-3kg/tree). Chicken manure every 2-3 months. 14-14-14 every 2 months (50-100g).",
    },
    KnowledgeGroup {
        name: "pests",
        keywords: &["pest", "insect", "kulisap", "bug", "aphid", "caterpillar"],
        text: "PESTS: Aphids - spray neem oil. Caterpillars - hand pick or Bt pesticide. Inspect weekly.",
    },
    KnowledgeGroup {
        name: "recipes",
        keywords: &["recipe", "cook", "luto", "lutuin", "eat", "food", "tinola"],
        text: "RECIPES: Add leaves last 2 min in tinola. Sauté with eggs and garlic. Blend in smoothies. Mix powder in pandesal.",
    },
];

pub const GENERAL_KNOWLEDGE: &str =
    "General malunggay (moringa) cultivation and usage information for the Philippines.";

/// Greetings, thanks, acknowledgements and continuation cues.
/// Matched as whole words or phrases.
pub static CONVERSATIONAL_TOKENS: &[&str] = &[
    "hello", "hi", "hey", "kumusta", "kamusta", "good morning", "good afternoon",
    "good evening", "magandang", "thank", "thanks", "salamat", "bye", "goodbye", "paalam",
    "ok", "okay", "sure", "nice", "great", "wow", "cool", "ayos", "sige",
    "oo", "yes", "no", "yep", "nope", "got it", "i see", "understood",
    "tell me more", "continue", "go on", "next", "what else", "ano pa",
];

/// Malunggay synonyms plus plant-care, commerce and health terms.
/// Matched as substrings so stems like "irrigat" cover their inflections.
pub static DOMAIN_KEYWORDS: &[&str] = &[
    "malunggay", "moringa", "moringga", "kamunggay",
    "dahon", "leaves", "leaf", "tanim", "plant", "grow", "harvest", "ani",
    "seedling", "cutting", "supling", "dilig", "water", "pataba", "fertilizer",
    "compost", "kulisap", "pest", "insect", "aphid", "disease", "sakit",
    "yellow", "dilaw", "nutrition", "vitamin", "benefit", "benepisyo",
    "presyo", "price", "sell", "bentahan", "recipe", "cook", "luto", "tinola",
    "seed", "buto", "pods", "powder", "capsule", "supplement", "tea",
    "soil", "lupa", "prune", "mulch", "organic", "negosyo", "palengke",
    "kalusugan", "anemia", "superfood", "pandesal", "smoothie",
];

/// Politics, celebrities, geography, consumer tech, entertainment, math and identity questions.
pub static OFF_TOPIC_PATTERNS: &[&str] = &[
    r"\bpresident\b", r"\bpolitics\b", r"\belection\b", r"\bgovernment\b",
    r"\bcelebrity\b", r"\bactor\b", r"\bsinger\b", r"\bnews\b",
    r"\bcapital city\b", r"\bcountry\b", r"what is (the )?(philippines|usa|japan)",
    r"\bworld war\b", r"\bhistory of\b",
    r"\bphone\b", r"\blaptop\b", r"\bcomputer\b", r"\bgame\b", r"\bmovie\b",
    r"\bmusic\b", r"\bsocial media\b", r"\bfacebook\b", r"\btiktok\b",
    r"\bmath\b", r"\bequation\b", r"\bcalculate\b", r"\bformula\b",
    r"who (am|are|is) (i|you|we|they)\b",
    r"what (am|are|is) (i|you|we|they)\b",
];

lazy_static! {
    pub static ref CONVERSATIONAL_REGEX: Regex = {
        let alternatives = CONVERSATIONAL_TOKENS
            .iter()
            .map(|token| regex::escape(token))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"\b(?:{})\b", alternatives))
            .expect("conversational token table must compile")
    };

    pub static ref OFF_TOPIC_REGEXES: Vec<Regex> = OFF_TOPIC_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).expect("off-topic pattern table must compile"))
        .collect();
}

/// Sent verbatim when the topic gate blocks a message.
pub fn off_topic_response(language: Language) -> &'static str {
    match language {
        Language::Tagalog =>
            "Pasensya na! Ang aking kaalaman ay nakatuon lamang sa malunggay (moringa). Hindi ako makatulong sa paksang iyon. Maaari mo ba akong tanungin tungkol sa pagtatanim, pag-aani, kalusugan, o pagbebenta ng malunggay? 🌿",
        Language::English =>
            "Sorry! I'm only designed to answer questions about malunggay (moringa). That topic is outside my expertise. Feel free to ask me about planting, harvesting, health benefits, or selling malunggay! 🌿",
        Language::Taglish =>
            "Sorry! I'm only designed to answer questions about malunggay (moringa). Hindi ko ma-assist ang topic na iyon. Ask me about planting, harvesting, health benefits, o presyo ng malunggay! 🌿",
    }
}

pub fn language_instruction(language: Language) -> &'static str {
    match language {
        Language::English =>
            "- Respond ONLY in English\n\
             - Be clear and professional but friendly\n\
             - Use simple terms a farmer can understand",
        Language::Tagalog =>
            "- Respond ONLY in Filipino/Tagalog\n\
             - Gamitin ang natural na Tagalog na madaling maintindihan ng mga magsasaka\n\
             - Iwasan ang sobrang formal na Tagalog",
        Language::Taglish =>
            "- Respond in Taglish (natural mix of Tagalog and English, the way Filipinos naturally speak)\n\
             - Example: \"Para sa planting, kailangan mo ng 12-18 inch na cutting...\"",
    }
}
