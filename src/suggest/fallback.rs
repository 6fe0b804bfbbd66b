//! Template fallback suggestions for degraded mode.
//!
//! When the gateway is unreachable the service answers from these
//! deterministic expansions instead of surfacing the upstream error.
//! Templates are English-only; localized fallbacks are a gateway concern.

use super::types::{SearchIntent, Suggestion};

const TEMPLATES: &[(&str, SearchIntent)] = &[
    ("what is {}", SearchIntent::Informational),
    ("how to improve {}", SearchIntent::Informational),
    ("{} guide", SearchIntent::Informational),
    ("{} checklist", SearchIntent::Informational),
    ("best {} tools", SearchIntent::Commercial),
    ("{} vs alternatives", SearchIntent::Commercial),
    ("{} pricing", SearchIntent::Transactional),
    ("{} software", SearchIntent::Transactional),
    ("{} login", SearchIntent::Navigational),
    ("{} examples", SearchIntent::Informational),
    ("{} for beginners", SearchIntent::Informational),
    ("{} mistakes to avoid", SearchIntent::Informational),
];

/// Produce exactly `count` suggestions derived from the query, ranked by
/// descending relevance.
pub fn generate(query: &str, _language: &str, count: u8) -> Vec<Suggestion> {
    let base = query.trim().to_lowercase();
    let mut suggestions = Vec::with_capacity(count as usize);
    for i in 0..count as usize {
        let (term, intent) = if i < TEMPLATES.len() {
            let (template, intent) = TEMPLATES[i];
            (template.replace("{}", &base), intent)
        } else {
            // Numbered long-tail variants once the template set is exhausted.
            (
                format!("{} ideas {}", base, i - TEMPLATES.len() + 1),
                SearchIntent::Informational,
            )
        };
        let relevance = (0.9 - 0.02 * i as f32).max(0.1);
        suggestions.push(Suggestion {
            term,
            intent,
            relevance,
        });
    }
    suggestions
}
