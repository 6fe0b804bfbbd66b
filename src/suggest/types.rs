//! Boundary types for the suggestion surface.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, ErrorContext, Result};

/// Upper bound on query length, in characters after trimming.
pub const MAX_QUERY_LEN: usize = 200;
/// Upper bound on suggestions per request.
pub const MAX_SUGGESTIONS: u8 = 50;

// `en` or `en-US` style tags; full BCP-47 is a gateway concern.
static LANGUAGE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRequest {
    /// Authenticated caller identity, used for quota accounting.
    pub subject: String,
    pub query: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_count")]
    pub count: u8,
    /// Model override; the configured default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_count() -> u8 {
    10
}

impl SuggestionRequest {
    pub fn new(subject: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            query: query.into(),
            language: default_language(),
            count: default_count(),
            model: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_count(mut self, count: u8) -> Self {
        self.count = count;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Validate at the boundary, before any runtime state is touched.
    pub fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() {
            return Err(Error::validation_with_context(
                "subject must not be empty",
                ErrorContext::new()
                    .with_field_path("request.subject")
                    .with_source("request_validator"),
            ));
        }
        let query = self.query.trim();
        if query.is_empty() {
            return Err(Error::validation_with_context(
                "query must not be empty",
                ErrorContext::new()
                    .with_field_path("request.query")
                    .with_source("request_validator"),
            ));
        }
        if query.chars().count() > MAX_QUERY_LEN {
            return Err(Error::validation_with_context(
                format!("query exceeds {} characters", MAX_QUERY_LEN),
                ErrorContext::new()
                    .with_field_path("request.query")
                    .with_details(format!("length: {}", query.chars().count()))
                    .with_source("request_validator"),
            ));
        }
        if !LANGUAGE_TAG.is_match(&self.language) {
            return Err(Error::validation_with_context(
                "language must be a tag like 'en' or 'en-US'",
                ErrorContext::new()
                    .with_field_path("request.language")
                    .with_details(self.language.clone())
                    .with_source("request_validator"),
            ));
        }
        if self.count == 0 || self.count > MAX_SUGGESTIONS {
            return Err(Error::validation_with_context(
                format!("count must be between 1 and {}", MAX_SUGGESTIONS),
                ErrorContext::new()
                    .with_field_path("request.count")
                    .with_details(self.count.to_string())
                    .with_source("request_validator"),
            ));
        }
        Ok(())
    }
}

/// Search intent class attached to each suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchIntent {
    Informational,
    Navigational,
    Transactional,
    Commercial,
}

impl SearchIntent {
    /// Lenient mapping from gateway strings; unknown values land on
    /// informational rather than failing the whole response.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "navigational" => SearchIntent::Navigational,
            "transactional" => SearchIntent::Transactional,
            "commercial" => SearchIntent::Commercial,
            _ => SearchIntent::Informational,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub term: String,
    pub intent: SearchIntent,
    pub relevance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub request_id: String,
    pub suggestions: Vec<Suggestion>,
    /// True when the set was served from the in-process cache.
    pub cache_hit: bool,
    /// True when the set came from the template fallback instead of the
    /// gateway.
    #[serde(default, skip_serializing_if = "is_false")]
    pub degraded: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}
