//! Suggestion service orchestration.

use std::sync::Arc;

use super::fallback;
use super::types::{Suggestion, SuggestionRequest, SuggestionResponse};
use crate::cache::{CacheKeyGenerator, CacheStats, ResultCache};
use crate::providers::ProviderPool;
use crate::security::{ops, SecurityPolicy};
use crate::Result;

/// Handler-facing entry point for keyword suggestions.
///
/// Request flow: validate → quota guard → cache lookup → provider call →
/// template fallback on provider failure → store + sweep. Identical
/// repeated input within the TTL window is answered from the cache and
/// flagged `cache_hit` in the response.
pub struct SuggestionService {
    cache: Arc<ResultCache<Vec<Suggestion>>>,
    providers: Arc<ProviderPool>,
    security: Arc<SecurityPolicy>,
    keys: CacheKeyGenerator,
    default_model: String,
}

impl SuggestionService {
    pub fn new(
        cache: Arc<ResultCache<Vec<Suggestion>>>,
        providers: Arc<ProviderPool>,
        security: Arc<SecurityPolicy>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            providers,
            security,
            keys: CacheKeyGenerator::new(),
            default_model: default_model.into(),
        }
    }

    pub async fn suggest(&self, request: SuggestionRequest) -> Result<SuggestionResponse> {
        request.validate()?;
        self.security
            .enforce(&request.subject, ops::KEYWORD_SUGGEST)?;

        let key = self
            .keys
            .generate(&request.query, &request.language, request.count);
        if let Some(suggestions) = self.cache.get(&key) {
            tracing::debug!(key = %key, "suggestion cache hit");
            return Ok(SuggestionResponse {
                request_id: new_request_id(),
                suggestions,
                cache_hit: true,
                degraded: false,
            });
        }
        tracing::debug!(key = %key, "suggestion cache miss");

        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());
        let (suggestions, degraded) = match self.fetch(&model, &request).await {
            Ok(suggestions) => (suggestions, false),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    model = %model,
                    query = %request.query,
                    "provider failed, serving template fallback"
                );
                (
                    fallback::generate(&request.query, &request.language, request.count),
                    true,
                )
            }
        };

        // Degraded sets are cached too; that keeps a failing upstream from
        // being hammered inside the TTL window.
        self.cache.put(key, suggestions.clone());
        self.cache.sweep();

        Ok(SuggestionResponse {
            request_id: new_request_id(),
            suggestions,
            cache_hit: false,
            degraded,
        })
    }

    async fn fetch(&self, model: &str, request: &SuggestionRequest) -> Result<Vec<Suggestion>> {
        let provider = self.providers.acquire(model)?;
        provider
            .suggest(&request.query, &request.language, request.count)
            .await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
