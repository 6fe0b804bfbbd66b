//! End-to-end scenarios for the suggestion service: caching, quota
//! enforcement and degraded fallback, each against a fresh runtime.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rankpilot_runtime::providers::{ProviderFactory, SuggestionProvider};
use rankpilot_runtime::security::ops;
use rankpilot_runtime::{
    Error, RateQuota, Result, Runtime, RuntimeConfig, SearchIntent, Suggestion, SuggestionRequest,
};

struct CountingProvider {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl SuggestionProvider for CountingProvider {
    fn id(&self) -> &str {
        "counting"
    }

    async fn suggest(&self, query: &str, _language: &str, count: u8) -> Result<Vec<Suggestion>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((0..count)
            .map(|i| Suggestion {
                term: format!("{} variant {}", query, i),
                intent: SearchIntent::Informational,
                relevance: 0.9 - i as f32 * 0.01,
            })
            .collect())
    }
}

struct FailingProvider;

#[async_trait]
impl SuggestionProvider for FailingProvider {
    fn id(&self) -> &str {
        "failing"
    }

    async fn suggest(&self, _query: &str, _language: &str, _count: u8) -> Result<Vec<Suggestion>> {
        Err(Error::Upstream {
            status: 503,
            message: "gateway overloaded".into(),
            retryable: true,
        })
    }
}

fn counting_factory(calls: Arc<AtomicUsize>) -> ProviderFactory {
    Arc::new(move |_model| {
        Ok(Arc::new(CountingProvider {
            calls: Arc::clone(&calls),
        }) as Arc<dyn SuggestionProvider>)
    })
}

fn failing_factory() -> ProviderFactory {
    Arc::new(|_model| Ok(Arc::new(FailingProvider) as Arc<dyn SuggestionProvider>))
}

#[tokio::test]
async fn repeated_query_is_served_from_cache() {
    let calls = Arc::new(AtomicUsize::new(0));
    let runtime = Runtime::with_provider_factory(
        RuntimeConfig::default(),
        counting_factory(Arc::clone(&calls)),
    );

    let first = runtime
        .suggestions()
        .suggest(SuggestionRequest::new("user-1", "seo tips"))
        .await
        .unwrap();
    assert!(!first.cache_hit);
    assert_eq!(first.suggestions.len(), 10);

    let second = runtime
        .suggestions()
        .suggest(SuggestionRequest::new("user-1", "seo tips"))
        .await
        .unwrap();
    assert!(second.cache_hit);
    assert_eq!(second.suggestions, first.suggestions);
    assert_ne!(second.request_id, first.request_id);

    // The gateway was consulted exactly once.
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let stats = runtime.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn normalized_queries_share_an_entry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let runtime = Runtime::with_provider_factory(
        RuntimeConfig::default(),
        counting_factory(Arc::clone(&calls)),
    );

    runtime
        .suggestions()
        .suggest(SuggestionRequest::new("user-1", "Link Building"))
        .await
        .unwrap();
    let second = runtime
        .suggestions()
        .suggest(SuggestionRequest::new("user-1", "  link building "))
        .await
        .unwrap();
    assert!(second.cache_hit);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn burst_above_quota_is_rejected_in_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let config = RuntimeConfig::default()
        .with_quota(ops::KEYWORD_SUGGEST, RateQuota::new(5, Duration::from_secs(60)));
    let runtime = Runtime::with_provider_factory(config, counting_factory(Arc::clone(&calls)));

    let mut outcomes = Vec::new();
    for i in 0..6 {
        let request = SuggestionRequest::new("user-1", format!("query {}", i));
        outcomes.push(runtime.suggestions().suggest(request).await);
    }

    assert!(outcomes[..5].iter().all(|r| r.is_ok()));
    let err = outcomes[5].as_ref().unwrap_err();
    assert!(err.is_rate_limited());
    assert!(err.retry_after().unwrap() <= Duration::from_secs(60));
}

#[tokio::test]
async fn other_subjects_are_unaffected_by_a_burst() {
    let config = RuntimeConfig::default()
        .with_quota(ops::KEYWORD_SUGGEST, RateQuota::new(1, Duration::from_secs(60)));
    let runtime =
        Runtime::with_provider_factory(config, counting_factory(Arc::new(AtomicUsize::new(0))));

    runtime
        .suggestions()
        .suggest(SuggestionRequest::new("user-1", "seo"))
        .await
        .unwrap();
    assert!(runtime
        .suggestions()
        .suggest(SuggestionRequest::new("user-1", "seo"))
        .await
        .is_err());
    assert!(runtime
        .suggestions()
        .suggest(SuggestionRequest::new("user-2", "seo"))
        .await
        .is_ok());
}

#[tokio::test]
async fn provider_failure_degrades_to_templates() {
    let runtime = Runtime::with_provider_factory(RuntimeConfig::default(), failing_factory());

    let response = runtime
        .suggestions()
        .suggest(SuggestionRequest::new("user-1", "seo tips").with_count(8))
        .await
        .unwrap();
    assert!(response.degraded);
    assert!(!response.cache_hit);
    assert_eq!(response.suggestions.len(), 8);
    assert!(response.suggestions.iter().all(|s| s.term.contains("seo tips")));

    // The degraded set was cached; the retry is a hit and no longer
    // reports degradation.
    let second = runtime
        .suggestions()
        .suggest(SuggestionRequest::new("user-1", "seo tips").with_count(8))
        .await
        .unwrap();
    assert!(second.cache_hit);
    assert!(!second.degraded);
    assert_eq!(second.suggestions, response.suggestions);
}

#[tokio::test]
async fn factory_failure_also_degrades() {
    let factory: ProviderFactory = Arc::new(|_model| {
        Err(Error::configuration_with_context(
            "gateway API key is not set",
            rankpilot_runtime::ErrorContext::new().with_field_path("provider.api_key"),
        ))
    });
    let runtime = Runtime::with_provider_factory(RuntimeConfig::default(), factory);

    let response = runtime
        .suggestions()
        .suggest(SuggestionRequest::new("user-1", "seo tips"))
        .await
        .unwrap();
    assert!(response.degraded);
    assert_eq!(response.suggestions.len(), 10);
    assert!(runtime.providers().is_empty());
}

#[tokio::test]
async fn invalid_request_is_rejected_before_any_state_changes() {
    let calls = Arc::new(AtomicUsize::new(0));
    let runtime = Runtime::with_provider_factory(
        RuntimeConfig::default(),
        counting_factory(Arc::clone(&calls)),
    );

    let err = runtime
        .suggestions()
        .suggest(SuggestionRequest::new("user-1", "seo").with_count(0))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(runtime.limiter().tracked_windows(), 0);
    assert_eq!(runtime.cache_stats().misses, 0);
}

#[tokio::test]
async fn model_override_routes_to_a_distinct_pool_entry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let runtime = Runtime::with_provider_factory(
        RuntimeConfig::default(),
        counting_factory(Arc::clone(&calls)),
    );

    runtime
        .suggestions()
        .suggest(SuggestionRequest::new("user-1", "seo"))
        .await
        .unwrap();
    runtime
        .suggestions()
        .suggest(SuggestionRequest::new("user-1", "serp").with_model("neuroseo-keywords-beta"))
        .await
        .unwrap();
    assert_eq!(runtime.providers().len(), 2);
}
