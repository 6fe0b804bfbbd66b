//! 运行时上下文：进程启动时构造一次，按引用传给每个请求处理器。
//!
//! # Runtime Context Module
//!
//! The composing application owns exactly one [`Runtime`]. It wires the
//! suggestion cache, the provider pool, the shared limiter and the
//! background sweeper together, replacing implicit module-level state with
//! a dependency that is visible at every call site and trivially testable
//! with a fresh instance per test.
//!
//! The structures inside are best-effort: their contents are lost on
//! process shutdown by design.

use std::sync::Arc;

use crate::cache::{CacheStats, ResultCache};
use crate::config::RuntimeConfig;
use crate::limiter::FixedWindowLimiter;
use crate::providers::{ProviderFactory, ProviderPool};
use crate::security::SecurityPolicy;
use crate::suggest::{Suggestion, SuggestionService};
use crate::sweeper::Sweeper;

pub struct Runtime {
    config: RuntimeConfig,
    suggestions: SuggestionService,
    suggestion_cache: Arc<ResultCache<Vec<Suggestion>>>,
    providers: Arc<ProviderPool>,
    limiter: Arc<FixedWindowLimiter>,
    security: Arc<SecurityPolicy>,
    sweeper: Sweeper,
}

impl Runtime {
    /// Build a runtime backed by the HTTP gateway driver.
    pub fn new(config: RuntimeConfig) -> Self {
        let factory = ProviderPool::http_factory(config.provider.clone());
        Self::with_provider_factory(config, factory)
    }

    /// Build a runtime with a custom provider factory. Production hosts use
    /// [`Runtime::new`]; tests substitute in-process fakes here.
    pub fn with_provider_factory(config: RuntimeConfig, factory: ProviderFactory) -> Self {
        let suggestion_cache = Arc::new(ResultCache::new(config.suggestion_ttl));
        let providers = Arc::new(ProviderPool::new(
            config.pool_max_size,
            config.pool_cleanup_interval,
            factory,
        ));
        let limiter = Arc::new(FixedWindowLimiter::new());
        let security = Arc::new(SecurityPolicy::new(
            Arc::clone(&limiter),
            config.quotas.clone(),
            config.default_quota,
        ));
        let suggestions = SuggestionService::new(
            Arc::clone(&suggestion_cache),
            Arc::clone(&providers),
            Arc::clone(&security),
            config.provider.model.clone(),
        );

        let sweeper = Sweeper::new();
        {
            let cache = Arc::clone(&suggestion_cache);
            sweeper.register("suggestion_cache", move || cache.sweep());
        }
        {
            let limiter = Arc::clone(&limiter);
            sweeper.register("rate_windows", move || limiter.cleanup_expired());
        }
        {
            let providers = Arc::clone(&providers);
            sweeper.register("provider_pool", move || providers.maybe_cleanup());
        }

        Self {
            config,
            suggestions,
            suggestion_cache,
            providers,
            limiter,
            security,
            sweeper,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn suggestions(&self) -> &SuggestionService {
        &self.suggestions
    }

    pub fn security(&self) -> &SecurityPolicy {
        &self.security
    }

    pub fn providers(&self) -> &ProviderPool {
        &self.providers
    }

    pub fn limiter(&self) -> &FixedWindowLimiter {
        &self.limiter
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.suggestion_cache.stats()
    }

    /// Run all registered sweeps synchronously; for tests and manual
    /// maintenance triggers.
    pub fn sweep_now(&self) -> usize {
        self.sweeper.run_once()
    }

    /// Start the shared background sweeper. Must be called from within a
    /// tokio runtime.
    pub fn start_background(&self) {
        self.sweeper.spawn(self.config.sweep_interval);
    }

    /// Stop all background work.
    pub async fn shutdown(&self) {
        self.sweeper.shutdown().await;
    }
}
