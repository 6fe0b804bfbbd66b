//! Runtime configuration.
//!
//! Call sites supply constants through [`RuntimeConfig`]; deployments can
//! override them with `RANKPILOT_*` environment variables.

use std::collections::HashMap;
use std::time::Duration;

use crate::limiter::RateQuota;
use crate::security::ops;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Lifetime of cached suggestion sets.
    pub suggestion_ttl: Duration,
    /// Ceiling on live provider instances.
    pub pool_max_size: usize,
    /// Wall-clock flush cadence for the provider pool.
    pub pool_cleanup_interval: Duration,
    /// Cadence of the shared background sweeper.
    pub sweep_interval: Duration,
    /// AI gateway connection settings.
    pub provider: ProviderConfig,
    /// Per-operation quota table.
    pub quotas: HashMap<String, RateQuota>,
    /// Quota applied to operations missing from the table.
    pub default_quota: RateQuota,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let mut quotas = HashMap::new();
        quotas.insert(ops::KEYWORD_SUGGEST.to_string(), RateQuota::per_minute(30));
        quotas.insert(ops::CONTENT_ANALYZE.to_string(), RateQuota::per_minute(10));
        quotas.insert(
            ops::SITE_AUDIT.to_string(),
            RateQuota::new(5, Duration::from_secs(300)),
        );
        Self {
            suggestion_ttl: Duration::from_secs(3600),
            pool_max_size: 8,
            pool_cleanup_interval: Duration::from_secs(600),
            sweep_interval: Duration::from_secs(60),
            provider: ProviderConfig::default(),
            quotas,
            default_quota: RateQuota::per_minute(60),
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus environment overrides:
    /// - `RANKPILOT_SUGGEST_TTL_SECS`
    /// - `RANKPILOT_POOL_MAX_SIZE`
    /// - `RANKPILOT_POOL_CLEANUP_SECS`
    /// - `RANKPILOT_SWEEP_INTERVAL_SECS`
    ///
    /// plus the `RANKPILOT_AI_*` overrides of [`ProviderConfig::from_env`].
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(secs) = env_u64("RANKPILOT_SUGGEST_TTL_SECS") {
            cfg.suggestion_ttl = Duration::from_secs(secs.max(1));
        }
        if let Some(n) = env_u64("RANKPILOT_POOL_MAX_SIZE") {
            cfg.pool_max_size = (n as usize).max(1);
        }
        if let Some(secs) = env_u64("RANKPILOT_POOL_CLEANUP_SECS") {
            cfg.pool_cleanup_interval = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = env_u64("RANKPILOT_SWEEP_INTERVAL_SECS") {
            cfg.sweep_interval = Duration::from_secs(secs.max(1));
        }
        cfg.provider = ProviderConfig::from_env();
        cfg
    }

    pub fn with_suggestion_ttl(mut self, ttl: Duration) -> Self {
        self.suggestion_ttl = ttl;
        self
    }

    pub fn with_pool_max_size(mut self, max: usize) -> Self {
        self.pool_max_size = max.max(1);
        self
    }

    pub fn with_pool_cleanup_interval(mut self, interval: Duration) -> Self {
        self.pool_cleanup_interval = interval;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_quota(mut self, operation: impl Into<String>, quota: RateQuota) -> Self {
        self.quotas.insert(operation.into(), quota);
        self
    }

    pub fn with_default_quota(mut self, quota: RateQuota) -> Self {
        self.default_quota = quota;
        self
    }
}

/// Connection settings for the hosted suggestion gateway.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Required for live construction; providers refuse to build without it.
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ai.rankpilot.app".to_string(),
            api_key: None,
            model: "neuroseo-keywords-v2".to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus `RANKPILOT_AI_BASE_URL`, `RANKPILOT_AI_API_KEY`,
    /// `RANKPILOT_AI_MODEL`, `RANKPILOT_AI_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(url) = std::env::var("RANKPILOT_AI_BASE_URL") {
            if !url.trim().is_empty() {
                cfg.base_url = url;
            }
        }
        if let Ok(key) = std::env::var("RANKPILOT_AI_API_KEY") {
            if !key.trim().is_empty() {
                cfg.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("RANKPILOT_AI_MODEL") {
            if !model.trim().is_empty() {
                cfg.model = model;
            }
        }
        if let Some(ms) = env_u64("RANKPILOT_AI_TIMEOUT_MS") {
            cfg.timeout = Duration::from_millis(ms.max(1));
        }
        cfg
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|s| s.parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_quota_table() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.quotas[ops::KEYWORD_SUGGEST].max_requests, 30);
        assert_eq!(cfg.quotas[ops::SITE_AUDIT].window, Duration::from_secs(300));
        assert_eq!(cfg.default_quota.max_requests, 60);
    }

    #[test]
    fn test_builders() {
        let cfg = RuntimeConfig::new()
            .with_suggestion_ttl(Duration::from_secs(10))
            .with_pool_max_size(0)
            .with_quota("export_report", RateQuota::per_minute(5));
        assert_eq!(cfg.suggestion_ttl, Duration::from_secs(10));
        // Floor of one keeps the pool usable.
        assert_eq!(cfg.pool_max_size, 1);
        assert_eq!(cfg.quotas["export_report"].max_requests, 5);
    }

    #[test]
    fn test_provider_builder() {
        let provider = ProviderConfig::new()
            .with_base_url("http://localhost:9000")
            .with_api_key("test-key")
            .with_model("neuroseo-keywords-dev");
        assert_eq!(provider.base_url, "http://localhost:9000");
        assert_eq!(provider.api_key.as_deref(), Some("test-key"));
        assert_eq!(provider.model, "neuroseo-keywords-dev");
    }
}
