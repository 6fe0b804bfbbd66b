//! 提供方模块：建议提供方接口、HTTP 驱动与客户端实例池。
//!
//! # Suggestion Providers Module
//!
//! The boundary to the hosted AI gateway. Handlers never construct provider
//! clients directly; they go through [`ProviderPool`], which memoizes
//! constructed handles per model behind the bounded [`InstancePool`].
//! Pooling is invisible to external callers — it only affects latency
//! (warm vs. cold construction) and process memory.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`SuggestionProvider`] | Object-safe async interface to a suggestion backend |
//! | [`HttpSuggestionProvider`] | JSON-over-HTTP driver for the hosted gateway |
//! | [`ProviderPool`] | Bounded pool of shared provider handles |

mod http;

pub use http::HttpSuggestionProvider;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ProviderConfig;
use crate::pool::InstancePool;
use crate::suggest::Suggestion;
use crate::Result;

/// A backend that turns a seed query into keyword suggestions.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Stable identifier for logs and diagnostics.
    fn id(&self) -> &str;

    async fn suggest(&self, query: &str, language: &str, count: u8) -> Result<Vec<Suggestion>>;
}

/// Builds a provider for a model id. Injectable so tests can substitute
/// in-process fakes for the HTTP driver.
pub type ProviderFactory =
    Arc<dyn Fn(&str) -> Result<Arc<dyn SuggestionProvider>> + Send + Sync>;

pub struct ProviderPool {
    instances: InstancePool<String, Arc<dyn SuggestionProvider>>,
    factory: ProviderFactory,
}

impl ProviderPool {
    pub fn new(max_size: usize, cleanup_interval: Duration, factory: ProviderFactory) -> Self {
        Self {
            instances: InstancePool::new(max_size, cleanup_interval),
            factory,
        }
    }

    /// Factory constructing [`HttpSuggestionProvider`] handles from shared
    /// gateway settings, one per model id.
    pub fn http_factory(config: ProviderConfig) -> ProviderFactory {
        Arc::new(move |model: &str| {
            let cfg = config.clone().with_model(model);
            let provider = HttpSuggestionProvider::new(cfg)?;
            Ok(Arc::new(provider) as Arc<dyn SuggestionProvider>)
        })
    }

    /// Return the pooled handle for `model`, constructing it on a miss.
    /// Construction failures propagate and leave nothing cached.
    pub fn acquire(&self, model: &str) -> Result<Arc<dyn SuggestionProvider>> {
        self.instances
            .acquire(model.to_string(), || (self.factory)(model))
    }

    /// Flush every pooled handle; safe for external triggers such as
    /// low-memory signals.
    pub fn cleanup(&self) -> usize {
        self.instances.cleanup()
    }

    /// Interval-gated flush for the shared sweep schedule.
    pub fn maybe_cleanup(&self) -> usize {
        self.instances.maybe_cleanup()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
