//! # rankpilot-runtime
//!
//! RankPilot 函数层的共享运行时状态管理：建议缓存、AI 客户端实例池与请求限流。
//!
//! Shared runtime-state management for RankPilot's serverless functions
//! layer. Each deployed function instance owns one [`Runtime`] holding the
//! in-process structures that sit between request handlers and the hosted
//! AI gateway: an expiring suggestion cache, a bounded pool of provider
//! clients, and a fixed-window request limiter.
//!
//! ## Core Philosophy
//!
//! - **Explicit ownership**: no module-level globals. The [`Runtime`] context
//!   is constructed once at process start and passed by reference to every
//!   handler, so tests get a fresh instance per case.
//! - **Best-effort state**: caches, pools and rate windows are performance
//!   optimizations, not sources of truth. Losing them on restart is expected.
//! - **Single critical sections**: every check-then-act sequence completes
//!   under one lock guard with no await point inside, so two requests can
//!   never interleave between a read and its dependent write.
//! - **Degrade, don't fail**: when the AI gateway is unreachable the
//!   suggestion service answers from deterministic templates instead of
//!   surfacing the upstream error.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rankpilot_runtime::{Runtime, RuntimeConfig, SuggestionRequest};
//!
//! #[tokio::main]
//! async fn main() -> rankpilot_runtime::Result<()> {
//!     let runtime = Runtime::new(RuntimeConfig::from_env());
//!     runtime.start_background();
//!
//!     let request = SuggestionRequest::new("user-123", "seo tips");
//!     let response = runtime.suggestions().suggest(request).await?;
//!     println!("{} suggestions (cache hit: {})",
//!         response.suggestions.len(), response.cache_hit);
//!
//!     runtime.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Expiring key-value store, cache keys, typed result cache |
//! | [`pool`] | Bounded instance pool with reset-on-pressure eviction |
//! | [`limiter`] | Fixed-window request limiter |
//! | [`security`] | Per-operation quota policy over the shared limiter |
//! | [`providers`] | Suggestion provider trait, HTTP driver and client pool |
//! | [`suggest`] | Keyword suggestion service and boundary types |
//! | [`sweeper`] | Shared background sweep scheduler |
//! | [`runtime`] | The composing runtime context |
//! | [`config`] | Runtime configuration and environment overrides |

pub mod cache;
pub mod config;
pub mod limiter;
pub mod logging;
pub mod pool;
pub mod providers;
pub mod runtime;
pub mod security;
pub mod suggest;
pub mod sweeper;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};

// Re-export main types for convenience
pub use config::{ProviderConfig, RuntimeConfig};
pub use limiter::{Decision, FixedWindowLimiter, RateQuota};
pub use runtime::Runtime;
pub use suggest::{
    SearchIntent, Suggestion, SuggestionRequest, SuggestionResponse, SuggestionService,
};
