//! 关键词建议模块：校验、限流、缓存与降级回退的编排层。
//!
//! # Keyword Suggestion Module
//!
//! The request-handler-facing surface for NeuroSEO keyword suggestions.
//! Boundary types are explicit and validated before any runtime state is
//! touched; the service layer wires the quota guard, the result cache and
//! the provider pool together and degrades to template suggestions when
//! the gateway fails.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`SuggestionService`] | Orchestration: validate → guard → cache → provider → fallback |
//! | [`SuggestionRequest`] | Validated request shape |
//! | [`SuggestionResponse`] | Response carrying the cache-hit and degraded flags |
//! | [`Suggestion`] / [`SearchIntent`] | One ranked suggestion and its intent class |
//! | [`fallback`] | Deterministic template suggestions for degraded mode |

pub mod fallback;
mod service;
mod types;

pub use service::SuggestionService;
pub use types::{
    SearchIntent, Suggestion, SuggestionRequest, SuggestionResponse, MAX_QUERY_LEN,
    MAX_SUGGESTIONS,
};
