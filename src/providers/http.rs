//! HTTP driver for the hosted suggestion gateway.
//!
//! Wire format: JSON POST to `/v1/keywords/suggest` with bearer auth.
//! Request: `{ model, query, language, count }`. Response:
//! `{ suggestions: [{ term, intent?, relevance? }] }` where `intent`
//! defaults to informational and `relevance` to 0.5 when the gateway
//! omits them.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::SuggestionProvider;
use crate::config::ProviderConfig;
use crate::suggest::{SearchIntent, Suggestion};
use crate::{Error, ErrorContext, Result};

#[derive(Debug)]
pub struct HttpSuggestionProvider {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl HttpSuggestionProvider {
    /// Build a handle bound to credentials. Fails without an API key so a
    /// misconfigured deployment surfaces at acquire time, not mid-request.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "gateway API key is not set",
                    ErrorContext::new()
                        .with_field_path("provider.api_key")
                        .with_source("provider_factory"),
                )
            })?;
        let base = Url::parse(&config.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid gateway base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("provider.base_url")
                    .with_details(config.base_url.clone()),
            )
        })?;
        let endpoint = base.join("/v1/keywords/suggest").map_err(|e| {
            Error::configuration_with_context(
                format!("cannot derive suggest endpoint: {}", e),
                ErrorContext::new().with_field_path("provider.base_url"),
            )
        })?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            endpoint,
            api_key,
            model: config.model,
        })
    }
}

#[async_trait]
impl SuggestionProvider for HttpSuggestionProvider {
    fn id(&self) -> &str {
        &self.model
    }

    async fn suggest(&self, query: &str, language: &str, count: u8) -> Result<Vec<Suggestion>> {
        let body = serde_json::json!({
            "model": self.model,
            "query": query,
            "language": language,
            "count": count,
        });
        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                message,
                retryable: status.as_u16() == 429 || status.is_server_error(),
            });
        }

        let payload: Value = response.json().await?;
        parse_suggestions(&payload)
    }
}

fn parse_suggestions(payload: &Value) -> Result<Vec<Suggestion>> {
    let items = payload
        .get("suggestions")
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            Error::runtime_with_context(
                "gateway payload is missing the suggestions array",
                ErrorContext::new()
                    .with_field_path("suggestions")
                    .with_source("http_provider"),
            )
        })?;

    items
        .iter()
        .map(|item| {
            let term = item
                .get("term")
                .and_then(|v| v.as_str())
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| {
                    Error::runtime_with_context(
                        "suggestion entry is missing a term",
                        ErrorContext::new()
                            .with_field_path("suggestions[].term")
                            .with_source("http_provider"),
                    )
                })?;
            let intent = item
                .get("intent")
                .and_then(|v| v.as_str())
                .map(SearchIntent::parse)
                .unwrap_or(SearchIntent::Informational);
            let relevance = item
                .get("relevance")
                .and_then(|v| v.as_f64())
                .unwrap_or(0.5) as f32;
            Ok(Suggestion {
                term: term.to_string(),
                intent,
                relevance,
            })
        })
        .collect()
}
