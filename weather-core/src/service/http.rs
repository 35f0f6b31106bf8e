use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use serde_json::Value;

use crate::{config::Config, error::LookupError};

use super::WeatherLookupService;

/// Looks up weather records over HTTP at `{base_url}/weather/{id}`.
#[derive(Debug, Clone)]
pub struct HttpLookupService {
    base_url: String,
    http: Client,
}

impl HttpLookupService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    /// Build a service from the configured address and timeout.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self::with_client(config.base_url(), http))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The identifier becomes exactly one path segment, whatever it contains.
    pub fn lookup_url(&self, id: &str) -> String {
        format!("{}/weather/{}", self.base_url, urlencoding::encode(id))
    }
}

#[async_trait]
impl WeatherLookupService for HttpLookupService {
    async fn fetch(&self, id: &str) -> Result<Value, LookupError> {
        let url = self.lookup_url(id);
        tracing::debug!(%url, "Sending weather lookup");

        // No body is sent; the header is kept for servers that expect it.
        let res = self
            .http
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| LookupError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = res.status();

        if status.is_success() {
            let body = res.bytes().await.map_err(|source| LookupError::Transport {
                url: url.clone(),
                source,
            })?;

            let parsed: Value = serde_json::from_slice(&body)
                .map_err(|source| LookupError::Decode { url: url.clone(), source })?;

            tracing::debug!(%url, %status, "Weather lookup succeeded");
            return Ok(parsed);
        }

        let body = res.text().await.map_err(|source| LookupError::Transport {
            url: url.clone(),
            source,
        })?;

        tracing::debug!(%url, %status, body = %truncate_body(&body), "Weather lookup rejected");

        Err(LookupError::Rejected {
            url,
            status,
            detail: extract_detail(&body),
        })
    }
}

/// Pull a non-empty string `detail` out of an error body, if there is one.
fn extract_detail(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;

    parsed
        .get("detail")
        .and_then(Value::as_str)
        .filter(|detail| !detail.is_empty())
        .map(str::to_owned)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
