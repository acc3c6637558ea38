//! Shared JSON-over-HTTPS plumbing
//!
//! Every service is reached the same way: bearer token, JSON bodies, and a
//! JSON error document on non-2xx responses.

use crate::config::HttpConfig;
use crate::error::{HttpError, Result};
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Authenticated client for one service base URL
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base: Url,
    api_token: String,
}

impl ServiceClient {
    pub fn new(base_url: &str, config: &HttpConfig) -> Result<Self> {
        let base =
            Url::parse(base_url).map_err(|e| HttpError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(HttpError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("opsflow/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base,
            api_token: config.api_token.clone(),
        })
    }

    /// Base URL with `segments` appended, each one percent-encoded
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| HttpError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }

    /// PUT `body`; `None` when the service acknowledges with an empty body
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Option<T>> {
        tracing::debug!("PUT {}", url);
        let bytes = self.send_raw(self.client.put(url).json(body)).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let bytes = self.send_raw(request).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_raw(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>> {
        let response = request.bearer_auth(&self.api_token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Service responded {}: {}", status, body);
            return Err(HttpError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Extract the human readable part of an error document
///
/// Services answer `{"type": "...", "message": ["..."]}`; older ones send a
/// single string. Anything else is passed through as-is.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    match value.get("message") {
        Some(serde_json::Value::String(message)) => message.clone(),
        Some(serde_json::Value::Array(messages)) => messages
            .iter()
            .filter_map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.trim().to_string(),
    }
}
