//! HTTP client for the AMap Web Service API.
//!
//! Wraps `reqwest` with base-URL handling, API key management, and
//! context-carrying transport errors. Provider-level status checks live in
//! [`crate::normalize`]; this layer only guarantees a 2xx JSON body.

use std::time::Duration;

use reqwest::{Client, Url};
use routecalc_core::AppConfig;

use crate::error::AmapError;

/// Client for the AMap Web Service API.
///
/// Use [`AmapClient::from_config`] for production or
/// [`AmapClient::with_base_url`] to point at a mock server in tests.
pub struct AmapClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl AmapClient {
    /// Creates a client from loaded application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`AmapClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, AmapError> {
        Self::with_base_url(
            &config.amap_api_key,
            &config.user_agent,
            config.request_timeout_secs,
            &config.amap_base_url,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`AmapError::ClientBuild`] if the `reqwest::Client` cannot be
    /// constructed, or [`AmapError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        user_agent: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, AmapError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder.build().map_err(AmapError::ClientBuild)?;

        // Exactly one trailing slash so relative endpoint paths join under any
        // path prefix instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| AmapError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
        })
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Builds an endpoint URL with percent-encoded query parameters appended
    /// in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`AmapError::InvalidBaseUrl`] if `path` cannot be joined onto
    /// the base URL.
    pub(crate) fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, AmapError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AmapError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx status, and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// - [`AmapError::Transport`] on network failure.
    /// - [`AmapError::UnexpectedStatus`] on a non-2xx status.
    /// - [`AmapError::Deserialize`] if the body is not valid JSON.
    pub(crate) async fn get_json(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<serde_json::Value, AmapError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| AmapError::Transport {
                context: context.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AmapError::UnexpectedStatus {
                status: status.as_u16(),
                context: context.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| AmapError::Transport {
                context: context.to_string(),
                source,
            })?;
        serde_json::from_str(&body).map_err(|source| AmapError::Deserialize {
            context: context.to_string(),
            source,
        })
    }
}

/// Renders `url` with the `key` parameter masked, for logs and errors.
#[must_use]
pub fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "***".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
