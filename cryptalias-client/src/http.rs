//! reqwest-backed HTTP transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::{debug, instrument};

use cryptalias_core::error::{CryptaliasError, Result};
use cryptalias_core::traits::{HttpFetcher, HttpResponse};

use crate::config::ClientConfig;

/// [`HttpFetcher`] over a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestFetcher {
    http_client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Builds a client with the configured timeout and user agent.
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| CryptaliasError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { http_client })
    }

    /// Wraps an existing client (custom TLS roots, proxies, pooling).
    pub fn from_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    #[instrument(skip(self))]
    async fn get(&self, url: &str, accept: &str) -> Result<HttpResponse> {
        let response = self
            .http_client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|e| CryptaliasError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CryptaliasError::Transport(e.to_string()))?;

        debug!(status, bytes = body.len(), "HTTP response");
        Ok(HttpResponse { status, body })
    }
}
