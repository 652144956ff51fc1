use std::time::Duration;

use async_trait::async_trait;

use crate::error::AuthError;

/// Injected HTTP collaborator: raw status and body, no protocol knowledge.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, body: &[u8]) -> Result<(u16, Vec<u8>), AuthError>;
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<(u16, Vec<u8>), AuthError>;
}

/// Reqwest-backed transport with JSON headers and a request timeout.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Builds a transport with the given request timeout.
    ///
    /// The timeout must cover the provider's long-poll window, so it is
    /// padded beyond the configured session timeout by the caller.
    pub fn new(timeout: Duration) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(Self { http })
    }

    /// Wraps an externally configured client, e.g. one carrying a pinned
    /// TLS trust context. The client is consumed as-is.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, body: &[u8]) -> Result<(u16, Vec<u8>), AuthError> {
        let response = self
            .http
            .post(url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .body(body.to_vec())
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok((status, bytes.to_vec()))
    }

    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<(u16, Vec<u8>), AuthError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok((status, bytes.to_vec()))
    }
}
