//! HTTP transport over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use connector_protocols::{
    CurrentUrlPayload, IdentityPayload, ServerCandidate, Transport, TransportError,
};

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;

/// Identity path probed during the handshake.
const IDENTITY_PATH: &str = "/.identity";

/// Path for current-URL delivery.
const CURRENT_URL_PATH: &str = "/current-url";

/// Production [`Transport`] over HTTP.
///
/// The client carries no global timeout; every request is bounded by the
/// caller-supplied timeout.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a shared client.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("browser-connector/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        Ok(Self { client })
    }

    fn classify(err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_decode() {
            TransportError::InvalidBody(err.to_string())
        } else {
            TransportError::Connect(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_identity(
        &self,
        candidate: &ServerCandidate,
        timeout: Duration,
    ) -> Result<IdentityPayload, TransportError> {
        let url = format!("{}{}", candidate.base_url(), IDENTITY_PATH);
        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<IdentityPayload>()
            .await
            .map_err(Self::classify)
    }

    async fn post_current_url(
        &self,
        candidate: &ServerCandidate,
        payload: &CurrentUrlPayload,
        timeout: Duration,
    ) -> Result<(), TransportError> {
        let url = format!("{}{}", candidate.base_url(), CURRENT_URL_PATH);
        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(payload)
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(())
    }
}
