//! HTTP transport for SOAP calls.

use crate::config::ClientConfig;
use crate::error::{Result, SoapClientError};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};

/// Content type for SOAP 1.1 requests.
pub const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Raw HTTP response from the service.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends a SOAP envelope and returns the raw reply.
///
/// Implementations must be safe to share across concurrent calls.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, endpoint: &str, soap_action: &str, body: String)
        -> Result<TransportResponse>;
}

/// Transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                SoapClientError::InvalidConfiguration(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Wrap an existing client, sharing its connection pool.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        endpoint: &str,
        soap_action: &str,
        body: String,
    ) -> Result<TransportResponse> {
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static(SOAP_CONTENT_TYPE))
            .header("SOAPAction", soap_action)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse { status, body })
    }
}
