//! IDMatrix SOAP client.
//!
//! Builds the envelope, posts it through a [`Transport`], and decodes the
//! reply. Every call is independent; nothing is retried.

use crate::config::ClientConfig;
use crate::decoder::decode_response;
use crate::envelope::build_envelope;
use crate::error::{Result, SoapClientError};
use crate::model::{IdMatrixRequest, IdMatrixResponse};
use crate::transport::{HttpTransport, Transport};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

/// Client for the IDMatrix verification service.
#[derive(Clone)]
pub struct IdMatrixClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl IdMatrixClient {
    /// Create a client using the HTTP transport.
    ///
    /// Fails with `InvalidConfiguration` before any network activity when
    /// credentials or endpoint are missing.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self {
            config,
            transport: Arc::new(transport),
        })
    }

    /// Create a client with a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the envelope for a request with the configured credentials.
    pub fn build_envelope(&self, request: &IdMatrixRequest) -> String {
        build_envelope(request, &self.config.username, &self.config.password)
    }

    /// Send a typed request.
    pub async fn send_request(&self, request: &IdMatrixRequest) -> Result<IdMatrixResponse> {
        self.execute(request).await.inspect_err(|e| {
            error!(
                error = %e,
                client_reference = ?request.client_reference,
                "Error sending SOAP request"
            );
        })
    }

    /// Send a typed request, aborting when `cancel` fires first.
    pub async fn send_request_with_cancel(
        &self,
        request: &IdMatrixRequest,
        cancel: &CancellationToken,
    ) -> Result<IdMatrixResponse> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(
                    client_reference = ?request.client_reference,
                    "SOAP request cancelled"
                );
                Err(SoapClientError::Cancelled)
            }
            result = self.send_request(request) => result,
        }
    }

    /// Decode a JSON request and send it.
    pub async fn send_json(&self, json: &str) -> Result<IdMatrixResponse> {
        let request: IdMatrixRequest = serde_json::from_str(json).inspect_err(|e| {
            error!(error = %e, "Invalid JSON request payload");
        })?;
        self.send_request(&request).await
    }

    async fn execute(&self, request: &IdMatrixRequest) -> Result<IdMatrixResponse> {
        let envelope = self.build_envelope(request);
        // Contains plain-text credentials
        trace!(envelope = %envelope, "SOAP request");

        debug!(
            endpoint = %self.config.endpoint,
            client_reference = ?request.client_reference,
            "Sending SOAP request"
        );

        let response = self
            .transport
            .post(&self.config.endpoint, &self.config.soap_action, envelope)
            .await?;

        let body = response.body_text();
        debug!(status = response.status, body = %body, "SOAP response");

        if !response.is_success() {
            return Err(SoapClientError::Transport {
                status: response.status,
                body,
            });
        }

        let decoded = decode_response(&response.body).inspect_err(|e| {
            error!(error = %e, "Error parsing SOAP response");
        })?;

        info!(
            message_id = %decoded.message_id,
            overall_outcome = %decoded.overall_outcome,
            verification_outcome = %decoded.verification_outcome,
            total_points = %decoded.total_points,
            "IDMatrix response decoded"
        );

        Ok(decoded)
    }
}

impl std::fmt::Debug for IdMatrixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdMatrixClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
