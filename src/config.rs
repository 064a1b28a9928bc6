//! Configuration types for the IDMatrix client.

use crate::error::{Result, SoapClientError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Production IDMatrix v4 endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://vedaxml.com/sy2/idmatrix-v4";

/// SOAPAction header value expected by the service.
pub const DEFAULT_SOAP_ACTION: &str = "IdMatrixOperation";

/// Client configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service endpoint URL
    pub endpoint: String,

    /// WS-Security username
    pub username: String,

    /// WS-Security password (sent as plain text)
    pub password: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// SOAPAction header value
    pub soap_action: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: 30,
            soap_action: DEFAULT_SOAP_ACTION.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the production endpoint.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Override the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check that credentials and endpoint are usable.
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(SoapClientError::InvalidConfiguration(
                "username is required".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(SoapClientError::InvalidConfiguration(
                "password is required".to_string(),
            ));
        }
        if self.endpoint.is_empty() {
            return Err(SoapClientError::InvalidConfiguration(
                "endpoint is required".to_string(),
            ));
        }

        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            SoapClientError::InvalidConfiguration(format!(
                "invalid endpoint '{}': {}",
                self.endpoint, e
            ))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SoapClientError::InvalidConfiguration(format!(
                "unsupported endpoint scheme '{}'",
                url.scheme()
            )));
        }

        if self.timeout_secs == 0 {
            return Err(SoapClientError::InvalidConfiguration(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.soap_action.is_empty() {
            return Err(SoapClientError::InvalidConfiguration(
                "soap_action is required".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("soap_action", &self.soap_action)
            .finish()
    }
}
