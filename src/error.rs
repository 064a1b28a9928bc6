//! Error types for the IDMatrix SOAP client.

use thiserror::Error;

/// IDMatrix client errors.
#[derive(Error, Debug)]
pub enum SoapClientError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid request payload: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("SOAP request failed with status {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed SOAP response: {message}")]
    MalformedResponse {
        message: String,
        #[source]
        source: Option<quick_xml::Error>,
    },

    #[error("Request cancelled")]
    Cancelled,
}

impl SoapClientError {
    /// Malformed response without an underlying parser error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
            source: None,
        }
    }

    /// Malformed response caused by an XML parser error.
    pub fn malformed_xml(message: impl Into<String>, source: quick_xml::Error) -> Self {
        Self::MalformedResponse {
            message: message.into(),
            source: Some(source),
        }
    }

    /// HTTP status carried by a transport failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SoapClientError>;
