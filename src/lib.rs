//! SOAP client for the IDMatrix identity verification service
//!
//! Translates a typed verification request into a SOAP 1.1 envelope with a
//! WS-Security UsernameToken header, posts it to the service, and decodes the
//! `IdMatrixResponse` payload into a typed result.
//!
//! # Features
//!
//! - Envelope construction with escaping by construction (quick-xml writer)
//! - Omission of absent address and consent blocks
//! - Prefix-insensitive response decoding that tolerates missing fields
//! - Pluggable transport with a pooled `reqwest` implementation
//! - Caller-driven cancellation
//!
//! # Example
//!
//! ```ignore
//! use idmatrix_soap::{ClientConfig, IdMatrixClient};
//!
//! let client = IdMatrixClient::new(ClientConfig::new("user", "password"))?;
//! let response = client.send_json(&request_json).await?;
//! println!("{}", response.overall_outcome);
//! ```

pub mod client;
pub mod config;
pub mod decoder;
pub mod envelope;
pub mod error;
pub mod model;
pub mod transport;
pub mod xml;

pub use client::IdMatrixClient;
pub use config::ClientConfig;
pub use decoder::decode_response;
pub use envelope::build_envelope;
pub use error::SoapClientError;
pub use model::{IdMatrixRequest, IdMatrixResponse};
pub use transport::{HttpTransport, Transport, TransportResponse};
