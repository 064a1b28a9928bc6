//! IDMatrix response decoding.

use crate::envelope::RESPONSE_ELEMENT;
use crate::error::{Result, SoapClientError};
use crate::model::IdMatrixResponse;
use crate::xml::{parse_document, XmlElement};
use bigdecimal::BigDecimal;
use quick_xml::encoding::EncodingError;
use std::str::FromStr;
use tracing::debug;

/// Status reported for every successfully decoded response.
pub const STATUS_COMPLETED: &str = "Completed";

/// Decode a raw SOAP response body.
///
/// The `IdMatrixResponse` element is located by local name, whatever prefix
/// the service used. Missing fields decode to empty values.
pub fn decode_response(raw: &[u8]) -> Result<IdMatrixResponse> {
    let xml = std::str::from_utf8(raw)
        .map_err(|e| {
            SoapClientError::malformed_xml("invalid UTF-8", EncodingError::from(e).into())
        })?;

    let root = parse_document(xml)?;

    let payload = root
        .find(|e| e.local_name() == RESPONSE_ELEMENT)
        .ok_or_else(|| missing_payload(&root))?;

    let mut response = IdMatrixResponse {
        message_id: field(payload, "message-id"),
        client_reference: field(payload, "client-reference"),
        overall_outcome: field(payload, "overall-outcome"),
        verification_outcome: field(payload, "verification-outcome"),
        status: STATUS_COMPLETED.to_string(),
        ..Default::default()
    };

    let points = field(payload, "total-points");
    match parse_points(&points) {
        Some(value) => response.total_points = value,
        None if points.is_empty() => {}
        None => debug!(total_points = %points, "Ignoring unparseable total-points"),
    }

    Ok(response)
}

/// Plain decimal notation only; exponents are not accepted.
fn parse_points(text: &str) -> Option<BigDecimal> {
    let text = text.trim();
    if text.contains(['e', 'E']) {
        return None;
    }
    BigDecimal::from_str(text).ok()
}

fn field(payload: &XmlElement, name: &str) -> String {
    payload
        .find_by_local_name(name)
        .map(|e| e.text())
        .unwrap_or_default()
}

/// Error for a document without the payload element, quoting any SOAP fault.
fn missing_payload(root: &XmlElement) -> SoapClientError {
    let fault = root
        .find(|e| e.local_name() == "Fault")
        .and_then(|f| {
            f.find_descendant(|e| matches!(e.local_name(), "faultstring" | "Text"))
        })
        .map(|e| e.text());

    match fault {
        Some(reason) => SoapClientError::malformed(format!(
            "no {} element found, SOAP fault: {}",
            RESPONSE_ELEMENT,
            reason.trim()
        )),
        None => SoapClientError::malformed(format!("no {} element found", RESPONSE_ELEMENT)),
    }
}
