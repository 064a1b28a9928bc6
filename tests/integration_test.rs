//! Integration tests for the idmatrix-soap crate.
//!
//! These tests exercise the public API end to end: envelope construction,
//! HTTP transport against a mock service, and response decoding.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use idmatrix_soap::config::ClientConfig;
use idmatrix_soap::envelope::build_envelope;
use idmatrix_soap::model::{Address, Addresses, Consents, IdMatrixRequest};
use idmatrix_soap::xml::parse_document;
use idmatrix_soap::{decode_response, HttpTransport, IdMatrixClient, SoapClientError};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn smith_request() -> IdMatrixRequest {
    IdMatrixRequest {
        family_name: Some("Smith".to_string()),
        first_given_name: Some("Jane".to_string()),
        consents: Some(Consents {
            veda_credit_bureau: true,
            ..Default::default()
        }),
        addresses: Some(Addresses {
            current_address: Some(Address {
                suburb: Some("Perth".to_string()),
                state: Some("WA".to_string()),
                ..Default::default()
            }),
            previous_address: None,
        }),
        ..IdMatrixRequest::new(NaiveDate::from_ymd_opt(1990, 5, 1).unwrap())
    }
}

fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new("acme", "s3cret").with_endpoint(format!("{}/sy2/idmatrix-v4", server.uri()))
}

const RESPONSE_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
  <soapenv:Body>
    <idm:IdMatrixResponse xmlns:idm="http://vedaxml.com/schemas/idmatrix-v4">
      <idm:response-header>
        <idm:message-id>8f1c7e2a</idm:message-id>
        <idm:client-reference>REF-001</idm:client-reference>
      </idm:response-header>
      <idm:response-outcome>
        <idm:overall-outcome>ACCEPT</idm:overall-outcome>
        <idm:verification-outcome>VERIFIED</idm:verification-outcome>
        <idm:total-points>42.50</idm:total-points>
      </idm:response-outcome>
    </idm:IdMatrixResponse>
  </soapenv:Body>
</soapenv:Envelope>"#;

// ============================================================================
// Envelope construction
// ============================================================================

#[test]
fn test_e2e_smith_envelope() {
    let xml = build_envelope(&smith_request(), "acme", "s3cret");
    let root = parse_document(&xml).unwrap();

    let payload = root.find_by_local_name("IdMatrixRequest").unwrap();
    assert_eq!(
        payload
            .elements()
            .filter(|e| e.local_name().ends_with("-address"))
            .count(),
        1
    );
    assert!(payload.find_by_local_name("current-address").is_some());
    assert!(payload.find_by_local_name("previous-address").is_none());

    let consents = payload.find_by_local_name("consents").unwrap();
    let flags: Vec<(&str, String)> = consents
        .elements()
        .map(|e| (e.local_name(), e.text()))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("veda-credit-bureau", "true".to_string()),
            ("drivers-licence", "false".to_string()),
            ("medicare", "false".to_string()),
            ("australian-passport", "false".to_string()),
            ("visa-entitlement-verification-online", "false".to_string()),
        ]
    );

    assert_eq!(
        payload.find_by_local_name("date-of-birth").unwrap().text(),
        "1990-05-01"
    );
    assert_eq!(payload.find_by_local_name("given-name").unwrap().text(), "Jane");
}

#[test]
fn test_envelope_from_json_matches_typed_request() {
    let json = r#"{
        "FamilyName": "Smith",
        "FirstGivenName": "Jane",
        "DateOfBirth": "1990-05-01T00:00:00",
        "Consents": {
            "VedaCreditBureau": true,
            "DriversLicence": false,
            "Medicare": false,
            "AustralianPassport": false,
            "VisaEntitlementVerificationOnline": false
        },
        "Addresses": { "CurrentAddress": { "Suburb": "Perth", "State": "WA" } }
    }"#;
    let from_json: IdMatrixRequest = serde_json::from_str(json).unwrap();
    assert_eq!(from_json, smith_request());
    assert_eq!(
        build_envelope(&from_json, "u", "p"),
        build_envelope(&smith_request(), "u", "p")
    );
}

// ============================================================================
// Response decoding
// ============================================================================

#[test]
fn test_decode_service_response() {
    let response = decode_response(RESPONSE_BODY.as_bytes()).unwrap();
    assert_eq!(response.message_id, "8f1c7e2a");
    assert_eq!(response.client_reference, "REF-001");
    assert_eq!(response.overall_outcome, "ACCEPT");
    assert_eq!(response.verification_outcome, "VERIFIED");
    assert_eq!(response.total_points, BigDecimal::from_str("42.5").unwrap());
    assert_eq!(response.status, "Completed");
}

#[test]
fn test_decode_not_xml() {
    let err = decode_response(b"Service Unavailable <<<").unwrap_err();
    assert!(matches!(err, SoapClientError::MalformedResponse { .. }));
}

// ============================================================================
// Client over HTTP
// ============================================================================

#[tokio::test]
async fn test_client_posts_soap_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sy2/idmatrix-v4"))
        .and(header("SOAPAction", "IdMatrixOperation"))
        .and(header("Content-Type", "text/xml; charset=utf-8"))
        .and(body_string_contains("<wsse:Username>acme</wsse:Username>"))
        .and(body_string_contains("<wsse:Password>s3cret</wsse:Password>"))
        .and(body_string_contains("<idm:family-name>Smith</idm:family-name>"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/xml; charset=utf-8")
                .set_body_string(RESPONSE_BODY),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = IdMatrixClient::new(test_config(&server)).unwrap();
    let response = client.send_request(&smith_request()).await.unwrap();

    assert_eq!(response.overall_outcome, "ACCEPT");
    assert_eq!(response.total_points, BigDecimal::from_str("42.50").unwrap());
}

#[tokio::test]
async fn test_client_send_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("<idm:family-name>Smith &amp; Co</idm:family-name>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESPONSE_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let client = IdMatrixClient::new(test_config(&server)).unwrap();
    let json = r#"{"FamilyName": "Smith & Co", "DateOfBirth": "1980-11-02", "Gender": null}"#;
    let response = client.send_json(json).await.unwrap();
    assert_eq!(response.message_id, "8f1c7e2a");
}

#[tokio::test]
async fn test_client_surfaces_http_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<soap:Fault>boom</soap:Fault>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = IdMatrixClient::new(test_config(&server)).unwrap();
    let err = client.send_request(&smith_request()).await.unwrap_err();

    match err {
        SoapClientError::Transport { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_client_malformed_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<soap:Envelope xmlns:soap=\"urn:s\"><soap:Body/></soap:Envelope>"),
        )
        .mount(&server)
        .await;

    let client = IdMatrixClient::new(test_config(&server)).unwrap();
    let err = client.send_request(&smith_request()).await.unwrap_err();
    assert!(matches!(err, SoapClientError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_client_cancellation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(RESPONSE_BODY)
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let client = IdMatrixClient::new(test_config(&server)).unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = client
        .send_request_with_cancel(&smith_request(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, SoapClientError::Cancelled));
}

#[tokio::test]
async fn test_client_timeout_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(RESPONSE_BODY)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.timeout_secs = 1;
    let client = IdMatrixClient::new(config).unwrap();

    let err = client.send_request(&smith_request()).await.unwrap_err();
    match err {
        SoapClientError::Http(e) => assert!(e.is_timeout()),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_client_rejects_invalid_configuration() {
    let err = IdMatrixClient::new(ClientConfig::new("acme", "")).unwrap_err();
    assert!(matches!(err, SoapClientError::InvalidConfiguration(_)));

    let err = IdMatrixClient::new(ClientConfig::new("acme", "pw").with_endpoint("")).unwrap_err();
    assert!(matches!(err, SoapClientError::InvalidConfiguration(_)));
}

#[tokio::test]
async fn test_shared_reqwest_client_transport() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("SOAPAction", "IdMatrixOperation"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESPONSE_BODY))
        .expect(2)
        .mount(&server)
        .await;

    let pool = reqwest::Client::new();
    let transport = Arc::new(HttpTransport::from_client(pool.clone()));
    let first = IdMatrixClient::with_transport(test_config(&server), transport.clone()).unwrap();
    let second = IdMatrixClient::with_transport(test_config(&server), transport).unwrap();

    let request = smith_request();
    let (a, b) = tokio::join!(first.send_request(&request), second.send_request(&request));
    assert_eq!(a.unwrap().message_id, "8f1c7e2a");
    assert_eq!(b.unwrap().message_id, "8f1c7e2a");
}
