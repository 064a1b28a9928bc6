//! SOAP envelope construction for IDMatrix requests.

use crate::model::{Address, Consents, IdMatrixRequest};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// SOAP namespace URIs.
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const IDMATRIX_NS: &str = "http://vedaxml.com/schemas/idmatrix-v4";
pub const WSSE_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";

/// Payload element names.
pub const REQUEST_ELEMENT: &str = "IdMatrixRequest";
pub const RESPONSE_ELEMENT: &str = "IdMatrixResponse";

type XmlWriter = Writer<Vec<u8>>;

/// Build the SOAP envelope for a request.
///
/// Credentials are embedded as a plain-text WS-Security UsernameToken, so the
/// returned document must be treated as sensitive.
pub fn build_envelope(request: &IdMatrixRequest, username: &str, password: &str) -> String {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_envelope(&mut writer, request, username, password)
        .expect("writing XML into a Vec<u8> cannot fail");
    // Every byte written came from &str input
    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}

fn write_envelope(
    w: &mut XmlWriter,
    request: &IdMatrixRequest,
    username: &str,
    password: &str,
) -> quick_xml::Result<()> {
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let envelope = BytesStart::new("soapenv:Envelope").with_attributes([
        ("xmlns:soapenv", SOAP_ENV_NS),
        ("xmlns:idm", IDMATRIX_NS),
        ("xmlns:wsse", WSSE_NS),
    ]);
    w.write_event(Event::Start(envelope))?;

    write_header(w, username, password)?;

    open(w, "soapenv:Body")?;
    open(w, "idm:IdMatrixRequest")?;
    text_element(w, "idm:client-reference", opt(&request.client_reference))?;
    text_element(w, "idm:reason-for-enquiry", opt(&request.reason))?;
    text_element(w, "idm:given-name", opt(&request.first_given_name))?;
    text_element(w, "idm:family-name", opt(&request.family_name))?;
    text_element(w, "idm:other-given-name", opt(&request.other_given_name))?;
    let dob = request.date_of_birth.format("%Y-%m-%d").to_string();
    text_element(w, "idm:date-of-birth", &dob)?;
    text_element(w, "idm:gender", opt(&request.gender))?;

    if let Some(address) = request.current_address() {
        write_address(w, "idm:current-address", address)?;
    }
    if let Some(address) = request.previous_address() {
        write_address(w, "idm:previous-address", address)?;
    }
    if let Some(consents) = &request.consents {
        write_consents(w, consents)?;
    }

    close(w, "idm:IdMatrixRequest")?;
    close(w, "soapenv:Body")?;
    close(w, "soapenv:Envelope")
}

fn write_header(w: &mut XmlWriter, username: &str, password: &str) -> quick_xml::Result<()> {
    open(w, "soapenv:Header")?;
    open(w, "wsse:Security")?;
    open(w, "wsse:UsernameToken")?;
    text_element(w, "wsse:Username", username)?;
    text_element(w, "wsse:Password", password)?;
    close(w, "wsse:UsernameToken")?;
    close(w, "wsse:Security")?;
    close(w, "soapenv:Header")
}

// Phone, employment, licence and email details are not part of the address
// block the service accepts.
fn write_address(w: &mut XmlWriter, tag: &str, address: &Address) -> quick_xml::Result<()> {
    open(w, tag)?;
    text_element(w, "idm:property", opt(&address.property))?;
    text_element(w, "idm:unit-number", opt(&address.unit_number))?;
    text_element(w, "idm:street-number", opt(&address.street_number))?;
    text_element(w, "idm:street-name", opt(&address.street_name))?;
    text_element(w, "idm:street-type", opt(&address.street_type))?;
    text_element(w, "idm:suburb", opt(&address.suburb))?;
    text_element(w, "idm:state", opt(&address.state))?;
    text_element(w, "idm:postcode", opt(&address.postcode))?;
    text_element(w, "idm:country", opt(&address.country))?;
    close(w, tag)
}

fn write_consents(w: &mut XmlWriter, consents: &Consents) -> quick_xml::Result<()> {
    open(w, "idm:consents")?;
    text_element(w, "idm:veda-credit-bureau", flag(consents.veda_credit_bureau))?;
    text_element(w, "idm:drivers-licence", flag(consents.drivers_licence))?;
    text_element(w, "idm:medicare", flag(consents.medicare))?;
    text_element(w, "idm:australian-passport", flag(consents.australian_passport))?;
    text_element(
        w,
        "idm:visa-entitlement-verification-online",
        flag(consents.visa_entitlement_verification_online),
    )?;
    close(w, "idm:consents")
}

fn open(w: &mut XmlWriter, tag: &str) -> quick_xml::Result<()> {
    w.write_event(Event::Start(BytesStart::new(tag)))?;
    Ok(())
}

fn close(w: &mut XmlWriter, tag: &str) -> quick_xml::Result<()> {
    w.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// `<tag>escaped text</tag>`, kept on one line even when indenting.
fn text_element(w: &mut XmlWriter, tag: &str, text: &str) -> quick_xml::Result<()> {
    w.create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
