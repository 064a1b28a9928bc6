//! Minimal XML element tree with prefix-insensitive search.
//!
//! Uses quick-xml which does not expand external entities.

use crate::error::{Result, SoapClientError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An XML element with its qualified name and children.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Qualified name as written, e.g. `a:IdMatrixResponse`
    pub name: String,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
        }
    }

    /// Name without namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Concatenated text of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
            }
        }
    }

    /// First element in depth-first pre-order (starting with `self`) that
    /// matches the predicate.
    pub fn find<P>(&self, predicate: P) -> Option<&XmlElement>
    where
        P: Fn(&XmlElement) -> bool,
    {
        find_first(self, &predicate)
    }

    /// Like [`find`](Self::find) but skips `self`.
    pub fn find_descendant<P>(&self, predicate: P) -> Option<&XmlElement>
    where
        P: Fn(&XmlElement) -> bool,
    {
        self.elements().find_map(|child| find_first(child, &predicate))
    }

    /// First descendant whose local name equals `name`.
    pub fn find_by_local_name(&self, name: &str) -> Option<&XmlElement> {
        self.find_descendant(|e| e.local_name() == name)
    }
}

fn find_first<'a, P>(element: &'a XmlElement, predicate: &P) -> Option<&'a XmlElement>
where
    P: Fn(&XmlElement) -> bool,
{
    if predicate(element) {
        return Some(element);
    }
    element.elements().find_map(|child| find_first(child, predicate))
}

/// Strip the namespace prefix from a qualified name.
pub fn local_name(qualified: &str) -> &str {
    match qualified.rfind(':') {
        Some(pos) => &qualified[pos + 1..],
        None => qualified,
    }
}

/// Parse a document into its root element.
///
/// DOCTYPE declarations (and so internal entity declarations) are rejected.
/// Whitespace-only text nodes are dropped.
pub fn parse_document(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().check_end_names = true;

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            SoapClientError::malformed_xml(
                format!("XML parse error at position {}", reader.buffer_position()),
                e,
            )
        })?;

        match event {
            Event::Start(ref e) => {
                stack.push(XmlElement::new(element_name(e)?));
            }

            Event::Empty(ref e) => {
                let element = XmlElement::new(element_name(e)?);
                attach(&mut stack, &mut root, element)?;
            }

            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| SoapClientError::malformed("unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }

            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .map_err(|err| SoapClientError::malformed_xml("invalid text content", err))?;
                push_text(&mut stack, &text);
            }

            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e);
                push_text(&mut stack, &text);
            }

            Event::DocType(_) => {
                return Err(SoapClientError::malformed(
                    "DOCTYPE declarations are not allowed",
                ));
            }

            Event::Eof => break,

            // Declarations, comments, processing instructions
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(SoapClientError::malformed(format!(
            "unclosed element <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| SoapClientError::malformed("document has no root element"))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(SoapClientError::malformed(format!(
                "unexpected second root element <{}>",
                element.name
            )))
        }
    }
    Ok(())
}

fn push_text(stack: &mut [XmlElement], text: &str) {
    if text.trim().is_empty() {
        return;
    }
    // Text outside the root element is ignored
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Text(text.to_string()));
    }
}

fn element_name(e: &BytesStart) -> Result<String> {
    let name = e.name();
    std::str::from_utf8(name.as_ref())
        .map(String::from)
        .map_err(|err| SoapClientError::malformed(format!("invalid element name: {}", err)))
}
