//! Namespace-aware XML element tree.
//!
//! Package parts are small enough to be read fully into memory, so every part
//! parser works over an [`Element`] tree instead of a raw event stream. Names
//! are resolved by [`NsReader`] against the `xmlns` declarations in scope, so
//! the parsers match on namespace URIs rather than on whatever prefix a
//! producer happened to choose.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::borrow::Cow;

/// A set of namespace URIs treated as equivalent.
pub type NamespaceSet = &'static [&'static str];

/// SpreadsheetML main namespace (transitional and strict).
pub const SPREADSHEETML: NamespaceSet = &[
    "http://schemas.openxmlformats.org/spreadsheetml/2006/main",
    "http://purl.oclc.org/ooxml/spreadsheetml/main",
];

/// Office document relationships namespace, used for `r:id` attributes.
pub const OFFICE_RELATIONSHIPS: NamespaceSet = &[
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships",
    "http://purl.oclc.org/ooxml/officeDocument/relationships",
];

/// Package relationships namespace, used by `.rels` parts.
pub const PACKAGE_RELATIONSHIPS: NamespaceSet =
    &["http://schemas.openxmlformats.org/package/2006/relationships"];

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A resolved element or attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    /// Namespace URI, if the name is bound to one
    pub namespace: Option<String>,
    /// Local part of the name
    pub local: String,
}

impl Name {
    /// Check whether this name is `local` within one of `namespaces`.
    pub fn is(&self, namespaces: NamespaceSet, local: &str) -> bool {
        self.local == local
            && self
                .namespace
                .as_deref()
                .is_some_and(|ns| namespaces.contains(&ns))
    }
}

/// An attribute with its resolved name and unescaped value.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: Name,
    pub value: String,
}

/// A child node of an element.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with resolved names.
#[derive(Debug, Clone)]
pub struct Element {
    pub name: Name,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    /// Parse a document and return its root element.
    ///
    /// Whitespace is kept as-is; cell text depends on it. A document with
    /// more than one top-level element is rejected.
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = NsReader::from_str(xml);
        reader.config_mut().expand_empty_elements = true;

        let mut open: Vec<Element> = Vec::new();
        let mut root = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => open.push(open_element(&reader, &e)?),
                Event::End(_) => {
                    if let Some(element) = open.pop() {
                        match open.last_mut() {
                            Some(parent) => parent.children.push(Node::Element(element)),
                            None if root.is_some() => {
                                return Err(Error::XmlParse(format!(
                                    "unexpected second root element <{}>",
                                    element.name.local
                                )));
                            }
                            None => root = Some(element),
                        }
                    }
                }
                Event::Text(e) => {
                    if let Some(current) = open.last_mut() {
                        current.children.push(Node::Text(e.unescape()?.into_owned()));
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = open.last_mut() {
                        let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                        current.children.push(Node::Text(text));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        root.ok_or_else(|| Error::XmlParse("document has no root element".to_string()))
    }

    /// Check whether this element is `local` within one of `namespaces`.
    pub fn is(&self, namespaces: NamespaceSet, local: &str) -> bool {
        self.name.is(namespaces, local)
    }

    /// Iterate over child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Iterate over child elements with the given name.
    pub fn children<'a>(
        &'a self,
        namespaces: NamespaceSet,
        local: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.is(namespaces, local))
    }

    /// First child element with the given name.
    pub fn child(&self, namespaces: NamespaceSet, local: &str) -> Option<&Element> {
        self.elements().find(|e| e.is(namespaces, local))
    }

    /// Value of an attribute that carries no namespace prefix.
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.namespace.is_none() && a.name.local == local)
            .map(|a| a.value.as_str())
    }

    /// Value of a namespaced attribute.
    pub fn attr_ns(&self, namespaces: NamespaceSet, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.is(namespaces, local))
            .map(|a| a.value.as_str())
    }

    /// Concatenated text of the direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

/// Build an element from a start tag, resolving names against the
/// declarations the reader has in scope.
fn open_element(reader: &NsReader<&[u8]>, start: &BytesStart<'_>) -> Result<Element> {
    let (namespace, local) = reader.resolve_element(start.name());
    let name = Name {
        namespace: namespace_uri(namespace),
        local: String::from_utf8_lossy(local.as_ref()).into_owned(),
    };

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }

        // Unprefixed attributes are never in the default namespace.
        let (namespace, local) = reader.resolve_attribute(attr.key);
        attributes.push(Attribute {
            name: Name {
                namespace: namespace_uri(namespace),
                local: String::from_utf8_lossy(local.as_ref()).into_owned(),
            },
            value: attr.unescape_value()?.into_owned(),
        });
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn namespace_uri(result: ResolveResult<'_>) -> Option<String> {
    match result {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        ResolveResult::Unknown(prefix) if prefix == b"xml" => Some(XML_NAMESPACE.to_string()),
        ResolveResult::Unknown(prefix) => {
            log::warn!(
                "undeclared namespace prefix {:?}",
                String::from_utf8_lossy(&prefix)
            );
            None
        }
        ResolveResult::Unbound => None,
    }
}

/// Whether XML 1.0 can carry this character.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escape text for use in element content or attribute values.
///
/// Quote, apostrophe, ampersand and angle brackets are replaced by entities.
/// Characters XML 1.0 cannot represent are dropped.
pub fn escape(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return quick_xml::escape::escape(text);
    }

    log::warn!("dropping characters not representable in XML from {:?}", text);
    let cleaned: String = text.chars().filter(|c| is_xml_char(*c)).collect();
    Cow::Owned(quick_xml::escape::escape(cleaned.as_str()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_resolution() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<x:workbook xmlns:x="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
    xmlns:rel="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <x:sheets><x:sheet name="One" sheetId="1" rel:id="rId1"/></x:sheets>
</x:workbook>"#;

        let root = Element::parse(xml).unwrap();
        assert!(root.is(SPREADSHEETML, "workbook"));

        let sheet = root
            .child(SPREADSHEETML, "sheets")
            .and_then(|s| s.child(SPREADSHEETML, "sheet"))
            .unwrap();
        assert_eq!(sheet.attr("name"), Some("One"));
        assert_eq!(sheet.attr_ns(OFFICE_RELATIONSHIPS, "id"), Some("rId1"));
        assert_eq!(sheet.attr("id"), None);
    }

    #[test]
    fn test_default_namespace_inherited() {
        let xml = r#"<root xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><a><b>x</b></a></root>"#;
        let root = Element::parse(xml).unwrap();
        let b = root
            .child(SPREADSHEETML, "a")
            .and_then(|a| a.child(SPREADSHEETML, "b"))
            .unwrap();
        assert_eq!(b.text(), "x");
    }

    #[test]
    fn test_unbound_element_does_not_match() {
        let root = Element::parse("<sheet name=\"a\"/>").unwrap();
        assert!(!root.is(SPREADSHEETML, "sheet"));
        assert_eq!(root.name.local, "sheet");
    }

    #[test]
    fn test_text_is_unescaped_and_untrimmed() {
        let root = Element::parse("<t xml:space=\"preserve\"> A &amp; B </t>").unwrap();
        assert_eq!(root.text(), " A & B ");
        assert_eq!(
            root.attributes[0].name.namespace.as_deref(),
            Some(XML_NAMESPACE)
        );
    }

    #[test]
    fn test_malformed_xml() {
        assert!(Element::parse("<a><b></a>").is_err());
        assert!(Element::parse("").is_err());
    }

    #[test]
    fn test_second_root_rejected() {
        let err = Element::parse("<a>1</a><b>2</b>").unwrap_err();
        assert!(matches!(err, Error::XmlParse(ref msg) if msg.contains("<b>")));

        assert!(Element::parse("<?xml version=\"1.0\"?>\n<a/>\n").is_ok());
    }

    #[test]
    fn test_declarations_are_not_attributes() {
        let root = Element::parse(
            r#"<s:sst xmlns:s="http://purl.oclc.org/ooxml/spreadsheetml/main" count="1"/>"#,
        )
        .unwrap();
        assert!(root.is(SPREADSHEETML, "sst"));
        assert_eq!(root.attributes.len(), 1);
        assert_eq!(root.attr("count"), Some("1"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("A & B"), "A &amp; B");
        assert_eq!(
            escape(r#"<"it's">"#),
            "&lt;&quot;it&apos;s&quot;&gt;"
        );
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("bell\u{7}"), "bell");
    }
}
