//! Owned XML element tree for the upstream feed.
//!
//! `roxmltree` documents borrow from their source text, so the parsed tree is
//! copied into [`XmlElement`] values that can live in the cache independently
//! of the response body.

use encoding_rs::{Encoding, UTF_8};

use crate::error::FetchError;

/// How far into the body to look for the `<?xml ... ?>` declaration.
const DECLARATION_SCAN_LIMIT: usize = 256;

/// A parsed feed document (the root element and everything below it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocument {
    pub root: XmlElement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Text before the first child element, if any.
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl FeedDocument {
    /// Parse a feed body into an owned document.
    pub fn parse(body: &str) -> Result<Self, FetchError> {
        let doc = roxmltree::Document::parse(body)?;
        Ok(Self { root: XmlElement::from_node(doc.root_element()) })
    }

    /// Decode a raw body and parse it.
    ///
    /// The encoding comes from a byte order mark, then the XML declaration,
    /// then `charset` (from the Content-Type header), then UTF-8.
    pub fn from_bytes(body: &[u8], charset: Option<&str>) -> Result<Self, FetchError> {
        let encoding = declared_encoding(body)
            .or_else(|| charset.and_then(|c| Encoding::for_label(c.trim().as_bytes())))
            .unwrap_or(UTF_8);

        let (text, used, had_errors) = encoding.decode(body);
        if had_errors {
            return Err(FetchError::Encoding(used.name()));
        }
        Self::parse(&text)
    }
}

/// Encoding named by the `encoding="..."` pseudo-attribute of the XML declaration.
fn declared_encoding(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(DECLARATION_SCAN_LIMIT)];
    let head = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    if !head.starts_with(b"<?xml") {
        return None;
    }

    let end = head.windows(2).position(|w| w == b"?>")?;
    let decl = &head[..end];
    let at = decl.windows(8).position(|w| w == b"encoding")?;
    let rest = decl[at + 8..].trim_ascii_start().strip_prefix(b"=")?.trim_ascii_start();
    let (&quote, rest) = rest.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = rest.iter().position(|&b| b == quote)?;

    Encoding::for_label(&rest[..len])
}

impl XmlElement {
    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        Self {
            name: node.tag_name().name().to_string(),
            attributes: node
                .attributes()
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect(),
            text: node.text().map(str::to_string),
            children: node.children().filter(|n| n.is_element()).map(Self::from_node).collect(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// First direct child with the given tag.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Every element below `self` with the given tag, depth-first in document order.
    pub fn descendants<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        let mut stack: Vec<&XmlElement> = self.children.iter().rev().collect();

        while let Some(el) = stack.pop() {
            if el.name == name {
                found.push(el);
            }
            stack.extend(el.children.iter().rev());
        }

        found
    }

    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}
