//! Generic XML tree used as the intermediate form between raw feed bytes and
//! article records.
//!
//! Every element is a node with its text, its attributes and its child
//! elements grouped by tag name. Repeated tags keep document order inside
//! their group, so `node.first("title")` is the first `<title>` child.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Concatenated text and CDATA content of this element
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    pub children: BTreeMap<String, Vec<XmlNode>>,
}

impl XmlNode {
    /// All child elements with the given tag, in document order
    pub fn children(&self, tag: &str) -> &[XmlNode] {
        self.children.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First child element with the given tag
    pub fn first(&self, tag: &str) -> Option<&XmlNode> {
        self.children(tag).first()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn push_child(&mut self, tag: String, node: XmlNode) {
        self.children.entry(tag).or_default().push(node);
    }
}

/// Parse an XML document into a tree.
///
/// The returned node is the document itself: it has no text or attributes and
/// exactly one child, the root element.
pub fn parse_document(xml: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut document = XmlNode::default();
    let mut has_root = false;
    // Open elements, innermost last
    let mut stack: Vec<(String, XmlNode)> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::Parse(format!("Invalid XML: {}", e)))?;

        match event {
            Event::Start(e) => {
                let (tag, node) = open_element(&e)?;
                if stack.is_empty() && has_root {
                    return Err(Error::Parse("Invalid XML: multiple root elements".to_string()));
                }
                stack.push((tag, node));
            }
            Event::Empty(e) => {
                let (tag, node) = open_element(&e)?;
                close_element(&mut stack, &mut document, &mut has_root, tag, node)?;
            }
            Event::End(_) => {
                // quick-xml validates that end names match their start tags
                let (tag, node) = stack
                    .pop()
                    .ok_or_else(|| Error::Parse("Invalid XML: unexpected closing tag".to_string()))?;
                close_element(&mut stack, &mut document, &mut has_root, tag, node)?;
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|e| Error::Parse(e.to_string()))?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let bytes = e.into_inner();
                let text = std::str::from_utf8(&bytes).map_err(|e| Error::Parse(e.to_string()))?;
                append_text(&mut stack, text)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes carry no data
            _ => {}
        }
    }

    if let Some((tag, _)) = stack.last() {
        return Err(Error::Parse(format!("Invalid XML: unclosed element <{}>", tag)));
    }
    if !has_root {
        return Err(Error::Parse("Invalid XML: document has no root element".to_string()));
    }

    Ok(document)
}

fn open_element(start: &BytesStart<'_>) -> Result<(String, XmlNode)> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut node = XmlNode::default();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Parse(e.to_string()))?
            .into_owned();
        node.attributes.insert(key, value);
    }

    Ok((tag, node))
}

fn close_element(
    stack: &mut [(String, XmlNode)],
    document: &mut XmlNode,
    has_root: &mut bool,
    tag: String,
    node: XmlNode,
) -> Result<()> {
    match stack.last_mut() {
        Some((_, parent)) => parent.push_child(tag, node),
        None => {
            if *has_root {
                return Err(Error::Parse("Invalid XML: multiple root elements".to_string()));
            }
            document.push_child(tag, node);
            *has_root = true;
        }
    }
    Ok(())
}

fn append_text(stack: &mut [(String, XmlNode)], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some((_, node)) => {
            node.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(Error::Parse("Invalid XML: text outside of root element".to_string())),
    }
}
