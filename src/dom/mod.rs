//! # DOM Module
//!
//! A small element tree for SVG skin templates and the in-memory page that
//! hosts them.
//!
//! Templates are parsed with `quick-xml` into [`Element`] trees. Comments,
//! processing instructions and the XML declaration are dropped; whitespace-only
//! text is trimmed. Everything else round-trips through [`Element::write_markup`].

pub mod document;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{GamerGripError, Result};

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Tag name, including any namespace prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Depth-first search for an element with the given `id`, starting at `self`.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            Node::Element(element) => element.find_by_id(id),
            Node::Text(_) => None,
        })
    }

    /// Mutable variant of [`Element::find_by_id`].
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            Node::Element(element) => element.find_by_id_mut(id),
            Node::Text(_) => None,
        })
    }

    /// Parses an XML document and returns its root element.
    ///
    /// # Errors
    ///
    /// - `Xml`: malformed markup, or an entity other than the predefined XML
    ///   ones (DTD-declared entities are not expanded)
    /// - `InvalidTemplate`: no root element, or unbalanced tags
    ///
    /// # Examples
    ///
    /// ```
    /// use gamergrip::dom::Element;
    ///
    /// let root = Element::parse(r#"<svg><circle id="b0-hilight" r="4"/></svg>"#)?;
    /// assert_eq!(root.name(), "svg");
    /// assert_eq!(root.find_by_id("b0-hilight").unwrap().attribute("r"), Some("4"));
    /// # Ok::<(), gamergrip::error::GamerGripError>(())
    /// ```
    pub fn parse(markup: &str) -> Result<Element> {
        let mut reader = Reader::from_str(markup);
        reader.trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    stack.push(element_from_start(&start)?);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        GamerGripError::InvalidTemplate("unexpected closing tag".to_string())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(text.unescape()?.into_owned());
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(String::from_utf8_lossy(&data.into_inner()).into_owned());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(GamerGripError::InvalidTemplate(
                "unclosed element at end of document".to_string(),
            ));
        }

        root.ok_or_else(|| GamerGripError::InvalidTemplate("document has no root element".to_string()))
    }

    /// Serializes the element and its subtree.
    pub fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_markup(out),
                Node::Text(text) => out.push_str(&escape(text.as_str())),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    /// Serialized markup as an owned string.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push_child(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(GamerGripError::InvalidTemplate(
                "multiple root elements".to_string(),
            ))
        }
    }
    Ok(())
}
