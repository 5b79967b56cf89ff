//! Owned element tree built from a parsed XML fragment.
//!
//! The tree keeps only what the structure parser needs: element names,
//! attributes, and ordered element/text children. Comments and processing
//! instructions are dropped and adjacent text runs merged, so an element's
//! leading text is exactly its first child when that child is text.

use roxmltree::NodeType;

use crate::error::Result;

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Nested element
    Element(XmlElement),
    /// Character data
    Text(String),
}

/// An element with its attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Local tag name
    pub name: String,

    /// Attributes in source order
    pub attributes: Vec<(String, String)>,

    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Parse an XML string and return its root element.
    pub fn parse(source: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(source)?;
        Ok(Self::from_node(doc.root_element()))
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut element = XmlElement::new(node.tag_name().name());
        element.attributes = node
            .attributes()
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect();

        for child in node.children() {
            match child.node_type() {
                NodeType::Element => element
                    .children
                    .push(XmlNode::Element(Self::from_node(child))),
                NodeType::Text => element.push_text(child.text().unwrap_or_default()),
                _ => {}
            }
        }
        element
    }

    fn push_text(&mut self, text: &str) {
        if let Some(XmlNode::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(XmlNode::Text(text.to_string()));
        }
    }

    /// Get an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// First direct child element with the given name.
    pub fn find_child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|child| child.name == name)
    }

    /// Text before the first child element, if any.
    pub fn leading_text(&self) -> Option<&str> {
        match self.children.first() {
            Some(XmlNode::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Leading text of the first direct child with the given name.
    ///
    /// Returns `Some("")` when the child exists but has no leading text.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.find_child(name)
            .map(|child| child.leading_text().unwrap_or_default())
    }

    /// All descendant elements with the given name, in document order.
    ///
    /// The element itself is never included.
    pub fn descendants_named(&self, name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        let mut stack: Vec<&XmlElement> = self.child_elements().collect();
        stack.reverse();

        while let Some(element) = stack.pop() {
            if element.name == name {
                found.push(element);
            }
            let start = stack.len();
            stack.extend(element.child_elements());
            stack[start..].reverse();
        }
        found
    }
}
