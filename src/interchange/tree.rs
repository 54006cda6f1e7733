//! Normalized XMI element tree.
//!
//! The reader turns markup into this shape; the model builder consumes it.
//! Every element exposes its attributes and its child elements grouped by
//! tag name, both in document order.

use indexmap::IndexMap;

use crate::base::constants::{XMI_ID, XMI_IDREF, XMI_TYPE};

/// One element of an XMI document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmiElement {
    /// Qualified tag name (e.g. `packagedElement`, `uml:Model`).
    pub tag: String,
    /// Attributes in document order.
    pub attributes: IndexMap<String, String>,
    /// Trimmed text content, if any.
    pub text: Option<String>,
    /// Child elements grouped by tag name.
    pub children: IndexMap<String, Vec<XmiElement>>,
}

impl XmiElement {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child element.
    pub fn with_child(mut self, child: XmiElement) -> Self {
        self.push_child(child);
        self
    }

    /// Append a child element.
    pub fn push_child(&mut self, child: XmiElement) {
        self.children.entry(child.tag.clone()).or_default().push(child);
    }

    /// Append text content, joining fragments.
    pub fn push_text(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        match &mut self.text {
            Some(text) => text.push_str(fragment),
            None => self.text = Some(fragment.to_string()),
        }
    }

    /// Get an attribute.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Children with the given tag (empty if none).
    pub fn children(&self, tag: &str) -> &[XmiElement] {
        self.children.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First child with the given tag.
    pub fn first(&self, tag: &str) -> Option<&XmiElement> {
        self.children(tag).first()
    }

    /// The `xmi:id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.attr(XMI_ID)
    }

    /// The `xmi:idref` attribute.
    pub fn idref(&self) -> Option<&str> {
        self.attr(XMI_IDREF)
    }

    /// The `xmi:type` attribute.
    pub fn xmi_type(&self) -> Option<&str> {
        self.attr(XMI_TYPE)
    }

    /// Value given either as attribute `key` or as the text of child `key`.
    pub fn attr_or_text(&self, key: &str) -> Option<&str> {
        self.attr(key)
            .or_else(|| self.first(key).and_then(|c| c.text.as_deref()))
    }

    /// Reference given either as attribute `key` or as child `key` with an
    /// `xmi:idref`.
    pub fn attr_or_idref(&self, key: &str) -> Option<&str> {
        self.attr(key).or_else(|| self.first(key).and_then(XmiElement::idref))
    }

    /// Text of every `ownedComment` body, in order.
    pub fn comments(&self) -> Vec<String> {
        self.children("ownedComment")
            .iter()
            .filter_map(|comment| comment.attr_or_text("body"))
            .map(str::to_string)
            .collect()
    }
}
