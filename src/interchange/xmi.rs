//! XMI (XML Model Interchange) reader.
//!
//! Reads a UML model serialized as XMI into the normalized
//! [`XmiElement`] tree, then compiles it with the
//! [`ModelBuilder`](crate::builder::ModelBuilder).
//!
//! ```xml
//! <xmi:XMI xmlns:xmi="http://www.omg.org/spec/XMI/20131001"
//!          xmlns:uml="http://www.omg.org/spec/UML/20131001">
//!   <uml:Model xmi:id="m" name="Example">
//!     <packagedElement xmi:type="uml:Package" xmi:id="core" name="Core">
//!       <packagedElement xmi:type="uml:Class" xmi:id="Agent" name="Agent"/>
//!     </packagedElement>
//!   </uml:Model>
//! </xmi:XMI>
//! ```

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::tree::XmiElement;
use super::{FormatCapability, InterchangeError, ModelFormat};
use crate::builder::{BuildResult, ModelBuilder};
use crate::config::ParserConfig;
use crate::model::Model;

/// XMI format handler.
#[derive(Debug, Clone, Default)]
pub struct Xmi {
    config: ParserConfig,
    resource: Option<String>,
}

impl Xmi {
    /// Create a reader with the given builder configuration.
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            resource: None,
        }
    }

    /// Record the resource name in the model's source.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Parse markup into the normalized element tree.
    pub fn parse_tree(input: &[u8]) -> Result<XmiElement, InterchangeError> {
        XmiReader::new().read(input)
    }

    /// Read a model and keep the build diagnostics.
    pub fn read_with_diagnostics(&self, input: &[u8]) -> Result<BuildResult, InterchangeError> {
        let tree = Self::parse_tree(input)?;
        let mut builder = ModelBuilder::new(self.config.clone());
        if let Some(resource) = &self.resource {
            builder = builder.with_resource(resource.clone());
        }
        builder.build(&tree)
    }

    /// Read a model from a file; the path becomes the model's resource.
    pub fn read_path(&self, path: &Path) -> Result<BuildResult, InterchangeError> {
        let input = std::fs::read(path)?;
        let xmi = self.clone().with_resource(path.display().to_string());
        xmi.read_with_diagnostics(&input)
    }
}

impl ModelFormat for Xmi {
    fn name(&self) -> &'static str {
        "XMI"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["xmi", "xml"]
    }

    fn mime_type(&self) -> &'static str {
        "application/xmi+xml"
    }

    fn capabilities(&self) -> FormatCapability {
        FormatCapability::READ_ONLY
    }

    fn read(&self, input: &[u8]) -> Result<Model, InterchangeError> {
        self.read_with_diagnostics(input).map(|result| result.model)
    }

    fn write(&self, _model: &Model) -> Result<Vec<u8>, InterchangeError> {
        Err(InterchangeError::Unsupported(
            "writing XMI from a canonical model".to_string(),
        ))
    }

    fn validate(&self, input: &[u8]) -> Result<(), InterchangeError> {
        let content = std::str::from_utf8(input)
            .map_err(|e| InterchangeError::xml(format!("Invalid UTF-8: {e}")))?;
        if !content.contains("XMI") && !content.contains("uml:Model") {
            return Err(InterchangeError::xml("Missing XMI/UML root element"));
        }
        Ok(())
    }
}

// ============================================================================
// XMI READER
// ============================================================================

/// Event-driven builder of the element tree.
struct XmiReader {
    /// Open elements, innermost last.
    stack: Vec<XmiElement>,
    /// First completed top-level element.
    root: Option<XmiElement>,
}

impl XmiReader {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
        }
    }

    fn read(mut self, input: &[u8]) -> Result<XmiElement, InterchangeError> {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let element = start_element(e)?;
                    self.stack.push(element);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = start_element(e)?;
                    self.close(element);
                }
                Ok(Event::End(_)) => {
                    if let Some(element) = self.stack.pop() {
                        self.close(element);
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| InterchangeError::xml(format!("Text error: {e}")))?;
                    if let Some(top) = self.stack.last_mut() {
                        top.push_text(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    let bytes = e.into_inner();
                    if let Some(top) = self.stack.last_mut() {
                        top.push_text(&String::from_utf8_lossy(&bytes));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(InterchangeError::xml(format!(
                        "XML parse error at position {}: {e}",
                        reader.error_position()
                    )));
                }
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = self.stack.last() {
            return Err(InterchangeError::xml(format!(
                "unexpected end of document inside <{}>",
                open.tag
            )));
        }
        self.root
            .ok_or_else(|| InterchangeError::missing_element("document root"))
    }

    fn close(&mut self, element: XmiElement) {
        match self.stack.last_mut() {
            Some(parent) => parent.push_child(element),
            None => {
                if self.root.is_none() {
                    self.root = Some(element);
                }
            }
        }
    }
}

fn start_element(e: &BytesStart<'_>) -> Result<XmiElement, InterchangeError> {
    let name_bytes = e.name();
    let tag = std::str::from_utf8(name_bytes.as_ref())
        .map_err(|e| InterchangeError::xml(format!("Invalid tag name: {e}")))?;
    let mut element = XmiElement::new(tag);

    for attr_result in e.attributes() {
        let attr =
            attr_result.map_err(|e| InterchangeError::xml(format!("Attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| InterchangeError::xml(format!("Attribute key error: {e}")))?;
        if key.starts_with("xmlns") {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|e| InterchangeError::xml(format!("Attribute value error: {e}")))?;
        element.attributes.insert(key.to_string(), value.into_owned());
    }
    Ok(element)
}
