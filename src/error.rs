//! Error types for model construction and interchange.

use thiserror::Error;

use crate::base::ElementId;

/// Errors that abort reading, building, or serializing a model.
///
/// Data-quality problems that do not abort a build are reported as
/// [`Diagnostic`](crate::diagnostics::Diagnostic)s instead.
#[derive(Debug, Error)]
pub enum InterchangeError {
    /// XML parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML parsing or serialization error.
    #[error("YAML error: {0}")]
    Yaml(String),

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing required element or attribute.
    #[error("Missing required {kind}: {name}")]
    Missing { kind: &'static str, name: String },

    /// The same id was defined twice for one entity kind.
    #[error("already seen {kind} id {id}")]
    DuplicateId { kind: &'static str, id: ElementId },

    /// An enumeration or datatype declared a generalization.
    #[error("inherited {kind} {id} (general {general}) is not supported")]
    InheritedValueType {
        kind: &'static str,
        id: ElementId,
        general: String,
    },

    /// Adding the edge would close a cycle in a hierarchy.
    #[error("hierarchy cycle: {child} is already an ancestor of {parent}")]
    HierarchyCycle { parent: ElementId, child: ElementId },

    /// Unsupported feature or format operation.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl InterchangeError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create a JSON error.
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json(message.into())
    }

    /// Create a YAML error.
    pub fn yaml(message: impl Into<String>) -> Self {
        Self::Yaml(message.into())
    }

    /// Create a missing element error.
    pub fn missing_element(name: impl Into<String>) -> Self {
        Self::Missing {
            kind: "element",
            name: name.into(),
        }
    }

    /// Create a missing attribute error.
    pub fn missing_attribute(name: impl Into<String>) -> Self {
        Self::Missing {
            kind: "attribute",
            name: name.into(),
        }
    }

    /// Create a duplicate id error.
    pub fn duplicate(kind: &'static str, id: impl Into<ElementId>) -> Self {
        Self::DuplicateId {
            kind,
            id: id.into(),
        }
    }
}
