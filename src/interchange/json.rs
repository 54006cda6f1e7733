//! Canonical JSON wire form.
//!
//! The document mirrors [`Model`] field for field: id-keyed objects for
//! every arena, arrays for ordered lists, and `{roots, parents, children}`
//! for both hierarchies. Decoding the JSON produced by encoding a model
//! reproduces an equal model.

use super::{FormatCapability, InterchangeError, ModelFormat};
use crate::model::Model;

/// Canonical JSON format handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalJson {
    /// Emit indented output.
    pub pretty: bool,
}

impl CanonicalJson {
    /// Handler producing indented output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Decode a model from JSON text.
    pub fn decode(input: &str) -> Result<Model, InterchangeError> {
        serde_json::from_str(input).map_err(|e| InterchangeError::json(e.to_string()))
    }

    /// Encode a model as JSON text.
    pub fn encode(&self, model: &Model) -> Result<String, InterchangeError> {
        let result = if self.pretty {
            serde_json::to_string_pretty(model)
        } else {
            serde_json::to_string(model)
        };
        result.map_err(|e| InterchangeError::json(e.to_string()))
    }
}

impl ModelFormat for CanonicalJson {
    fn name(&self) -> &'static str {
        "Canonical JSON"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    fn capabilities(&self) -> FormatCapability {
        FormatCapability::FULL
    }

    fn read(&self, input: &[u8]) -> Result<Model, InterchangeError> {
        serde_json::from_slice(input).map_err(|e| InterchangeError::json(e.to_string()))
    }

    fn write(&self, model: &Model) -> Result<Vec<u8>, InterchangeError> {
        self.encode(model).map(String::into_bytes)
    }

    fn validate(&self, input: &[u8]) -> Result<(), InterchangeError> {
        serde_json::from_slice::<serde_json::Value>(input)
            .map(|_| ())
            .map_err(|e| InterchangeError::json(e.to_string()))
    }
}
