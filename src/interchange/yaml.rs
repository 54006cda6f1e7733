//! Canonical YAML form: the same serde shape as [`CanonicalJson`](super::CanonicalJson).

use super::{FormatCapability, InterchangeError, ModelFormat};
use crate::model::Model;

/// Canonical YAML format handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalYaml;

impl ModelFormat for CanonicalYaml {
    fn name(&self) -> &'static str {
        "Canonical YAML"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    fn mime_type(&self) -> &'static str {
        "application/x-yaml"
    }

    fn capabilities(&self) -> FormatCapability {
        FormatCapability::FULL
    }

    fn read(&self, input: &[u8]) -> Result<Model, InterchangeError> {
        serde_yaml::from_slice(input).map_err(|e| InterchangeError::yaml(e.to_string()))
    }

    fn write(&self, model: &Model) -> Result<Vec<u8>, InterchangeError> {
        serde_yaml::to_string(model)
            .map(String::into_bytes)
            .map_err(|e| InterchangeError::yaml(e.to_string()))
    }
}
