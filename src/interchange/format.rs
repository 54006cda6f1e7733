//! Common trait for model interchange formats.

use super::InterchangeError;
use crate::model::Model;

/// Capabilities supported by a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatCapability {
    /// Can read/import models.
    pub read: bool,
    /// Can write/export models.
    pub write: bool,
    /// Preserves all canonical information on a round trip.
    pub lossless: bool,
}

impl FormatCapability {
    /// Full capability (read, write, lossless).
    pub const FULL: Self = Self {
        read: true,
        write: true,
        lossless: true,
    };

    /// Read-only capability.
    pub const READ_ONLY: Self = Self {
        read: true,
        write: false,
        lossless: false,
    };
}

/// Trait for model interchange formats.
///
/// Implementations convert between the canonical [`Model`] and an external
/// representation: XMI documents are compiled into a model, the canonical
/// JSON/YAML forms serialize the model itself.
pub trait ModelFormat: Send + Sync {
    /// Human-readable name of the format.
    fn name(&self) -> &'static str;

    /// File extension(s) for this format.
    fn extensions(&self) -> &'static [&'static str];

    /// MIME type for this format.
    fn mime_type(&self) -> &'static str;

    /// Capabilities of this format implementation.
    fn capabilities(&self) -> FormatCapability;

    /// Read a model from bytes.
    fn read(&self, input: &[u8]) -> Result<Model, InterchangeError>;

    /// Write a model to bytes.
    fn write(&self, model: &Model) -> Result<Vec<u8>, InterchangeError>;

    /// Validate that the input is well-formed for this format.
    ///
    /// This is a quick check that doesn't fully parse the content.
    fn validate(&self, input: &[u8]) -> Result<(), InterchangeError> {
        let _ = input;
        Ok(())
    }
}
