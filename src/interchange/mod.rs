//! Model interchange formats.
//!
//! - **XMI** - the input notation, compiled into a canonical model
//! - **Canonical JSON** - the wire form of the canonical model
//! - **Canonical YAML** - the same shape as YAML
//!
//! ```text
//! ┌──────────────┐   parse_tree   ┌──────────────┐   ModelBuilder   ┌──────────────┐
//! │   XMI bytes  │ ─────────────▶ │  XmiElement  │ ───────────────▶ │    Model     │
//! └──────────────┘                └──────────────┘                  └──────┬───────┘
//!                                                                          │ serde
//!                                                                   ┌──────▼───────┐
//!                                                                   │  JSON / YAML │
//!                                                                   └──────────────┘
//! ```

mod format;
mod json;
pub mod tree;
mod xmi;
mod yaml;

pub use crate::error::InterchangeError;
pub use format::{FormatCapability, ModelFormat};
pub use json::CanonicalJson;
pub use tree::XmiElement;
pub use xmi::Xmi;
pub use yaml::CanonicalYaml;

/// Supported file extensions for interchange formats.
pub fn supported_extensions() -> &'static [&'static str] {
    &["xmi", "xml", "json", "yaml", "yml"]
}

/// Detect format from file extension. XMI uses the default configuration.
pub fn detect_format(path: &std::path::Path) -> Option<Box<dyn ModelFormat>> {
    let ext = path.extension()?.to_str()?;
    match ext.to_lowercase().as_str() {
        "xmi" | "xml" => Some(Box::new(Xmi::default())),
        "json" => Some(Box::new(CanonicalJson::default())),
        "yaml" | "yml" => Some(Box::new(CanonicalYaml)),
        _ => None,
    }
}
