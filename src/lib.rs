//! # canonical-uml
//!
//! Compiles UML models exchanged as XMI into a canonical, id-indexed graph,
//! extracts self-contained views from it, and materializes either into a
//! deduplicated object graph.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! interchange → XMI reader, canonical JSON/YAML formats
//!   ↓
//! uml         → Materialized object graph (to_uml)
//!   ↓
//! view        → View extraction (get_view)
//!   ↓
//! builder     → XMI tree → canonical Model, association resolution
//!   ↓
//! model       → Canonical records, property index, referees
//!   ↓
//! hierarchy   → Incremental transitive closure
//!   ↓
//! base        → ElementId, constants
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use canonical_uml::interchange::{ModelFormat, Xmi};
//! use canonical_uml::{ModelSource, ViewOptions, get_view, to_uml};
//!
//! let bytes = std::fs::read("ddi.xmi")?;
//! let model = Xmi::default().read(&bytes)?;
//! let view = get_view(&model, &ModelSource::new("ddi.xmi"), &["Agents"], ViewOptions::new())?;
//! let graph = to_uml(&view);
//! println!("{} classes", graph.classes().count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// ============================================================================
// MODULES (dependency order: base → hierarchy → model → builder → view → uml)
// ============================================================================

/// Foundation types: ElementId, XMI constants
pub mod base;

/// Error type shared by every fallible operation
pub mod error;

/// Non-fatal build findings
pub mod diagnostics;

/// Builder configuration
pub mod config;

/// Incremental transitive closure for class and package hierarchies
pub mod hierarchy;

/// Canonical model records
pub mod model;

/// XMI tree → canonical model
pub mod builder;

/// View extraction
pub mod view;

/// Materialized object graph
pub mod uml;

/// Model interchange formats: XMI, canonical JSON, canonical YAML
pub mod interchange;

// Re-export commonly needed items
pub use base::ElementId;
pub use builder::{BuildResult, ModelBuilder};
pub use config::ParserConfig;
pub use diagnostics::{Diagnostic, Severity};
pub use error::InterchangeError;
pub use hierarchy::Hierarchy;
pub use model::{Model, ModelSource};
pub use uml::{UmlModel, to_uml};
pub use view::{ViewOptions, get_view};
