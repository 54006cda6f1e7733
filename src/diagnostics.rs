//! Diagnostics for non-fatal data-quality problems.
//!
//! Structural violations abort a build with an
//! [`InterchangeError`](crate::error::InterchangeError). Everything else is
//! recorded here, logged through `tracing`, and the build carries on.

use std::sync::Arc;

use crate::base::ElementId;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Info,
}

/// A data-quality finding attached to a model element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Diagnostic code (see [`codes`]).
    pub code: &'static str,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// The element the finding is about, when there is one.
    pub element: Option<ElementId>,
}

impl Diagnostic {
    /// Create a new warning diagnostic.
    pub fn warning(code: &'static str, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            element: None,
        }
    }

    /// Create a new informational diagnostic.
    pub fn info(code: &'static str, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Info,
            code,
            message: message.into(),
            element: None,
        }
    }

    /// Attach the element this diagnostic is about.
    pub fn with_element(mut self, id: impl Into<ElementId>) -> Self {
        self.element = Some(id.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.element {
            Some(id) => write!(f, "[{}] {} ({})", self.code, self.message, id),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Diagnostic codes.
///
/// - **W001-W099**: data-quality warnings
/// - **I001-I099**: informational report events
pub mod codes {
    /// Owned attribute without a name and without an association to name it.
    pub const UNNAMED_PROPERTY: &str = "W001";
    /// Property name starts with an upper-case letter.
    pub const PROPERTY_NAME_CASE: &str = "W002";
    /// Aggregation value other than `none`, `shared`, or `composite`.
    pub const UNKNOWN_AGGREGATION: &str = "W003";
    /// Element `xmi:type` the builder has no handler for.
    pub const UNKNOWN_ELEMENT_TYPE: &str = "W004";
    /// Association whose owned end is not an attribute of any class.
    pub const UNRESOLVED_ASSOCIATION_END: &str = "W005";
    /// Property without a `type` reference.
    pub const MISSING_PROPERTY_TYPE: &str = "W006";
    /// Classifier declared directly under the model, outside any package.
    pub const ELEMENT_OUTSIDE_PACKAGE: &str = "W007";
    /// One property name used with more than one target type.
    pub const MIXED_PROPERTY_TYPES: &str = "I001";
}

// ============================================================================
// COLLECTOR
// ============================================================================

/// Accumulates diagnostics and mirrors each one to `tracing`.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => tracing::warn!("{diagnostic}"),
            Severity::Info => tracing::debug!("{diagnostic}"),
        }
        self.diagnostics.push(diagnostic);
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the collector.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
