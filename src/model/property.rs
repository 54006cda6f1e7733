//! Property records and their typed parts.

use serde::{Deserialize, Serialize};

use crate::base::ElementId;
use crate::base::constants::{UPPER_UNLIMITED, WIRE_UNLIMITED};

// ============================================================================
// TARGET
// ============================================================================

/// What a property is typed by.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// Id of a class, enumeration, or datatype in the same model.
    Idref(ElementId),
    /// External or primitive type designator (already normalized).
    Href(String),
}

impl Target {
    /// The lookup key: the href string or the referenced id.
    pub fn key(&self) -> &str {
        match self {
            Self::Idref(id) => id.as_str(),
            Self::Href(href) => href,
        }
    }

    /// The referenced id, for internal targets.
    pub fn idref(&self) -> Option<&ElementId> {
        match self {
            Self::Idref(id) => Some(id),
            Self::Href(_) => None,
        }
    }

    /// The external designator, for href targets.
    pub fn href(&self) -> Option<&str> {
        match self {
            Self::Idref(_) => None,
            Self::Href(href) => Some(href),
        }
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// UML aggregation kind of a property.
///
/// Values outside the known kinds are kept verbatim in [`Aggregation::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Aggregation {
    None,
    Shared,
    Composite,
    Other(String),
}

impl Aggregation {
    /// Parse a wire value.
    pub fn parse(value: &str) -> Self {
        match value {
            "none" => Self::None,
            "shared" => Self::Shared,
            "composite" => Self::Composite,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Shared => "shared",
            Self::Composite => "composite",
            Self::Other(value) => value,
        }
    }

    /// Returns false for values kept verbatim.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for Aggregation {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Aggregation> for String {
    fn from(value: Aggregation) -> Self {
        value.as_str().to_string()
    }
}

// ============================================================================
// CARDINALITY
// ============================================================================

/// Normalize an upper bound: the wire's `-1` becomes the unbounded sentinel.
pub fn normalize_upper(upper: impl Into<String>) -> String {
    let upper = upper.into();
    if upper == WIRE_UNLIMITED {
        UPPER_UNLIMITED.to_string()
    } else {
        upper
    }
}

// ============================================================================
// PROPERTY RECORD
// ============================================================================

/// A property owned by a class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PropertyWire", into = "PropertyWire")]
pub struct PropertyRecord {
    pub id: ElementId,
    /// The owning class.
    pub class_id: ElementId,
    pub name: Option<String>,
    pub target: Option<Target>,
    pub lower: String,
    /// Non-negative integer string or [`UPPER_UNLIMITED`].
    pub upper: String,
    pub aggregation: Option<Aggregation>,
    /// The association this property was resolved from, if any.
    pub association: Option<ElementId>,
    pub comments: Vec<String>,
}

impl PropertyRecord {
    /// Create a property; `upper` is normalized.
    pub fn new(
        id: impl Into<ElementId>,
        class_id: impl Into<ElementId>,
        name: Option<String>,
        target: Option<Target>,
        lower: impl Into<String>,
        upper: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            class_id: class_id.into(),
            name,
            target,
            lower: lower.into(),
            upper: normalize_upper(upper),
            aggregation: None,
            association: None,
            comments: Vec::new(),
        }
    }

    /// Set the comments.
    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    /// Set the aggregation kind.
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    /// Returns true if the upper bound is unbounded.
    pub fn is_unbounded(&self) -> bool {
        self.upper == UPPER_UNLIMITED
    }
}

/// Wire shape: the target is spread over `idref` / `href`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertyWire {
    id: ElementId,
    class_id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    idref: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    href: Option<String>,
    lower: String,
    upper: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aggregation: Option<Aggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    association: Option<ElementId>,
    #[serde(default)]
    comments: Vec<String>,
}

impl From<PropertyWire> for PropertyRecord {
    fn from(wire: PropertyWire) -> Self {
        let target = match (wire.href, wire.idref) {
            (Some(href), _) => Some(Target::Href(href)),
            (None, Some(id)) => Some(Target::Idref(id)),
            (None, None) => None,
        };
        Self {
            id: wire.id,
            class_id: wire.class_id,
            name: wire.name,
            target,
            lower: wire.lower,
            upper: normalize_upper(wire.upper),
            aggregation: wire.aggregation,
            association: wire.association,
            comments: wire.comments,
        }
    }
}

impl From<PropertyRecord> for PropertyWire {
    fn from(record: PropertyRecord) -> Self {
        let (idref, href) = match record.target {
            Some(Target::Idref(id)) => (Some(id), None),
            Some(Target::Href(href)) => (None, Some(href)),
            None => (None, None),
        };
        Self {
            id: record.id,
            class_id: record.class_id,
            name: record.name,
            idref,
            href,
            lower: record.lower,
            upper: record.upper,
            aggregation: record.aggregation,
            association: record.association,
            comments: record.comments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_unlimited_is_normalized() {
        let p = PropertyRecord::new("p", "C", Some("member".into()), None, "0", "-1");
        assert_eq!(p.upper, "*");
        assert!(p.is_unbounded());
    }

    #[test]
    fn test_numeric_bounds_pass_through() {
        let p = PropertyRecord::new("p", "C", None, None, "1", "5");
        assert_eq!(p.lower, "1");
        assert_eq!(p.upper, "5");
    }

    #[test]
    fn test_unknown_aggregation_kept_verbatim() {
        let agg = Aggregation::parse("weird");
        assert!(!agg.is_known());
        assert_eq!(agg.as_str(), "weird");
        assert_eq!(Aggregation::parse("composite"), Aggregation::Composite);
    }

    #[test]
    fn test_wire_form_spreads_target() {
        let p = PropertyRecord::new(
            "p",
            "C",
            Some("label".into()),
            Some(Target::Href("http://www.w3.org/2001/XMLSchema#string".into())),
            "0",
            "1",
        );
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["href"], "http://www.w3.org/2001/XMLSchema#string");
        assert!(json.get("idref").is_none());
        assert_eq!(json["classId"], "C");
    }
}
