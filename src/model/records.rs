//! Entity records stored in the [`Model`](super::Model) arenas.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::property::{Aggregation, PropertyRecord};
use crate::base::ElementId;

/// Kind of entity a package lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Class,
    Enumeration,
    Datatype,
    Package,
    Import,
}

impl ElementKind {
    /// Human-readable kind name, as used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Enumeration => "enumeration",
            Self::Datatype => "datatype",
            Self::Package => "package",
            Self::Import => "import",
        }
    }
}

/// A typed reference from a package to one of its elements.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub id: ElementId,
}

impl ElementRef {
    pub fn new(kind: ElementKind, id: impl Into<ElementId>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// A package. Elements live in the model arenas; the package only orders
/// and classifies references to them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ancestor package ids, nearest first.
    #[serde(default)]
    pub packages: Vec<ElementId>,
    #[serde(default)]
    pub elements: Vec<ElementRef>,
    #[serde(default)]
    pub comments: Vec<String>,
}

impl Package {
    pub fn new(id: impl Into<ElementId>, name: Option<String>, packages: Vec<ElementId>) -> Self {
        Self {
            id: id.into(),
            name,
            packages,
            elements: Vec::new(),
            comments: Vec::new(),
        }
    }
}

/// Back-reference: "class `class_id`'s property `prop_name` points at me".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Referee {
    pub class_id: ElementId,
    pub prop_name: String,
}

impl Referee {
    pub fn new(class_id: impl Into<ElementId>, prop_name: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            prop_name: prop_name.into(),
        }
    }
}

/// Transient link from an owned attribute to the association naming it.
///
/// Created while scanning a class's attributes; the association-resolution
/// pass uses it to find which class and which property an association end
/// belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssocRef {
    /// Id of the owned attribute.
    pub id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub class_id: ElementId,
    /// The class at the other end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ElementId>,
    pub lower: String,
    pub upper: String,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    /// Index of the linked property in the owning class's `properties`.
    pub property: usize,
}

/// A class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub properties: Vec<PropertyRecord>,
    /// Owned-attribute id → association link (construction only).
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub associations: IndexMap<ElementId, AssocRef>,
    #[serde(default)]
    pub super_classes: Vec<ElementId>,
    #[serde(default)]
    pub referees: Vec<Referee>,
    #[serde(default)]
    pub comments: Vec<String>,
    /// Ancestor package ids, nearest first.
    #[serde(default)]
    pub packages: Vec<ElementId>,
}

impl Class {
    pub fn new(id: impl Into<ElementId>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
            is_abstract: false,
            properties: Vec::new(),
            associations: IndexMap::new(),
            super_classes: Vec::new(),
            referees: Vec::new(),
            comments: Vec::new(),
            packages: Vec::new(),
        }
    }

    /// Look up an owned property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyRecord> {
        self.properties
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
    }
}

/// An association as read from the input. Resolved into a property on the
/// class owning the attribute end; consumers do not traverse it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The member end that is not the association's owned end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ElementId>,
    #[serde(default)]
    pub comments: Vec<String>,
}

/// An enumeration with its literal values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumeration {
    pub id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub packages: Vec<ElementId>,
    #[serde(default)]
    pub referees: Vec<Referee>,
    #[serde(default)]
    pub comments: Vec<String>,
}

/// A datatype or primitive type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datatype {
    pub id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub packages: Vec<ElementId>,
    #[serde(default)]
    pub referees: Vec<Referee>,
    #[serde(default)]
    pub comments: Vec<String>,
}

/// A package re-exposing an entity defined elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedElement {
    pub id: ElementId,
    pub idref: ElementId,
}

/// A named, curated set of member classes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub members: Vec<ElementId>,
    #[serde(default)]
    pub comments: Vec<String>,
}

/// Handle to one property: the owning class and its position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySource {
    pub class_id: ElementId,
    pub index: usize,
}

/// Every property in the model sharing one name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyIndexEntry {
    pub sources: Vec<PropertySource>,
    /// Distinct targets (href or idref) in order of first appearance.
    #[serde(default)]
    pub uniform_type: Vec<String>,
}

impl PropertyIndexEntry {
    /// Returns true if all sources agree on one target.
    pub fn is_uniform(&self) -> bool {
        self.uniform_type.len() <= 1
    }
}

/// Where a model came from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// View names a view model was extracted for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub view_labels: Vec<String>,
}

impl ModelSource {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            view_labels: Vec::new(),
        }
    }
}
