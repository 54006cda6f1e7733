//! Materialized UML object graph.
//!
//! The canonical [`Model`](crate::model::Model) is id-indexed: every edge is
//! an id to look up. A [`UmlModel`] is the same content after dereferencing,
//! stored as an arena of [`UmlNode`]s linked by [`NodeId`] handles. Each
//! canonical entity becomes exactly one node; every path that reaches it is
//! recorded in the node's `references`.
//!
//! ```text
//! UmlModel
//! ├── elements: [NodeId]          top-level packages
//! ├── nodes:    [UmlNode]         arena, addressed by NodeId
//! │     ├── id          canonical id (href string for external datatypes)
//! │     ├── references  every Referrer that reached this node
//! │     └── kind        Package | Enumeration | Datatype | Class
//! │                     | Import | Property | Missing
//! ├── packages:  id → NodeId          one entry per package node
//! ├── classes:   id → NodeId          one entry per class node
//! └── missing_elements: id → NodeId   dangling idrefs
//! ```
//!
//! Self-referencing classes and mutually referencing classes are ordinary
//! cycles in this graph.

mod materialize;

pub use materialize::to_uml;

use indexmap::IndexMap;

use crate::base::ElementId;
use crate::model::{Aggregation, ModelSource};

/// Handle to a node in a [`UmlModel`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Whatever reached a node: the model itself (top-level packages) or
/// another node (a package, class, property, or import).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Referrer {
    Model,
    Node(NodeId),
}

/// One materialized element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UmlNode {
    pub id: ElementId,
    pub references: Vec<Referrer>,
    pub kind: UmlElement,
}

impl UmlNode {
    /// Display name, for kinds that have one.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            UmlElement::Package { name, .. }
            | UmlElement::Enumeration { name, .. }
            | UmlElement::Datatype { name, .. }
            | UmlElement::Class { name, .. }
            | UmlElement::Property { name, .. } => name.as_deref(),
            UmlElement::Import { .. } | UmlElement::Missing => None,
        }
    }

    /// Returns true for a placeholder of a dangling reference.
    pub fn is_missing(&self) -> bool {
        matches!(self.kind, UmlElement::Missing)
    }
}

/// Kind-specific content of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UmlElement {
    Package {
        name: Option<String>,
        elements: Vec<NodeId>,
        comments: Vec<String>,
    },
    Enumeration {
        name: Option<String>,
        values: Vec<String>,
        comments: Vec<String>,
    },
    Datatype {
        name: Option<String>,
        /// Synthesized from an `href` designator rather than declared.
        external: bool,
        comments: Vec<String>,
    },
    Class {
        name: Option<String>,
        is_abstract: bool,
        generalizations: Vec<NodeId>,
        properties: Vec<NodeId>,
        comments: Vec<String>,
    },
    Import {
        target: Option<NodeId>,
    },
    Property {
        name: Option<String>,
        in_class: NodeId,
        /// `None` for a property declared without a type.
        ty: Option<NodeId>,
        lower: String,
        upper: String,
        association: Option<ElementId>,
        aggregation: Option<Aggregation>,
        comments: Vec<String>,
    },
    Missing,
}

/// The materialized object graph of one canonical model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UmlModel {
    pub id: Option<ElementId>,
    pub name: Option<String>,
    pub source: ModelSource,
    /// Top-level packages, in package-hierarchy root order.
    pub elements: Vec<NodeId>,
    pub nodes: Vec<UmlNode>,
    /// Package nodes by canonical id, in creation order.
    pub packages: IndexMap<ElementId, NodeId>,
    /// Class nodes by canonical id, in creation order.
    pub classes: IndexMap<ElementId, NodeId>,
    pub missing_elements: IndexMap<ElementId, NodeId>,
}

impl UmlModel {
    /// Get a node by handle.
    pub fn node(&self, id: NodeId) -> &UmlNode {
        &self.nodes[id.index()]
    }

    /// All nodes with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &UmlNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::new(i), node))
    }

    /// The class node for `id`.
    pub fn class(&self, id: &str) -> Option<(NodeId, &UmlNode)> {
        self.classes.get(id).map(|&n| (n, self.node(n)))
    }

    /// The package node for `id`.
    pub fn package(&self, id: &str) -> Option<(NodeId, &UmlNode)> {
        self.packages.get(id).map(|&n| (n, self.node(n)))
    }

    /// The placeholder node for a dangling id.
    pub fn missing(&self, id: &str) -> Option<&UmlNode> {
        self.missing_elements.get(id).map(|&n| self.node(n))
    }

    /// Nodes of class kind, in creation order.
    pub fn classes(&self) -> impl Iterator<Item = &UmlNode> {
        self.classes.values().map(|&n| self.node(n))
    }
}
