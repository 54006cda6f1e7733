//! Canonical model → UML object graph.
//!
//! One constructor per element kind, each backed by a memo table keyed by
//! canonical id. A constructor registers its node *before* any child is
//! resolved, so a property typed by its own class (or by a class that is
//! still being built) hits the memo instead of building it again.
//!
//! Packages and classes are expanded from an explicit stack of [`Frame`]s
//! rather than by recursion. Children are still resolved depth first, one
//! at a time, so node creation and reference order match a recursive walk,
//! but a chain of property references of any length uses constant native
//! stack.

use rustc_hash::FxHashMap;

use super::{NodeId, Referrer, UmlElement, UmlModel, UmlNode};
use crate::base::ElementId;
use crate::model::{Class, ElementKind, ElementRef, Model, Package, PropertyRecord, Target};

/// Materialize `model` into an object graph rooted at its top-level
/// packages.
///
/// Dangling idrefs become `Missing` nodes and `href` targets become
/// external datatype nodes; neither is an error.
pub fn to_uml(model: &Model) -> UmlModel {
    let mut materializer = Materializer::new(model);
    let mut roots = Vec::new();
    for id in model.package_hierarchy.roots() {
        roots.push(materializer.create_package(id, Referrer::Model));
        materializer.drain();
    }

    let mut out = materializer.out;
    out.elements = roots;
    tracing::debug!(
        nodes = out.nodes.len(),
        missing = out.missing_elements.len(),
        "materialized model"
    );
    out
}

/// A node whose children are still being resolved. The child lists grow
/// one entry per step; their length is the cursor into the record.
enum Frame<'a> {
    Package {
        node: NodeId,
        record: &'a Package,
        elements: Vec<NodeId>,
    },
    Class {
        node: NodeId,
        record: &'a Class,
        generalizations: Vec<NodeId>,
        properties: Vec<NodeId>,
    },
}

struct Materializer<'a> {
    model: &'a Model,
    /// Packages, classes and missing elements are memoized on the output.
    out: UmlModel,
    enums: FxHashMap<ElementId, NodeId>,
    /// Declared datatypes and `href` designators share one table.
    datatypes: FxHashMap<ElementId, NodeId>,
    imports: FxHashMap<ElementId, NodeId>,
    stack: Vec<Frame<'a>>,
}

impl<'a> Materializer<'a> {
    fn new(model: &'a Model) -> Self {
        Self {
            model,
            out: UmlModel {
                id: model.id.clone(),
                name: model.name.clone(),
                source: model.source.clone(),
                ..UmlModel::default()
            },
            enums: FxHashMap::default(),
            datatypes: FxHashMap::default(),
            imports: FxHashMap::default(),
            stack: Vec::new(),
        }
    }

    // ========================================================================
    // ARENA
    // ========================================================================

    fn push(&mut self, id: ElementId, referrer: Referrer, kind: UmlElement) -> NodeId {
        let node = NodeId::new(self.out.nodes.len());
        self.out.nodes.push(UmlNode {
            id,
            references: vec![referrer],
            kind,
        });
        node
    }

    fn add_reference(&mut self, node: NodeId, referrer: Referrer) -> NodeId {
        self.out.nodes[node.index()].references.push(referrer);
        node
    }

    fn kind_mut(&mut self, node: NodeId) -> &mut UmlElement {
        &mut self.out.nodes[node.index()].kind
    }

    // ========================================================================
    // WORKLIST
    // ========================================================================

    /// Run frames until the stack is empty. A frame with children left goes
    /// back below whatever its last step pushed, so the newest node is
    /// always expanded first.
    fn drain(&mut self) {
        while let Some(frame) = self.stack.pop() {
            let depth = self.stack.len();
            if let Some(frame) = self.step(frame) {
                self.stack.insert(depth, frame);
            }
        }
    }

    /// Resolve the next child of `frame`, or write back its child lists
    /// once all are resolved.
    fn step(&mut self, frame: Frame<'a>) -> Option<Frame<'a>> {
        match frame {
            Frame::Package {
                node,
                record,
                mut elements,
            } => match record.elements.get(elements.len()) {
                Some(element) => {
                    elements.push(self.map_element_ref(element, Referrer::Node(node)));
                    Some(Frame::Package {
                        node,
                        record,
                        elements,
                    })
                }
                None => {
                    if let UmlElement::Package { elements: e, .. } = self.kind_mut(node) {
                        *e = elements;
                    }
                    None
                }
            },
            Frame::Class {
                node,
                record,
                mut generalizations,
                mut properties,
            } => {
                if let Some(general) = record.super_classes.get(generalizations.len()) {
                    generalizations.push(self.resolve_idref(general, Referrer::Node(node)));
                } else if let Some(property) = record.properties.get(properties.len()) {
                    properties.push(self.create_property(property, node));
                } else {
                    if let UmlElement::Class {
                        generalizations: g,
                        properties: p,
                        ..
                    } = self.kind_mut(node)
                    {
                        *g = generalizations;
                        *p = properties;
                    }
                    return None;
                }
                Some(Frame::Class {
                    node,
                    record,
                    generalizations,
                    properties,
                })
            }
        }
    }

    // ========================================================================
    // DISPATCH
    // ========================================================================

    fn map_element_ref(&mut self, element: &ElementRef, referrer: Referrer) -> NodeId {
        match element.kind {
            ElementKind::Import => self.follow_import(&element.id, referrer),
            ElementKind::Package => self.create_package(&element.id, referrer),
            ElementKind::Enumeration => self.create_enumeration(&element.id, referrer),
            ElementKind::Datatype => self.create_datatype(&element.id, referrer),
            ElementKind::Class => self.create_class(&element.id, referrer),
        }
    }

    /// Resolve an id against every arena; unknown ids become `Missing`.
    fn resolve_idref(&mut self, id: &ElementId, referrer: Referrer) -> NodeId {
        if self.model.packages.contains_key(id) {
            self.create_package(id, referrer)
        } else if self.model.enums.contains_key(id) {
            self.create_enumeration(id, referrer)
        } else if self.model.datatypes.contains_key(id) {
            self.create_datatype(id, referrer)
        } else if self.model.classes.contains_key(id) {
            self.create_class(id, referrer)
        } else {
            self.create_missing(id, referrer)
        }
    }

    fn map_target(&mut self, target: &Target, referrer: Referrer) -> NodeId {
        match target {
            Target::Href(href) => self.create_external_datatype(href, referrer),
            Target::Idref(id) => self.resolve_idref(id, referrer),
        }
    }

    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Creates the package node and queues its elements.
    fn create_package(&mut self, id: &ElementId, referrer: Referrer) -> NodeId {
        if let Some(&node) = self.out.packages.get(id) {
            return self.add_reference(node, referrer);
        }
        let model = self.model;
        let Some(record) = model.packages.get(id) else {
            return self.create_missing(id, referrer);
        };

        let node = self.push(
            id.clone(),
            referrer,
            UmlElement::Package {
                name: record.name.clone(),
                elements: Vec::new(),
                comments: record.comments.clone(),
            },
        );
        self.out.packages.insert(id.clone(), node);
        self.stack.push(Frame::Package {
            node,
            record,
            elements: Vec::with_capacity(record.elements.len()),
        });
        node
    }

    fn create_enumeration(&mut self, id: &ElementId, referrer: Referrer) -> NodeId {
        if let Some(&node) = self.enums.get(id) {
            return self.add_reference(node, referrer);
        }
        let model = self.model;
        let Some(record) = model.enums.get(id) else {
            return self.create_missing(id, referrer);
        };
        let node = self.push(
            id.clone(),
            referrer,
            UmlElement::Enumeration {
                name: record.name.clone(),
                values: record.values.clone(),
                comments: record.comments.clone(),
            },
        );
        self.enums.insert(id.clone(), node);
        node
    }

    fn create_datatype(&mut self, id: &ElementId, referrer: Referrer) -> NodeId {
        if let Some(&node) = self.datatypes.get(id) {
            return self.add_reference(node, referrer);
        }
        let model = self.model;
        let Some(record) = model.datatypes.get(id) else {
            return self.create_missing(id, referrer);
        };
        let node = self.push(
            id.clone(),
            referrer,
            UmlElement::Datatype {
                name: record.name.clone(),
                external: false,
                comments: record.comments.clone(),
            },
        );
        self.datatypes.insert(id.clone(), node);
        node
    }

    /// A datatype named by an `href` designator, keyed by the designator.
    fn create_external_datatype(&mut self, href: &str, referrer: Referrer) -> NodeId {
        if let Some(&node) = self.datatypes.get(href) {
            return self.add_reference(node, referrer);
        }
        let id = ElementId::new(href);
        let node = self.push(
            id.clone(),
            referrer,
            UmlElement::Datatype {
                name: Some(href.to_string()),
                external: true,
                comments: Vec::new(),
            },
        );
        self.datatypes.insert(id, node);
        node
    }

    /// Creates the class node and queues its generalizations, then its
    /// properties.
    fn create_class(&mut self, id: &ElementId, referrer: Referrer) -> NodeId {
        if let Some(&node) = self.out.classes.get(id) {
            return self.add_reference(node, referrer);
        }
        let model = self.model;
        let Some(record) = model.classes.get(id) else {
            return self.create_missing(id, referrer);
        };

        let node = self.push(
            id.clone(),
            referrer,
            UmlElement::Class {
                name: record.name.clone(),
                is_abstract: record.is_abstract,
                generalizations: Vec::new(),
                properties: Vec::new(),
                comments: record.comments.clone(),
            },
        );
        self.out.classes.insert(id.clone(), node);
        self.stack.push(Frame::Class {
            node,
            record,
            generalizations: Vec::with_capacity(record.super_classes.len()),
            properties: Vec::with_capacity(record.properties.len()),
        });
        node
    }

    /// Properties are reached only through their class, which is memoized,
    /// so each property is built once.
    fn create_property(&mut self, record: &PropertyRecord, in_class: NodeId) -> NodeId {
        let node = self.push(
            record.id.clone(),
            Referrer::Node(in_class),
            UmlElement::Property {
                name: record.name.clone(),
                in_class,
                ty: None,
                lower: record.lower.clone(),
                upper: record.upper.clone(),
                association: record.association.clone(),
                aggregation: record.aggregation.clone(),
                comments: record.comments.clone(),
            },
        );
        let resolved = record
            .target
            .as_ref()
            .map(|target| self.map_target(target, Referrer::Node(node)));
        if let UmlElement::Property { ty, .. } = self.kind_mut(node) {
            *ty = resolved;
        }
        node
    }

    fn follow_import(&mut self, id: &ElementId, referrer: Referrer) -> NodeId {
        if let Some(&node) = self.imports.get(id) {
            return self.add_reference(node, referrer);
        }
        let node = self.push(id.clone(), referrer, UmlElement::Import { target: None });
        self.imports.insert(id.clone(), node);

        let model = self.model;
        let resolved = match model.imports.get(id) {
            Some(record) => Some(self.resolve_idref(&record.idref, Referrer::Node(node))),
            None => {
                tracing::warn!(import = %id, "package lists an unknown import");
                None
            }
        };
        if let UmlElement::Import { target } = self.kind_mut(node) {
            *target = resolved;
        }
        node
    }

    fn create_missing(&mut self, id: &ElementId, referrer: Referrer) -> NodeId {
        if let Some(&node) = self.out.missing_elements.get(id) {
            return self.add_reference(node, referrer);
        }
        tracing::debug!(id = %id, "dangling reference");
        let node = self.push(id.clone(), referrer, UmlElement::Missing);
        self.out.missing_elements.insert(id.clone(), node);
        node
    }
}
