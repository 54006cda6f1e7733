//! Canonical model builder.
//!
//! Compiles a normalized XMI tree into a [`Model`] in one depth-first walk
//! of the package structure, followed by three passes over the result:
//!
//! ```text
//! visit(packagedElement, ancestry)      packages, classes, enums, datatypes,
//!   │                                   associations, imports, views,
//!   │                                   class/package hierarchy edges
//!   ▼
//! resolve_associations                  association → property on the
//!   │                                   class owning the attribute end
//!   ▼
//! index_properties                      property name → all sources
//!   ▼
//! update_referees                       uniformType + back-references
//! ```
//!
//! Duplicate ids and inherited enumerations/datatypes abort the build.
//! Everything else is recorded as a [`Diagnostic`] and the build continues.

mod associations;
mod parse;

use rustc_hash::FxHashMap;

use crate::base::ElementId;
use crate::base::constants::{UML_MODEL, XMI_ROOT};
use crate::config::ParserConfig;
use crate::diagnostics::{Diagnostic, DiagnosticCollector, codes};
use crate::error::InterchangeError;
use crate::interchange::XmiElement;
use crate::model::{
    Association, Class, Datatype, ElementKind, ElementRef, Enumeration, ImportedElement, Model,
    ModelSource, Package, index_properties, update_referees,
};

/// A compiled model together with the non-fatal findings of the build.
#[derive(Clone, Debug)]
pub struct BuildResult {
    pub model: Model,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds a canonical [`Model`] from an XMI element tree.
///
/// A builder is consumed by [`build`](Self::build); its lookup tables never
/// outlive one build.
pub struct ModelBuilder {
    config: ParserConfig,
    resource: Option<String>,
    model: Model,
    diagnostics: DiagnosticCollector,
    /// Owned-attribute id → id of the class owning it, for association ends.
    assoc_src_to_class: FxHashMap<ElementId, ElementId>,
}

impl ModelBuilder {
    /// Create a builder with the given configuration.
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            resource: None,
            model: Model::new(),
            diagnostics: DiagnosticCollector::new(),
            assoc_src_to_class: FxHashMap::default(),
        }
    }

    /// Record the resource name in the model's source.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Compile `document` (an `xmi:XMI` wrapper or a `uml:Model` element).
    pub fn build(mut self, document: &XmiElement) -> Result<BuildResult, InterchangeError> {
        let root = find_model_root(document)?;
        self.model.id = root.id().map(ElementId::from);
        self.model.name = self.parse_name(root);
        self.model.source = ModelSource {
            resource: self.resource.take(),
            view_labels: Vec::new(),
        };

        for sub in root.children("packagedElement") {
            self.visit(sub, &[])?;
        }

        associations::resolve_associations(
            &mut self.model,
            &self.assoc_src_to_class,
            &mut self.diagnostics,
        );
        index_properties(&mut self.model);
        update_referees(&mut self.model);
        self.report_mixed_types();

        tracing::debug!(
            classes = self.model.classes.len(),
            packages = self.model.packages.len(),
            enums = self.model.enums.len(),
            datatypes = self.model.datatypes.len(),
            associations = self.model.associations.len(),
            views = self.model.views.len(),
            "built canonical model"
        );

        Ok(BuildResult {
            model: self.model,
            diagnostics: self.diagnostics.finish(),
        })
    }

    // ========================================================================
    // TRAVERSAL
    // ========================================================================

    /// Visit one packaged element. `parents` is the ancestry chain, nearest
    /// package first.
    fn visit(&mut self, elt: &XmiElement, parents: &[ElementId]) -> Result<(), InterchangeError> {
        let Some(id) = elt.id() else {
            tracing::trace!(tag = %elt.tag, "skipping element without xmi:id");
            return Ok(());
        };
        let id = ElementId::new(id);
        let xmi_type = elt.xmi_type().unwrap_or(elt.tag.as_str());
        let local_type = xmi_type.rsplit(':').next().unwrap_or(xmi_type);

        match local_type {
            "Class" => self.visit_class(elt, id, parents),
            "Enumeration" => self.visit_enumeration(elt, id, parents),
            "DataType" | "PrimitiveType" => self.visit_datatype(elt, id, parents),
            "Model" | "Package" => self.visit_package(elt, id, parents),
            "Association" => self.visit_association(elt, id),
            _ => {
                self.diagnostics.push(
                    Diagnostic::warning(
                        codes::UNKNOWN_ELEMENT_TYPE,
                        format!("need handler for {xmi_type}"),
                    )
                    .with_element(id),
                );
                Ok(())
            }
        }
    }

    fn visit_class(
        &mut self,
        elt: &XmiElement,
        id: ElementId,
        parents: &[ElementId],
    ) -> Result<(), InterchangeError> {
        if self.model.classes.contains_key(&id) {
            return Err(InterchangeError::duplicate("class", id));
        }

        let owned = self.parse_properties(elt.children("ownedAttribute"), &id);
        for attribute_id in owned.associations.keys() {
            self.assoc_src_to_class
                .insert(attribute_id.clone(), id.clone());
        }

        let mut class = Class::new(id.clone(), self.parse_name(elt));
        class.is_abstract = parse::is_abstract(elt);
        class.properties = owned.properties;
        class.associations = owned.associations;
        class.comments = elt.comments();
        class.packages = parents.to_vec();

        // Multiple inheritance: one edge per generalization.
        for generalization in elt.children("generalization") {
            let Some(general) = generalization.attr_or_idref("general") else {
                tracing::trace!(class = %id, "generalization without general");
                continue;
            };
            self.model.class_hierarchy.add(general, id.clone())?;
            class.super_classes.push(ElementId::new(general));
        }

        self.model.add_class(class)?;
        self.list_in_parent(parents, ElementRef::new(ElementKind::Class, id));
        Ok(())
    }

    fn visit_enumeration(
        &mut self,
        elt: &XmiElement,
        id: ElementId,
        parents: &[ElementId],
    ) -> Result<(), InterchangeError> {
        if self.model.enums.contains_key(&id) {
            return Err(InterchangeError::duplicate("enum", id));
        }
        reject_generalization(elt, "enumeration", &id)?;

        let values = elt
            .children("ownedLiteral")
            .iter()
            .filter_map(|literal| self.parse_name(literal))
            .collect();
        let name = self.parse_name(elt);
        self.model.add_enum(Enumeration {
            id: id.clone(),
            name,
            values,
            packages: parents.to_vec(),
            referees: Vec::new(),
            comments: elt.comments(),
        })?;
        self.list_in_parent(parents, ElementRef::new(ElementKind::Enumeration, id));
        Ok(())
    }

    fn visit_datatype(
        &mut self,
        elt: &XmiElement,
        id: ElementId,
        parents: &[ElementId],
    ) -> Result<(), InterchangeError> {
        if self.model.datatypes.contains_key(&id) {
            return Err(InterchangeError::duplicate("datatype", id));
        }
        reject_generalization(elt, "datatype", &id)?;

        let name = self.parse_name(elt);
        self.model.add_datatype(Datatype {
            id: id.clone(),
            name,
            packages: parents.to_vec(),
            referees: Vec::new(),
            comments: elt.comments(),
        })?;
        self.list_in_parent(parents, ElementRef::new(ElementKind::Datatype, id));
        Ok(())
    }

    fn visit_package(
        &mut self,
        elt: &XmiElement,
        id: ElementId,
        parents: &[ElementId],
    ) -> Result<(), InterchangeError> {
        if self.config.is_view_package(&id) {
            // The view container itself is elided from the package hierarchy.
            let views = self.parse_views(elt);
            tracing::debug!(package = %id, count = views.len(), "parsed views");
            self.model.views.extend(views);
            return Ok(());
        }

        let mut package = Package::new(id.clone(), self.parse_name(elt), parents.to_vec());
        package.comments = elt.comments();
        self.model.add_package(package)?;

        match parents.first() {
            None => {
                self.model.package_hierarchy.insert(id.clone());
            }
            Some(_) if self.config.is_excluded_package(&id) => {
                tracing::debug!(package = %id, "skipping excluded package subtree");
                return Ok(());
            }
            Some(parent) => {
                self.model.package_hierarchy.add(parent.clone(), id.clone())?;
                self.list_in_parent(parents, ElementRef::new(ElementKind::Package, id.clone()));
            }
        }

        for import in elt.children("elementImport") {
            let (Some(import_id), Some(idref)) = (import.id(), parse::imported_element(import))
            else {
                tracing::trace!(package = %id, "skipping incomplete elementImport");
                continue;
            };
            let import_id = ElementId::new(import_id);
            self.model.imports.insert(
                import_id.clone(),
                ImportedElement {
                    id: import_id.clone(),
                    idref: ElementId::new(idref),
                },
            );
            if let Some(package) = self.model.packages.get_mut(&id) {
                package
                    .elements
                    .push(ElementRef::new(ElementKind::Import, import_id));
            }
        }

        let mut ancestry = Vec::with_capacity(parents.len() + 1);
        ancestry.push(id);
        ancestry.extend_from_slice(parents);
        for sub in elt.children("packagedElement") {
            self.visit(sub, &ancestry)?;
        }
        Ok(())
    }

    fn visit_association(&mut self, elt: &XmiElement, id: ElementId) -> Result<(), InterchangeError> {
        if self.model.associations.contains_key(&id) {
            return Err(InterchangeError::duplicate("association", id));
        }
        let owned_end = elt.first("ownedEnd").and_then(XmiElement::id);
        let from = parse::member_ends(elt)
            .into_iter()
            .find(|end| Some(*end) != owned_end)
            .map(ElementId::new);

        let association = Association {
            id: id.clone(),
            name: self.parse_name(elt),
            from,
            comments: elt.comments(),
        };
        self.model.associations.insert(id, association);
        Ok(())
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    /// Append `element` to the nearest package's element list.
    fn list_in_parent(&mut self, parents: &[ElementId], element: ElementRef) {
        let Some(parent) = parents.first() else {
            self.diagnostics.push(
                Diagnostic::warning(
                    codes::ELEMENT_OUTSIDE_PACKAGE,
                    format!("{} is not inside any package", element.kind.as_str()),
                )
                .with_element(element.id),
            );
            return;
        };
        if let Some(package) = self.model.packages.get_mut(parent) {
            package.elements.push(element);
        }
    }

    fn report_mixed_types(&mut self) {
        for (name, entry) in &self.model.properties {
            if entry.is_uniform() {
                continue;
            }
            self.diagnostics.push(Diagnostic::info(
                codes::MIXED_PROPERTY_TYPES,
                format!(
                    "property {name} is used with {} types: {}",
                    entry.uniform_type.len(),
                    entry.uniform_type.join(", ")
                ),
            ));
        }
    }
}

/// Locate the `uml:Model` element of a document.
fn find_model_root(document: &XmiElement) -> Result<&XmiElement, InterchangeError> {
    if document.tag == XMI_ROOT {
        return document
            .first(UML_MODEL)
            .ok_or_else(|| InterchangeError::missing_element(UML_MODEL));
    }
    if document.tag == UML_MODEL || document.xmi_type() == Some(UML_MODEL) {
        return Ok(document);
    }
    Err(InterchangeError::missing_element(UML_MODEL))
}

/// Enumerations and datatypes cannot inherit.
fn reject_generalization(
    elt: &XmiElement,
    kind: &'static str,
    id: &ElementId,
) -> Result<(), InterchangeError> {
    match elt.first("generalization") {
        Some(generalization) => Err(InterchangeError::InheritedValueType {
            kind,
            id: id.clone(),
            general: generalization
                .attr_or_idref("general")
                .unwrap_or_default()
                .to_string(),
        }),
        None => Ok(()),
    }
}
