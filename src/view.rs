//! View extraction: a self-contained sub-model for a set of named views.
//!
//! A view model contains the views' member classes with their transitive
//! superclasses, every enumeration and datatype those classes use, and
//! optionally the classes they reference. Each entity is copied with its
//! package ancestry, so the sub-model materializes on its own.
//!
//! ```text
//! seed   = members ∪ superclasses(members)
//! expand(ids, follow_parents):
//!   for id in ids, once per id:
//!     copy class, its value types, and their package chains
//!     next = referenced classes           (if follow_referenced_classes)
//!          ∪ direct superclasses          (if follow_parents)
//!     expand(next, follow_referent_hierarchy)
//! ```

use crate::base::ElementId;
use crate::error::InterchangeError;
use crate::model::{
    Class, Datatype, ElementKind, ElementRef, Enumeration, Model, ModelSource, Package,
    index_properties, update_referees,
};

/// How far a view extraction follows class references.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Pull in classes that included classes' properties are typed by.
    pub follow_referenced_classes: bool,
    /// Also pull in the superclasses of classes reached by reference.
    pub follow_referent_hierarchy: bool,
}

impl ViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn follow_referenced_classes(mut self, follow: bool) -> Self {
        self.follow_referenced_classes = follow;
        self
    }

    pub fn follow_referent_hierarchy(mut self, follow: bool) -> Self {
        self.follow_referent_hierarchy = follow;
        self
    }
}

/// Extract the sub-model for the views named in `view_names`.
///
/// `source` becomes the result's source, with `view_names` as its view
/// labels. Names that match no view contribute nothing. The input model is
/// not modified.
pub fn get_view<S: AsRef<str>>(
    model: &Model,
    source: &ModelSource,
    view_names: &[S],
    options: ViewOptions,
) -> Result<Model, InterchangeError> {
    let labels: Vec<String> = view_names.iter().map(|n| n.as_ref().to_string()).collect();

    let mut extractor = ViewExtractor {
        source: model,
        options,
        view: Model {
            id: model.id.clone(),
            name: model.name.clone(),
            source: ModelSource {
                resource: source.resource.clone(),
                view_labels: labels.clone(),
            },
            views: model
                .views
                .iter()
                .filter(|v| v.name.as_ref().is_some_and(|name| labels.contains(name)))
                .cloned()
                .collect(),
            ..Model::default()
        },
    };

    let mut seed: Vec<ElementId> = Vec::new();
    for view in &extractor.view.views {
        for member in &view.members {
            if !seed.contains(member) {
                seed.push(member.clone());
            }
            for parent in model.class_hierarchy.parents_of(member) {
                if !seed.contains(parent) {
                    seed.push(parent.clone());
                }
            }
        }
    }

    extractor.add_dependent_classes(&seed, true)?;

    let mut view = extractor.view;
    index_properties(&mut view);
    update_referees(&mut view);

    tracing::debug!(
        views = ?view.source.view_labels,
        classes = view.classes.len(),
        enums = view.enums.len(),
        datatypes = view.datatypes.len(),
        packages = view.packages.len(),
        "extracted view"
    );
    Ok(view)
}

/// Working state of one extraction. The `view` arenas double as the memo
/// tables: an id present there is never expanded again.
struct ViewExtractor<'a> {
    source: &'a Model,
    options: ViewOptions,
    view: Model,
}

impl ViewExtractor<'_> {
    fn add_dependent_classes(
        &mut self,
        class_ids: &[ElementId],
        follow_parents: bool,
    ) -> Result<(), InterchangeError> {
        let source = self.source;
        for class_id in class_ids {
            if self.view.classes.contains_key(class_id) {
                continue;
            }
            let Some(old) = source.classes.get(class_id) else {
                tracing::warn!(class = %class_id, "view member is not a class of the model");
                continue;
            };

            let mut class = Class::new(old.id.clone(), old.name.clone());
            class.is_abstract = old.is_abstract;
            class.properties = old.properties.clone();
            class.super_classes = old.super_classes.clone();
            class.comments = old.comments.clone();
            class.packages = old.packages.clone();
            self.view.classes.insert(class_id.clone(), class);

            let mut next: Vec<ElementId> = Vec::new();
            for property in &old.properties {
                let Some(target) = property.target.as_ref() else {
                    continue;
                };
                let key = target.key();
                if source.enums.contains_key(key) {
                    self.copy_enum(key)?;
                }
                if source.datatypes.contains_key(key) {
                    self.copy_datatype(key)?;
                }
                if self.options.follow_referenced_classes && source.classes.contains_key(key) {
                    next.push(ElementId::new(key));
                }
            }

            self.add_packages(&old.packages)?;
            self.list_in_package(&old.packages, ElementKind::Class, &old.id);
            for super_class in &old.super_classes {
                self.view
                    .class_hierarchy
                    .add(super_class.clone(), old.id.clone())?;
            }

            if follow_parents {
                next.extend(old.super_classes.iter().cloned());
            }
            self.add_dependent_classes(&next, self.options.follow_referent_hierarchy)?;
        }
        Ok(())
    }

    fn copy_enum(&mut self, id: &str) -> Result<(), InterchangeError> {
        let source = self.source;
        let Some(old) = source.enums.get(id) else {
            return Ok(());
        };
        if self.view.enums.contains_key(id) {
            return Ok(());
        }
        self.view.enums.insert(
            old.id.clone(),
            Enumeration {
                id: old.id.clone(),
                name: old.name.clone(),
                values: old.values.clone(),
                packages: old.packages.clone(),
                referees: Vec::new(),
                comments: old.comments.clone(),
            },
        );
        self.add_packages(&old.packages)?;
        self.list_in_package(&old.packages, ElementKind::Enumeration, &old.id);
        Ok(())
    }

    fn copy_datatype(&mut self, id: &str) -> Result<(), InterchangeError> {
        let source = self.source;
        let Some(old) = source.datatypes.get(id) else {
            return Ok(());
        };
        if self.view.datatypes.contains_key(id) {
            return Ok(());
        }
        self.view.datatypes.insert(
            old.id.clone(),
            Datatype {
                id: old.id.clone(),
                name: old.name.clone(),
                packages: old.packages.clone(),
                referees: Vec::new(),
                comments: old.comments.clone(),
            },
        );
        self.add_packages(&old.packages)?;
        self.list_in_package(&old.packages, ElementKind::Datatype, &old.id);
        Ok(())
    }

    /// Recreate an ancestry chain (nearest first) and link adjacent pairs.
    ///
    /// A package created here is also listed in its parent, so the view's
    /// object graph reaches it from the top-level package.
    fn add_packages(&mut self, chain: &[ElementId]) -> Result<(), InterchangeError> {
        let source = self.source;
        let mut created = Vec::with_capacity(chain.len());
        for package_id in chain {
            if self.view.packages.contains_key(package_id) {
                created.push(false);
                continue;
            }
            let Some(old) = source.packages.get(package_id) else {
                tracing::trace!(package = %package_id, "ancestor package not in model");
                created.push(false);
                continue;
            };
            let mut package = Package::new(package_id.clone(), old.name.clone(), old.packages.clone());
            package.comments = old.comments.clone();
            self.view.packages.insert(package_id.clone(), package);
            created.push(true);
        }

        for (i, pair) in chain.windows(2).enumerate() {
            let (child, parent) = (&pair[0], &pair[1]);
            self.view.package_hierarchy.add(parent.clone(), child.clone())?;
            if created[i] {
                if let Some(package) = self.view.packages.get_mut(parent) {
                    package
                        .elements
                        .push(ElementRef::new(ElementKind::Package, child.clone()));
                }
            }
        }
        if let Some(outermost) = chain.last() {
            self.view.package_hierarchy.insert(outermost.clone());
        }
        Ok(())
    }

    fn list_in_package(&mut self, chain: &[ElementId], kind: ElementKind, id: &ElementId) {
        let Some(package) = chain.first().and_then(|p| self.view.packages.get_mut(p)) else {
            return;
        };
        package.elements.push(ElementRef::new(kind, id.clone()));
    }
}
