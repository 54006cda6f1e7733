//! Association resolution: every association becomes the property on the
//! class that owns its attribute end.

use rustc_hash::FxHashMap;

use crate::base::ElementId;
use crate::diagnostics::{Diagnostic, DiagnosticCollector, codes};
use crate::model::Model;

/// Resolve every association into the linked property of its owning class.
///
/// The property keeps its identity and target; its name becomes the
/// attribute's own name or else the association's name, its comments are
/// the attribute's followed by the association's, and the attribute's
/// aggregation is carried over.
pub(super) fn resolve_associations(
    model: &mut Model,
    assoc_src_to_class: &FxHashMap<ElementId, ElementId>,
    diagnostics: &mut DiagnosticCollector,
) {
    let Model {
        associations,
        classes,
        ..
    } = model;

    for association in associations.values() {
        let owner = association
            .from
            .as_ref()
            .and_then(|from| Some((from, assoc_src_to_class.get(from)?)))
            .and_then(|(from, class_id)| Some((from, classes.get_mut(class_id)?)));
        let Some((from, class)) = owner else {
            diagnostics.push(
                Diagnostic::warning(
                    codes::UNRESOLVED_ASSOCIATION_END,
                    format!(
                        "association end {} is not an attribute of any class",
                        association.from.as_ref().map_or("<none>", ElementId::as_str)
                    ),
                )
                .with_element(association.id.clone()),
            );
            continue;
        };
        let Some(aref) = class.associations.get(from) else {
            continue;
        };

        let name = aref.name.clone().or_else(|| association.name.clone());
        let mut comments = aref.comments.clone();
        comments.extend(association.comments.iter().cloned());
        let aggregation = aref.aggregation.clone();
        let index = aref.property;

        match class.properties.get_mut(index) {
            Some(property) => {
                property.name = name;
                property.comments = comments;
                if aggregation.is_some() {
                    property.aggregation = aggregation;
                }
                property.association = Some(association.id.clone());
                tracing::trace!(
                    class = %property.class_id,
                    property = ?property.name,
                    association = %association.id,
                    "resolved association"
                );
            }
            None => tracing::warn!(
                association = %association.id,
                index,
                "association link points past the class's properties"
            ),
        }
    }
}
