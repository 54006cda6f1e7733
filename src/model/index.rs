//! Property-name index and referee (back-reference) pass.

use super::records::{PropertyIndexEntry, PropertySource, Referee};
use super::Model;
use crate::base::constants::UNNAMED_PROPERTY_KEY;

/// Rebuild `model.properties`: every property of every class, grouped by
/// property name, in class then property order.
///
/// Unnamed properties share the [`UNNAMED_PROPERTY_KEY`] entry.
pub fn index_properties(model: &mut Model) {
    model.properties.clear();
    for (class_id, class) in &model.classes {
        for (index, property) in class.properties.iter().enumerate() {
            let name = property.name.as_deref().unwrap_or(UNNAMED_PROPERTY_KEY);
            model
                .properties
                .entry(name.to_string())
                .or_default()
                .sources
                .push(PropertySource {
                    class_id: class_id.clone(),
                    index,
                });
        }
    }
}

/// Distinct targets used by the sources of one index entry, in order of
/// first appearance.
pub fn find_minimal_types(model: &Model, entry: &PropertyIndexEntry) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for source in &entry.sources {
        let Some(target) = model.property(source).and_then(|p| p.target.as_ref()) else {
            continue;
        };
        if !types.iter().any(|t| t == target.key()) {
            types.push(target.key().to_string());
        }
    }
    types
}

/// Recompute `uniform_type` for every index entry and rebuild the referee
/// lists of every class, enumeration, and datatype from scratch.
///
/// Targets that resolve to nothing are skipped; they surface later as
/// missing elements when the model is materialized.
pub fn update_referees(model: &mut Model) {
    for class in model.classes.values_mut() {
        class.referees.clear();
    }
    for enumeration in model.enums.values_mut() {
        enumeration.referees.clear();
    }
    for datatype in model.datatypes.values_mut() {
        datatype.referees.clear();
    }

    let mut edges: Vec<(String, Referee)> = Vec::new();
    let mut uniform: Vec<Vec<String>> = Vec::with_capacity(model.properties.len());
    for (prop_name, entry) in &model.properties {
        uniform.push(find_minimal_types(model, entry));
        for source in &entry.sources {
            let Some(target) = model.property(source).and_then(|p| p.target.as_ref()) else {
                continue;
            };
            edges.push((
                target.key().to_string(),
                Referee::new(source.class_id.clone(), prop_name.clone()),
            ));
        }
    }

    for (entry, types) in model.properties.values_mut().zip(uniform) {
        entry.uniform_type = types;
    }
    for (key, referee) in edges {
        match model.referees_mut(&key) {
            Some(referees) => referees.push(referee),
            None => tracing::trace!(key = %key, "referent not found"),
        }
    }
}
