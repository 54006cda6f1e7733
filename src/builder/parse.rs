//! Field-level parsing of XMI elements.

use indexmap::IndexMap;

use super::ModelBuilder;
use crate::base::ElementId;
use crate::base::constants::{DEFAULT_LOWER, UPPER_UNLIMITED};
use crate::diagnostics::{Diagnostic, codes};
use crate::interchange::XmiElement;
use crate::model::{Aggregation, AssocRef, PropertyRecord, Target, View};

/// Properties and association links parsed from a class's owned attributes.
pub(super) struct OwnedAttributes {
    pub properties: Vec<PropertyRecord>,
    pub associations: IndexMap<ElementId, AssocRef>,
}

impl ModelBuilder {
    /// Element name (attribute or child), mapped through the configuration.
    pub(super) fn parse_name(&self, elt: &XmiElement) -> Option<String> {
        elt.attr_or_text("name")
            .filter(|raw| !raw.is_empty())
            .map(|raw| self.config.display_name(raw))
    }

    /// Parse `ownedAttribute` elements of class `class_id`.
    pub(super) fn parse_properties(
        &mut self,
        elts: &[XmiElement],
        class_id: &ElementId,
    ) -> OwnedAttributes {
        let mut owned = OwnedAttributes {
            properties: Vec::with_capacity(elts.len()),
            associations: IndexMap::new(),
        };

        for (index, elt) in elts.iter().enumerate() {
            let id = match elt.id() {
                Some(id) => ElementId::new(id),
                None => ElementId::new(format!("{class_id}-ownedAttribute-{index}")),
            };
            let name = self.parse_name(elt);

            let type_elt = elt.first("type");
            let idref = type_elt
                .and_then(XmiElement::idref)
                .or_else(|| elt.attr("type"))
                .map(ElementId::new);
            let href = type_elt
                .and_then(|t| t.attr("href"))
                .map(|href| self.config.normalize(href));
            let target = match (href, &idref) {
                (Some(href), _) => Some(Target::Href(href)),
                (None, Some(idref)) => Some(Target::Idref(idref.clone())),
                (None, None) => {
                    self.diagnostics.push(
                        Diagnostic::warning(
                            codes::MISSING_PROPERTY_TYPE,
                            format!("property in class {class_id} has no type"),
                        )
                        .with_element(id.clone()),
                    );
                    None
                }
            };

            let lower = elt
                .first("lowerValue")
                .and_then(parse_value)
                .unwrap_or(DEFAULT_LOWER)
                .to_string();
            let upper = elt
                .first("upperValue")
                .and_then(parse_value)
                .unwrap_or(UPPER_UNLIMITED)
                .to_string();
            let comments = elt.comments();

            let aggregation = elt.attr_or_text("aggregation").map(Aggregation::parse);
            if let Some(Aggregation::Other(value)) = &aggregation {
                self.diagnostics.push(
                    Diagnostic::warning(
                        codes::UNKNOWN_AGGREGATION,
                        format!("unknown aggregation kind {value}"),
                    )
                    .with_element(id.clone()),
                );
            }

            let mut record = PropertyRecord::new(
                id.clone(),
                class_id.clone(),
                name.clone(),
                target,
                lower,
                upper,
            )
            .with_comments(comments.clone());
            record.aggregation = aggregation.clone();

            if elt.attr_or_idref("association").is_some() {
                owned.associations.insert(
                    id.clone(),
                    AssocRef {
                        id: id.clone(),
                        name,
                        class_id: class_id.clone(),
                        target: idref,
                        lower: record.lower.clone(),
                        upper: record.upper.clone(),
                        comments,
                        aggregation,
                        property: owned.properties.len(),
                    },
                );
            } else if name.is_none() {
                self.diagnostics.push(
                    Diagnostic::warning(
                        codes::UNNAMED_PROPERTY,
                        format!("property in class {class_id} has no name"),
                    )
                    .with_element(id.clone()),
                );
            } else if self.config.check_property_name_case
                && name
                    .as_deref()
                    .and_then(|n| n.chars().next())
                    .is_some_and(char::is_uppercase)
            {
                self.diagnostics.push(
                    Diagnostic::warning(
                        codes::PROPERTY_NAME_CASE,
                        format!(
                            "unexpected initial capital in property name {} in class {class_id}",
                            name.as_deref().unwrap_or_default()
                        ),
                    )
                    .with_element(id.clone()),
                );
            }

            owned.properties.push(record);
        }
        owned
    }

    /// Parse the children of a view container package as views.
    pub(super) fn parse_views(&self, elt: &XmiElement) -> Vec<View> {
        elt.children("packagedElement")
            .iter()
            .filter_map(|view| {
                let id = view.id()?;
                Some(View {
                    id: ElementId::new(id),
                    name: self.parse_name(view),
                    members: view
                        .children("elementImport")
                        .iter()
                        .filter_map(imported_element)
                        .map(ElementId::new)
                        .collect(),
                    comments: view.comments(),
                })
            })
            .collect()
    }
}

/// `isAbstract` as attribute or child text.
pub(super) fn is_abstract(elt: &XmiElement) -> bool {
    elt.attr_or_text("isAbstract") == Some("true")
}

/// Target of an `elementImport`.
pub(super) fn imported_element(import: &XmiElement) -> Option<&str> {
    import.attr_or_idref("importedElement")
}

/// Member end ids of an association: `memberEnd` children, then the
/// space-separated `memberEnd` attribute.
pub(super) fn member_ends(elt: &XmiElement) -> Vec<&str> {
    let mut ends: Vec<&str> = elt
        .children("memberEnd")
        .iter()
        .filter_map(XmiElement::idref)
        .collect();
    if let Some(attr) = elt.attr("memberEnd") {
        ends.extend(attr.split_whitespace());
    }
    ends
}

/// `value` of a multiplicity element, as attribute or child text.
fn parse_value(elt: &XmiElement) -> Option<&str> {
    elt.attr_or_text("value")
}
