//! Canonical, id-indexed UML model.
//!
//! Every entity kind lives in its own arena keyed by id; relations between
//! entities are id-to-id edges, never embedded copies.
//!
//! ```text
//! Model
//! ├── packages:     IndexMap<ElementId, Package>
//! ├── classes:      IndexMap<ElementId, Class>       (owns PropertyRecords)
//! ├── properties:   IndexMap<String, PropertyIndexEntry>   (by property name)
//! ├── enums:        IndexMap<ElementId, Enumeration>
//! ├── datatypes:    IndexMap<ElementId, Datatype>
//! ├── imports:      IndexMap<ElementId, ImportedElement>
//! ├── associations: IndexMap<ElementId, Association>
//! ├── class_hierarchy / package_hierarchy: Hierarchy
//! └── views:        Vec<View>
//! ```
//!
//! `IndexMap` keeps insertion order so iteration and serialization are
//! deterministic.

mod index;
mod property;
mod records;

pub use index::{find_minimal_types, index_properties, update_referees};
pub use property::{Aggregation, PropertyRecord, Target, normalize_upper};
pub use records::{
    AssocRef, Association, Class, Datatype, ElementKind, ElementRef, Enumeration,
    ImportedElement, ModelSource, Package, PropertyIndexEntry, PropertySource, Referee, View,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::base::ElementId;
use crate::error::InterchangeError;
use crate::hierarchy::Hierarchy;

/// Kind of entity a property target can resolve to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferentKind {
    Class,
    Enumeration,
    Datatype,
}

/// The canonical model graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub source: ModelSource,
    #[serde(default)]
    pub packages: IndexMap<ElementId, Package>,
    #[serde(default)]
    pub classes: IndexMap<ElementId, Class>,
    #[serde(default)]
    pub properties: IndexMap<String, PropertyIndexEntry>,
    #[serde(default)]
    pub enums: IndexMap<ElementId, Enumeration>,
    #[serde(default)]
    pub datatypes: IndexMap<ElementId, Datatype>,
    #[serde(default)]
    pub imports: IndexMap<ElementId, ImportedElement>,
    #[serde(default)]
    pub associations: IndexMap<ElementId, Association>,
    #[serde(default)]
    pub class_hierarchy: Hierarchy,
    #[serde(default)]
    pub package_hierarchy: Hierarchy,
    #[serde(default)]
    pub views: Vec<View>,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep copy of the model sharing no state with `self`.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    // ── Insertion ───────────────────────────────────────────────────

    /// Add a class; a second class with the same id is an error.
    pub fn add_class(&mut self, class: Class) -> Result<(), InterchangeError> {
        if self.classes.contains_key(&class.id) {
            return Err(InterchangeError::duplicate("class", class.id));
        }
        self.classes.insert(class.id.clone(), class);
        Ok(())
    }

    /// Add an enumeration; a second enumeration with the same id is an error.
    pub fn add_enum(&mut self, enumeration: Enumeration) -> Result<(), InterchangeError> {
        if self.enums.contains_key(&enumeration.id) {
            return Err(InterchangeError::duplicate("enum", enumeration.id));
        }
        self.enums.insert(enumeration.id.clone(), enumeration);
        Ok(())
    }

    /// Add a datatype; a second datatype with the same id is an error.
    pub fn add_datatype(&mut self, datatype: Datatype) -> Result<(), InterchangeError> {
        if self.datatypes.contains_key(&datatype.id) {
            return Err(InterchangeError::duplicate("datatype", datatype.id));
        }
        self.datatypes.insert(datatype.id.clone(), datatype);
        Ok(())
    }

    /// Add a package; a second package with the same id is an error.
    pub fn add_package(&mut self, package: Package) -> Result<(), InterchangeError> {
        if self.packages.contains_key(&package.id) {
            return Err(InterchangeError::duplicate("package", package.id));
        }
        self.packages.insert(package.id.clone(), package);
        Ok(())
    }

    // ── Lookup ──────────────────────────────────────────────────────

    /// Get a class by id.
    pub fn class(&self, id: &str) -> Option<&Class> {
        self.classes.get(id)
    }

    /// Get a package by id.
    pub fn package(&self, id: &str) -> Option<&Package> {
        self.packages.get(id)
    }

    /// Resolve a property target key to the kind of entity it names.
    pub fn referent_kind(&self, key: &str) -> Option<ReferentKind> {
        if self.classes.contains_key(key) {
            Some(ReferentKind::Class)
        } else if self.enums.contains_key(key) {
            Some(ReferentKind::Enumeration)
        } else if self.datatypes.contains_key(key) {
            Some(ReferentKind::Datatype)
        } else {
            None
        }
    }

    /// Back-references recorded on a class, enumeration, or datatype.
    pub fn referees(&self, id: &str) -> Option<&[Referee]> {
        match self.referent_kind(id)? {
            ReferentKind::Class => self.classes.get(id).map(|c| c.referees.as_slice()),
            ReferentKind::Enumeration => self.enums.get(id).map(|e| e.referees.as_slice()),
            ReferentKind::Datatype => self.datatypes.get(id).map(|d| d.referees.as_slice()),
        }
    }

    pub(crate) fn referees_mut(&mut self, id: &str) -> Option<&mut Vec<Referee>> {
        match self.referent_kind(id)? {
            ReferentKind::Class => self.classes.get_mut(id).map(|c| &mut c.referees),
            ReferentKind::Enumeration => self.enums.get_mut(id).map(|e| &mut e.referees),
            ReferentKind::Datatype => self.datatypes.get_mut(id).map(|d| &mut d.referees),
        }
    }

    /// Resolve a property handle from the property-name index.
    pub fn property(&self, source: &PropertySource) -> Option<&PropertyRecord> {
        self.classes
            .get(&source.class_id)?
            .properties
            .get(source.index)
    }

    /// All properties sharing `name`, across every class.
    pub fn properties_named<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = &'a PropertyRecord> + 'a {
        self.properties
            .get(name)
            .into_iter()
            .flat_map(|entry| entry.sources.iter())
            .filter_map(|source| self.property(source))
    }

    /// Find a view by name.
    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name.as_deref() == Some(name))
    }
}
