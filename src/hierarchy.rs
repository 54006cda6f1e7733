//! Incremental transitive closure over a parent → child relation.
//!
//! Used twice per model: once for class generalization (superclass →
//! subclass) and once for package containment (package → nested package).
//!
//! Each node keeps an explicit ancestor set and descendant set. Adding an
//! edge unions the new reachability into every affected node instead of
//! recomputing the closure:
//!
//! ```text
//! add(P, C):
//!   for a in {P} ∪ parents(P):   children(a) ∪= {C} ∪ children(C)
//!   for d in {C} ∪ children(C):  parents(d)  ∪= {P} ∪ parents(P)
//! ```
//!
//! Edges that would close a cycle are rejected, so the closure is always a
//! DAG closure and every traversal over it terminates.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::base::ElementId;
use crate::error::InterchangeError;

/// Transitively closed parent/child relation with insertion-ordered sets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    /// Nodes that have never appeared as a child.
    pub roots: IndexSet<ElementId>,
    /// All ancestors of each node, nearest edges first.
    pub parents: IndexMap<ElementId, IndexSet<ElementId>>,
    /// All descendants of each node.
    pub children: IndexMap<ElementId, IndexSet<ElementId>>,
}

impl Hierarchy {
    /// Create an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node without adding an edge.
    ///
    /// A node seen for the first time becomes a root. Returns `true` if the
    /// node was new.
    pub fn insert(&mut self, id: impl Into<ElementId>) -> bool {
        let id = id.into();
        if self.parents.contains_key(&id) {
            return false;
        }
        self.parents.insert(id.clone(), IndexSet::new());
        self.children.insert(id.clone(), IndexSet::new());
        self.roots.insert(id);
        true
    }

    /// Record the direct edge `parent → child` and restore the closure.
    ///
    /// Adding an edge that is already implied by the closure is a no-op.
    /// Adding an edge from a node to itself or to one of its ancestors
    /// fails with [`InterchangeError::HierarchyCycle`] and leaves the
    /// hierarchy untouched.
    pub fn add(
        &mut self,
        parent: impl Into<ElementId>,
        child: impl Into<ElementId>,
    ) -> Result<(), InterchangeError> {
        let parent = parent.into();
        let child = child.into();

        if self.is_ancestor(&parent, &child) {
            return Ok(());
        }
        if parent == child || self.is_ancestor(&child, &parent) {
            return Err(InterchangeError::HierarchyCycle { parent, child });
        }

        self.insert(parent.clone());
        self.insert(child.clone());
        self.roots.shift_remove(&child);

        let mut descendants = IndexSet::with_capacity(1 + self.children_of(&child).len());
        descendants.insert(child.clone());
        descendants.extend(self.children_of(&child).iter().cloned());

        let mut ancestors = IndexSet::with_capacity(1 + self.parents_of(&parent).len());
        ancestors.insert(parent.clone());
        ancestors.extend(self.parents_of(&parent).iter().cloned());

        for a in &ancestors {
            if let Some(set) = self.children.get_mut(a) {
                set.extend(descendants.iter().cloned());
            }
        }
        for d in &descendants {
            if let Some(set) = self.parents.get_mut(d) {
                set.extend(ancestors.iter().cloned());
            }
        }
        Ok(())
    }

    /// All ancestors of `id` (empty if unknown).
    pub fn parents_of(&self, id: &str) -> &IndexSet<ElementId> {
        self.parents.get(id).unwrap_or(empty_set())
    }

    /// All descendants of `id` (empty if unknown).
    pub fn children_of(&self, id: &str) -> &IndexSet<ElementId> {
        self.children.get(id).unwrap_or(empty_set())
    }

    /// Nodes that have never appeared as a child, in first-seen order.
    pub fn roots(&self) -> impl Iterator<Item = &ElementId> {
        self.roots.iter()
    }

    /// Returns true if `ancestor` is reachable by following parent edges from `id`.
    pub fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        self.parents_of(id).contains(ancestor)
    }

    /// Returns true if the node has been registered.
    pub fn contains(&self, id: &str) -> bool {
        self.parents.contains_key(id)
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Returns true if no node has been registered.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

fn empty_set() -> &'static IndexSet<ElementId> {
    static EMPTY: std::sync::OnceLock<IndexSet<ElementId>> = std::sync::OnceLock::new();
    EMPTY.get_or_init(IndexSet::new)
}
