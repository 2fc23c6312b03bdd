//! Class hierarchy links.
//!
//! Base links are weak: a pruned base stays in the raw list but is skipped by
//! every `live_*` query. Adding a base that is itself a class records the
//! back-link in the base's derived list.

use crate::{EntityId, EntityTree, FunctionKind};

impl EntityTree {
    /// Link `base` as a base type of `class`.
    ///
    /// Returns `false` if the link already existed.
    #[track_caller]
    pub fn add_base_type(&mut self, class: EntityId, base: EntityId) -> bool {
        if self.class(class).bases.contains(&base) {
            return false;
        }
        self.class_mut(class).bases.push(base);
        if self.is_live(base) && self.as_class(base).is_some() {
            self.class_mut(base).derived.push(class);
        }
        true
    }

    /// Base types that are still live, in insertion order.
    pub fn live_base_types(&self, class: EntityId) -> Vec<EntityId> {
        self.class(class)
            .bases
            .iter()
            .copied()
            .filter(|&base| self.is_live(base))
            .collect()
    }

    pub fn has_base_types(&self, class: EntityId) -> bool {
        self.class(class)
            .bases
            .iter()
            .any(|&base| self.is_live(base))
    }

    /// Number of base slots, expired ones included.
    pub fn base_type_count(&self, class: EntityId) -> usize {
        self.class(class).bases.len()
    }

    /// Derived classes that are still live, in registration order.
    pub fn live_derived_types(&self, class: EntityId) -> Vec<EntityId> {
        self.class(class)
            .derived
            .iter()
            .copied()
            .filter(|&derived| self.is_live(derived))
            .collect()
    }

    pub fn derived_count(&self, class: EntityId) -> usize {
        self.class(class)
            .derived
            .iter()
            .filter(|&&derived| self.is_live(derived))
            .count()
    }

    /// Whether some interface in the hierarchy of `class` lacks a native
    /// implementation. Only meaningful once the class has been used.
    #[inline]
    pub fn is_abstract(&self, class: EntityId) -> bool {
        self.class(class).is_abstract
    }

    pub(crate) fn set_abstract(&mut self, class: EntityId, is_abstract: bool) {
        self.class_mut(class).is_abstract = is_abstract;
    }

    /// The live synthesized subclass of `class`, if any.
    pub fn concrete_type(&self, class: EntityId) -> Option<EntityId> {
        self.as_class(class)?
            .concrete
            .filter(|&concrete| self.is_live(concrete))
    }

    pub fn constructors(&self, class: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.groups_of_kind(class, FunctionKind::Constructor)
    }

    pub fn destructors(&self, class: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.groups_of_kind(class, FunctionKind::Destructor)
    }
}
