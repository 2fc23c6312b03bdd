//! Usage propagation.
//!
//! Marking an entity used first marks its parent chain, then bumps its own
//! counter. The call that takes the counter from zero to one runs the kind's
//! first-use step, which pulls in the entities it depends on.

use crate::stack::ensure_sufficient_stack;
use crate::{EntityData, EntityId, EntityTree, TypeData};

impl EntityTree {
    /// Mark `id` used.
    pub fn use_entity(&mut self, id: EntityId) {
        ensure_sufficient_stack(|| {
            if let Some(parent) = self.get(id).parent {
                self.use_entity(parent);
            }
            let entity = self.get_mut(id);
            entity.usages = entity.usages.saturating_add(1);
            if entity.usages == 1 {
                self.on_first_use(id);
            }
        });
    }

    /// Mark `id` and every descendant used, regardless of prior usage.
    pub fn use_all(&mut self, id: EntityId) {
        ensure_sufficient_stack(|| {
            self.use_entity(id);
            let children = self.children(id).to_vec();
            for child in children {
                self.use_all(child);
            }
        });
    }

    fn on_first_use(&mut self, id: EntityId) {
        let mut dependencies = Vec::new();
        match &self.get(id).data {
            EntityData::TypeReference(reference) => dependencies.push(reference.referred),
            EntityData::Function(function) => dependencies.extend(function.return_type),
            EntityData::FunctionGroup(_) => dependencies.extend_from_slice(self.children(id)),
            EntityData::Type(TypeData::Alias(alias)) => dependencies.extend(alias.underlying),
            EntityData::Type(TypeData::Callable(callable)) => {
                dependencies.push(callable.return_type);
                dependencies.extend_from_slice(self.children(id));
            }
            EntityData::Type(TypeData::Enum(_)) => {
                self.mark_last_entry(id);
                dependencies.extend_from_slice(self.children(id));
            }
            EntityData::Type(TypeData::Class(class)) => {
                let is_concrete = class.is_concrete;
                dependencies.extend(self.constructors(id));
                dependencies.extend(self.destructors(id));
                dependencies.extend(self.live_base_types(id));
                self.use_live(&dependencies);
                if !is_concrete {
                    self.synthesize_concrete_type(id);
                }
                return;
            }
            EntityData::Scope
            | EntityData::EnumEntry(_)
            | EntityData::Type(TypeData::Primitive(_)) => {}
        }
        self.use_live(&dependencies);
    }

    fn use_live(&mut self, ids: &[EntityId]) {
        for &dependency in ids {
            if self.is_live(dependency) {
                self.use_entity(dependency);
            }
        }
    }

    fn mark_last_entry(&mut self, enumeration: EntityId) {
        let Some(&last) = self.children(enumeration).last() else {
            return;
        };
        if let EntityData::EnumEntry(entry) = &mut self.get_mut(last).data {
            entry.last = true;
        }
    }

    /// Clear the generated flag on `id` and everything it owns.
    pub fn reset_generated(&mut self, id: EntityId) {
        ensure_sufficient_stack(|| {
            let entity = self.get_mut(id);
            entity.generated = false;
            let mut owned = entity.children.clone();
            owned.extend(self.owned_outside_children(id));
            for child in owned {
                self.reset_generated(child);
            }
        });
    }
}
