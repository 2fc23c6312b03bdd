//! Concrete-type synthesis.
//!
//! A foreign subclass can only override a native virtual through a native
//! subclass that forwards the call. On first use every class gets such a
//! subclass, named [`CONCRETE_TYPE_NAME`], holding one trampoline override
//! per distinct overridable signature found in the class and its bases.
//!
//! Walk order is the class's own groups, then its bases depth-first in
//! insertion order, so the most-derived declaration of a signature claims the
//! override slot. A non-overridable implementation claims its signature
//! without a trampoline. An interface that claims its own slot has no native
//! implementation anywhere below it, which makes the class abstract.
//! Interfaces are always used along with the class.

use rustc_hash::FxHashSet;

use crate::{
    ClassData, EntityData, EntityId, EntityTree, FunctionFlags, FunctionKind, TypeData,
    CONCRETE_TYPE_NAME,
};

/// Group name, kind and parameter types of an overload.
type Signature = (String, FunctionKind, Vec<EntityId>);

#[derive(Default)]
struct OverrideWalk {
    visited: FxHashSet<EntityId>,
    /// Signatures implemented natively without being overridable. Nothing
    /// further up the hierarchy can be overridden through them.
    sealed: FxHashSet<Signature>,
}

impl EntityTree {
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(class = %self.hierarchy(class, "."))
    )]
    pub(crate) fn synthesize_concrete_type(&mut self, class: EntityId) {
        let concrete = match self.concrete_type(class) {
            Some(existing) => existing,
            None => self.create_concrete_type(class),
        };

        let mut walk = OverrideWalk::default();
        self.collect_overrides(class, class, concrete, &mut walk);

        if self.children(concrete).is_empty() {
            tracing::debug!("no overridable functions, dropping concrete type");
            self.prune(concrete);
        } else if self.is_abstract(class) {
            tracing::debug!("class has unimplemented interfaces");
        }
    }

    fn create_concrete_type(&mut self, class: EntityId) -> EntityId {
        let concrete = self.add_owned(
            class,
            CONCRETE_TYPE_NAME,
            EntityData::Type(TypeData::Class(ClassData {
                is_concrete: true,
                ..ClassData::default()
            })),
        );
        self.class_mut(class).concrete = Some(concrete);
        // No back-link: the synthesized type is not a derived class of the
        // description.
        self.class_mut(concrete).bases.push(class);
        concrete
    }

    fn collect_overrides(
        &mut self,
        class: EntityId,
        source: EntityId,
        concrete: EntityId,
        walk: &mut OverrideWalk,
    ) {
        if !walk.visited.insert(source) {
            return;
        }

        let groups: Vec<EntityId> = self
            .function_groups(source)
            .filter(|&group| self.function_group(group).kind() != FunctionKind::Destructor)
            .collect();
        for group in groups {
            let overloads = self.overloads(group).to_vec();
            for overload in overloads {
                let function = self.function(overload);
                let (is_interface, is_overridable) =
                    (function.is_interface(), function.is_overridable());
                if is_interface {
                    // An interface is part of the class surface whether or
                    // not something below implements it.
                    self.use_entity(overload);
                }

                let signature = self.signature(group, overload);
                if walk.sealed.contains(&signature) {
                    continue;
                }
                if is_interface || is_overridable {
                    self.add_trampoline(class, concrete, group, overload);
                } else {
                    walk.sealed.insert(signature);
                }
            }
        }

        for base in self.live_base_types(source) {
            if let Some(base_class) = self.class_target(base) {
                self.collect_overrides(class, base_class, concrete, walk);
            }
        }
    }

    fn signature(&self, group: EntityId, overload: EntityId) -> Signature {
        let parameters = self
            .parameters(overload)
            .iter()
            .map(|parameter| parameter.referred)
            .collect();
        (
            self.name(group).to_owned(),
            self.function_group(group).kind(),
            parameters,
        )
    }

    fn add_trampoline(
        &mut self,
        class: EntityId,
        concrete: EntityId,
        group: EntityId,
        overload: EntityId,
    ) {
        let kind = self.function_group(group).kind();
        let target_group = match self.find_function_group(concrete, self.name(group), kind) {
            Some(existing) => existing,
            None => {
                let name = self.name(group).to_owned();
                self.add_function_group(concrete, name, kind)
            }
        };

        let mut decl = self.declaration(overload);
        decl.flags = FunctionFlags::OVERRIDE;
        let is_interface = self.function(overload).is_interface();

        if let Some(trampoline) = self.add_overload(target_group, decl) {
            self.function_mut(trampoline).overridden = Some(overload);
            if is_interface {
                self.set_abstract(class, true);
                self.use_entity(trampoline);
            }
        }
    }

    /// Decide which synthesized overrides survive.
    ///
    /// A trampoline is kept when the function it overrides is in use. A
    /// concrete type left with no used trampoline is pruned. Call once after
    /// usage has settled and before generation.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn finalize_concrete_types(&mut self) {
        // Using a trampoline can pull in classes that synthesize new concrete
        // types. Those land at the end of the arena, so walking by index
        // reaches them too.
        let mut index = EntityId::FIRST_DYNAMIC;
        while (index as usize) < self.entity_count() {
            let concrete = EntityId::new(index);
            index += 1;

            let is_concrete = self.is_live(concrete)
                && self.as_class(concrete).is_some_and(ClassData::is_concrete);
            if !is_concrete {
                continue;
            }
            let Some(class) = self.parent(concrete) else {
                continue;
            };

            let mut retained = false;
            let groups: Vec<EntityId> = self.function_groups(concrete).collect();
            for group in groups {
                let overloads = self.overloads(group).to_vec();
                for trampoline in overloads {
                    let keep = self
                        .function(trampoline)
                        .overridden
                        .filter(|&original| self.is_live(original))
                        .is_some_and(|original| {
                            self.function(original).is_overridable() && self.is_used(original)
                        });
                    if keep {
                        self.use_entity(trampoline);
                    }
                    retained |= self.is_used(trampoline);
                }
            }

            if !retained {
                tracing::debug!(
                    class = %self.hierarchy(class, "."),
                    "no used overrides, dropping concrete type"
                );
                self.prune(concrete);
            }
        }
    }
}
