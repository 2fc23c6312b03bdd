//! The depth-first generation walk.

use ag_ir::stack::ensure_sufficient_stack;
use ag_ir::{EntityId, EntityKind, EntityTree, Primitive, TypeKind, TypeReference};

use crate::BindingGenerator;

/// State of one generation pass, handed to every hook.
pub struct Generation<'t> {
    tree: &'t mut EntityTree,
    class_depth: u32,
}

impl<'t> Generation<'t> {
    pub fn new(tree: &'t mut EntityTree) -> Self {
        Generation {
            tree,
            class_depth: 0,
        }
    }

    #[inline]
    pub fn tree(&self) -> &EntityTree {
        &*self.tree
    }

    /// Mutable access for backend contexts.
    #[inline]
    pub fn tree_mut(&mut self) -> &mut EntityTree {
        &mut *self.tree
    }

    /// Number of class hooks currently on the stack. Inside the hook for a
    /// top-level class this is 1.
    #[inline]
    pub fn class_depth(&self) -> u32 {
        self.class_depth
    }

    /// Generate `id` unless it is unused, pruned, or already generated in
    /// this pass.
    pub fn generate<G: BindingGenerator + ?Sized>(&mut self, generator: &mut G, id: EntityId) {
        if !self.tree.is_live(id) || !self.tree.is_used(id) || self.tree.is_generated(id) {
            return;
        }
        self.tree.set_generated(id, true);

        let kind = self.tree.kind(id);
        let type_kind = self.tree.type_kind(id);
        ensure_sufficient_stack(|| match (kind, type_kind) {
            (EntityKind::Scope, _) => {
                if self.tree.name(id).is_empty() {
                    self.generate_nested(generator, id);
                } else {
                    generator.generate_named_scope(self, id);
                }
            }
            (EntityKind::FunctionGroup, _) => generator.generate_function_group(self, id),
            (EntityKind::Function, _) => generator.generate_function(self, id),
            (EntityKind::TypeReference, _) => {
                let reference = self.tree.type_reference(id);
                generator.generate_type_reference(self, &reference);
            }
            (EntityKind::EnumEntry, _) => generator.generate_enum_entry(self, id),
            (EntityKind::Type, Some(TypeKind::Class)) => {
                self.class_depth += 1;
                generator.generate_class(self, id);
                self.class_depth -= 1;
            }
            (EntityKind::Type, Some(TypeKind::Enum)) => generator.generate_enum(self, id),
            (EntityKind::Type, Some(TypeKind::Alias)) => generator.generate_type_alias(self, id),
            (EntityKind::Type, _) => {}
        });
    }

    /// Generate every child of `id` in insertion order.
    pub fn generate_nested<G: BindingGenerator + ?Sized>(
        &mut self,
        generator: &mut G,
        id: EntityId,
    ) {
        let children = self.tree.children(id).to_vec();
        for child in children {
            self.generate(generator, child);
        }
    }

    /// Generate the overloads of a function group.
    pub fn generate_overloads<G: BindingGenerator + ?Sized>(
        &mut self,
        generator: &mut G,
        group: EntityId,
    ) {
        self.generate_nested(generator, group);
    }

    /// Generate the entries of an enum.
    pub fn generate_values<G: BindingGenerator + ?Sized>(
        &mut self,
        generator: &mut G,
        enumeration: EntityId,
    ) {
        self.generate_nested(generator, enumeration);
    }

    /// Call the base-type hook for each live base of `class`, with separators
    /// between them. Expired base links are skipped.
    pub fn generate_base_types<G: BindingGenerator + ?Sized>(
        &mut self,
        generator: &mut G,
        class: EntityId,
    ) {
        let bases = self.tree.live_base_types(class);
        for (index, &base) in bases.iter().enumerate() {
            let separate = generator.generate_base_type(self, base, index);
            if separate && index + 1 < bases.len() {
                generator.generate_argument_separator(self);
            }
        }
    }

    /// Generate the synthesized concrete subclass of `class`, if it
    /// survived finalization.
    pub fn generate_concrete_type<G: BindingGenerator + ?Sized>(
        &mut self,
        generator: &mut G,
        class: EntityId,
    ) {
        if let Some(concrete) = self.tree.concrete_type(class) {
            self.generate(generator, concrete);
        }
    }

    /// Call the interception hooks for every used trampoline of `class`'s
    /// concrete type, then the context hook once if there were any.
    ///
    /// Returns the number of interception functions generated.
    pub fn generate_interceptions<G: BindingGenerator + ?Sized>(
        &mut self,
        generator: &mut G,
        class: EntityId,
    ) -> usize {
        let Some(concrete) = self.tree.concrete_type(class) else {
            return 0;
        };

        let trampolines: Vec<EntityId> = self
            .tree
            .function_groups(concrete)
            .flat_map(|group| self.tree.overloads(group).to_vec())
            .filter(|&trampoline| self.tree.is_live(trampoline) && self.tree.is_used(trampoline))
            .collect();
        for &trampoline in &trampolines {
            generator.generate_interception_function(self, trampoline, class);
        }
        if !trampolines.is_empty() {
            generator.generate_interception_context(self, class);
        }
        trampolines.len()
    }

    /// Emit the parameters of `function` separated by argument separators.
    ///
    /// `as_pod` lowers each reference for the bridge ABI. `include_self`
    /// prepends the object handle for functions that need one.
    pub fn generate_parameters<G: BindingGenerator + ?Sized>(
        &mut self,
        generator: &mut G,
        function: EntityId,
        as_pod: bool,
        include_self: bool,
    ) {
        let mut parameters = Vec::with_capacity(self.tree.parameter_count(function, include_self));
        if include_self && self.tree.needs_this_handle(function) {
            parameters.push(TypeReference::new(
                generator.object_handle_name(),
                Primitive::ObjectHandle.id(),
            ));
        }
        for parameter in self.tree.parameters(function) {
            parameters.push(if as_pod {
                self.tree.as_pod(&parameter)
            } else {
                parameter
            });
        }

        for (index, parameter) in parameters.iter().enumerate() {
            generator.generate_type_reference(self, parameter);
            if index + 1 < parameters.len() {
                generator.generate_argument_separator(self);
            }
        }
    }

    /// Emit the return type of `function`, if it has one.
    ///
    /// Returns whether the hook was called.
    pub fn generate_return_type<G: BindingGenerator + ?Sized>(
        &mut self,
        generator: &mut G,
        function: EntityId,
        as_pod: bool,
    ) -> bool {
        let Some(returned) = self.tree.return_type(function) else {
            return false;
        };
        let returned = if as_pod {
            self.tree.as_pod(&returned)
        } else {
            returned
        };
        generator.generate_type_reference(self, &returned);
        true
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, reason = "tests use expect for brevity")]
mod tests;
