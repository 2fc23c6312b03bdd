//! Binding generation for autoglue.
//!
//! A backend language implements [`BindingGenerator`]: one hook per entity
//! kind, all defaulting to no-ops. [`generate_bindings`] walks the used part
//! of a [`Backend`]'s entity tree depth-first and calls the hooks; hooks call
//! back into the [`Generation`] walker to descend into whatever they nest
//! (members of a class, entries of an enum, parameters of a function).
//!
//! ```text
//! generate_bindings(&mut backend, &mut generator, GenerateOptions::default())?;
//! ```
//!
//! A walk only visits entities with nonzero usage that have not been
//! generated in the current pass. Every pass starts by clearing the
//! generated flags, so running a second generator over the same backend
//! sees the same tree.

mod backend;
mod generation;

use std::any::Any;

use ag_diagnostic::ErrorGuaranteed;
use ag_ir::{EntityId, EntityTree, TypeReference};

pub use backend::{Backend, GlueSource};
pub use generation::Generation;

/// Hooks invoked by the generation walk.
///
/// Every hook has an empty default so a backend implements only what it
/// emits. Hooks that produce nested output call the matching
/// [`Generation`] helper themselves, e.g. `generate_class` usually calls
/// [`Generation::generate_base_types`] and [`Generation::generate_nested`].
#[allow(unused_variables)]
pub trait BindingGenerator {
    fn generate_class(&mut self, cx: &mut Generation<'_>, class: EntityId) {}

    fn generate_enum(&mut self, cx: &mut Generation<'_>, enumeration: EntityId) {}

    fn generate_enum_entry(&mut self, cx: &mut Generation<'_>, entry: EntityId) {}

    /// A function group. The default generates its overloads.
    fn generate_function_group(&mut self, cx: &mut Generation<'_>, group: EntityId) {
        cx.generate_overloads(self, group);
    }

    fn generate_function(&mut self, cx: &mut Generation<'_>, function: EntityId) {}

    /// A parameter or return type. Lowered references and the `self`
    /// handle are not tree entities, so this receives a value.
    fn generate_type_reference(&mut self, cx: &mut Generation<'_>, reference: &TypeReference) {}

    fn generate_type_alias(&mut self, cx: &mut Generation<'_>, alias: EntityId) {}

    /// One live base type. `index` counts live bases only.
    ///
    /// Return `false` to suppress the separator that would follow.
    fn generate_base_type(&mut self, cx: &mut Generation<'_>, base: EntityId, index: usize) -> bool {
        true
    }

    /// Only scopes with a name reach this hook. Unnamed scopes, the root
    /// among them, generate their children directly.
    fn generate_named_scope(&mut self, cx: &mut Generation<'_>, scope: EntityId) {}

    fn generate_argument_separator(&mut self, cx: &mut Generation<'_>) {}

    /// One used trampoline of `class`'s concrete type.
    fn generate_interception_function(
        &mut self,
        cx: &mut Generation<'_>,
        trampoline: EntityId,
        class: EntityId,
    ) {
    }

    /// Emitted after the interception functions of `class`, typically the
    /// call that registers them with the native side.
    fn generate_interception_context(&mut self, cx: &mut Generation<'_>, class: EntityId) {}

    /// Per-entity backend state, offered once for every live entity when a
    /// pass resets contexts.
    fn initialize_context(&mut self, tree: &EntityTree, id: EntityId) -> Option<Box<dyn Any>> {
        None
    }

    fn on_generation_finished(&mut self, cx: &mut Generation<'_>) {}

    /// Parameter name of the native object handle.
    fn object_handle_name(&self) -> &str {
        "objectHandle"
    }
}

/// Options for one generation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Drop every entity context and offer each entity to
    /// [`BindingGenerator::initialize_context`] before walking.
    pub reset_context: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            reset_context: true,
        }
    }
}

/// Run one generation pass of `generator` over `backend`.
///
/// Fails only if the backend's glue could not be generated.
#[tracing::instrument(level = "debug", skip_all, fields(reset_context = options.reset_context))]
pub fn generate_bindings<G: BindingGenerator + ?Sized>(
    backend: &mut Backend,
    generator: &mut G,
    options: GenerateOptions,
) -> Result<(), ErrorGuaranteed> {
    backend.ensure_glue_generated()?;

    let tree = backend.tree_mut();
    let root = tree.root();
    tree.reset_generated(root);

    if options.reset_context {
        tree.clear_contexts();
        let ids: Vec<EntityId> = tree.ids().collect();
        for id in ids {
            if let Some(context) = generator.initialize_context(tree, id) {
                tree.initialize_context(id, context);
            }
        }
    }

    let mut cx = Generation::new(tree);
    cx.generate(generator, root);
    generator.on_generation_finished(&mut cx);
    tracing::debug!("generation finished");
    Ok(())
}
