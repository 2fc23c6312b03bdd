//! Entity graph for the autoglue binding generator.
//!
//! Every element of a native API surface (scopes, classes, enums, aliases,
//! overloaded functions and the type references between them) is an
//! [`Entity`] stored in an [`EntityTree`] arena and addressed by a copyable
//! [`EntityId`].
//!
//! The tree owns three analyses that backends rely on:
//!
//! - **Usage propagation** ([`EntityTree::use_entity`]): marking an entity
//!   used marks its ancestors and pulls in whatever it depends on.
//! - **Overload matching** ([`EntityTree::add_overload`]): declarations with
//!   identical parameter types collapse into one overload.
//! - **Concrete-type synthesis**: the first use of a class creates a
//!   `ConcreteType` subclass carrying trampoline overrides for every
//!   overridable function in the hierarchy, and
//!   [`EntityTree::finalize_concrete_types`] discards the ones nothing needs.
//!
//! # Weak links
//!
//! Base types, derived types, alias targets and the referred type of a
//! reference are plain [`EntityId`]s. Pruned entities are tombstoned, never
//! reused, so a link to a pruned entity reads as "absent" everywhere.
//!
//! # Primitives
//!
//! The eight [`Primitive`] kinds occupy fixed arena slots in every tree, so
//! `EntityId::primitive(Primitive::Integer)` names the same entity in any
//! [`EntityTree`].

mod class;
mod concrete;
mod entity;
mod id;
mod kind;
mod listing;
mod overload;
mod primitive;
pub mod stack;
mod tree;
mod type_ref;
mod usage;

pub use entity::{
    AliasData, CallableData, ClassData, EnumData, EnumEntryData, Entity, EntityData,
    FunctionData, FunctionGroupData, TypeData, TypeReferenceData,
};
pub use id::EntityId;
pub use kind::{EntityKind, EnumFormat, FunctionFlags, FunctionKind, TypeKind};
pub use overload::FunctionDecl;
pub use primitive::Primitive;
pub use tree::{EntityTree, CONCRETE_TYPE_NAME};
pub use type_ref::TypeReference;
