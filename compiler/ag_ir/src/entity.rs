//! Entity slots and their per-kind payloads.

use std::any::Any;
use std::fmt;

use crate::{EntityId, EntityKind, EnumFormat, FunctionFlags, FunctionKind, Primitive, TypeKind};

/// One arena slot.
///
/// Ownership is expressed through `children`; `parent` is navigational.
/// Return types and concrete types are owned through their payload instead
/// of `children`, so nested generation never reaches them implicitly.
pub struct Entity {
    pub(crate) name: String,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) usages: u32,
    pub(crate) generated: bool,
    pub(crate) live: bool,
    pub(crate) context: Option<Box<dyn Any>>,
    pub(crate) data: EntityData,
}

impl Entity {
    pub(crate) fn new(name: impl Into<String>, parent: Option<EntityId>, data: EntityData) -> Self {
        Entity {
            name: name.into(),
            parent,
            children: Vec::new(),
            usages: 0,
            generated: false,
            live: true,
            context: None,
            data,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    #[inline]
    pub fn usages(&self) -> u32 {
        self.usages
    }

    #[inline]
    pub fn is_used(&self) -> bool {
        self.usages > 0
    }

    #[inline]
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// `false` once the entity has been pruned.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.live
    }

    #[inline]
    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    #[inline]
    pub fn data(&self) -> &EntityData {
        &self.data
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.data.kind()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("usages", &self.usages)
            .field("generated", &self.generated)
            .field("live", &self.live)
            .field("has_context", &self.context.is_some())
            .field("data", &self.data)
            .finish()
    }
}

/// Per-kind payload of an entity.
#[derive(Clone, Debug)]
pub enum EntityData {
    Scope,
    FunctionGroup(FunctionGroupData),
    Function(FunctionData),
    TypeReference(TypeReferenceData),
    EnumEntry(EnumEntryData),
    Type(TypeData),
}

impl EntityData {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityData::Scope => EntityKind::Scope,
            EntityData::FunctionGroup(_) => EntityKind::FunctionGroup,
            EntityData::Function(_) => EntityKind::Function,
            EntityData::TypeReference(_) => EntityKind::TypeReference,
            EntityData::EnumEntry(_) => EntityKind::EnumEntry,
            EntityData::Type(_) => EntityKind::Type,
        }
    }

    /// Human-readable kind label used by the tree listing.
    pub fn describe(&self) -> &'static str {
        match self {
            EntityData::Scope => "Scope",
            EntityData::FunctionGroup(_) => "Function group",
            EntityData::Function(_) => "Function",
            EntityData::TypeReference(_) => "TypeReference",
            EntityData::EnumEntry(_) => "Enum entry",
            EntityData::Type(TypeData::Primitive(_)) => "Primitive type",
            EntityData::Type(TypeData::Callable(_)) => "Callable type",
            EntityData::Type(TypeData::Alias(_)) => "TypeAlias",
            EntityData::Type(TypeData::Class(_)) => "Class",
            EntityData::Type(TypeData::Enum(_)) => "Enum",
        }
    }
}

/// Payload of an [`EntityKind::Type`] entity.
#[derive(Clone, Debug)]
pub enum TypeData {
    Primitive(Primitive),
    Callable(CallableData),
    Alias(AliasData),
    Class(ClassData),
    Enum(EnumData),
}

impl TypeData {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeData::Primitive(_) => TypeKind::Primitive,
            TypeData::Callable(_) => TypeKind::Callable,
            TypeData::Alias(_) => TypeKind::Alias,
            TypeData::Class(_) => TypeKind::Class,
            TypeData::Enum(_) => TypeKind::Enum,
        }
    }
}

/// Overloads of one function name and kind. The overloads themselves are
/// the group's children.
#[derive(Clone, Debug)]
pub struct FunctionGroupData {
    pub(crate) kind: FunctionKind,
    pub(crate) interfaces: u32,
    pub(crate) overridables: u32,
}

impl FunctionGroupData {
    #[inline]
    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    #[inline]
    pub fn has_overridable(&self) -> bool {
        self.overridables > 0
    }

    #[inline]
    pub fn has_interface(&self) -> bool {
        self.interfaces > 0
    }
}

/// A single overload. Parameters are the function's children.
#[derive(Clone, Debug)]
pub struct FunctionData {
    pub(crate) kind: FunctionKind,
    pub(crate) return_type: Option<EntityId>,
    pub(crate) flags: FunctionFlags,
    pub(crate) overridden: Option<EntityId>,
    pub(crate) overload_index: u32,
    pub(crate) operator: Option<String>,
}

impl FunctionData {
    #[inline]
    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    /// The owned return-type reference entity.
    #[inline]
    pub fn return_type(&self) -> Option<EntityId> {
        self.return_type
    }

    #[inline]
    pub fn flags(&self) -> FunctionFlags {
        self.flags
    }

    #[inline]
    pub fn is_overridable(&self) -> bool {
        self.flags.contains(FunctionFlags::OVERRIDABLE)
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(FunctionFlags::INTERFACE)
    }

    #[inline]
    pub fn is_override(&self) -> bool {
        self.flags.contains(FunctionFlags::OVERRIDE)
    }

    /// For trampolines, the overload this one overrides.
    #[inline]
    pub fn overridden(&self) -> Option<EntityId> {
        self.overridden
    }

    /// Position within the group at insertion time.
    #[inline]
    pub fn overload_index(&self) -> u32 {
        self.overload_index
    }

    /// The operator token for overloaded operators (`+`, `==`, ...).
    #[inline]
    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }
}

#[derive(Clone, Debug)]
pub struct TypeReferenceData {
    pub(crate) referred: EntityId,
    pub(crate) by_reference: bool,
}

impl TypeReferenceData {
    #[inline]
    pub fn referred(&self) -> EntityId {
        self.referred
    }

    #[inline]
    pub fn is_by_reference(&self) -> bool {
        self.by_reference
    }
}

#[derive(Clone, Debug)]
pub struct EnumEntryData {
    pub(crate) value: String,
    pub(crate) last: bool,
}

impl EnumEntryData {
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set on the final entry when the enclosing enum is first used.
    #[inline]
    pub fn is_last(&self) -> bool {
        self.last
    }
}

/// A function type. Parameters are children; the derived name lives in the
/// entity name.
#[derive(Clone, Debug)]
pub struct CallableData {
    pub(crate) return_type: EntityId,
}

impl CallableData {
    /// The owned return-type reference entity.
    #[inline]
    pub fn return_type(&self) -> EntityId {
        self.return_type
    }
}

#[derive(Clone, Debug)]
pub struct AliasData {
    pub(crate) underlying: Option<EntityId>,
}

impl AliasData {
    /// The direct target, which may itself be an alias or pruned.
    #[inline]
    pub fn underlying(&self) -> Option<EntityId> {
        self.underlying
    }
}

#[derive(Clone, Debug, Default)]
pub struct ClassData {
    pub(crate) bases: Vec<EntityId>,
    pub(crate) derived: Vec<EntityId>,
    pub(crate) is_abstract: bool,
    pub(crate) is_concrete: bool,
    pub(crate) concrete: Option<EntityId>,
}

impl ClassData {
    /// Raw base links, including ones that have since expired.
    #[inline]
    pub fn bases(&self) -> &[EntityId] {
        &self.bases
    }

    /// Raw derived back-links, including ones that have since expired.
    #[inline]
    pub fn derived(&self) -> &[EntityId] {
        &self.derived
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// `true` for a synthesized `ConcreteType`.
    #[inline]
    pub fn is_concrete(&self) -> bool {
        self.is_concrete
    }
}

#[derive(Clone, Debug, Default)]
pub struct EnumData {
    pub(crate) format: EnumFormat,
}

impl EnumData {
    #[inline]
    pub fn format(&self) -> EnumFormat {
        self.format
    }
}
