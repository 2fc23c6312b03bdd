//! The entity arena: construction, typed access, resolution and pruning.

use std::any::Any;

use crate::stack::ensure_sufficient_stack;
use crate::{
    AliasData, CallableData, ClassData, EntityData, EntityId, EntityKind, EnumData, EnumEntryData,
    EnumFormat, FunctionData, FunctionGroupData, FunctionKind, Primitive, TypeData, TypeKind,
    TypeReference, TypeReferenceData,
};

pub(crate) use crate::entity::Entity;

/// Name of a synthesized override-enabling subclass, and the resolution
/// segment that reaches it from its class.
pub const CONCRETE_TYPE_NAME: &str = "ConcreteType";

/// Arena of entities rooted at an unnamed scope.
///
/// Slots are never reused: pruning tombstones a subtree so that every weak
/// link pointing into it reads as absent.
pub struct EntityTree {
    entities: Vec<Entity>,
}

impl Default for EntityTree {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityTree {
    /// Create a tree holding only the primitive registry and the root scope.
    pub fn new() -> Self {
        let mut entities = Vec::with_capacity(EntityId::FIRST_DYNAMIC as usize);
        for primitive in Primitive::ALL {
            entities.push(Entity::new(
                primitive.name(),
                None,
                EntityData::Type(TypeData::Primitive(primitive)),
            ));
        }
        entities.push(Entity::new("", None, EntityData::Scope));
        debug_assert_eq!(entities.len(), EntityId::FIRST_DYNAMIC as usize);
        EntityTree { entities }
    }

    #[inline]
    pub fn root(&self) -> EntityId {
        EntityId::ROOT
    }

    /// Number of slots, including primitives and tombstones.
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Every live entity in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, entity)| entity.live)
            .filter_map(|(index, _)| u32::try_from(index).ok().map(EntityId::new))
    }

    #[inline]
    pub fn get(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.index()]
    }

    /// `false` for pruned entities and ids from another arena.
    #[inline]
    pub fn is_live(&self, id: EntityId) -> bool {
        self.entities.get(id.index()).is_some_and(|entity| entity.live)
    }

    #[inline]
    pub fn name(&self, id: EntityId) -> &str {
        &self.get(id).name
    }

    #[inline]
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.get(id).parent
    }

    #[inline]
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        &self.get(id).children
    }

    #[inline]
    pub fn kind(&self, id: EntityId) -> EntityKind {
        self.get(id).data.kind()
    }

    pub fn type_kind(&self, id: EntityId) -> Option<TypeKind> {
        match &self.get(id).data {
            EntityData::Type(data) => Some(data.kind()),
            _ => None,
        }
    }

    #[inline]
    pub fn usages(&self, id: EntityId) -> u32 {
        self.get(id).usages
    }

    #[inline]
    pub fn is_used(&self, id: EntityId) -> bool {
        self.get(id).usages > 0
    }

    #[inline]
    pub fn is_generated(&self, id: EntityId) -> bool {
        self.get(id).generated
    }

    #[inline]
    pub fn set_generated(&mut self, id: EntityId, generated: bool) {
        self.get_mut(id).generated = generated;
    }

    // Typed access

    pub fn as_class(&self, id: EntityId) -> Option<&ClassData> {
        match &self.get(id).data {
            EntityData::Type(TypeData::Class(class)) => Some(class),
            _ => None,
        }
    }

    /// Class payload of `id`. Panics if `id` is not a class.
    pub fn class(&self, id: EntityId) -> &ClassData {
        self.as_class(id)
            .unwrap_or_else(|| self.kind_mismatch(id, "a class"))
    }

    pub(crate) fn class_mut(&mut self, id: EntityId) -> &mut ClassData {
        if self.as_class(id).is_none() {
            self.kind_mismatch(id, "a class");
        }
        match &mut self.get_mut(id).data {
            EntityData::Type(TypeData::Class(class)) => class,
            _ => unreachable!(),
        }
    }

    pub fn as_enum(&self, id: EntityId) -> Option<&EnumData> {
        match &self.get(id).data {
            EntityData::Type(TypeData::Enum(data)) => Some(data),
            _ => None,
        }
    }

    pub fn as_alias(&self, id: EntityId) -> Option<&AliasData> {
        match &self.get(id).data {
            EntityData::Type(TypeData::Alias(alias)) => Some(alias),
            _ => None,
        }
    }

    pub fn as_callable(&self, id: EntityId) -> Option<&CallableData> {
        match &self.get(id).data {
            EntityData::Type(TypeData::Callable(callable)) => Some(callable),
            _ => None,
        }
    }

    pub fn as_primitive(&self, id: EntityId) -> Option<Primitive> {
        match &self.get(id).data {
            EntityData::Type(TypeData::Primitive(primitive)) => Some(*primitive),
            _ => None,
        }
    }

    pub fn as_function_group(&self, id: EntityId) -> Option<&FunctionGroupData> {
        match &self.get(id).data {
            EntityData::FunctionGroup(group) => Some(group),
            _ => None,
        }
    }

    /// Function group payload of `id`. Panics on any other kind.
    pub fn function_group(&self, id: EntityId) -> &FunctionGroupData {
        self.as_function_group(id)
            .unwrap_or_else(|| self.kind_mismatch(id, "a function group"))
    }

    pub(crate) fn function_group_mut(&mut self, id: EntityId) -> &mut FunctionGroupData {
        if self.as_function_group(id).is_none() {
            self.kind_mismatch(id, "a function group");
        }
        match &mut self.get_mut(id).data {
            EntityData::FunctionGroup(group) => group,
            _ => unreachable!(),
        }
    }

    pub fn as_function(&self, id: EntityId) -> Option<&FunctionData> {
        match &self.get(id).data {
            EntityData::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Function payload of `id`. Panics on any other kind.
    pub fn function(&self, id: EntityId) -> &FunctionData {
        self.as_function(id)
            .unwrap_or_else(|| self.kind_mismatch(id, "a function"))
    }

    pub(crate) fn function_mut(&mut self, id: EntityId) -> &mut FunctionData {
        if self.as_function(id).is_none() {
            self.kind_mismatch(id, "a function");
        }
        match &mut self.get_mut(id).data {
            EntityData::Function(function) => function,
            _ => unreachable!(),
        }
    }

    pub fn as_type_reference(&self, id: EntityId) -> Option<&TypeReferenceData> {
        match &self.get(id).data {
            EntityData::TypeReference(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn as_enum_entry(&self, id: EntityId) -> Option<&EnumEntryData> {
        match &self.get(id).data {
            EntityData::EnumEntry(entry) => Some(entry),
            _ => None,
        }
    }

    /// Enum entry payload of `id`. Panics on any other kind.
    pub fn enum_entry(&self, id: EntityId) -> &EnumEntryData {
        self.as_enum_entry(id)
            .unwrap_or_else(|| self.kind_mismatch(id, "an enum entry"))
    }

    #[cold]
    #[track_caller]
    fn kind_mismatch(&self, id: EntityId, expected: &str) -> ! {
        panic!(
            "{id:?} `{}` is {}, not {expected}",
            self.name(id),
            self.get(id).data.describe()
        )
    }

    // Backend contexts

    /// Attach a backend context unless one is already present.
    ///
    /// Returns `true` if `context` was stored.
    pub fn initialize_context(&mut self, id: EntityId, context: Box<dyn Any>) -> bool {
        let entity = self.get_mut(id);
        if entity.context.is_some() {
            return false;
        }
        entity.context = Some(context);
        true
    }

    pub fn context<T: Any>(&self, id: EntityId) -> Option<&T> {
        self.get(id).context.as_ref()?.downcast_ref()
    }

    pub fn context_mut<T: Any>(&mut self, id: EntityId) -> Option<&mut T> {
        self.get_mut(id).context.as_mut()?.downcast_mut()
    }

    pub fn clear_contexts(&mut self) {
        for entity in &mut self.entities {
            entity.context = None;
        }
    }

    // Construction

    fn alloc(&mut self, name: impl Into<String>, parent: EntityId, data: EntityData) -> EntityId {
        let Ok(raw) = u32::try_from(self.entities.len()) else {
            panic!("entity arena exceeded u32::MAX slots");
        };
        self.entities.push(Entity::new(name, Some(parent), data));
        EntityId::new(raw)
    }

    /// Allocate an entity owned by `parent` outside its children list.
    pub(crate) fn add_owned(
        &mut self,
        parent: EntityId,
        name: impl Into<String>,
        data: EntityData,
    ) -> EntityId {
        self.alloc(name, parent, data)
    }

    /// Append a new entity to `parent`'s children.
    #[track_caller]
    pub fn add_child(
        &mut self,
        parent: EntityId,
        name: impl Into<String>,
        data: EntityData,
    ) -> EntityId {
        assert!(
            self.is_live(parent),
            "cannot add a child under pruned entity {parent:?}"
        );
        let id = self.alloc(name, parent, data);
        self.get_mut(parent).children.push(id);
        id
    }

    pub fn add_scope(&mut self, parent: EntityId, name: impl Into<String>) -> EntityId {
        self.add_child(parent, name, EntityData::Scope)
    }

    pub fn add_class(&mut self, parent: EntityId, name: impl Into<String>) -> EntityId {
        self.add_child(
            parent,
            name,
            EntityData::Type(TypeData::Class(ClassData::default())),
        )
    }

    pub fn add_enum(&mut self, parent: EntityId, name: impl Into<String>) -> EntityId {
        self.add_child(
            parent,
            name,
            EntityData::Type(TypeData::Enum(EnumData {
                format: EnumFormat::Integer,
            })),
        )
    }

    #[track_caller]
    pub fn add_enum_entry(
        &mut self,
        enumeration: EntityId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> EntityId {
        if self.as_enum(enumeration).is_none() {
            self.kind_mismatch(enumeration, "an enum");
        }
        self.add_child(
            enumeration,
            name,
            EntityData::EnumEntry(EnumEntryData {
                value: value.into(),
                last: false,
            }),
        )
    }

    pub fn add_alias(
        &mut self,
        parent: EntityId,
        name: impl Into<String>,
        underlying: Option<EntityId>,
    ) -> EntityId {
        self.add_child(
            parent,
            name,
            EntityData::Type(TypeData::Alias(AliasData { underlying })),
        )
    }

    /// Point an alias at its underlying type.
    #[track_caller]
    pub fn set_alias_underlying(&mut self, alias: EntityId, underlying: EntityId) {
        if self.as_alias(alias).is_none() {
            self.kind_mismatch(alias, "a type alias");
        }
        if let EntityData::Type(TypeData::Alias(data)) = &mut self.get_mut(alias).data {
            data.underlying = Some(underlying);
        }
    }

    /// A frontend-named primitive such as `int` that maps onto a registry kind.
    pub fn add_primitive(
        &mut self,
        parent: EntityId,
        name: impl Into<String>,
        primitive: Primitive,
    ) -> EntityId {
        self.add_child(parent, name, EntityData::Type(TypeData::Primitive(primitive)))
    }

    pub fn add_function_group(
        &mut self,
        parent: EntityId,
        name: impl Into<String>,
        kind: FunctionKind,
    ) -> EntityId {
        self.add_child(
            parent,
            name,
            EntityData::FunctionGroup(FunctionGroupData {
                kind,
                interfaces: 0,
                overridables: 0,
            }),
        )
    }

    /// Materialize a reference value as a child entity of `parent`.
    pub fn add_type_reference(&mut self, parent: EntityId, reference: &TypeReference) -> EntityId {
        self.add_child(parent, reference.name.clone(), reference_data(reference))
    }

    /// Create a callable type named after its signature, e.g.
    /// `Callable_Void_Integer_String`.
    pub fn add_callable(
        &mut self,
        parent: EntityId,
        return_type: &TypeReference,
        parameters: &[TypeReference],
    ) -> EntityId {
        let mut name = format!("Callable_{}", self.name(return_type.referred));
        for parameter in parameters {
            name.push('_');
            name.push_str(self.name(parameter.referred));
        }

        let callable = self.add_child(
            parent,
            name,
            EntityData::Type(TypeData::Callable(CallableData {
                return_type: Primitive::Void.id(),
            })),
        );
        let returned = self.add_owned(
            callable,
            return_type.name.clone(),
            reference_data(return_type),
        );
        if let EntityData::Type(TypeData::Callable(data)) = &mut self.get_mut(callable).data {
            data.return_type = returned;
        }
        for parameter in parameters {
            self.add_type_reference(callable, parameter);
        }
        callable
    }

    /// Entities owned by `id` that are not in its children list.
    pub(crate) fn owned_outside_children(&self, id: EntityId) -> Option<EntityId> {
        match &self.get(id).data {
            EntityData::Function(function) => function.return_type,
            EntityData::Type(TypeData::Callable(callable)) => Some(callable.return_type),
            EntityData::Type(TypeData::Class(class)) => class.concrete,
            _ => None,
        }
    }

    /// Detach `id` from its parent and tombstone its whole subtree.
    ///
    /// Panics for the root scope and registry primitives.
    #[track_caller]
    pub fn prune(&mut self, id: EntityId) {
        assert!(
            id != EntityId::ROOT && !id.is_primitive(),
            "{id:?} cannot be pruned"
        );
        if !self.is_live(id) {
            return;
        }

        let removed_flags = self.as_function(id).map(FunctionData::flags);
        if let Some(parent) = self.get(id).parent {
            let parent = self.get_mut(parent);
            parent.children.retain(|&child| child != id);
            match &mut parent.data {
                EntityData::Type(TypeData::Class(class)) if class.concrete == Some(id) => {
                    class.concrete = None;
                }
                EntityData::Function(function) if function.return_type == Some(id) => {
                    function.return_type = None;
                }
                EntityData::FunctionGroup(group) => {
                    if let Some(flags) = removed_flags {
                        if flags.contains(crate::FunctionFlags::INTERFACE) {
                            group.interfaces = group.interfaces.saturating_sub(1);
                        }
                        if flags.contains(crate::FunctionFlags::OVERRIDABLE) {
                            group.overridables = group.overridables.saturating_sub(1);
                        }
                    }
                }
                _ => {}
            }
        }

        tracing::trace!(id = ?id, name = %self.name(id), "pruning subtree");
        self.tombstone(id);
    }

    fn tombstone(&mut self, id: EntityId) {
        ensure_sufficient_stack(|| {
            let entity = self.get_mut(id);
            entity.live = false;
            entity.context = None;
            let mut owned = entity.children.clone();
            owned.extend(self.owned_outside_children(id));
            for child in owned {
                self.tombstone(child);
            }
        });
    }

    // Lookup

    /// Live function groups among the children of `owner`.
    pub fn function_groups(&self, owner: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.children(owner)
            .iter()
            .copied()
            .filter(|&child| self.as_function_group(child).is_some())
    }

    /// The group of `owner` with the given name and kind.
    pub fn find_function_group(
        &self,
        owner: EntityId,
        name: &str,
        kind: FunctionKind,
    ) -> Option<EntityId> {
        self.function_groups(owner)
            .find(|&group| self.name(group) == name && self.function_group(group).kind == kind)
    }

    /// Whether `id` answers to the resolution segment `segment`.
    ///
    /// Constructor and destructor groups also answer to `Constructor` and
    /// `Destructor`.
    pub fn has_name(&self, id: EntityId, segment: &str) -> bool {
        if let Some(group) = self.as_function_group(id) {
            match (group.kind, segment) {
                (FunctionKind::Constructor, "Constructor")
                | (FunctionKind::Destructor, "Destructor") => return true,
                _ => {}
            }
        }
        self.name(id) == segment
    }

    /// Resolve a dotted path relative to `from`. The first matching child
    /// wins at every segment.
    pub fn resolve(&self, from: EntityId, qualified: &str) -> Option<EntityId> {
        ensure_sufficient_stack(|| {
            let (head, rest) = match qualified.split_once('.') {
                Some((head, rest)) => (head, Some(rest)),
                None => (qualified, None),
            };
            let found = self.find_child(from, head)?;
            match rest {
                Some(rest) => self.resolve(found, rest),
                None => Some(found),
            }
        })
    }

    fn find_child(&self, from: EntityId, segment: &str) -> Option<EntityId> {
        if !self.is_live(from) {
            return None;
        }
        if self.as_alias(from).is_some() {
            let target = self.alias_underlying(from, true)?;
            return self.find_child(target, segment);
        }
        if let Some(found) = self
            .children(from)
            .iter()
            .copied()
            .find(|&child| self.has_name(child, segment))
        {
            return Some(found);
        }
        if segment == CONCRETE_TYPE_NAME {
            return self.concrete_type(from);
        }
        None
    }

    /// Path from the root to `id` joined by `delimiter`. Unnamed ancestors
    /// (including the root) are skipped.
    pub fn hierarchy(&self, id: EntityId, delimiter: &str) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            let name = self.name(node);
            if !name.is_empty() {
                names.push(name);
            }
            current = self.parent(node);
        }
        names.reverse();
        names.join(delimiter)
    }
}

pub(crate) fn reference_data(reference: &TypeReference) -> EntityData {
    EntityData::TypeReference(TypeReferenceData {
        referred: reference.referred,
        by_reference: reference.by_reference,
    })
}
