//! Type references and plain-old-data lowering.

use rustc_hash::FxHashSet;

use crate::{EntityId, EntityTree, Primitive, TypeKind};

/// A named use of a type, as handed to generator hooks.
///
/// References stored in the tree are snapshotted into this form by
/// [`EntityTree::type_reference`]. Lowered references and the synthetic
/// `self` parameter exist only as values; `entity` then names the tree
/// reference they were derived from, if any, so backend contexts stay
/// reachable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeReference {
    pub entity: Option<EntityId>,
    pub name: String,
    pub referred: EntityId,
    pub by_reference: bool,
}

impl TypeReference {
    /// A by-value reference not backed by a tree entity.
    pub fn new(name: impl Into<String>, referred: EntityId) -> Self {
        TypeReference {
            entity: None,
            name: name.into(),
            referred,
            by_reference: false,
        }
    }

    #[must_use]
    pub fn by_reference(mut self) -> Self {
        self.by_reference = true;
        self
    }

    /// Two references are identical when they refer to the same type entity.
    /// Names and passing mode are ignored.
    #[inline]
    pub fn is_identical(&self, other: &TypeReference) -> bool {
        self.referred == other.referred
    }
}

impl EntityTree {
    /// Snapshot the reference entity `id`. Panics on any other kind.
    pub fn type_reference(&self, id: EntityId) -> TypeReference {
        let Some(data) = self.as_type_reference(id) else {
            panic!("{id:?} `{}` is not a type reference", self.name(id));
        };
        TypeReference {
            entity: Some(id),
            name: self.name(id).to_owned(),
            referred: data.referred,
            by_reference: data.by_reference,
        }
    }

    /// Follow an alias to its target.
    ///
    /// With `recursive`, chains collapse to the first non-alias type. `None`
    /// when a link in the chain has expired or the chain loops.
    pub fn alias_underlying(&self, alias: EntityId, recursive: bool) -> Option<EntityId> {
        let mut seen = FxHashSet::default();
        let mut current = alias;
        loop {
            let target = self.as_alias(current)?.underlying?;
            if !self.is_live(target) {
                return None;
            }
            if !recursive || self.as_alias(target).is_none() {
                return Some(target);
            }
            if !seen.insert(target) {
                return None;
            }
            current = target;
        }
    }

    /// The class behind `id`, looking through aliases.
    pub fn class_target(&self, id: EntityId) -> Option<EntityId> {
        if !self.is_live(id) {
            return None;
        }
        match self.type_kind(id)? {
            TypeKind::Class => Some(id),
            TypeKind::Alias => self
                .alias_underlying(id, true)
                .filter(|&target| self.as_class(target).is_some()),
            _ => None,
        }
    }

    /// Rewrite a reference into its plain-old-data form.
    ///
    /// Classes become [`Primitive::ObjectHandle`], enums become
    /// [`Primitive::Integer`], and aliases lower their resolved target.
    /// Everything else is returned unchanged.
    pub fn as_pod(&self, reference: &TypeReference) -> TypeReference {
        let lowered = |primitive: Primitive| TypeReference {
            referred: primitive.id(),
            ..reference.clone()
        };

        match self.type_kind(reference.referred) {
            Some(TypeKind::Class) => lowered(Primitive::ObjectHandle),
            Some(TypeKind::Enum) => lowered(Primitive::Integer),
            Some(TypeKind::Alias) => match self.alias_underlying(reference.referred, true) {
                Some(target) => self.as_pod(&TypeReference {
                    referred: target,
                    ..reference.clone()
                }),
                None => {
                    tracing::warn!(
                        alias = %self.hierarchy(reference.referred, "."),
                        "alias has no live underlying type, leaving reference unlowered"
                    );
                    reference.clone()
                }
            },
            _ => reference.clone(),
        }
    }
}

#[cfg(test)]
mod tests;
