//! The primitive type registry.
//!
//! Backends lower classes and enums to these kinds when they need a
//! plain-old-data view of a value (see [`EntityTree::as_pod`]).
//!
//! [`EntityTree::as_pod`]: crate::EntityTree::as_pod

use crate::EntityId;

/// Built-in primitive kinds, in reserved-slot order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum Primitive {
    /// Opaque handle to a native object.
    ObjectHandle,
    Integer,
    Float,
    Double,
    Boolean,
    Character,
    String,
    Void,
}

impl Primitive {
    /// Number of registry primitives.
    pub const COUNT: usize = 8;

    /// All primitives, indexed by their reserved slot.
    pub const ALL: [Primitive; Self::COUNT] = [
        Primitive::ObjectHandle,
        Primitive::Integer,
        Primitive::Float,
        Primitive::Double,
        Primitive::Boolean,
        Primitive::Character,
        Primitive::String,
        Primitive::Void,
    ];

    /// Registry name, also used as the entity name of the reserved slot.
    pub const fn name(self) -> &'static str {
        match self {
            Primitive::ObjectHandle => "ObjectHandle",
            Primitive::Integer => "Integer",
            Primitive::Float => "Float",
            Primitive::Double => "Double",
            Primitive::Boolean => "Boolean",
            Primitive::Character => "Character",
            Primitive::String => "String",
            Primitive::Void => "Void",
        }
    }

    /// Look up a primitive by registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// The primitive living in a reserved slot, if `id` is one.
    pub fn from_id(id: EntityId) -> Option<Self> {
        Self::ALL.get(id.index()).copied()
    }

    /// The reserved slot of this primitive.
    #[inline]
    pub const fn id(self) -> EntityId {
        EntityId::primitive(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_match_declaration_order() {
        for (index, primitive) in Primitive::ALL.iter().enumerate() {
            assert_eq!(primitive.id().index(), index);
            assert_eq!(Primitive::from_id(primitive.id()), Some(*primitive));
        }
    }

    #[test]
    fn names_round_trip() {
        for primitive in Primitive::ALL {
            assert_eq!(Primitive::from_name(primitive.name()), Some(primitive));
        }
        assert_eq!(Primitive::from_name("int"), None);
    }

    #[test]
    fn root_is_not_a_primitive() {
        assert!(Primitive::from_id(EntityId::ROOT).is_none());
        assert!(!EntityId::ROOT.is_primitive());
        assert!(Primitive::Void.id().is_primitive());
    }
}
