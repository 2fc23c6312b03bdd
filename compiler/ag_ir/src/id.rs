//! Arena index for entities.

use std::fmt;

use crate::Primitive;

/// Index into an [`EntityTree`](crate::EntityTree).
///
/// The first [`Primitive::COUNT`] slots hold the primitive registry and the
/// slot right after them holds the root scope, so both are known without
/// consulting a tree.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// The unnamed root scope of every tree.
    #[allow(clippy::cast_possible_truncation)]
    pub const ROOT: EntityId = EntityId(Primitive::COUNT as u32);

    /// First index handed out to entities created after construction.
    pub const FIRST_DYNAMIC: u32 = Self::ROOT.0 + 1;

    /// Create an `EntityId` from a raw index.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The reserved slot of a registry primitive.
    #[inline]
    pub const fn primitive(primitive: Primitive) -> Self {
        Self(primitive as u32)
    }

    /// Get the raw index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `true` for the reserved primitive slots.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::ROOT.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ROOT {
            write!(f, "EntityId::ROOT")
        } else if let Some(primitive) = Primitive::from_id(*self) {
            write!(f, "EntityId({})", primitive.name())
        } else {
            write!(f, "EntityId({})", self.0)
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
