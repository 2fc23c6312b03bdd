//! Kind tags and function flags.

use std::fmt;

use bitflags::bitflags;

/// The closed set of entity kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum EntityKind {
    Scope,
    Function,
    FunctionGroup,
    Type,
    TypeReference,
    EnumEntry,
}

/// Sub-kind of an [`EntityKind::Type`] entity.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKind {
    Primitive,
    Callable,
    Alias,
    Class,
    Enum,
}

/// What a function overload is.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FunctionKind {
    Constructor,
    Destructor,
    MemberFunction,
    Function,
}

impl FunctionKind {
    /// Member functions and free functions carry a return type; constructors
    /// and destructors never do.
    #[inline]
    pub const fn has_return_type(self) -> bool {
        matches!(self, FunctionKind::MemberFunction | FunctionKind::Function)
    }

    /// Whether calling the bridge requires the native object handle.
    #[inline]
    pub const fn needs_this_handle(self) -> bool {
        matches!(self, FunctionKind::MemberFunction | FunctionKind::Destructor)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FunctionKind::Constructor => "Constructor",
            FunctionKind::Destructor => "Destructor",
            FunctionKind::MemberFunction => "MemberFunction",
            FunctionKind::Function => "Function",
        }
    }

    /// Parse the name produced by [`as_str`](Self::as_str).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Constructor" => Some(FunctionKind::Constructor),
            "Destructor" => Some(FunctionKind::Destructor),
            "MemberFunction" => Some(FunctionKind::MemberFunction),
            "Function" => Some(FunctionKind::Function),
            _ => None,
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How enum values are represented by backends.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum EnumFormat {
    #[default]
    Integer,
}

bitflags! {
    /// Override-related properties of a function overload.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FunctionFlags: u8 {
        /// Can be overridden by a foreign subclass.
        const OVERRIDABLE = 1 << 0;
        /// Trampoline synthesized inside a concrete type.
        const OVERRIDE = 1 << 1;
        /// Has no native implementation. Always overridable.
        const INTERFACE = 1 << 2;
    }
}

impl FunctionFlags {
    /// Apply the `INTERFACE` implies `OVERRIDABLE` rule.
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.contains(FunctionFlags::INTERFACE) {
            self | FunctionFlags::OVERRIDABLE
        } else {
            self
        }
    }

    /// Names of the set flags, in bit order.
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }

    /// Inverse of [`names`](Self::names). Unknown names yield `None`.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        names
            .into_iter()
            .try_fold(FunctionFlags::empty(), |acc, name| {
                FunctionFlags::from_name(name).map(|flag| acc | flag)
            })
    }
}
