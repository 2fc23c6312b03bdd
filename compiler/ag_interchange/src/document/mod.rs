//! The serde model of a binding description.
//!
//! A document is one tree of [`Element`]s rooted at an unnamed scope. Type
//! links (return types, parameter types, bases, alias targets) are dotted
//! paths from the root, or registry primitive names.

use serde::{Deserialize, Serialize};

/// Version written by this crate and the only one it reads.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub format_version: u32,
    pub root: Element,
    /// Qualified names marked used, with everything beneath them, after
    /// loading.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exports: Vec<String>,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            format_version: FORMAT_VERSION,
            root: Element::root(),
            exports: Vec::new(),
        }
    }
}

/// One entity. Which fields matter depends on `kind`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Kept as text so unknown kinds survive parsing and can be reported.
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// `FunctionGroup` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub returns_reference: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// `EnumEntry` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<String>,
    /// `TypeAlias` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying: Option<String>,
    /// `Primitive` only: the registry primitive this named type stands for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primitive: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(kind: ElementKind, name: impl Into<String>) -> Self {
        Element {
            kind: kind.as_str().to_owned(),
            name: name.into(),
            ..Element::default()
        }
    }

    /// The unnamed scope every document starts from.
    pub fn root() -> Self {
        Element::new(ElementKind::Scope, "")
    }

    /// Parsed kind, `None` for kinds this reader does not know.
    pub fn element_kind(&self) -> Option<ElementKind> {
        ElementKind::from_name(&self.kind)
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub by_reference: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Scope,
    Class,
    Enum,
    EnumEntry,
    TypeAlias,
    Primitive,
    FunctionGroup,
    Function,
}

impl ElementKind {
    pub const ALL: [ElementKind; 8] = [
        ElementKind::Scope,
        ElementKind::Class,
        ElementKind::Enum,
        ElementKind::EnumEntry,
        ElementKind::TypeAlias,
        ElementKind::Primitive,
        ElementKind::FunctionGroup,
        ElementKind::Function,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ElementKind::Scope => "Scope",
            ElementKind::Class => "Class",
            ElementKind::Enum => "Enum",
            ElementKind::EnumEntry => "EnumEntry",
            ElementKind::TypeAlias => "TypeAlias",
            ElementKind::Primitive => "Primitive",
            ElementKind::FunctionGroup => "FunctionGroup",
            ElementKind::Function => "Function",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }

    /// Kinds that own other elements, and so are written with
    /// `begin_element`/`end_element`.
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            ElementKind::Scope | ElementKind::Class | ElementKind::Enum | ElementKind::FunctionGroup
        )
    }
}

#[allow(clippy::trivially_copy_pass_by_ref, reason = "serde passes fields by reference")]
fn is_false(value: &bool) -> bool {
    !*value
}
