//! Function groups, overload deduplication and per-function queries.

use crate::tree::reference_data;
use crate::{
    EntityData, EntityId, EntityTree, FunctionData, FunctionFlags, FunctionKind, Primitive,
    TypeReference,
};

/// A function signature waiting to be added to a group.
///
/// The overload takes its name and [`FunctionKind`] from the group it is
/// added to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionDecl {
    pub return_type: Option<TypeReference>,
    pub parameters: Vec<TypeReference>,
    pub flags: FunctionFlags,
    pub operator: Option<String>,
}

impl FunctionDecl {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn returning(mut self, return_type: TypeReference) -> Self {
        self.return_type = Some(return_type);
        self
    }

    #[must_use]
    pub fn parameter(mut self, parameter: TypeReference) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: FunctionFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_operator(mut self, token: impl Into<String>) -> Self {
        self.operator = Some(token.into());
        self
    }
}

impl EntityTree {
    /// Add an overload to `group` unless one with the same parameter types
    /// already exists.
    ///
    /// Returns the new function, or `None` if the declaration was absorbed by
    /// an existing overload. Panics if `group` is not a function group or if
    /// the presence of a return type contradicts the group's kind.
    #[track_caller]
    pub fn add_overload(&mut self, group: EntityId, decl: FunctionDecl) -> Option<EntityId> {
        let kind = self.function_group(group).kind;
        assert!(
            decl.return_type.is_some() == kind.has_return_type(),
            "{kind} `{}` {} a return type",
            self.hierarchy(group, "."),
            if kind.has_return_type() { "requires" } else { "cannot have" },
        );

        if let Some(existing) = self.find_matching_parameters(group, &decl.parameters) {
            tracing::debug!(
                group = %self.hierarchy(group, "."),
                existing = existing.raw(),
                "discarding overload with identical parameters"
            );
            return None;
        }

        let flags = decl.flags.normalized();
        let overload_index = u32::try_from(self.children(group).len()).unwrap_or(u32::MAX);
        let name = self.name(group).to_owned();
        let function = self.add_child(
            group,
            name,
            EntityData::Function(FunctionData {
                kind,
                return_type: None,
                flags,
                overridden: None,
                overload_index,
                operator: decl.operator,
            }),
        );

        if let Some(return_type) = &decl.return_type {
            let returned =
                self.add_owned(function, return_type.name.clone(), reference_data(return_type));
            self.function_mut(function).return_type = Some(returned);
        }
        for parameter in &decl.parameters {
            self.add_type_reference(function, parameter);
        }

        let data = self.function_group_mut(group);
        if flags.contains(FunctionFlags::INTERFACE) {
            data.interfaces += 1;
        }
        if flags.contains(FunctionFlags::OVERRIDABLE) {
            data.overridables += 1;
        }
        Some(function)
    }

    /// The overload of `group` whose parameters refer to the same types, in
    /// the same order, as `parameters`.
    pub fn find_matching_parameters(
        &self,
        group: EntityId,
        parameters: &[TypeReference],
    ) -> Option<EntityId> {
        self.overloads(group).iter().copied().find(|&overload| {
            let existing = self.children(overload);
            existing.len() == parameters.len()
                && existing.iter().zip(parameters).all(|(&param, wanted)| {
                    self.as_type_reference(param)
                        .is_some_and(|data| data.referred == wanted.referred)
                })
        })
    }

    /// Overloads of `group`, in insertion order.
    #[inline]
    pub fn overloads(&self, group: EntityId) -> &[EntityId] {
        self.children(group)
    }

    /// Parameter references of `function`, in declaration order.
    pub fn parameters(&self, function: EntityId) -> Vec<TypeReference> {
        self.children(function)
            .iter()
            .map(|&param| self.type_reference(param))
            .collect()
    }

    pub fn return_type(&self, function: EntityId) -> Option<TypeReference> {
        let returned = self.function(function).return_type?;
        Some(self.type_reference(returned))
    }

    /// The signature of an existing overload, ready to be re-added elsewhere.
    pub fn declaration(&self, function: EntityId) -> FunctionDecl {
        let data = self.function(function);
        let strip = |mut reference: TypeReference| {
            reference.entity = None;
            reference
        };
        FunctionDecl {
            return_type: self.return_type(function).map(strip),
            parameters: self.parameters(function).into_iter().map(strip).collect(),
            flags: data.flags,
            operator: data.operator.clone(),
        }
    }

    /// The group containing `function`.
    #[track_caller]
    pub fn group_of(&self, function: EntityId) -> EntityId {
        match self.parent(function) {
            Some(group) if self.as_function_group(group).is_some() => group,
            _ => panic!("{function:?} is not inside a function group"),
        }
    }

    /// The entity the group of `function` belongs to, e.g. its class.
    pub fn owner_of(&self, function: EntityId) -> Option<EntityId> {
        self.parent(self.group_of(function))
    }

    /// Unique glue symbol for an overload: the group path joined with `_`,
    /// followed by the overload index.
    pub fn bridge_name(&self, function: EntityId) -> String {
        format!(
            "{}_{}",
            self.hierarchy(self.group_of(function), "_"),
            self.function(function).overload_index
        )
    }

    /// Whether the bridge takes the native object handle as its first
    /// argument.
    pub fn needs_this_handle(&self, function: EntityId) -> bool {
        self.function(function).kind.needs_this_handle()
    }

    /// Constructors return the new handle; other functions return a value
    /// unless their return type is `Void`.
    pub fn returns_value(&self, function: EntityId) -> bool {
        let data = self.function(function);
        if data.kind == FunctionKind::Constructor {
            return true;
        }
        data.return_type.is_some_and(|returned| {
            let referred = self.type_reference(returned).referred;
            self.as_primitive(referred) != Some(Primitive::Void)
        })
    }

    /// Number of bridge parameters, optionally counting the `self` handle.
    pub fn parameter_count(&self, function: EntityId, include_self: bool) -> usize {
        let explicit = self.children(function).len();
        if include_self && self.needs_this_handle(function) {
            explicit + 1
        } else {
            explicit
        }
    }

    /// Function groups of `owner` with the given kind.
    pub fn groups_of_kind(
        &self,
        owner: EntityId,
        kind: FunctionKind,
    ) -> impl Iterator<Item = EntityId> + '_ {
        self.function_groups(owner)
            .filter(move |&group| self.function_group(group).kind == kind)
    }
}
