//! Document to entity tree.
//!
//! Loading runs in two passes. The first builds every scope, type and
//! function group so that forward references work; the second resolves type
//! paths and adds function overloads, alias targets and base links. A bad
//! element is reported and skipped, and loading carries on.

use ag_diagnostic::queue::DiagnosticQueue;
use ag_diagnostic::{unknown_kind, unresolved_type, Diagnostic, ErrorCode, ErrorGuaranteed};
use ag_ir::stack::ensure_sufficient_stack;
use ag_ir::{
    EntityId, EntityKind, EntityTree, FunctionDecl, FunctionFlags, FunctionKind, Primitive,
    TypeReference,
};

use crate::document::{Document, Element, ElementKind, FORMAT_VERSION};

/// Work deferred to the linking pass.
enum Link<'d> {
    Bases {
        class: EntityId,
        path: String,
        bases: &'d [String],
    },
    Alias {
        alias: EntityId,
        path: String,
        target: &'d str,
    },
    Function {
        group: EntityId,
        path: String,
        element: &'d Element,
        flags: FunctionFlags,
    },
}

pub struct Deserializer<'t> {
    tree: &'t mut EntityTree,
    diagnostics: &'t mut DiagnosticQueue,
    failed: Option<ErrorGuaranteed>,
}

impl<'t> Deserializer<'t> {
    pub fn new(tree: &'t mut EntityTree, diagnostics: &'t mut DiagnosticQueue) -> Self {
        Deserializer {
            tree,
            diagnostics,
            failed: None,
        }
    }

    /// Add the contents of `document` under the tree's root and mark its
    /// exports used.
    ///
    /// Returns `Err` if any error was reported. Elements that loaded cleanly
    /// stay in the tree either way.
    #[tracing::instrument(level = "debug", skip_all, fields(exports = document.exports.len()))]
    pub fn load(&mut self, document: &Document) -> Result<(), ErrorGuaranteed> {
        if document.format_version != FORMAT_VERSION {
            return Err(self
                .diagnostics
                .emit_error(unsupported_version(document.format_version)));
        }
        if document.root.element_kind() != Some(ElementKind::Scope) {
            return Err(self.diagnostics.emit_error(
                Diagnostic::error(ErrorCode::E1002)
                    .with_message(format!(
                        "document root must be a `Scope`, found `{}`",
                        document.root.kind
                    ))
                    .with_label("<root>", "nothing loaded"),
            ));
        }

        let mut links = Vec::new();
        let root = self.tree.root();
        self.build_children(root, ElementKind::Scope, "", &document.root.children, &mut links);
        tracing::debug!(links = links.len(), "structure built");

        for link in links {
            self.link(link);
        }

        let exports = document.exports.iter().map(String::as_str);
        if let Err(guarantee) = export(self.tree, self.diagnostics, exports) {
            self.failed = Some(guarantee);
        }

        match self.failed {
            Some(guarantee) => Err(guarantee),
            None => Ok(()),
        }
    }

    fn error(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(code = %diagnostic.code, "element rejected");
        self.failed = Some(self.diagnostics.emit_error(diagnostic));
    }

    fn build_children<'d>(
        &mut self,
        parent: EntityId,
        parent_kind: ElementKind,
        parent_path: &str,
        elements: &'d [Element],
        links: &mut Vec<Link<'d>>,
    ) {
        for (index, element) in elements.iter().enumerate() {
            let path = element_path(parent_path, element, index);
            ensure_sufficient_stack(|| self.build(parent, parent_kind, path, element, links));
        }
    }

    fn build<'d>(
        &mut self,
        parent: EntityId,
        parent_kind: ElementKind,
        path: String,
        element: &'d Element,
        links: &mut Vec<Link<'d>>,
    ) {
        let Some(kind) = element.element_kind() else {
            self.error(unknown_kind(&path, &element.kind));
            return;
        };
        if !is_allowed(kind, parent_kind) {
            self.error(
                Diagnostic::error(ErrorCode::E1003)
                    .with_message(format!(
                        "`{}` cannot appear inside `{}`",
                        kind.as_str(),
                        parent_kind.as_str()
                    ))
                    .with_label(&path, "element skipped"),
            );
            return;
        }

        let name = element.name.as_str();
        match kind {
            ElementKind::Scope => {
                let scope = self.tree.add_scope(parent, name);
                self.build_children(scope, kind, &path, &element.children, links);
            }
            ElementKind::Class => {
                let class = self.tree.add_class(parent, name);
                if !element.bases.is_empty() {
                    links.push(Link::Bases {
                        class,
                        path: path.clone(),
                        bases: &element.bases,
                    });
                }
                self.build_children(class, kind, &path, &element.children, links);
            }
            ElementKind::Enum => {
                let enumeration = self.tree.add_enum(parent, name);
                self.build_children(enumeration, kind, &path, &element.children, links);
            }
            ElementKind::EnumEntry => {
                let Some(value) = &element.value else {
                    self.error(malformed(&path, "enum entry has no `value`"));
                    return;
                };
                self.tree.add_enum_entry(parent, name, value.clone());
                self.reject_children(kind, &path, element);
            }
            ElementKind::TypeAlias => {
                let Some(target) = element.underlying.as_deref() else {
                    self.error(malformed(&path, "type alias has no `underlying` type"));
                    return;
                };
                let alias = self.tree.add_alias(parent, name, None);
                self.reject_children(kind, &path, element);
                links.push(Link::Alias {
                    alias,
                    path,
                    target,
                });
            }
            ElementKind::Primitive => {
                let requested = element.primitive.as_deref().unwrap_or_default();
                let Some(primitive) = Primitive::from_name(requested) else {
                    self.error(malformed(
                        &path,
                        &format!("`{requested}` is not a registry primitive"),
                    ));
                    return;
                };
                self.tree.add_primitive(parent, name, primitive);
                self.reject_children(kind, &path, element);
            }
            ElementKind::FunctionGroup => {
                let requested = element.function_kind.as_deref().unwrap_or_default();
                let Some(function_kind) = FunctionKind::from_name(requested) else {
                    self.error(malformed(
                        &path,
                        &format!("`{requested}` is not a function kind"),
                    ));
                    return;
                };
                let group = self.tree.add_function_group(parent, name, function_kind);
                self.build_children(group, kind, &path, &element.children, links);
            }
            ElementKind::Function => {
                let Some(flags) = parse_flags(&element.flags) else {
                    self.error(malformed(
                        &path,
                        "function flags must be `overridable`, `override` or `interface`",
                    ));
                    return;
                };
                self.reject_children(kind, &path, element);
                links.push(Link::Function {
                    group: parent,
                    path,
                    element,
                    flags,
                });
            }
        }
    }

    /// Leaves take no children. Each one is reported where it stands.
    fn reject_children(&mut self, kind: ElementKind, path: &str, element: &Element) {
        for (index, child) in element.children.iter().enumerate() {
            let child_path = element_path(path, child, index);
            self.error(
                Diagnostic::error(ErrorCode::E1003)
                    .with_message(format!("`{}` cannot contain other elements", kind.as_str()))
                    .with_label(&child_path, "element skipped"),
            );
        }
    }

    fn link(&mut self, link: Link<'_>) {
        match link {
            Link::Bases { class, path, bases } => {
                for base in bases {
                    if let Some(base) = self.resolve_type(&path, base) {
                        self.tree.add_base_type(class, base);
                    }
                }
            }
            Link::Alias {
                alias,
                path,
                target,
            } => {
                if let Some(target) = self.resolve_type(&path, target) {
                    self.tree.set_alias_underlying(alias, target);
                }
            }
            Link::Function {
                group,
                path,
                element,
                flags,
            } => self.add_function(group, &path, element, flags),
        }
    }

    fn add_function(&mut self, group: EntityId, path: &str, element: &Element, flags: FunctionFlags) {
        let kind = self.tree.function_group(group).kind();
        let mut decl = FunctionDecl::new().with_flags(flags);
        let mut complete = true;

        match (&element.return_type, kind.has_return_type()) {
            (Some(target), true) => match self.resolve_type(path, target) {
                Some(returned) => {
                    let mut reference = TypeReference::new("", returned);
                    reference.by_reference = element.returns_reference;
                    decl = decl.returning(reference);
                }
                None => complete = false,
            },
            (None, true) => {
                self.error(malformed(path, &format!("`{kind}` requires a `return_type`")));
                return;
            }
            (Some(_), false) => {
                self.error(malformed(path, &format!("`{kind}` cannot have a `return_type`")));
                return;
            }
            (None, false) => {}
        }

        for parameter in &element.parameters {
            match self.resolve_type(path, &parameter.ty) {
                Some(ty) => {
                    let mut reference = TypeReference::new(parameter.name.clone(), ty);
                    reference.by_reference = parameter.by_reference;
                    decl = decl.parameter(reference);
                }
                None => complete = false,
            }
        }
        if !complete {
            return;
        }
        if let Some(operator) = &element.operator {
            decl = decl.with_operator(operator.clone());
        }

        if self.tree.add_overload(group, decl).is_none() {
            self.diagnostics.add(
                Diagnostic::warning(ErrorCode::W1001)
                    .with_message("overload with identical parameter types ignored")
                    .with_label(path, "duplicate declared here")
                    .with_note("parameter names do not distinguish overloads"),
            );
        }
    }

    /// A dotted path from the root, falling back to registry primitive names.
    fn resolve_type(&mut self, path: &str, target: &str) -> Option<EntityId> {
        let root = self.tree.root();
        match self.tree.resolve(root, target) {
            Some(found) if self.tree.kind(found) == EntityKind::Type => Some(found),
            Some(found) => {
                let kind = self.tree.kind(found);
                self.error(
                    Diagnostic::error(ErrorCode::E2002)
                        .with_message(format!("`{target}` is not a type"))
                        .with_label(path, "linked here")
                        .with_note(format!("it names a {kind:?} entity")),
                );
                None
            }
            None => match Primitive::from_name(target) {
                Some(primitive) => Some(primitive.id()),
                None => {
                    self.error(unresolved_type(path, target));
                    None
                }
            },
        }
    }
}

/// Mark every entity named in `names`, and everything beneath it, used.
///
/// Unresolved names are reported and the rest are still exported. Returns
/// the number of names exported.
pub fn export<'a>(
    tree: &mut EntityTree,
    diagnostics: &mut DiagnosticQueue,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<usize, ErrorGuaranteed> {
    let root = tree.root();
    let mut exported = 0;
    let mut failed = None;
    for name in names {
        match tree.resolve(root, name) {
            Some(entity) => {
                tree.use_all(entity);
                exported += 1;
            }
            None => {
                failed = Some(
                    diagnostics.emit_error(
                        Diagnostic::error(ErrorCode::E3001)
                            .with_message(format!("cannot resolve export `{name}`"))
                            .with_label(name, "nothing exported")
                            .with_suggestion("`agc list` prints every qualified name"),
                    ),
                );
            }
        }
    }
    match failed {
        Some(guarantee) => Err(guarantee),
        None => Ok(exported),
    }
}

fn is_allowed(kind: ElementKind, parent: ElementKind) -> bool {
    match parent {
        ElementKind::Enum => kind == ElementKind::EnumEntry,
        ElementKind::FunctionGroup => kind == ElementKind::Function,
        ElementKind::Scope => !matches!(kind, ElementKind::EnumEntry | ElementKind::Function),
        ElementKind::Class => !matches!(
            kind,
            ElementKind::Scope | ElementKind::EnumEntry | ElementKind::Function
        ),
        ElementKind::EnumEntry
        | ElementKind::TypeAlias
        | ElementKind::Primitive
        | ElementKind::Function => false,
    }
}

/// Flags are written lowercase; the bit names are uppercase.
fn parse_flags(names: &[String]) -> Option<FunctionFlags> {
    let upper: Vec<String> = names.iter().map(|name| name.to_ascii_uppercase()).collect();
    FunctionFlags::from_names(upper.iter().map(String::as_str))
}

/// Diagnostic path of an element: dotted names, with `[index]` standing in
/// for unnamed elements such as overloads.
fn element_path(parent: &str, element: &Element, index: usize) -> String {
    match (parent.is_empty(), element.name.is_empty()) {
        (true, true) => format!("[{index}]"),
        (true, false) => element.name.clone(),
        (false, true) => format!("{parent}[{index}]"),
        (false, false) => format!("{parent}.{}", element.name),
    }
}

fn malformed(path: &str, message: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1002)
        .with_message(message)
        .with_label(path, "element skipped")
}

#[cold]
fn unsupported_version(found: u32) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1004)
        .with_message(format!("unsupported format version {found}"))
        .with_note(format!("this reader understands version {FORMAT_VERSION}"))
}
