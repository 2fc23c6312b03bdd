//! Entity tree to document.
//!
//! [`Serializer`] is an ordinary binding generator, so it sees exactly what
//! any backend would: used entities only, each once. It never opens the
//! synthesized concrete types. Named primitives are not written; documents
//! refer to registry primitives by name instead.

use ag_diagnostic::ErrorGuaranteed;
use ag_generate::{generate_bindings, Backend, BindingGenerator, GenerateOptions, Generation};
use ag_ir::{EntityId, EntityTree};

use crate::document::{Document, Element, ElementKind, Parameter, FORMAT_VERSION};

/// Sink for the serializer's output.
///
/// Link setters apply to the most recently begun, ended or written element.
pub trait ElementWriter {
    /// Open an element that will own the elements written after it.
    fn begin_element(&mut self, element: Element);

    /// Close the innermost open element.
    fn end_element(&mut self);

    /// Write an element that owns nothing.
    fn write_element(&mut self, element: Element);

    fn set_return_type(&mut self, path: String, by_reference: bool);

    fn set_referred_type(&mut self, path: String);

    fn add_base_type(&mut self, path: String);
}

/// Builds a [`Document`] in memory.
#[derive(Debug)]
pub struct JsonWriter {
    /// Open elements, outermost first. The root is always open.
    open: Vec<Element>,
    /// Whether links target the last child of the innermost open element
    /// rather than the open element itself.
    after_child: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        JsonWriter {
            open: vec![Element::root()],
            after_child: false,
        }
    }

    fn current(&mut self) -> Option<&mut Element> {
        let innermost = self.open.last_mut()?;
        if self.after_child {
            innermost.children.last_mut()
        } else {
            Some(innermost)
        }
    }

    /// Close anything still open and produce the document.
    ///
    /// The names of top-level elements become its exports, so loading the
    /// document marks everything in it used again.
    pub fn finish(mut self) -> Document {
        while self.open.len() > 1 {
            self.end_element();
        }
        let root = self.open.pop().unwrap_or_else(Element::root);

        let mut exports: Vec<String> = Vec::new();
        for child in &root.children {
            if !child.name.is_empty() && !exports.contains(&child.name) {
                exports.push(child.name.clone());
            }
        }

        Document {
            format_version: FORMAT_VERSION,
            root,
            exports,
        }
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementWriter for JsonWriter {
    fn begin_element(&mut self, element: Element) {
        self.open.push(element);
        self.after_child = false;
    }

    fn end_element(&mut self) {
        if self.open.len() > 1 {
            if let Some(done) = self.open.pop() {
                if let Some(parent) = self.open.last_mut() {
                    parent.children.push(done);
                }
            }
        }
        self.after_child = true;
    }

    fn write_element(&mut self, element: Element) {
        if let Some(parent) = self.open.last_mut() {
            parent.children.push(element);
        }
        self.after_child = true;
    }

    fn set_return_type(&mut self, path: String, by_reference: bool) {
        if let Some(element) = self.current() {
            element.return_type = Some(path);
            element.returns_reference = by_reference;
        }
    }

    fn set_referred_type(&mut self, path: String) {
        if let Some(element) = self.current() {
            element.underlying = Some(path);
        }
    }

    fn add_base_type(&mut self, path: String) {
        if let Some(element) = self.current() {
            element.bases.push(path);
        }
    }
}

pub struct Serializer<W> {
    writer: W,
}

impl<W: ElementWriter> Serializer<W> {
    pub fn new(writer: W) -> Self {
        Serializer { writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: ElementWriter> BindingGenerator for Serializer<W> {
    fn generate_named_scope(&mut self, cx: &mut Generation<'_>, scope: EntityId) {
        let name = cx.tree().name(scope).to_owned();
        self.writer
            .begin_element(Element::new(ElementKind::Scope, name));
        cx.generate_nested(self, scope);
        self.writer.end_element();
    }

    fn generate_class(&mut self, cx: &mut Generation<'_>, class: EntityId) {
        if cx.tree().class(class).is_concrete() {
            return;
        }
        let name = cx.tree().name(class).to_owned();
        self.writer
            .begin_element(Element::new(ElementKind::Class, name));
        cx.generate_base_types(self, class);
        cx.generate_nested(self, class);
        self.writer.end_element();
    }

    fn generate_base_type(&mut self, cx: &mut Generation<'_>, base: EntityId, _index: usize) -> bool {
        self.writer.add_base_type(type_path(cx.tree(), base));
        false
    }

    fn generate_enum(&mut self, cx: &mut Generation<'_>, enumeration: EntityId) {
        let name = cx.tree().name(enumeration).to_owned();
        self.writer
            .begin_element(Element::new(ElementKind::Enum, name));
        cx.generate_values(self, enumeration);
        self.writer.end_element();
    }

    fn generate_enum_entry(&mut self, cx: &mut Generation<'_>, entry: EntityId) {
        let tree = cx.tree();
        let mut element = Element::new(ElementKind::EnumEntry, tree.name(entry));
        element.value = Some(tree.enum_entry(entry).value().to_owned());
        self.writer.write_element(element);
    }

    fn generate_type_alias(&mut self, cx: &mut Generation<'_>, alias: EntityId) {
        let tree = cx.tree();
        self.writer
            .write_element(Element::new(ElementKind::TypeAlias, tree.name(alias)));
        if let Some(target) = tree.alias_underlying(alias, false) {
            self.writer.set_referred_type(type_path(tree, target));
        }
    }

    fn generate_function_group(&mut self, cx: &mut Generation<'_>, group: EntityId) {
        let tree = cx.tree();
        let mut element = Element::new(ElementKind::FunctionGroup, tree.name(group));
        element.function_kind = Some(tree.function_group(group).kind().as_str().to_owned());
        self.writer.begin_element(element);
        cx.generate_overloads(self, group);
        self.writer.end_element();
    }

    fn generate_function(&mut self, cx: &mut Generation<'_>, function: EntityId) {
        let tree = cx.tree();
        let data = tree.function(function);

        let mut element = Element::new(ElementKind::Function, "");
        element.flags = data
            .flags()
            .names()
            .into_iter()
            .map(str::to_ascii_lowercase)
            .collect();
        element.operator = data.operator().map(str::to_owned);
        element.parameters = tree
            .parameters(function)
            .into_iter()
            .map(|parameter| Parameter {
                ty: type_path(tree, parameter.referred),
                name: parameter.name,
                by_reference: parameter.by_reference,
            })
            .collect();
        self.writer.write_element(element);

        if let Some(returned) = tree.return_type(function) {
            self.writer
                .set_return_type(type_path(tree, returned.referred), returned.by_reference);
        }
    }
}

/// How a document names `id`: primitives by registry name, even when the
/// description gave them a name of their own, everything else by dotted path
/// from the root.
fn type_path(tree: &EntityTree, id: EntityId) -> String {
    match tree.as_primitive(id) {
        Some(primitive) => primitive.name().to_owned(),
        None => tree.hierarchy(id, "."),
    }
}

/// Write the used part of `backend`'s tree as a document.
#[tracing::instrument(level = "debug", skip_all)]
pub fn serialize(backend: &mut Backend) -> Result<Document, ErrorGuaranteed> {
    let mut serializer = Serializer::new(JsonWriter::new());
    generate_bindings(backend, &mut serializer, GenerateOptions::default())?;
    let document = serializer.into_writer().finish();
    tracing::debug!(
        top_level = document.root.children.len(),
        "document written"
    );
    Ok(document)
}

#[cfg(test)]
#[allow(clippy::expect_used, reason = "tests use expect for brevity")]
mod tests;
