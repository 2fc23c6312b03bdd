use ag_diagnostic::queue::DiagnosticQueue;
use ag_diagnostic::{Diagnostic, ErrorCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::InterchangeSource;

fn document(value: serde_json::Value) -> Document {
    serde_json::from_value(value).expect("document")
}

fn serialize_document(input: &Document) -> Document {
    let mut backend = Backend::with_source(EntityTree::new(), InterchangeSource::new(input.clone()));
    serialize(&mut backend).expect("serialize")
}

fn element_names(element: &Element, names: &mut Vec<String>) {
    names.push(element.name.clone());
    for child in &element.children {
        element_names(child, names);
    }
}

#[test]
fn loaded_documents_serialize_unchanged() {
    let input = document(json!({
        "format_version": FORMAT_VERSION,
        "root": { "kind": "Scope", "children": [
            { "kind": "Scope", "name": "gfx", "children": [
                { "kind": "Enum", "name": "Color", "children": [
                    { "kind": "EnumEntry", "name": "Red", "value": "0" },
                    { "kind": "EnumEntry", "name": "Blue", "value": "1" }
                ] },
                { "kind": "Class", "name": "Shape", "children": [
                    { "kind": "FunctionGroup", "name": "area", "function_kind": "MemberFunction",
                      "children": [
                        { "kind": "Function", "return_type": "Double",
                          "flags": ["overridable", "interface"] }
                    ] },
                    { "kind": "FunctionGroup", "name": "paint", "function_kind": "MemberFunction",
                      "children": [
                        { "kind": "Function", "return_type": "Void", "parameters": [
                            { "name": "color", "type": "gfx.Color" },
                            { "name": "target", "type": "gfx.Shape", "by_reference": true }
                        ] }
                    ] }
                ] },
                { "kind": "Class", "name": "Circle", "bases": ["gfx.Shape"] },
                { "kind": "TypeAlias", "name": "Real", "underlying": "Double" }
            ] },
            { "kind": "FunctionGroup", "name": "compare", "function_kind": "Function",
              "children": [
                { "kind": "Function", "return_type": "Boolean", "operator": "==",
                  "parameters": [{ "type": "gfx.Real" }, { "type": "gfx.Real" }] }
            ] }
        ] },
        "exports": ["gfx", "compare"]
    }));

    let output = serialize_document(&input);

    assert_eq!(output, input);
}

#[test]
fn concrete_types_are_never_written() {
    let input = document(json!({
        "format_version": FORMAT_VERSION,
        "root": { "kind": "Scope", "children": [
            { "kind": "Class", "name": "Shape", "children": [
                { "kind": "FunctionGroup", "name": "area", "function_kind": "MemberFunction",
                  "children": [
                    { "kind": "Function", "return_type": "Double", "flags": ["interface"] }
                ] }
            ] }
        ] },
        "exports": ["Shape"]
    }));

    let output = serialize_document(&input);

    let mut names = Vec::new();
    element_names(&output.root, &mut names);
    assert_eq!(names, vec!["", "Shape", "area", ""]);
}

#[test]
fn only_used_entities_are_written() {
    let input = document(json!({
        "format_version": FORMAT_VERSION,
        "root": { "kind": "Scope", "children": [
            { "kind": "Scope", "name": "gfx", "children": [
                { "kind": "Class", "name": "Point" },
                { "kind": "Class", "name": "Unused" }
            ] },
            { "kind": "Class", "name": "Elsewhere" }
        ] },
        "exports": ["gfx.Point"]
    }));

    let output = serialize_document(&input);

    assert_eq!(
        output,
        document(json!({
            "format_version": FORMAT_VERSION,
            "root": { "kind": "Scope", "children": [
                { "kind": "Scope", "name": "gfx", "children": [
                    { "kind": "Class", "name": "Point" }
                ] }
            ] },
            "exports": ["gfx"]
        }))
    );
}

#[test]
fn links_target_the_latest_element() {
    let mut writer = JsonWriter::new();
    writer.begin_element(Element::new(ElementKind::Class, "Circle"));
    writer.add_base_type("Shape".to_owned());
    writer.write_element(Element::new(ElementKind::TypeAlias, "Radius"));
    writer.set_referred_type("Double".to_owned());
    writer.end_element();
    writer.add_base_type("Drawable".to_owned());

    let document = writer.finish();

    let circle = &document.root.children[0];
    assert_eq!(circle.bases, vec!["Shape", "Drawable"]);
    assert_eq!(circle.children[0].underlying.as_deref(), Some("Double"));
    assert_eq!(document.exports, vec!["Circle"]);
}

#[test]
fn finish_closes_open_elements() {
    let mut writer = JsonWriter::new();
    writer.begin_element(Element::new(ElementKind::Scope, "outer"));
    writer.begin_element(Element::new(ElementKind::Class, "Inner"));

    let document = writer.finish();

    assert_eq!(
        document.root,
        Element::root().with_child(
            Element::new(ElementKind::Scope, "outer")
                .with_child(Element::new(ElementKind::Class, "Inner"))
        )
    );
}

#[test]
fn named_primitives_are_written_by_registry_name() {
    let input = document(json!({
        "format_version": FORMAT_VERSION,
        "root": { "kind": "Scope", "children": [
            { "kind": "Primitive", "name": "int", "primitive": "Integer" },
            { "kind": "FunctionGroup", "name": "twice", "function_kind": "Function",
              "children": [
                { "kind": "Function", "return_type": "int",
                  "parameters": [{ "name": "value", "type": "int" }] }
            ] }
        ] },
        "exports": ["twice"]
    }));

    let output = serialize_document(&input);
    let function = &output.root.children[0].children[0];
    assert_eq!(function.return_type.as_deref(), Some("Integer"));
    assert_eq!(function.parameters[0].ty, "Integer");

    // The written document loads again without the alias.
    let reloaded = serialize_document(&output);
    assert_eq!(reloaded, output);
}

#[test]
fn failed_glue_writes_nothing() {
    let mut backend = Backend::with_source(
        EntityTree::new(),
        |_: &mut EntityTree, diagnostics: &mut DiagnosticQueue| -> Result<(), ErrorGuaranteed> {
            Err(diagnostics.emit_error(Diagnostic::error(ErrorCode::E3001).with_message("boom")))
        },
    );

    assert!(serialize(&mut backend).is_err());
}
