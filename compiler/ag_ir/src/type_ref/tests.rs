use pretty_assertions::assert_eq;

use super::*;

#[test]
fn class_lowers_to_object_handle() {
    let mut tree = EntityTree::new();
    let widget = tree.add_class(tree.root(), "Widget");

    let pod = tree.as_pod(&TypeReference::new("w", widget).by_reference());

    assert_eq!(pod.referred, Primitive::ObjectHandle.id());
    assert_eq!(pod.name, "w");
    assert!(pod.by_reference);
}

#[test]
fn enum_lowers_to_integer() {
    let mut tree = EntityTree::new();
    let color = tree.add_enum(tree.root(), "Color");

    let pod = tree.as_pod(&TypeReference::new("c", color));

    assert_eq!(pod.referred, Primitive::Integer.id());
}

#[test]
fn alias_chain_lowers_its_final_target() {
    let mut tree = EntityTree::new();
    let root = tree.root();
    let widget = tree.add_class(root, "Widget");
    let inner = tree.add_alias(root, "WidgetRef", Some(widget));
    let outer = tree.add_alias(root, "WidgetHandle", Some(inner));

    assert_eq!(tree.alias_underlying(outer, false), Some(inner));
    assert_eq!(tree.alias_underlying(outer, true), Some(widget));

    let pod = tree.as_pod(&TypeReference::new("h", outer));
    assert_eq!(pod.referred, Primitive::ObjectHandle.id());
}

#[test]
fn alias_to_primitive_lowers_to_that_primitive() {
    let mut tree = EntityTree::new();
    let size = tree.add_alias(tree.root(), "size_t", Some(Primitive::Integer.id()));

    let pod = tree.as_pod(&TypeReference::new("n", size));

    assert_eq!(pod.referred, Primitive::Integer.id());
}

#[test]
fn primitives_are_unchanged() {
    let tree = EntityTree::new();
    let reference = TypeReference::new("flag", Primitive::Boolean.id());

    assert_eq!(tree.as_pod(&reference), reference);
}

#[test]
fn dangling_alias_stays_unlowered() {
    let mut tree = EntityTree::new();
    let root = tree.root();
    let widget = tree.add_class(root, "Widget");
    let alias = tree.add_alias(root, "WidgetRef", Some(widget));
    tree.prune(widget);

    let reference = TypeReference::new("w", alias);
    assert_eq!(tree.alias_underlying(alias, true), None);
    assert_eq!(tree.as_pod(&reference), reference);
}

#[test]
fn alias_cycle_resolves_to_none() {
    let mut tree = EntityTree::new();
    let root = tree.root();
    let a = tree.add_alias(root, "A", None);
    let b = tree.add_alias(root, "B", Some(a));
    tree.set_alias_underlying(a, b);

    assert_eq!(tree.alias_underlying(a, true), None);
}

#[test]
fn identity_ignores_name_and_passing_mode() {
    let a = TypeReference::new("x", Primitive::Integer.id());
    let b = TypeReference::new("y", Primitive::Integer.id()).by_reference();
    let c = TypeReference::new("x", Primitive::Float.id());

    assert!(a.is_identical(&b));
    assert!(!a.is_identical(&c));
}

#[test]
fn snapshot_carries_backing_entity() {
    let mut tree = EntityTree::new();
    let root = tree.root();
    let callable = tree.add_callable(
        root,
        &TypeReference::new("", Primitive::Void.id()),
        &[TypeReference::new("value", Primitive::Integer.id()).by_reference()],
    );
    let param = tree.children(callable)[0];

    let snapshot = tree.type_reference(param);

    assert_eq!(snapshot.entity, Some(param));
    assert_eq!(snapshot.name, "value");
    assert!(snapshot.by_reference);
    assert_eq!(tree.name(callable), "Callable_Void_Integer");
}

#[test]
fn class_target_looks_through_aliases() {
    let mut tree = EntityTree::new();
    let root = tree.root();
    let widget = tree.add_class(root, "Widget");
    let alias = tree.add_alias(root, "W", Some(widget));
    let color = tree.add_enum(root, "Color");

    assert_eq!(tree.class_target(widget), Some(widget));
    assert_eq!(tree.class_target(alias), Some(widget));
    assert_eq!(tree.class_target(color), None);
}
