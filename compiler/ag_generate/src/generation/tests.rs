use ag_ir::{FunctionDecl, FunctionFlags, FunctionKind, Primitive};
use pretty_assertions::assert_eq;

use super::*;
use crate::tests::Recorder;
use crate::{generate_bindings, Backend, GenerateOptions};

fn walk(tree: &mut EntityTree, recorder: &mut Recorder) {
    let root = tree.root();
    Generation::new(tree).generate(recorder, root);
}

/// Draws nothing and never wants a separator after a base.
struct NoSeparators {
    bases: usize,
    separators: usize,
}

impl BindingGenerator for NoSeparators {
    fn generate_base_type(&mut self, _cx: &mut Generation<'_>, _base: EntityId, _index: usize) -> bool {
        self.bases += 1;
        false
    }

    fn generate_argument_separator(&mut self, _cx: &mut Generation<'_>) {
        self.separators += 1;
    }
}

/// `Circle : Shape, Drawable, Temp` with `Temp` pruned.
fn circle_with_expired_base() -> (EntityTree, EntityId) {
    let mut tree = EntityTree::new();
    let root = tree.root();
    let shape = tree.add_class(root, "Shape");
    let drawable = tree.add_class(root, "Drawable");
    let temp = tree.add_class(root, "Temp");
    let circle = tree.add_class(root, "Circle");
    tree.add_base_type(circle, shape);
    tree.add_base_type(circle, drawable);
    tree.add_base_type(circle, temp);
    tree.prune(temp);
    (tree, circle)
}

#[test]
fn expired_bases_are_skipped_with_one_separator_between_live_ones() {
    let (mut tree, circle) = circle_with_expired_base();
    assert_eq!(tree.base_type_count(circle), 3);
    let mut recorder = Recorder::default();

    Generation::new(&mut tree).generate_base_types(&mut recorder, circle);

    assert_eq!(recorder.events, vec!["base 0 Shape", ",", "base 1 Drawable"]);
}

#[test]
fn base_hook_can_suppress_separators() {
    let (mut tree, circle) = circle_with_expired_base();
    let mut generator = NoSeparators {
        bases: 0,
        separators: 0,
    };

    Generation::new(&mut tree).generate_base_types(&mut generator, circle);

    assert_eq!(generator.bases, 2);
    assert_eq!(generator.separators, 0);
}

#[test]
fn class_depth_tracks_nesting() {
    let mut tree = EntityTree::new();
    let root = tree.root();
    let outer = tree.add_class(root, "Outer");
    let inner = tree.add_class(outer, "Inner");
    tree.add_class(inner, "Innermost");
    tree.use_all(root);
    let mut recorder = Recorder::default();

    let mut cx = Generation::new(&mut tree);
    assert_eq!(cx.class_depth(), 0);
    cx.generate(&mut recorder, root);
    assert_eq!(cx.class_depth(), 0);

    assert_eq!(
        recorder.events,
        vec![
            "class Outer depth=1",
            "class Outer.Inner depth=2",
            "class Outer.Inner.Innermost depth=3",
        ]
    );
}

#[test]
fn only_the_last_enum_entry_is_marked() {
    let mut tree = EntityTree::new();
    let root = tree.root();
    let color = tree.add_enum(root, "Color");
    tree.add_enum_entry(color, "Red", "0");
    tree.add_enum_entry(color, "Green", "1");
    tree.add_enum_entry(color, "Blue", "2");
    tree.use_all(root);
    let mut recorder = Recorder::default();

    walk(&mut tree, &mut recorder);

    assert_eq!(
        recorder.events,
        vec![
            "enum Color",
            "entry Red=0",
            "entry Green=1",
            "entry Blue=2 last",
        ]
    );
}

#[test]
fn an_entity_is_generated_once_per_pass() {
    let mut tree = EntityTree::new();
    let root = tree.root();
    let point = tree.add_class(root, "Point");
    tree.use_entity(point);
    let mut recorder = Recorder::default();

    let mut cx = Generation::new(&mut tree);
    cx.generate(&mut recorder, root);
    cx.generate(&mut recorder, point);
    cx.generate(&mut recorder, root);

    assert_eq!(recorder.events, vec!["class Point depth=1"]);
    assert!(tree.is_generated(point));
}

#[test]
fn unnamed_scopes_are_transparent() {
    let mut tree = EntityTree::new();
    let root = tree.root();
    let anonymous = tree.add_scope(root, "");
    let named = tree.add_scope(anonymous, "gfx");
    let point = tree.add_class(named, "Point");
    tree.use_entity(point);
    let mut recorder = Recorder::default();

    walk(&mut tree, &mut recorder);

    assert_eq!(recorder.events, vec!["scope gfx", "class gfx.Point depth=1"]);
}

#[test]
fn primitives_and_callables_generate_nothing() {
    let mut tree = EntityTree::new();
    let root = tree.root();
    let callback = tree.add_callable(
        root,
        &TypeReference::new("", Primitive::Void.id()),
        &[TypeReference::new("", Primitive::Integer.id())],
    );
    tree.use_entity(callback);
    tree.use_entity(Primitive::Double.id());
    let mut recorder = Recorder::default();

    let mut cx = Generation::new(&mut tree);
    cx.generate(&mut recorder, root);
    cx.generate(&mut recorder, Primitive::Double.id());

    assert!(recorder.events.is_empty());
}

#[test]
fn aliases_reach_their_hook() {
    let mut tree = EntityTree::new();
    let root = tree.root();
    let real = tree.add_alias(root, "Real", Some(Primitive::Double.id()));
    tree.use_entity(real);
    let mut recorder = Recorder::default();

    walk(&mut tree, &mut recorder);

    assert_eq!(recorder.events, vec!["alias Real"]);
    assert!(tree.is_used(Primitive::Double.id()));
}

/// `Canvas::draw(Shape& shape, Color color)` plus a free `clear()`.
fn canvas_tree() -> (EntityTree, EntityId, EntityId) {
    let mut tree = EntityTree::new();
    let root = tree.root();
    let shape = tree.add_class(root, "Shape");
    let color = tree.add_enum(root, "Color");
    tree.add_enum_entry(color, "Red", "0");
    let canvas = tree.add_class(root, "Canvas");
    let draw_group = tree.add_function_group(canvas, "draw", FunctionKind::MemberFunction);
    let draw = tree
        .add_overload(
            draw_group,
            FunctionDecl::new()
                .returning(TypeReference::new("", Primitive::Void.id()))
                .parameter(TypeReference::new("shape", shape).by_reference())
                .parameter(TypeReference::new("color", color)),
        )
        .expect("draw");
    let clear_group = tree.add_function_group(root, "clear", FunctionKind::Function);
    let clear = tree
        .add_overload(
            clear_group,
            FunctionDecl::new().returning(TypeReference::new("", Primitive::Void.id())),
        )
        .expect("clear");
    (tree, draw, clear)
}

#[test]
fn parameters_keep_declared_types_by_default() {
    let (mut tree, draw, _) = canvas_tree();
    let mut recorder = Recorder::default();

    Generation::new(&mut tree).generate_parameters(&mut recorder, draw, false, false);

    assert_eq!(
        recorder.events,
        vec!["ref Shape& shape", ",", "ref Color color"]
    );
}

#[test]
fn lowered_parameters_lead_with_the_object_handle() {
    let (mut tree, draw, _) = canvas_tree();
    let mut recorder = Recorder::default();

    Generation::new(&mut tree).generate_parameters(&mut recorder, draw, true, true);

    assert_eq!(
        recorder.events,
        vec![
            "ref ObjectHandle objectHandle",
            ",",
            "ref ObjectHandle& shape",
            ",",
            "ref Integer color",
        ]
    );
}

#[test]
fn free_functions_take_no_object_handle() {
    let (mut tree, _, clear) = canvas_tree();
    let mut recorder = Recorder::default();

    let mut cx = Generation::new(&mut tree);
    cx.generate_parameters(&mut recorder, clear, true, true);
    let emitted = cx.generate_return_type(&mut recorder, clear, true);

    assert!(emitted);
    assert_eq!(recorder.events, vec!["ref Void"]);
}

#[test]
fn constructors_have_no_return_type_hook() {
    let mut tree = EntityTree::new();
    let point = tree.add_class(tree.root(), "Point");
    let group = tree.add_function_group(point, "Point", FunctionKind::Constructor);
    let constructor = tree
        .add_overload(
            group,
            FunctionDecl::new().parameter(TypeReference::new("x", Primitive::Double.id())),
        )
        .expect("constructor");
    let mut recorder = Recorder::lowering();

    let mut cx = Generation::new(&mut tree);
    let emitted = cx.generate_return_type(&mut recorder, constructor, true);
    cx.generate_parameters(&mut recorder, constructor, true, true);

    assert!(!emitted);
    assert_eq!(recorder.events, vec!["ref Double x"]);
}

#[test]
fn whole_pass_lowers_through_the_recorder() {
    let (mut tree, _, _) = canvas_tree();
    let root = tree.root();
    tree.use_all(root);
    let mut backend = Backend::new(tree);
    let mut recorder = Recorder::lowering();

    generate_bindings(&mut backend, &mut recorder, GenerateOptions::default())
        .expect("generation");

    assert!(recorder.events.contains(&"fn Canvas_draw_0".to_owned()));
    assert!(recorder.events.contains(&"ref Integer color".to_owned()));
    assert!(recorder.events.contains(&"fn clear_0".to_owned()));
    assert_eq!(recorder.events.last().map(String::as_str), Some("finished"));
}

#[test]
fn unused_overrides_leave_no_concrete_type_to_generate() {
    let mut tree = EntityTree::new();
    let widget = tree.add_class(tree.root(), "Widget");
    let draw = tree.add_function_group(widget, "draw", FunctionKind::MemberFunction);
    tree.add_overload(
        draw,
        FunctionDecl::new()
            .returning(TypeReference::new("", Primitive::Void.id()))
            .with_flags(FunctionFlags::OVERRIDABLE),
    )
    .expect("overload");
    tree.use_entity(widget);
    let mut backend = Backend::new(tree);
    let mut recorder = Recorder::default();

    generate_bindings(&mut backend, &mut recorder, GenerateOptions::default())
        .expect("generation");

    assert_eq!(recorder.events, vec!["class Widget depth=1", "finished"]);
}

#[test]
fn interceptions_cover_used_overrides_only() {
    let mut tree = EntityTree::new();
    let root = tree.root();
    let widget = tree.add_class(root, "Widget");
    for name in ["draw", "resize"] {
        let group = tree.add_function_group(widget, name, FunctionKind::MemberFunction);
        tree.add_overload(
            group,
            FunctionDecl::new()
                .returning(TypeReference::new("", Primitive::Void.id()))
                .with_flags(FunctionFlags::OVERRIDABLE),
        )
        .expect("overload");
    }
    tree.use_entity(widget);
    let draw = tree
        .find_function_group(widget, "draw", FunctionKind::MemberFunction)
        .expect("draw");
    tree.use_entity(draw);
    tree.finalize_concrete_types();
    let mut recorder = Recorder::default();

    let count = Generation::new(&mut tree).generate_interceptions(&mut recorder, widget);

    assert_eq!(count, 1);
    assert_eq!(
        recorder.events,
        vec!["intercept Widget_ConcreteType_draw_0", "context Widget"]
    );
}
