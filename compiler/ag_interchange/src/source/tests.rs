use std::path::PathBuf;

use ag_diagnostic::ErrorCode;
use ag_generate::Backend;
use serde_json::json;

use super::*;
use crate::InterchangeError;

fn two_classes() -> Document {
    serde_json::from_value(json!({
        "format_version": 1,
        "root": { "kind": "Scope", "children": [
            { "kind": "Class", "name": "A" },
            { "kind": "Class", "name": "B" }
        ] }
    }))
    .expect("document")
}

fn used(backend: &Backend, path: &str) -> bool {
    let entity = backend
        .tree()
        .resolve(backend.root(), path)
        .expect("path should resolve");
    backend.tree().is_used(entity)
}

#[test]
fn extra_exports_are_applied_after_loading() {
    let source = InterchangeSource::new(two_classes()).with_exports(["A".to_owned()]);
    let mut backend = Backend::with_source(EntityTree::new(), source);

    backend.ensure_glue_generated().expect("glue");

    assert!(used(&backend, "A"));
    assert!(!used(&backend, "B"));
}

#[test]
fn export_all_uses_the_whole_tree() {
    let source = InterchangeSource::new(two_classes()).export_all(true);
    let mut backend = Backend::with_source(EntityTree::new(), source);

    backend.ensure_glue_generated().expect("glue");

    assert!(used(&backend, "A"));
    assert!(used(&backend, "B"));
}

#[test]
fn unresolved_extra_export_fails_the_glue() {
    let source = InterchangeSource::new(two_classes()).with_exports(["C".to_owned()]);
    let mut backend = Backend::with_source(EntityTree::new(), source);

    assert!(backend.ensure_glue_generated().is_err());
    let codes: Vec<ErrorCode> = backend.diagnostics().peek().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E3001]);
}

#[test]
fn missing_file_is_a_read_error() {
    let path = PathBuf::from("/nonexistent/autoglue/description.json");

    let error = InterchangeSource::from_path(&path)
        .err()
        .expect("reading should fail");

    assert!(matches!(error, InterchangeError::Read { .. }));
    assert!(error.to_string().contains("description.json"));
}
