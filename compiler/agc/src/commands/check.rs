//! The `check` command: load, link and export without writing anything.

use std::io::Write;
use std::path::Path;

use ag_ir::{EntityKind, EntityTree, Primitive};

use super::{load_backend, report_diagnostics, write_out, CommandResult, Failed, Options};

pub fn check_file(path: &Path, options: &Options, out: &mut dyn Write, err: &mut dyn Write) -> CommandResult {
    let mut backend = load_backend(path, options, err)?;
    let glue = backend.ensure_glue_generated();
    let warnings = backend.diagnostics().warning_count();
    report_diagnostics(&mut backend, options, err);
    glue.map_err(|_| Failed)?;

    let (types, functions) = count_declarations(backend.tree());
    let summary = format!(
        "OK: {} ({types} {}, {functions} {}, {warnings} {})\n",
        path.display(),
        plural(types, "type", "types"),
        plural(functions, "function", "functions"),
        plural(warnings, "warning", "warnings"),
    );
    write_out(out, &summary, err)
}

/// Declared types and function overloads. Registry primitives, synthesized
/// concrete types and their overrides are not counted.
fn count_declarations(tree: &EntityTree) -> (usize, usize) {
    let mut types = 0;
    let mut functions = 0;
    for id in tree.ids() {
        match tree.kind(id) {
            EntityKind::Type => {
                let synthesized = tree.as_class(id).is_some_and(|class| class.is_concrete());
                if Primitive::from_id(id).is_none() && !synthesized {
                    types += 1;
                }
            }
            EntityKind::Function if !tree.function(id).is_override() => functions += 1,
            _ => {}
        }
    }
    (types, functions)
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}
