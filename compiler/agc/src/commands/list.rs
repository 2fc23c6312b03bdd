//! The `list` command: print the loaded entity tree.

use std::io::Write;
use std::path::Path;

use super::{load_backend, report_diagnostics, write_out, CommandResult, Failed, Options};

/// Print the whole tree, or one subtree per `--export` name.
///
/// Every live entity is listed whether or not it is used; exports only pick
/// which subtrees are shown.
pub fn list_file(path: &Path, options: &Options, out: &mut dyn Write, err: &mut dyn Write) -> CommandResult {
    let mut backend = load_backend(path, options, err)?;
    let glue = backend.ensure_glue_generated();
    report_diagnostics(&mut backend, options, err);
    glue.map_err(|_| Failed)?;

    let tree = backend.tree();
    let root = tree.root();
    if options.exports.is_empty() {
        return write_out(out, &tree.listing(root), err);
    }

    for name in &options.exports {
        // Unresolved exports already failed the glue.
        if let Some(id) = tree.resolve(root, name) {
            write_out(out, &tree.listing(id), err)?;
        }
    }
    Ok(())
}
