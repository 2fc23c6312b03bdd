//! The `serialize` command: write the used part of a description back out.

use std::io::Write;
use std::path::Path;

use ag_interchange::{serialize, write_document, write_document_file};

use super::{load_backend, report_diagnostics, CommandResult, Failed, Options};

pub fn serialize_file(
    path: &Path,
    options: &Options,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> CommandResult {
    let mut backend = load_backend(path, options, err)?;
    let document = serialize(&mut backend);
    report_diagnostics(&mut backend, options, err);
    let document = document.map_err(|_| Failed)?;

    let written = match &options.output {
        Some(output) => write_document_file(&document, output),
        None => write_document(&document, &mut *out),
    };
    written.map_err(|error| {
        let _ = writeln!(err, "error: {error}");
        Failed
    })
}
