//! Command handlers for the `agc` CLI.
//!
//! Each submodule implements one command. Commands write their results to
//! `out` and diagnostics to `err`, and return [`Failed`] once the reason has
//! been reported. Option parsing and diagnostic rendering live here.

use std::io::Write;
use std::path::{Path, PathBuf};

use ag_diagnostic::emitter::{ColorMode, DiagnosticEmitter, JsonEmitter, TerminalEmitter};
use ag_generate::Backend;
use ag_interchange::InterchangeSource;
use ag_ir::EntityTree;

mod check;
mod explain;
mod list;
mod serialize;

pub use check::check_file;
pub use explain::explain_error;
pub use list::list_file;
pub use serialize::serialize_file;

/// A command did not succeed. The reason has already been written.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Failed;

pub type CommandResult = Result<(), Failed>;

/// How diagnostics are rendered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_flag(value: &str) -> Option<Self> {
        match value {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// `--export=<name>`, repeatable.
    pub exports: Vec<String>,
    /// `--all`
    pub export_all: bool,
    /// `--format=text|json`
    pub format: OutputFormat,
    /// `--color=auto|always|never`
    pub color: ColorMode,
    /// `--verbose` / `-v`
    pub verbose: bool,
    /// `-o <path>`
    pub output: Option<PathBuf>,
    /// Whether the diagnostic stream is a terminal, for `--color=auto`.
    pub err_is_tty: bool,
}

/// Split command arguments into options and positional arguments.
pub fn parse_options(args: &[String]) -> Result<(Options, Vec<String>), String> {
    let mut options = Options::default();
    let mut positional = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        i += 1;

        if arg == "-o" {
            let Some(path) = args.get(i) else {
                return Err("`-o` needs a path".to_owned());
            };
            options.output = Some(PathBuf::from(path));
            i += 1;
        } else if let Some(name) = arg.strip_prefix("--export=") {
            options.exports.push(name.to_owned());
        } else if arg == "--all" {
            options.export_all = true;
        } else if let Some(value) = arg.strip_prefix("--format=") {
            options.format = OutputFormat::from_flag(value)
                .ok_or_else(|| format!("unknown format `{value}`, expected `text` or `json`"))?;
        } else if let Some(value) = arg.strip_prefix("--color=") {
            options.color = ColorMode::from_flag(value).ok_or_else(|| {
                format!("unknown color mode `{value}`, expected `auto`, `always` or `never`")
            })?;
        } else if arg == "--verbose" || arg == "-v" {
            options.verbose = true;
        } else if arg.starts_with('-') {
            return Err(format!("unknown option `{arg}`"));
        } else {
            positional.push(arg.clone());
        }
    }

    Ok((options, positional))
}

/// A backend whose glue loads the document at `path` and applies the
/// export options.
pub(crate) fn load_backend(
    path: &Path,
    options: &Options,
    err: &mut dyn Write,
) -> Result<Backend, Failed> {
    tracing::debug!(
        path = %path.display(),
        exports = options.exports.len(),
        export_all = options.export_all,
        "loading description"
    );
    let source = InterchangeSource::from_path(path).map_err(|error| {
        tracing::debug!(%error, "description not readable");
        let _ = writeln!(err, "error: {error}");
        Failed
    })?;
    let source = source
        .with_exports(options.exports.iter().cloned())
        .export_all(options.export_all);
    Ok(Backend::with_source(EntityTree::new(), source))
}

/// Render and drain the backend's diagnostics.
pub(crate) fn report_diagnostics(backend: &mut Backend, options: &Options, err: &mut dyn Write) {
    let queue = backend.diagnostics_mut();
    let errors = queue.error_count();
    let warnings = queue.warning_count();
    let diagnostics = queue.flush();
    tracing::debug!(errors, warnings, format = ?options.format, "reporting diagnostics");

    match options.format {
        OutputFormat::Text => {
            if diagnostics.is_empty() {
                return;
            }
            let mut emitter = TerminalEmitter::with_color_mode(err, options.color, options.err_is_tty);
            emitter.emit_all(&diagnostics);
            emitter.emit_summary(errors, warnings);
            emitter.flush();
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(err);
            emitter.emit_all(&diagnostics);
            emitter.flush();
        }
    }
}

pub(crate) fn write_out(out: &mut dyn Write, text: &str, err: &mut dyn Write) -> CommandResult {
    out.write_all(text.as_bytes()).map_err(|error| {
        let _ = writeln!(err, "error: cannot write output: {error}");
        Failed
    })
}
