//! Human-readable diagnostics, optionally with ANSI color.
//!
//! ```text
//! error[E2001]: cannot resolve type `Vec3`
//!   at gfx.Shape.move: referenced here
//!   in gfx: searched from here
//!   note: paths are resolved from the root
//!   help: declare `Vec3` in the document
//! ```

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::{Diagnostic, Severity};

use super::DiagnosticEmitter;

/// When to color terminal output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color when the output is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }

    /// Parse a `--color=` value.
    pub fn from_flag(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }
}

#[derive(Copy, Clone)]
enum Style {
    Severity(Severity),
    Code,
    Path,
    Secondary,
}

impl Style {
    fn ansi(self) -> &'static str {
        match self {
            Style::Severity(Severity::Error) => "\x1b[1;31m",
            Style::Severity(Severity::Warning) => "\x1b[1;33m",
            Style::Severity(Severity::Note) => "\x1b[1;36m",
            Style::Severity(Severity::Help) => "\x1b[1;32m",
            Style::Code | Style::Path => "\x1b[1m",
            Style::Secondary => "\x1b[34m",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Writes each diagnostic as a headline followed by indented detail lines.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    /// `is_tty` is consulted for [`ColorMode::Auto`].
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    fn paint(&self, out: &mut String, style: Style, text: &str) {
        if self.colors {
            let _ = write!(out, "{}{text}{RESET}", style.ansi());
        } else {
            out.push_str(text);
        }
    }

    fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        self.paint(&mut out, Style::Severity(diagnostic.severity), &diagnostic.severity.to_string());
        self.paint(&mut out, Style::Code, &format!("[{}]", diagnostic.code));
        let _ = writeln!(out, ": {}", diagnostic.message);

        for label in &diagnostic.labels {
            let (lead, style) = if label.is_primary {
                ("at", Style::Path)
            } else {
                ("in", Style::Secondary)
            };
            let _ = write!(out, "  {lead} ");
            self.paint(&mut out, style, &label.path);
            let _ = writeln!(out, ": {}", label.message);
        }

        let details = diagnostic
            .notes
            .iter()
            .map(|note| (Severity::Note, note))
            .chain(diagnostic.suggestions.iter().map(|help| (Severity::Help, help)));
        for (severity, text) in details {
            out.push_str("  ");
            self.paint(&mut out, Style::Severity(severity), &severity.to_string());
            let _ = writeln!(out, ": {text}");
        }

        out.push('\n');
        out
    }
}

impl TerminalEmitter<io::Stderr> {
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let text = self.render(diagnostic);
        let _ = self.writer.write_all(text.as_bytes());
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        let count = |n: usize, what: &str| {
            if n == 1 {
                format!("1 {what}")
            } else {
                format!("{n} {what}s")
            }
        };

        let mut out = String::new();
        if error_count > 0 {
            self.paint(&mut out, Style::Severity(Severity::Error), "error");
            let _ = write!(out, ": description rejected with {}", count(error_count, "error"));
            if warning_count > 0 {
                let _ = write!(out, " and {}", count(warning_count, "warning"));
            }
        } else if warning_count > 0 {
            self.paint(&mut out, Style::Severity(Severity::Warning), "warning");
            let _ = write!(out, ": {}", count(warning_count, "warning"));
        } else {
            return;
        }
        out.push('\n');
        let _ = self.writer.write_all(out.as_bytes());
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
