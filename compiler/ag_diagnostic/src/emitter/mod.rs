//! Rendering diagnostics for people ([`TerminalEmitter`]) and tools
//! ([`JsonEmitter`]).

mod json;
mod terminal;

pub use json::JsonEmitter;
pub use terminal::{ColorMode, TerminalEmitter};

use crate::{Diagnostic, Severity};

/// A sink for diagnostics. Output may be buffered until [`flush`](Self::flush).
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        diagnostics.iter().for_each(|diagnostic| self.emit(diagnostic));
    }

    fn flush(&mut self);

    /// Closing line after a batch. Emitters with nothing to add ignore it.
    fn emit_summary(&mut self, error_count: usize, warning_count: usize);
}

/// `(errors, warnings)` in a batch, for [`DiagnosticEmitter::emit_summary`].
pub fn count_severities(diagnostics: &[Diagnostic]) -> (usize, usize) {
    let count = |severity| diagnostics.iter().filter(|d| d.severity == severity).count();
    (count(Severity::Error), count(Severity::Warning))
}
