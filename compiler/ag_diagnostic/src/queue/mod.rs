//! Collects diagnostics while a document is read and linked.
//!
//! Diagnostics stay in report order, which for the reader is document
//! order. Errors past the configured limit are replaced by a single E9002
//! notice. Repeats of an error (same code, element and message) are dropped.

use rustc_hash::FxHashSet;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed, Severity};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiagnosticConfig {
    /// Errors kept before the rest are summarized; 0 keeps all of them.
    pub error_limit: usize,
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 20,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Keep everything, repeats included.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Identity of a diagnostic for deduplication.
type SeenKey = (ErrorCode, Option<String>, String);

#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    config: DiagnosticConfig,
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<SeenKey>,
    error_count: usize,
    warning_count: usize,
    overflowed: bool,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..DiagnosticQueue::default()
        }
    }

    /// Queue `diag`. Returns `false` if it was a repeat or over the limit.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if diag.is_error() && self.limit_reached() {
            if !self.overflowed {
                self.overflowed = true;
                self.diagnostics.push(too_many_errors(self.config.error_limit));
            }
            return false;
        }

        if self.config.deduplicate {
            let key = (
                diag.code,
                diag.primary_path().map(str::to_owned),
                diag.message.clone(),
            );
            if !self.seen.insert(key) {
                return false;
            }
        }

        match diag.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Note | Severity::Help => {}
        }
        self.diagnostics.push(diag);
        true
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit != 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Queue an error and return the proof that one was reported.
    ///
    /// Filtering cannot invalidate the proof: a filtered error is either a
    /// repeat of a counted one or past a limit that counted errors reached.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diag.is_error(), "emit_error called with a {}", diag.severity);
        self.add(diag);
        ErrorGuaranteed::new()
    }

    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Take everything queued, in report order, and start over.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let config = self.config.clone();
        std::mem::replace(self, Self::with_config(config)).diagnostics
    }

    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

/// The notice queued in place of errors past the limit.
#[cold]
pub fn too_many_errors(limit: usize) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("stopped reporting after {limit} errors"))
        .with_note("later errors in this document were not reported")
}
