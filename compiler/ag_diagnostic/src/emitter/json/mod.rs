//! Machine-readable diagnostics.
//!
//! Diagnostics are collected and written as one JSON array on
//! [`flush`](DiagnosticEmitter::flush), so the output always parses even
//! when nothing was reported.

use std::io::Write;

use crate::Diagnostic;

use super::DiagnosticEmitter;

pub struct JsonEmitter<W: Write> {
    writer: W,
    pending: Vec<Diagnostic>,
}

impl<W: Write> JsonEmitter<W> {
    pub fn new(writer: W) -> Self {
        JsonEmitter {
            writer,
            pending: Vec::new(),
        }
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.pending.push(diagnostic.clone());
    }

    fn flush(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if serde_json::to_writer(&mut self.writer, &pending).is_ok() {
            let _ = writeln!(self.writer);
        }
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, _error_count: usize, _warning_count: usize) {}
}
