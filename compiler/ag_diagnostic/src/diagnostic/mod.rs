//! Core diagnostic types.
//!
//! Binding descriptions have no source spans, so a [`Label`] points at an
//! element path such as `gfx.Shape.area` instead.

use std::fmt;

use serde::Serialize;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Help,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points a diagnostic at an element. `path` is dotted, `[i]` for unnamed
/// elements, or `<root>`.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct Label {
    pub path: String,
    pub message: String,
    /// The element the diagnostic is about, as opposed to context.
    pub is_primary: bool,
}

impl Label {
    pub fn primary(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::at(path.into(), message.into(), true)
    }

    pub fn secondary(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::at(path.into(), message.into(), false)
    }

    fn at(path: String, message: String, is_primary: bool) -> Self {
        Label {
            path,
            message,
            is_primary,
        }
    }
}

/// One problem found while reading, linking or exporting a description.
///
/// Built with the `with_*` methods and handed to a
/// [`DiagnosticQueue`](crate::queue::DiagnosticQueue).
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::with_severity(code, Severity::Error)
    }

    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::with_severity(code, Severity::Warning)
    }

    fn with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            ..self
        }
    }

    /// Point at the offending element.
    pub fn with_label(mut self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(path, message));
        self
    }

    /// Point at an element that explains the primary one.
    pub fn with_secondary_label(
        mut self,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.labels.push(Label::secondary(path, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn primary_path(&self) -> Option<&str> {
        let label = self.labels.iter().find(|label| label.is_primary)?;
        Some(&label.path)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Plain rendering, the same layout as the uncolored terminal emitter
/// without the trailing blank line.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        for label in &self.labels {
            let lead = if label.is_primary { "at" } else { "in" };
            write!(f, "\n  {lead} {}: {}", label.path, label.message)?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        for suggestion in &self.suggestions {
            write!(f, "\n  help: {suggestion}")?;
        }
        Ok(())
    }
}

/// An element kind the reader does not know.
#[cold]
pub fn unknown_kind(path: &str, kind: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001)
        .with_message(format!("unknown element kind `{kind}`"))
        .with_label(path, "element skipped")
}

/// A type path that names nothing in the tree or the primitive registry.
#[cold]
pub fn unresolved_type(path: &str, target: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message(format!("cannot resolve type `{target}`"))
        .with_label(path, "referenced here")
        .with_note("type paths are resolved from the root, then against primitive names")
}
