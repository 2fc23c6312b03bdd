//! Diagnostics for loading and linking binding descriptions.
//!
//! A diagnostic carries:
//! - an error code for `agc explain` lookups
//! - a message saying what went wrong
//! - labels naming the element path where it went wrong
//! - notes and suggestions
//!
//! # Error Guarantees
//!
//! `ErrorGuaranteed` is proof that at least one error was reported. It can
//! only be obtained from a [`DiagnosticQueue`](queue::DiagnosticQueue).
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic);
//! fn load() -> Result<Loaded, ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod errors;
mod guarantee;
pub mod queue;

pub use diagnostic::{unknown_kind, unresolved_type, Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use errors::ErrorDocs;
pub use guarantee::ErrorGuaranteed;
