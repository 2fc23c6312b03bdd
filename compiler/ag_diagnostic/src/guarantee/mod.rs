//! Proof that an error was reported.

use std::fmt;

/// Zero-sized witness that at least one error diagnostic was emitted.
///
/// Only [`DiagnosticQueue`](crate::queue::DiagnosticQueue) hands these out,
/// so returning `Err(ErrorGuaranteed)` cannot forget to report anything.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// A guarantee for a count of already-reported errors, if nonzero.
    pub fn from_error_count(count: usize) -> Option<Self> {
        (count > 0).then(Self::new)
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error(s) emitted")
    }
}

impl std::error::Error for ErrorGuaranteed {}

#[cfg(test)]
mod tests;
