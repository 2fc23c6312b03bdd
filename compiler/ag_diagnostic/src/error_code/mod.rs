//! Error codes for every diagnostic autoglue reports.
//!
//! The first digit names the phase. Codes are what `agc explain` looks up.

use std::fmt;

/// Error codes for all diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E1xxx: Interchange (reading a binding description)
/// - E2xxx: Linking (resolving type paths)
/// - E3xxx: Selection (resolving export names)
/// - E9xxx: Internal errors
/// - Wxxxx: Warnings
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Interchange Errors (E1xxx)
    /// Unknown element kind
    E1001,
    /// Malformed element
    E1002,
    /// Element not allowed under its parent
    E1003,
    /// Unsupported document format version
    E1004,

    // Linking Errors (E2xxx)
    /// Unresolved type path
    E2001,
    /// Linked entity is not a type
    E2002,

    // Selection Errors (E3xxx)
    /// Unresolved export name
    E3001,

    // Internal Errors (E9xxx)
    /// Too many errors
    E9002,

    // Interchange Warnings (W1xxx)
    /// Overload with identical parameter types ignored
    W1001,
}

impl ErrorCode {
    /// All error code variants.
    ///
    /// When adding a variant, add it here and to `as_str()`. The
    /// `every_code_is_in_all` test catches an omission.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E3001,
        ErrorCode::E9002,
        ErrorCode::W1001,
    ];

    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E9002 => "E9002",
            ErrorCode::W1001 => "W1001",
        }
    }

    /// One-line description, as shown by `agc explain` without docs.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "unknown element kind",
            ErrorCode::E1002 => "malformed element",
            ErrorCode::E1003 => "element not allowed here",
            ErrorCode::E1004 => "unsupported document format version",
            ErrorCode::E2001 => "unresolved type path",
            ErrorCode::E2002 => "linked entity is not a type",
            ErrorCode::E3001 => "unresolved export name",
            ErrorCode::E9002 => "too many errors",
            ErrorCode::W1001 => "duplicate overload ignored",
        }
    }

    /// Check if this is an interchange error (E1xxx range).
    pub fn is_interchange_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E1001 | ErrorCode::E1002 | ErrorCode::E1003 | ErrorCode::E1004
        )
    }

    /// Check if this is a linking error (E2xxx range).
    pub fn is_link_error(&self) -> bool {
        matches!(self, ErrorCode::E2001 | ErrorCode::E2002)
    }

    /// Check if this is a selection error (E3xxx range).
    pub fn is_selection_error(&self) -> bool {
        matches!(self, ErrorCode::E3001)
    }

    /// Check if this is an internal error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9002)
    }

    /// Check if this is a warning code (Wxxxx range).
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W1001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2001"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

impl serde::Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
