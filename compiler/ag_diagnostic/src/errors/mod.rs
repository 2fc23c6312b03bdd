//! Long-form explanations for `agc explain`, one markdown page per code.
//!
//! A page starts with `# <CODE>: <title>`. Adding a code to
//! [`ErrorCode`] without a page here fails `every_code_is_documented`.

use crate::ErrorCode;

pub struct ErrorDocs;

impl ErrorDocs {
    /// The explanation page for `code`.
    pub fn get(code: ErrorCode) -> Option<&'static str> {
        let page = match code {
            ErrorCode::E1001 => include_str!("E1001.md"),
            ErrorCode::E1002 => include_str!("E1002.md"),
            ErrorCode::E1003 => include_str!("E1003.md"),
            ErrorCode::E1004 => include_str!("E1004.md"),
            ErrorCode::E2001 => include_str!("E2001.md"),
            ErrorCode::E2002 => include_str!("E2002.md"),
            ErrorCode::E3001 => include_str!("E3001.md"),
            ErrorCode::E9002 => include_str!("E9002.md"),
            ErrorCode::W1001 => include_str!("W1001.md"),
        };
        (!page.trim().is_empty()).then_some(page)
    }

    /// Codes that have a page.
    pub fn all_codes() -> impl Iterator<Item = ErrorCode> {
        ErrorCode::ALL.iter().copied().filter(|code| Self::has_docs(*code))
    }

    pub fn has_docs(code: ErrorCode) -> bool {
        Self::get(code).is_some()
    }
}
