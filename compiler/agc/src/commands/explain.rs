//! The `explain` command: show the documentation for a diagnostic code.

use std::io::Write;

use ag_diagnostic::{ErrorCode, ErrorDocs};

use super::{write_out, CommandResult, Failed};

pub fn explain_error(code_str: &str, out: &mut dyn Write, err: &mut dyn Write) -> CommandResult {
    let Ok(code) = code_str.parse::<ErrorCode>() else {
        let _ = writeln!(err, "Unknown error code: {code_str}");
        let _ = writeln!(err);
        let _ = writeln!(
            err,
            "Codes have the format EXXXX (errors) or WXXXX (warnings) where X is a digit."
        );
        let _ = writeln!(err, "Examples: E1001, E2001, W1001");
        return Err(Failed);
    };

    let Some(doc) = ErrorDocs::get(code) else {
        let _ = writeln!(err, "No documentation available for {code}");
        let _ = writeln!(err, "{code}: {}", code.description());
        return Err(Failed);
    };

    write_out(out, doc, err)?;
    if !doc.ends_with('\n') {
        write_out(out, "\n", err)?;
    }
    Ok(())
}
