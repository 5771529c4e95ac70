//! Error rendering and diagnostic replay for the command line.

use std::path::Path;

use docxlinks::error::Error;
use docxlinks::types::{Diagnostic, Severity};

/// ANSI bold, used for markdown headings on stderr.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
    return;
}

/// Replay the extraction audit trail of one document through `tracing`.
pub fn emit(document: &Path, diagnostics: &[Diagnostic]) {
    let document = document.display().to_string();
    for diagnostic in diagnostics {
        let message = diagnostic.message.as_str();
        match diagnostic.severity {
            Severity::Debug => tracing::debug!(document = %document, "{message}"),
            Severity::Info => tracing::info!(document = %document, "{message}"),
            Severity::Warning => tracing::warn!(document = %document, "{message}"),
        }
    }
    return;
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where the user can
/// act on it, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::ConfigInvalid { key, reason } => render_config_invalid(key, reason),
        Error::DocumentUnreadable { path, reason } => render_document_unreadable(path, reason),
        Error::FileNotFound { path } => format!(
            "\
# Error: File Not Found

`{}` does not exist.
",
            path.display()
        ),
        Error::InvalidPattern { pattern, reason } => format!(
            "\
# Error: Invalid Pattern

`{pattern}` is not a valid regular expression: {reason}

## Fix

Check `convention_prefix` in the `[extraction]` table of `.docxlinks.toml`.
"
        ),
        Error::Io(e) => format!(
            "\
# Error: I/O

{e}
"
        ),
        Error::Json(e) => format!(
            "\
# Error: JSON Report

{e}
"
        ),
        Error::MalformedXml { part, reason } => format!(
            "\
# Error: Malformed XML

`{part}` is not well-formed: {reason}

## Fix

Open and re-save the document in Word to repair it.
"
        ),
        Error::TomlDe(e) => format!(
            "\
# Error: Invalid TOML

{e}

## Fix

Check `.docxlinks.toml`. Recognised keys are `include`, `exclude` and the
`[extraction]` table.
"
        ),
        Error::UnsupportedInput { path } => render_unsupported_input(path),
        Error::Xlsx(e) => format!(
            "\
# Error: Spreadsheet Report

{e}

## Fix

Close the report if it is open in Excel, or write JSON instead:

    docxlinks extract <PATH> --format json
"
        ),
    };
}

/// Block for a rejected configuration value.
fn render_config_invalid(key: &str, reason: &str) -> String {
    return format!(
        "\
# Error: Invalid Config

`{key}`: {reason}

## Fix

Edit the value of `{key}` in `.docxlinks.toml`.
"
    );
}

/// Block for a file that is not a readable `.docx` package.
fn render_document_unreadable(path: &Path, reason: &str) -> String {
    return format!(
        "\
# Error: Document Unreadable

Could not open `{}`: {reason}

## Fix

Only Word 2007+ `.docx` files are supported. Convert legacy `.doc` files
by re-saving them as `.docx`.
",
        path.display()
    );
}

/// Block for an input path that is neither a document nor a directory.
fn render_unsupported_input(path: &Path) -> String {
    return format!(
        "\
# Error: Unsupported Input

`{}` is neither a `.docx` file nor a directory.

## Fix

Pass a document or a folder to scan:

    docxlinks extract report.docx
    docxlinks extract ./documents
",
        path.display()
    );
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn every_rendering_starts_with_a_heading() {
        let errors = [
            Error::ConfigInvalid { key: "convention_prefix".to_string(), reason: "empty".to_string() },
            Error::DocumentUnreadable { path: PathBuf::from("a.docx"), reason: "bad zip".to_string() },
            Error::FileNotFound { path: PathBuf::from("missing.docx") },
            Error::MalformedXml { part: "word/document.xml".to_string(), reason: "eof".to_string() },
            Error::UnsupportedInput { path: PathBuf::from("notes.txt") },
        ];
        for e in &errors {
            assert!(render_error(e).starts_with("# Error: "), "{e}");
        }
    }

    #[test]
    fn unreadable_document_names_path_and_fix() {
        let md = render_error(&Error::DocumentUnreadable {
            path: PathBuf::from("contract.docx"),
            reason: "invalid Zip archive".to_string(),
        });
        assert!(md.contains("`contract.docx`"));
        assert!(md.contains("invalid Zip archive"));
        assert!(md.contains("## Fix"));
    }

    #[test]
    fn config_error_points_at_key() {
        let md = render_error(&Error::ConfigInvalid {
            key: "extraction.convention_prefix".to_string(),
            reason: "must not be empty".to_string(),
        });
        assert!(md.contains("`extraction.convention_prefix`: must not be empty"));
    }
}
