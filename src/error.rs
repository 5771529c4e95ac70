//! Crate-level error types for docxlinks.
use std::path::PathBuf;

/// Everything that can abort a document or a command. Per-element problems
/// inside a document never become an `Error`; they are reported as
/// [`crate::types::Diagnostic`] records instead.
#[allow(clippy::error_impl_error, reason = "crate-level error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value is present but unusable.
    #[error("invalid config: {key}: {reason}")]
    ConfigInvalid {
        /// Dotted key of the offending setting.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The file exists but is not a readable `.docx` container.
    #[error("could not open document {}: {reason}", path.display())]
    DocumentUnreadable {
        /// Path of the document that failed to open.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// The input path does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A configured pattern did not compile into a regex.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The regex source that failed to compile.
        pattern: String,
        /// Compiler message from the regex crate.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON report serialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped serde_json error.
        #[from]
        serde_json::Error,
    ),

    /// A document part is not well-formed XML.
    #[error("malformed xml in {part}: {reason}")]
    MalformedXml {
        /// Name of the package part, e.g. `word/document.xml`.
        part: String,
        /// Parser message, including the failing position when known.
        reason: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The input path is neither a `.docx` file nor a directory.
    #[error("unsupported input: {} (expected a .docx file or a directory)", path.display())]
    UnsupportedInput {
        /// Path that was rejected.
        path: PathBuf,
    },

    /// The spreadsheet writer failed.
    #[error("xlsx: {0}")]
    Xlsx(
        /// The wrapped rust_xlsxwriter error.
        #[from]
        rust_xlsxwriter::XlsxError,
    ),
}
