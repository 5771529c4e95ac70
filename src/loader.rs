//! Open a `.docx` package and build its [`Document`].

use std::fs::File;
use std::io::Read as _;
use std::path::Path;

use zip::ZipArchive;
use zip::result::ZipError;

use crate::document::{DOCUMENT_PART, Document, RELATIONSHIPS_PART};
use crate::error::Error;

/// Load a document from a `.docx` file on disk.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the path does not exist,
/// `Error::DocumentUnreadable` if it is not a zip package or lacks
/// `word/document.xml`, and `Error::MalformedXml` if a part fails to parse.
pub fn load_document(path: &Path) -> Result<Document, Error> {
    let file = match File::open(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::FileNotFound { path: path.to_path_buf() });
        },
        Err(e) => return Err(Error::Io(e)),
        Ok(f) => f,
    };

    let unreadable = |reason: String| return Error::DocumentUnreadable { path: path.to_path_buf(), reason };

    let mut archive = ZipArchive::new(file).map_err(|e| return unreadable(e.to_string()))?;
    let Some(document_xml) = read_part(&mut archive, DOCUMENT_PART).map_err(unreadable)? else {
        return Err(unreadable(format!("missing part {DOCUMENT_PART}")));
    };
    let relationships_xml = read_part(&mut archive, RELATIONSHIPS_PART).map_err(unreadable)?;

    return Document::from_xml(&document_xml, relationships_xml.as_deref());
}

/// Read one package part as UTF-8. `Ok(None)` when the part does not exist.
fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<String>, String> {
    let mut entry = match archive.by_name(name) {
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(format!("{name}: {e}")),
        Ok(entry) => entry,
    };
    let mut content = String::new();
    entry.read_to_string(&mut content).map_err(|e| return format!("{name}: {e}"))?;
    return Ok(Some(content));
}
