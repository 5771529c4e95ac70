//! Directory scanning for `.docx` documents.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;

/// Extension of the documents a scan picks up.
const DOCX_EXTENSION: &str = "docx";

/// Prefix Word gives the lock file it keeps next to an open document.
const LOCK_FILE_PREFIX: &str = "~$";

/// Find every `.docx` document under `root`, in file-name order.
/// Applies the config's include/exclude filters to the path relative to `root`
/// and skips Word's `~$` lock files. Unreadable directory entries are skipped.
pub fn find_documents(root: &Path, config: &Config) -> Vec<PathBuf> {
    return WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| return e.file_type().is_file() && is_docx(e.path()))
        .filter(|e| return !is_lock_file(e.path()))
        .filter(|e| {
            let relative = e.path().strip_prefix(root).unwrap_or(e.path());
            return config.should_scan(&relative.to_string_lossy());
        })
        .map(walkdir::DirEntry::into_path)
        .collect();
}

/// Whether the path carries a `.docx` extension, in any case.
pub fn is_docx(path: &Path) -> bool {
    return path.extension().is_some_and(|ext| return ext.eq_ignore_ascii_case(DOCX_EXTENSION));
}

/// Whether the file name marks a Word lock file.
fn is_lock_file(path: &Path) -> bool {
    return path
        .file_name()
        .is_some_and(|name| return name.to_string_lossy().starts_with(LOCK_FILE_PREFIX));
}
