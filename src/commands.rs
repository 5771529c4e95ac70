//! CLI commands for docxlinks: extract, summary.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use docxlinks::aggregate::LinkGroups;
use docxlinks::config::Config;
use docxlinks::error::Error;
use docxlinks::report::{self, ReportFormat};
use docxlinks::rules::Rules;
use docxlinks::types::Extraction;
use docxlinks::{loader, scanner};

use crate::diagnostics;

/// Documents selected by a PATH argument, with the config that governs them.
struct Inputs {
    /// Whether PATH was a directory; failures then do not stop the run.
    batch: bool,
    /// Config loaded from the scan root.
    config: Config,
    /// Documents to process, in scan order.
    documents: Vec<PathBuf>,
}

/// Extract the links of one document or of every document under a directory
/// and write one report per document.
///
/// # Errors
///
/// Returns errors from config loading, and for a single-document PATH any
/// error from loading the document or writing its report.
pub fn extract(path: &Path, output_dir: Option<&Path>, format: ReportFormat) -> Result<ExitCode, Error> {
    let inputs = select_inputs(path)?;
    let rules = Rules::new(&inputs.config.extraction)?;

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)?;
    }

    if inputs.documents.is_empty() {
        eprintln!("No .docx documents found under {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let mut failed = 0_usize;
    for document in &inputs.documents {
        let outcome = extract_one(document, &rules, output_dir, format);
        match outcome {
            Err(e) if !inputs.batch => return Err(e),
            Err(e) => {
                failed = failed.saturating_add(1);
                eprintln!("failed: {}", document.display());
                diagnostics::print_error(&e);
            },
            Ok((report_path, count)) => {
                println!("{} -> {} ({count} links)", document.display(), report_path.display());
            },
        }
    }

    if failed > 0 {
        eprintln!();
        eprintln!("{failed} of {} documents failed", inputs.documents.len());
        return Ok(ExitCode::FAILURE);
    }
    return Ok(ExitCode::SUCCESS);
}

/// Print the per-type counts of one document, then each non-empty group
/// with its links.
///
/// # Errors
///
/// Returns errors from config loading, document loading, or JSON
/// serialization.
pub fn summary(path: &Path, json: bool) -> Result<ExitCode, Error> {
    let inputs = select_inputs(path)?;
    if inputs.batch {
        return Err(Error::UnsupportedInput { path: path.to_path_buf() });
    }
    let rules = Rules::new(&inputs.config.extraction)?;
    let extraction = run_extraction(path, &rules)?;
    let groups = LinkGroups::new(&extraction.links);
    let summary = groups.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("# {}", path.display());
    println!();
    for entry in &summary.counts {
        println!("- {}: {}", entry.label, entry.count);
    }
    println!();
    println!("Total: {}", summary.total);

    for (link_type, links) in groups.iter() {
        println!();
        println!("## {}", link_type.label());
        println!();
        for link in links {
            println!("- {} -> {}", link.text, link.target);
        }
    }
    return Ok(ExitCode::SUCCESS);
}

/// Load, extract and report one document. Returns the report path and the
/// number of links written.
fn extract_one(
    document: &Path,
    rules: &Rules,
    output_dir: Option<&Path>,
    format: ReportFormat,
) -> Result<(PathBuf, usize), Error> {
    let extraction = run_extraction(document, rules)?;
    let report_path = report::report_path(document, output_dir, format);
    report::write_report(&extraction.links, &report_path)?;
    return Ok((report_path, extraction.links.len()));
}

/// Load one document, extract its links and replay the diagnostics.
fn run_extraction(document: &Path, rules: &Rules) -> Result<Extraction, Error> {
    tracing::info!(document = %document.display(), "extracting");
    let loaded = loader::load_document(document)?;
    let extraction = docxlinks::extract(&loaded, rules);
    diagnostics::emit(document, &extraction.diagnostics);
    return Ok(extraction);
}

/// Resolve a PATH argument into the documents it names.
/// A directory is scanned recursively with its own `.docxlinks.toml`; a file
/// must be a `.docx` and uses the config of its parent directory.
fn select_inputs(path: &Path) -> Result<Inputs, Error> {
    if !path.exists() {
        return Err(Error::FileNotFound { path: path.to_path_buf() });
    }

    if path.is_dir() {
        let config = Config::load(path)?;
        let documents = scanner::find_documents(path, &config);
        tracing::debug!(root = %path.display(), count = documents.len(), "scanned directory");
        return Ok(Inputs { batch: true, config, documents });
    }

    if !scanner::is_docx(path) {
        return Err(Error::UnsupportedInput { path: path.to_path_buf() });
    }

    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let config = Config::load(&root)?;
    return Ok(Inputs { batch: false, config, documents: vec![path.to_path_buf()] });
}
