//! Report writing: one row per unique link, as a spreadsheet or JSON.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};

use crate::error::Error;
use crate::types::LinkCandidate;

/// Column headers, in column order: text, target, type, link text, context.
pub const HEADERS: [&str; 5] = ["Szöveg", "Cél", "Típus", "Hivatkozás szövege", "Környezet"];

/// Worksheet name of the spreadsheet report.
pub const SHEET_NAME: &str = "Hivatkozások";

/// Suffix appended to a document's stem to name its report.
pub const REPORT_SUFFIX: &str = "_hivatkozasok";

/// Column widths, matching `HEADERS`.
const COLUMN_WIDTHS: [u16; 5] = [40, 60, 30, 40, 80];

/// Longest string a spreadsheet cell accepts.
const MAX_CELL_CHARS: usize = 32_767;

/// Output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// Pretty-printed JSON array.
    Json,
    /// Excel workbook.
    #[default]
    Xlsx,
}

impl ReportFormat {
    /// File extension without the dot.
    pub const fn extension(self) -> &'static str {
        return match self {
            Self::Json => "json",
            Self::Xlsx => "xlsx",
        };
    }

    /// Format implied by a path's extension; anything but `.json` is xlsx.
    pub fn from_path(path: &Path) -> Self {
        let is_json = path.extension().is_some_and(|ext| return ext.eq_ignore_ascii_case("json"));
        return if is_json { Self::Json } else { Self::Xlsx };
    }
}

/// Where the report for `document` goes: `<stem>_hivatkozasok.<ext>` inside
/// `output_dir`, or next to the document when no directory is given.
pub fn report_path(document: &Path, output_dir: Option<&Path>, format: ReportFormat) -> PathBuf {
    let stem = document.file_stem().map(|s| return s.to_string_lossy().into_owned()).unwrap_or_default();
    let file_name = format!("{stem}{REPORT_SUFFIX}.{}", format.extension());
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => document.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    return dir.join(file_name);
}

/// Write `links` to `path` in the format implied by its extension.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be created, `Error::Json` or
/// `Error::Xlsx` if serialization fails.
pub fn write_report(links: &[LinkCandidate], path: &Path) -> Result<(), Error> {
    return match ReportFormat::from_path(path) {
        ReportFormat::Json => write_json(links, path),
        ReportFormat::Xlsx => write_xlsx(links, path),
    };
}

/// Write a pretty JSON array.
fn write_json(links: &[LinkCandidate], path: &Path) -> Result<(), Error> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, links)?;
    return Ok(());
}

/// Write a workbook with a bold header row and one row per link.
fn write_xlsx(links: &[LinkCandidate], path: &Path) -> Result<(), Error> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    for ((col, header), width) in (0_u16..).zip(HEADERS).zip(COLUMN_WIDTHS) {
        worksheet.write_string_with_format(0, col, header, &bold)?;
        worksheet.set_column_width(col, width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (row, link) in (1_u32..).zip(links) {
        let cells = [
            link.text.as_str(),
            link.target.as_str(),
            link.link_type.label(),
            link.link_text.as_str(),
            link.context.as_str(),
        ];
        for (col, value) in (0_u16..).zip(cells) {
            worksheet.write_string(row, col, clip_cell(value))?;
        }
    }

    workbook.save(path)?;
    return Ok(());
}

/// Truncate a value to what a cell can hold.
fn clip_cell(value: &str) -> String {
    return value.chars().take(MAX_CELL_CHARS).collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LinkType;

    fn sample() -> Vec<LinkCandidate> {
        return vec![LinkCandidate {
            context: "See http://example.com for details".to_string(),
            link_type: LinkType::External,
            link_text: "http://example.com".to_string(),
            target: "http://example.com".to_string(),
            text: "http://example.com".to_string(),
        }];
    }

    #[test]
    fn json_report_round_trips_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_report(&sample(), &path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["type"], "external");
        assert_eq!(value[0]["target"], "http://example.com");
        assert_eq!(value[0]["context"], "See http://example.com for details");
    }

    #[test]
    fn xlsx_report_is_a_zip_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_report(&sample(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn report_path_uses_document_stem() {
        let doc = Path::new("/data/in/Szerződés.docx");
        assert_eq!(
            report_path(doc, None, ReportFormat::Xlsx),
            PathBuf::from("/data/in/Szerződés_hivatkozasok.xlsx")
        );
        assert_eq!(
            report_path(doc, Some(Path::new("/out")), ReportFormat::Json),
            PathBuf::from("/out/Szerződés_hivatkozasok.json")
        );
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ReportFormat::from_path(Path::new("a.JSON")), ReportFormat::Json);
        assert_eq!(ReportFormat::from_path(Path::new("a.xlsx")), ReportFormat::Xlsx);
        assert_eq!(ReportFormat::from_path(Path::new("a")), ReportFormat::Xlsx);
    }

    #[test]
    fn long_values_are_clipped() {
        assert_eq!(clip_cell(&"é".repeat(40_000)).chars().count(), MAX_CELL_CHARS);
    }
}
