//! Field-code reconstruction: stitch a complex field's instruction back
//! together from the runs that carry its pieces.
//!
//! A complex field is spread across sibling runs:
//! `fldChar begin`, one or more `instrText`, optionally `fldChar separate`
//! followed by the displayed result runs, then `fldChar end`. Fields nest.

use crate::document::Run;

/// Keyword that opens a hyperlink field instruction.
pub const HYPERLINK_KEYWORD: &str = "HYPERLINK";

/// The three field-character markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldChar {
    /// Start of a field.
    Begin,
    /// End of a field.
    End,
    /// Boundary between instruction and displayed result.
    Separate,
}

/// A reconstructed complex field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCode {
    /// Text of the runs between `separate` and `end`.
    pub display: String,
    /// Concatenated `instrText` of the outermost field.
    pub instruction: String,
}

/// Why a field could not be reconstructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The run at `start` does not begin a field.
    #[error("run {start} does not begin a field")]
    NotABegin {
        /// Index of the offending run.
        start: usize,
    },
    /// No matching `end` marker before the paragraph ran out.
    #[error("field starting at run {start} has no end marker")]
    Unterminated {
        /// Index of the run carrying `begin`.
        start: usize,
    },
}

/// The field-character markers carried by a run, in document order.
pub fn field_chars(run: &Run) -> Vec<FieldChar> {
    return run
        .markup
        .descendants()
        .filter(|e| return e.is("fldChar"))
        .filter_map(|e| {
            return match e.attribute("w:fldCharType")? {
                "begin" => Some(FieldChar::Begin),
                "end" => Some(FieldChar::End),
                "separate" => Some(FieldChar::Separate),
                _ => None,
            };
        })
        .collect();
}

/// Whether the run opens a complex field.
pub fn begins_field(run: &Run) -> bool {
    return field_chars(run).first() == Some(&FieldChar::Begin);
}

/// Walk `runs` from the field beginning at `start` up to its matching end.
///
/// Instruction text is taken only from the outermost field; nested fields
/// contribute nothing to it.
///
/// # Errors
///
/// Returns `FieldError::NotABegin` if `runs[start]` carries no `begin`, and
/// `FieldError::Unterminated` if the runs end before the matching `end`.
pub fn reconstruct(runs: &[Run], start: usize) -> Result<FieldCode, FieldError> {
    let Some(first) = runs.get(start) else {
        return Err(FieldError::NotABegin { start });
    };
    if !begins_field(first) {
        return Err(FieldError::NotABegin { start });
    }

    let mut depth = 0_usize;
    let mut in_result = false;
    let mut code = FieldCode { display: String::new(), instruction: String::new() };

    for run in runs.iter().skip(start) {
        for element in run.markup.descendants() {
            match element.local_name() {
                "fldChar" => match element.attribute("w:fldCharType") {
                    Some("begin") => depth = depth.saturating_add(1),
                    Some("separate") if depth == 1 => in_result = true,
                    Some("end") => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            return Ok(code);
                        }
                    },
                    _ => {},
                },
                "instrText" if depth == 1 && !in_result => code.instruction.push_str(&element.text()),
                _ => {},
            }
        }
        if in_result && depth == 1 && !run_carries_field_char(run) {
            code.display.push_str(&run.text);
        }
    }

    return Err(FieldError::Unterminated { start });
}

/// Whether any field-character marker appears in the run.
fn run_carries_field_char(run: &Run) -> bool {
    return run.markup.descendants().any(|e| return e.is("fldChar"));
}

/// The first double-quoted argument of a `HYPERLINK` instruction.
///
/// Leading whitespace before the keyword is ignored. Returns `None` when the
/// instruction is not a hyperlink or carries no quoted argument.
pub fn hyperlink_target(instruction: &str) -> Option<&str> {
    let rest = instruction.trim_start().strip_prefix(HYPERLINK_KEYWORD)?;
    let mut parts = rest.split('"');
    parts.next()?;
    let target = parts.next()?;
    // An opening quote with no closing one is not an argument.
    parts.next()?;
    return Some(target);
}

/// Whether the instruction is a hyperlink field at all.
pub fn is_hyperlink_instruction(instruction: &str) -> bool {
    return instruction.trim_start().starts_with(HYPERLINK_KEYWORD);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::document::tests::body;

    fn runs_of(paragraph_xml: &str) -> Vec<Run> {
        let doc = Document::from_xml(&body(paragraph_xml), None).unwrap();
        return doc.paragraphs.into_iter().next().unwrap().runs;
    }

    const FIELD: &str = r#"<w:p>
<w:r><w:fldChar w:fldCharType="begin"/></w:r>
<w:r><w:instrText xml:space="preserve"> HYPERLINK "https://exa</w:instrText></w:r>
<w:r><w:instrText>mple.com/doc" \o "tip"</w:instrText></w:r>
<w:r><w:fldChar w:fldCharType="separate"/></w:r>
<w:r><w:t>Example</w:t></w:r><w:r><w:t xml:space="preserve"> site</w:t></w:r>
<w:r><w:fldChar w:fldCharType="end"/></w:r>
</w:p>"#;

    #[test]
    fn reconstructs_split_instruction_and_display() {
        let runs = runs_of(FIELD);
        assert!(begins_field(&runs[0]));
        let code = reconstruct(&runs, 0).unwrap();
        assert_eq!(code.instruction, r#" HYPERLINK "https://example.com/doc" \o "tip""#);
        assert_eq!(code.display, "Example site");
        assert_eq!(hyperlink_target(&code.instruction), Some("https://example.com/doc"));
    }

    #[test]
    fn nested_field_does_not_leak_into_instruction() {
        let xml = r#"<w:p>
<w:r><w:fldChar w:fldCharType="begin"/></w:r>
<w:r><w:instrText>HYPERLINK "a"</w:instrText></w:r>
<w:r><w:fldChar w:fldCharType="begin"/></w:r>
<w:r><w:instrText> PAGE </w:instrText></w:r>
<w:r><w:fldChar w:fldCharType="end"/></w:r>
<w:r><w:fldChar w:fldCharType="end"/></w:r>
</w:p>"#;
        let code = reconstruct(&runs_of(xml), 0).unwrap();
        assert_eq!(code.instruction, r#"HYPERLINK "a""#);
    }

    #[test]
    fn missing_end_is_unterminated() {
        let xml = r#"<w:p><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText>HYPERLINK "x"</w:instrText></w:r></w:p>"#;
        assert_eq!(reconstruct(&runs_of(xml), 0), Err(FieldError::Unterminated { start: 0 }));
    }

    #[test]
    fn non_begin_run_is_rejected() {
        let runs = runs_of(FIELD);
        assert_eq!(reconstruct(&runs, 1), Err(FieldError::NotABegin { start: 1 }));
        assert_eq!(reconstruct(&runs, 99), Err(FieldError::NotABegin { start: 99 }));
    }

    #[test]
    fn hyperlink_target_requires_keyword_and_quotes() {
        assert_eq!(hyperlink_target(r#"HYPERLINK "http://x.org""#), Some("http://x.org"));
        assert_eq!(hyperlink_target(r#"  HYPERLINK \l "Section2""#), Some("Section2"));
        assert_eq!(hyperlink_target(r#"PAGEREF "x""#), None);
        assert_eq!(hyperlink_target("HYPERLINK"), None);
        assert_eq!(hyperlink_target(r#"HYPERLINK "open"#), None);
        assert!(is_hyperlink_instruction(" HYPERLINK"));
    }
}
