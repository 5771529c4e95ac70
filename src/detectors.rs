//! The five link detectors. Each is an independent function over the
//! read-only document; none sees another's output.

use crate::classify::{classify_external, classify_internal_convention};
use crate::context::{self, Anchor};
use crate::document::{Document, HyperlinkRef, Paragraph, Run};
use crate::fields::{self, FieldCode};
use crate::rules::Rules;
use crate::types::{Diagnostic, Findings, LinkCandidate, LinkType};

/// Context literal for bookmark candidates, which have no surrounding text.
pub const BOOKMARK_CONTEXT: &str = "Könyvjelző";

/// Placeholder `text` for field-code links.
pub const FIELD_LINK_TEXT: &str = "Mező hivatkozás";

/// Bookmarks whose names start with this are generated by Word, not by users.
pub const HIDDEN_BOOKMARK_PREFIX: char = '_';

/// Signature shared by every detector.
pub type Detector = fn(&Document, &Rules) -> Findings;

/// Every detector with a display name, in the order they run.
pub const DETECTORS: [(&str, Detector); 5] = [
    ("embedded hyperlinks", relationship_links),
    ("literal urls", literal_urls),
    ("field codes", field_links),
    ("bookmarks", bookmarks),
    ("internal cross-references", convention_links),
];

/// Links carried by runs, through the enclosing `w:hyperlink` or through a
/// `hyperlink` element inside the run's own markup.
pub fn relationship_links(document: &Document, rules: &Rules) -> Findings {
    let mut findings = Findings::default();

    for (p_index, paragraph) in document.paragraphs.iter().enumerate() {
        for (r_index, run) in paragraph.runs.iter().enumerate() {
            let location = format!("paragraph {}, run {}", p_index.saturating_add(1), r_index.saturating_add(1));

            for reference in hyperlink_refs(run, &location, &mut findings.diagnostics) {
                let target = match reference {
                    HyperlinkRef::Anchor(anchor) => format!("#{anchor}"),
                    HyperlinkRef::Relationship(id) => match document.relationships.target(&id) {
                        Some(target) if !target.is_empty() => target.to_string(),
                        Some(_) => {
                            findings.diagnostics.push(Diagnostic::warning(format!(
                                "{location}: relationship `{id}` has an empty target"
                            )));
                            continue;
                        },
                        None => {
                            findings.diagnostics.push(Diagnostic::warning(format!(
                                "{location}: relationship `{id}` not found in relationship table"
                            )));
                            continue;
                        },
                    },
                };

                let text = if run.text.is_empty() { target.clone() } else { run.text.clone() };
                let candidate = LinkCandidate {
                    context: paragraph_context(paragraph, run, rules, &mut findings.diagnostics),
                    link_type: classify_external(&target),
                    link_text: run.text.clone(),
                    target,
                    text,
                };
                findings.found(candidate, "embedded hyperlink");
            }
        }
    }

    return findings;
}

/// Resolve a run's hyperlink references: the structural attribute first, then
/// a markup query. An unreadable attribute is recorded and treated as absent.
fn hyperlink_refs(run: &Run, location: &str, diagnostics: &mut Vec<Diagnostic>) -> Vec<HyperlinkRef> {
    match run.hyperlink_ref() {
        Err(e) => diagnostics.push(Diagnostic::warning(format!("{location}: {e}; falling back to markup query"))),
        Ok(None) => {},
        Ok(Some(reference)) => return vec![reference],
    }

    return run
        .markup
        .descendants()
        .filter(|e| return e.is("hyperlink"))
        .filter_map(|e| return e.attribute("r:id"))
        .map(|id| return HyperlinkRef::Relationship(id.to_string()))
        .collect();
}

/// URLs typed as plain text.
pub fn literal_urls(document: &Document, rules: &Rules) -> Findings {
    let mut findings = Findings::default();

    for paragraph in &document.paragraphs {
        for found in rules.url().find_iter(&paragraph.text) {
            let url = found.as_str();
            let candidate = LinkCandidate {
                context: paragraph_context(paragraph, url, rules, &mut findings.diagnostics),
                link_type: classify_external(url),
                link_text: url.to_string(),
                target: url.to_string(),
                text: url.to_string(),
            };
            findings.found(candidate, "literal url");
        }
    }

    return findings;
}

/// `HYPERLINK` instructions in complex fields and simple fields.
pub fn field_links(document: &Document, rules: &Rules) -> Findings {
    let mut findings = Findings::default();

    for (p_index, paragraph) in document.paragraphs.iter().enumerate() {
        let p_number = p_index.saturating_add(1);

        for (r_index, run) in paragraph.runs.iter().enumerate() {
            if !fields::begins_field(run) {
                continue;
            }
            match fields::reconstruct(&paragraph.runs, r_index) {
                Err(e) => {
                    findings.diagnostics.push(Diagnostic::warning(format!("paragraph {p_number}: {e}")));
                },
                Ok(FieldCode { display, instruction }) => {
                    let link_text = if display.is_empty() { run.text.clone() } else { display };
                    push_field_link(&mut findings, paragraph, p_number, &instruction, link_text, rules);
                },
            }
        }

        for field in &paragraph.simple_fields {
            push_field_link(&mut findings, paragraph, p_number, &field.instruction, field.text.clone(), rules);
        }
    }

    return findings;
}

/// Emit a candidate for one field instruction if it is a usable hyperlink.
fn push_field_link(
    findings: &mut Findings,
    paragraph: &Paragraph,
    p_number: usize,
    instruction: &str,
    link_text: String,
    rules: &Rules,
) {
    if !fields::is_hyperlink_instruction(instruction) {
        return;
    }
    let Some(target) = fields::hyperlink_target(instruction).filter(|t| return !t.is_empty()) else {
        findings.diagnostics.push(Diagnostic::debug(format!(
            "paragraph {p_number}: HYPERLINK field without a quoted target: `{}`",
            instruction.trim()
        )));
        return;
    };

    let candidate = LinkCandidate {
        context: paragraph_context(paragraph, &link_text, rules, &mut findings.diagnostics),
        link_type: classify_external(target),
        link_text,
        target: target.to_string(),
        text: FIELD_LINK_TEXT.to_string(),
    };
    findings.found(candidate, "field link");
}

/// User bookmarks as internal targets.
pub fn bookmarks(document: &Document, _rules: &Rules) -> Findings {
    let mut findings = Findings::default();

    for bookmark in &document.bookmarks {
        let Some(name) = bookmark.name.as_deref().filter(|n| return !n.is_empty()) else {
            findings.diagnostics.push(Diagnostic::warning(format!(
                "bookmark {} has no name",
                bookmark.position.saturating_add(1)
            )));
            continue;
        };
        if name.starts_with(HIDDEN_BOOKMARK_PREFIX) {
            continue;
        }

        let candidate = LinkCandidate {
            context: BOOKMARK_CONTEXT.to_string(),
            link_type: LinkType::Internal,
            link_text: paragraph_containing(document, name).unwrap_or_default().to_string(),
            target: format!("#{name}"),
            text: format!("{BOOKMARK_CONTEXT}: {name}"),
        };
        findings.found(candidate, "bookmark");
    }

    return findings;
}

/// Text of the first paragraph that mentions `name`.
fn paragraph_containing<'a>(document: &'a Document, name: &str) -> Option<&'a str> {
    return document
        .paragraphs
        .iter()
        .find(|p| return p.text.contains(name))
        .map(|p| return p.text.as_str());
}

/// `label<TAB>prefix ... BKM_...` cross-references written as plain text.
pub fn convention_links(document: &Document, rules: &Rules) -> Findings {
    let mut findings = Findings::default();

    for (p_index, paragraph) in document.paragraphs.iter().enumerate() {
        for caps in rules.convention().captures_iter(&paragraph.text) {
            let label = caps.get(1).map_or("", |m| return m.as_str()).trim();
            let marker = caps.get(2).map_or("", |m| return m.as_str()).trim();
            if marker.is_empty() {
                continue;
            }
            // A second marker on the same line has no label of its own.
            if label.is_empty() {
                findings.diagnostics.push(Diagnostic::debug(format!(
                    "paragraph {}: cross-reference `{marker}` has no label",
                    p_index.saturating_add(1)
                )));
                continue;
            }

            let candidate = LinkCandidate {
                context: paragraph_context(paragraph, label, rules, &mut findings.diagnostics),
                link_type: classify_internal_convention(marker, &rules.partial_match_phrases),
                link_text: label.to_string(),
                target: marker.to_string(),
                text: label.to_string(),
            };
            findings.found(candidate, "internal cross-reference");
        }
    }

    return findings;
}

/// Context window around `anchor`, or an empty string plus a debug record.
fn paragraph_context<A: Anchor + ?Sized>(
    paragraph: &Paragraph,
    anchor: &A,
    rules: &Rules,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    return match context::window(&paragraph.text, anchor, rules.context_radius) {
        Err(e) => {
            diagnostics.push(Diagnostic::debug(format!("no context: {e}")));
            String::new()
        },
        Ok(window) => window,
    };
}
