//! The extraction pass: run every detector, merge, deduplicate.

use crate::aggregate;
use crate::detectors::DETECTORS;
use crate::document::Document;
use crate::rules::Rules;
use crate::types::{Diagnostic, Extraction, LinkCandidate};

/// Every unique link in the document, using the default rules.
pub fn extract_hyperlinks(document: &Document) -> Vec<LinkCandidate> {
    return extract(document, &Rules::default()).links;
}

/// Run all detectors in order over `document` and reduce their candidates to
/// a unique, first-seen-ordered set. Never fails: problems with individual
/// elements come back as diagnostics.
pub fn extract(document: &Document, rules: &Rules) -> Extraction {
    let mut candidates: Vec<LinkCandidate> = Vec::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    for (name, detector) in DETECTORS {
        let findings = detector(document, rules);
        diagnostics.push(Diagnostic::info(format!("{name}: {} candidate(s)", findings.candidates.len())));
        diagnostics.extend(findings.diagnostics);
        candidates.extend(findings.candidates);
    }

    let before = candidates.len();
    candidates.retain(|c| return !c.target.is_empty());
    if candidates.len() < before {
        diagnostics.push(Diagnostic::warning(format!(
            "dropped {} candidate(s) with an empty target",
            before.saturating_sub(candidates.len())
        )));
    }

    let links = aggregate::deduplicate(candidates);
    diagnostics.push(Diagnostic::info(format!("{} unique link(s) found", links.len())));

    return Extraction { diagnostics, links };
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::document::tests::{body, rels};
    use crate::types::{LinkType, Severity};

    fn sample() -> Document {
        let xml = body(
            r#"<w:p><w:bookmarkStart w:id="0" w:name="Section2"/><w:r><w:t>Section2: see http://example.com for details</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Again http://example.com and </w:t></w:r><w:hyperlink r:id="rId1"><w:r><w:t>http://example.com</w:t></w:r></w:hyperlink></w:p>
<w:p><w:hyperlink r:id="rId404"><w:r><w:t>missing</w:t></w:r></w:hyperlink></w:p>
<w:p><w:bookmarkStart w:id="1" w:name="_GoBack"/><w:r><w:t>Intro</w:t><w:tab/><w:t>Dokumentum belső hivatkozás: BKM_AB12</w:t></w:r></w:p>
<w:p><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText> HYPERLINK "not a url" </w:instrText></w:r><w:r><w:fldChar w:fldCharType="separate"/></w:r><w:r><w:t>odd</w:t></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>"#,
        );
        let rels = rels(&[("rId1", "http://example.com")]);
        return Document::from_xml(&xml, Some(&rels)).unwrap();
    }

    #[test]
    fn merges_all_detectors_without_duplicates() {
        let extraction = extract(&sample(), &Rules::default());
        let keys: Vec<(&str, &str)> = extraction.links.iter().map(LinkCandidate::key).collect();
        assert_eq!(
            keys,
            vec![
                ("http://example.com", "http://example.com"),
                ("Mező hivatkozás", "not a url"),
                ("Könyvjelző: Section2", "#Section2"),
                ("Intro", "Dokumentum belső hivatkozás: BKM_AB12"),
            ]
        );

        let unique: HashSet<(&str, &str)> = keys.iter().copied().collect();
        assert_eq!(unique.len(), keys.len());

        let types: Vec<LinkType> = extraction.links.iter().map(|l| return l.link_type).collect();
        assert_eq!(types, vec![LinkType::External, LinkType::Broken, LinkType::Internal, LinkType::Orphaned]);
    }

    #[test]
    fn missing_relationship_is_recorded_not_fatal() {
        let extraction = extract(&sample(), &Rules::default());
        assert!(extraction.has_warnings());
        assert!(
            extraction
                .diagnostics
                .iter()
                .any(|d| return d.severity == Severity::Warning && d.message.contains("rId404"))
        );
    }

    #[test]
    fn paragraph_contexts_are_substrings_of_their_paragraph() {
        let doc = sample();
        for link in extract_hyperlinks(&doc) {
            if link.link_type == LinkType::Internal && link.target.starts_with('#') {
                continue;
            }
            assert!(
                doc.paragraphs.iter().any(|p| return p.text.contains(&link.context)),
                "context `{}` not in any paragraph",
                link.context
            );
        }
    }

    #[test]
    fn extraction_is_idempotent() {
        let doc = sample();
        assert_eq!(extract_hyperlinks(&doc), extract_hyperlinks(&doc));
    }

    #[test]
    fn same_url_in_two_paragraphs_yields_one_candidate() {
        let xml = body(
            r#"<w:p><w:r><w:t>first https://dup.example.org</w:t></w:r></w:p><w:p><w:r><w:t>second https://dup.example.org</w:t></w:r></w:p>"#,
        );
        let doc = Document::from_xml(&xml, None).unwrap();
        let links = extract_hyperlinks(&doc);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].context, "first https://dup.example.org");
    }

    #[test]
    fn hyperlink_in_text_box_is_reported_once() {
        let xml = body(
            r#"<w:p><w:r><w:drawing><wp:anchor><a:graphic><a:graphicData><wps:wsp><wps:txbx><w:txbxContent><w:p><w:hyperlink r:id="rId1"><w:r><w:t>boxed</w:t></w:r></w:hyperlink></w:p></w:txbxContent></wps:txbx></wps:wsp></a:graphicData></a:graphic></wp:anchor></w:drawing></w:r></w:p>"#,
        );
        let doc = Document::from_xml(&xml, Some(&rels(&[("rId1", "https://box.example.com")]))).unwrap();

        let links = extract_hyperlinks(&doc);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "boxed");
        assert_eq!(links[0].target, "https://box.example.com");
        assert_eq!(links[0].link_text, "boxed");
        assert_eq!(links[0].context, "boxed");
    }

    #[test]
    fn empty_document_yields_nothing() {
        let doc = Document::from_xml(&body(""), None).unwrap();
        let extraction = extract(&doc, &Rules::default());
        assert!(extraction.links.is_empty());
        assert!(!extraction.has_warnings());
    }
}
