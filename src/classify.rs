//! Classification rules over a link's target string.
//!
//! These are the business rules of the audit, so every trigger string is a
//! named constant and every rule is a plain predicate.

use url::Url;

use crate::types::LinkType;

/// A target starting with this character names a bookmark.
pub const ANCHOR_PREFIX: char = '#';

/// Marker embedded in generated internal cross-reference targets.
pub const BOOKMARK_MARKER: &str = "BKM_";

/// Phrases that flag a convention reference as a valid partial match.
pub const DEFAULT_PARTIAL_MATCH_PHRASES: [&str; 2] = ["részleges egyezés", "partial match"];

/// Classify a target found by the relationship, literal-URL or field detectors.
///
/// Internal when it starts with `#` or contains `BKM_`, external when it is an
/// absolute URL with a scheme and a host, broken otherwise.
pub fn classify_external(target: &str) -> LinkType {
    if is_internal_target(target) {
        return LinkType::Internal;
    }
    if is_valid_url(target) {
        return LinkType::External;
    }
    return LinkType::Broken;
}

/// Classify a target found by the tab-separated convention detector.
///
/// `phrases` are matched case-insensitively.
pub fn classify_internal_convention<S: AsRef<str>>(target: &str, phrases: &[S]) -> LinkType {
    if !target.contains(BOOKMARK_MARKER) {
        return LinkType::UnknownInternal;
    }
    if has_partial_match_phrase(target, phrases) {
        return LinkType::PartialMatch;
    }
    return LinkType::Orphaned;
}

/// Whether the target points inside the document.
pub fn is_internal_target(target: &str) -> bool {
    return target.starts_with(ANCHOR_PREFIX) || target.contains(BOOKMARK_MARKER);
}

/// Whether the target parses as an absolute URL with a non-empty scheme and host.
pub fn is_valid_url(target: &str) -> bool {
    let Ok(url) = Url::parse(target) else {
        return false;
    };
    return !url.scheme().is_empty() && url.host_str().is_some_and(|host| return !host.is_empty());
}

/// Whether any of `phrases` occurs in `target`, ignoring case.
pub fn has_partial_match_phrase<S: AsRef<str>>(target: &str, phrases: &[S]) -> bool {
    let lowered = target.to_lowercase();
    return phrases
        .iter()
        .map(|p| return p.as_ref().to_lowercase())
        .any(|p| return !p.is_empty() && lowered.contains(&p));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_and_markers_are_internal() {
        assert_eq!(classify_external("#Section2"), LinkType::Internal);
        assert_eq!(classify_external("https://example.com/BKM_12"), LinkType::Internal);
    }

    #[test]
    fn absolute_urls_are_external() {
        assert_eq!(classify_external("http://example.com"), LinkType::External);
        assert_eq!(classify_external("https://example.com/a?b=c"), LinkType::External);
        assert_eq!(classify_external("ftp://files.example.com/x"), LinkType::External);
    }

    #[test]
    fn hostless_or_relative_targets_are_broken() {
        assert_eq!(classify_external("mailto:someone@example.com"), LinkType::Broken);
        assert_eq!(classify_external("media/image1.png"), LinkType::Broken);
        assert_eq!(classify_external("not a url"), LinkType::Broken);
        assert_eq!(classify_external(""), LinkType::Broken);
    }

    #[test]
    fn convention_without_phrase_is_orphaned() {
        let t = classify_internal_convention("Dokumentum belső hivatkozás: BKM_AB12", &DEFAULT_PARTIAL_MATCH_PHRASES);
        assert_eq!(t, LinkType::Orphaned);
    }

    #[test]
    fn convention_phrase_is_case_insensitive() {
        let phrases = DEFAULT_PARTIAL_MATCH_PHRASES;
        let hu = "Dokumentum belső hivatkozás (Részleges Egyezés): BKM_AB12";
        let en = "Dokumentum belső hivatkozás: BKM_AB12 PARTIAL MATCH";
        assert_eq!(classify_internal_convention(hu, &phrases), LinkType::PartialMatch);
        assert_eq!(classify_internal_convention(en, &phrases), LinkType::PartialMatch);
    }

    #[test]
    fn convention_without_marker_is_unknown() {
        let t = classify_internal_convention("részleges egyezés", &DEFAULT_PARTIAL_MATCH_PHRASES);
        assert_eq!(t, LinkType::UnknownInternal);
    }

    #[test]
    fn empty_phrases_never_match() {
        let phrases: [&str; 1] = [""];
        assert_eq!(classify_internal_convention("x BKM_1", &phrases), LinkType::Orphaned);
    }
}
