//! Bounded text windows around a link's anchor, for human auditing.

use crate::document::Run;

/// Default number of characters kept on each side of the anchor.
pub const DEFAULT_RADIUS: usize = 50;

/// Something whose text can be located inside a paragraph.
pub trait Anchor {
    /// The verbatim text to search for.
    fn anchor_text(&self) -> &str;
}

impl Anchor for str {
    fn anchor_text(&self) -> &str {
        return self;
    }
}

impl Anchor for String {
    fn anchor_text(&self) -> &str {
        return self;
    }
}

impl Anchor for Run {
    fn anchor_text(&self) -> &str {
        return &self.text;
    }
}

/// Why no window could be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// The anchor has no text to locate.
    #[error("anchor text is empty")]
    EmptyAnchor,
    /// The anchor text does not occur verbatim in the paragraph.
    #[error("anchor `{anchor}` not found in paragraph")]
    NotFound {
        /// The text that was searched for.
        anchor: String,
    },
}

/// Text from `radius` characters before the first occurrence of the anchor to
/// `radius` characters after its end, clipped to the paragraph.
///
/// Counts characters, not bytes, so multi-byte text never splits.
///
/// # Errors
///
/// Returns `ContextError::EmptyAnchor` for an empty anchor and
/// `ContextError::NotFound` if the anchor is not in `paragraph`.
pub fn window<A: Anchor + ?Sized>(paragraph: &str, anchor: &A, radius: usize) -> Result<String, ContextError> {
    let needle = anchor.anchor_text();
    if needle.is_empty() {
        return Err(ContextError::EmptyAnchor);
    }
    let Some(start_byte) = paragraph.find(needle) else {
        return Err(ContextError::NotFound { anchor: needle.to_string() });
    };

    let start = paragraph.char_indices().take_while(|(i, _)| return *i < start_byte).count();
    let len = needle.chars().count();
    let from = start.saturating_sub(radius);
    let to = start.saturating_add(len).saturating_add(radius);

    return Ok(paragraph.chars().skip(from).take(to.saturating_sub(from)).collect());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_paragraph_is_returned_whole() {
        let p = "See http://example.com for details";
        assert_eq!(window(p, "http://example.com", DEFAULT_RADIUS).unwrap(), p);
    }

    #[test]
    fn long_paragraph_is_clipped_on_both_sides() {
        let before = "a".repeat(80);
        let after = "b".repeat(80);
        let p = format!("{before}LINK{after}");
        let w = window(&p, "LINK", DEFAULT_RADIUS).unwrap();
        assert_eq!(w, format!("{}LINK{}", "a".repeat(50), "b".repeat(50)));
        assert!(p.contains(&w));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let p = "ééééé ANCHOR űűűűű";
        assert_eq!(window(p, "ANCHOR", 3).unwrap(), "éé ANCHOR űű");
    }

    #[test]
    fn uses_first_occurrence() {
        let p = "x1 target y2 target z3";
        assert_eq!(window(p, "target", 3).unwrap(), "x1 target y2");
    }

    #[test]
    fn run_anchor_uses_its_text() {
        let run = Run { text: "site".to_string(), ..Run::default() };
        assert_eq!(window("visit site now", &run, 2).unwrap(), "t site n");
    }

    #[test]
    fn missing_or_empty_anchor_fails() {
        assert_eq!(window("abc", "", 5), Err(ContextError::EmptyAnchor));
        assert_eq!(
            window("abc", "zzz", 5),
            Err(ContextError::NotFound { anchor: "zzz".to_string() })
        );
    }
}
