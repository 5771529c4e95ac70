//! Core domain types: link candidates, their classification and diagnostics.
use std::fmt;

use serde::Serialize;

/// Semantic type of a discovered link. Variant order is the grouping order
/// used by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Points somewhere inside the document (`#bookmark` or a `BKM_` marker).
    Internal,
    /// Syntactically valid absolute URL.
    External,
    /// Neither internal nor a parseable absolute URL.
    Broken,
    /// Convention reference whose marker carries a partial-match phrase.
    PartialMatch,
    /// Convention reference without the partial-match phrase.
    Orphaned,
    /// Convention reference whose target lacks the `BKM_` marker.
    UnknownInternal,
}

impl LinkType {
    /// Every variant, in grouping order.
    pub const ALL: [Self; 6] = [
        Self::Internal,
        Self::External,
        Self::Broken,
        Self::PartialMatch,
        Self::Orphaned,
        Self::UnknownInternal,
    ];

    /// Report label, as it appears in the spreadsheet's type column.
    pub const fn label(self) -> &'static str {
        return match self {
            Self::Broken => "törött",
            Self::External => "külső",
            Self::Internal => "belső",
            Self::Orphaned => "Valószínűleg törött belső hivatkozás (szellem-hivatkozás)",
            Self::PartialMatch => "Érvényes belső hivatkozás (részleges egyezés)",
            Self::UnknownInternal => "Ismeretlen belső hivatkozás típus",
        };
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(self.label());
    }
}

/// One discovered reference. Identity for deduplication is `(text, target)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCandidate {
    /// Up to `radius` characters either side of the anchor, or a fixed literal.
    pub context: String,
    /// Classification assigned at creation.
    #[serde(rename = "type")]
    pub link_type: LinkType,
    /// The anchor text exactly as it appeared in the document.
    pub link_text: String,
    /// Destination: URL, `#bookmark`, or reconstructed field argument.
    pub target: String,
    /// Display text taken from the source construct.
    pub text: String,
}

impl LinkCandidate {
    /// The identity key used by the deduplicator.
    pub fn key(&self) -> (&str, &str) {
        return (&self.text, &self.target);
    }
}

/// How much a diagnostic matters to the person reading the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Discovery trace: a finding, or a context that could not be located.
    Debug,
    /// Progress of the extraction pass.
    Info,
    /// An element was skipped because its structure was missing or malformed.
    Warning,
}

/// A recoverable event recorded during extraction instead of being logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Human-readable description naming the element involved.
    pub message: String,
    /// Importance of the event.
    pub severity: Severity,
}

impl Diagnostic {
    /// Shorthand for a `Debug` diagnostic.
    pub fn debug(message: impl Into<String>) -> Self {
        return Self { message: message.into(), severity: Severity::Debug };
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(message: impl Into<String>) -> Self {
        return Self { message: message.into(), severity: Severity::Info };
    }

    /// Shorthand for a `Warning` diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        return Self { message: message.into(), severity: Severity::Warning };
    }
}

/// Output of a single detector: its candidates in discovery order plus
/// whatever it had to say along the way.
#[derive(Debug, Default)]
pub struct Findings {
    /// Candidates in the order the detector found them.
    pub candidates: Vec<LinkCandidate>,
    /// Recoverable events recorded by the detector.
    pub diagnostics: Vec<Diagnostic>,
}

impl Findings {
    /// Record a candidate and a debug trace line for it.
    pub fn found(&mut self, candidate: LinkCandidate, source: &str) {
        self.diagnostics.push(Diagnostic::debug(format!(
            "{source}: {} -> {}",
            candidate.text, candidate.target
        )));
        self.candidates.push(candidate);
    }
}

/// Result of a full extraction pass over one document.
#[derive(Debug, Default, Serialize)]
pub struct Extraction {
    /// Recoverable events from every detector, in detector order.
    pub diagnostics: Vec<Diagnostic>,
    /// Deduplicated candidates in first-seen order.
    pub links: Vec<LinkCandidate>,
}

impl Extraction {
    /// Whether any diagnostic reached `Warning` severity.
    pub fn has_warnings(&self) -> bool {
        return self.diagnostics.iter().any(|d| return d.severity == Severity::Warning);
    }
}
