//! Read-only document tree: paragraphs, runs, bookmarks and relationships.
//!
//! Built once from `word/document.xml` and its relationship part, then shared
//! by every detector without mutation.

use std::collections::HashMap;

use crate::error::Error;
use crate::markup::{self, Element};

/// Name of the main document part inside a `.docx` package.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Name of the relationship part belonging to the main document.
pub const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";

/// Local name of a text box body. Its paragraphs are collected on their own,
/// so the run that hosts the box keeps none of its markup.
const TEXT_BOX_CONTENT: &str = "txbxContent";

/// A parsed WordprocessingML document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Every `w:bookmarkStart` in document order.
    pub bookmarks: Vec<Bookmark>,
    /// Paragraphs in document order, including table cells and text boxes.
    pub paragraphs: Vec<Paragraph>,
    /// Relationship id to target lookup.
    pub relationships: RelationshipTable,
}

impl Document {
    /// Build a document from the XML of the main part and, if present, its
    /// relationship part.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedXml` if either part is not well-formed.
    pub fn from_xml(document_xml: &str, relationships_xml: Option<&str>) -> Result<Self, Error> {
        let root = markup::parse(DOCUMENT_PART, document_xml)?;
        let relationships = match relationships_xml {
            Some(xml) => RelationshipTable::from_element(&markup::parse(RELATIONSHIPS_PART, xml)?),
            None => RelationshipTable::default(),
        };

        let mut paragraphs = Vec::new();
        collect_paragraphs(&root, &mut paragraphs);

        let bookmarks = root
            .descendants()
            .filter(|e| return e.is("bookmarkStart"))
            .enumerate()
            .map(|(position, e)| {
                return Bookmark { name: e.attribute("w:name").map(str::to_string), position };
            })
            .collect();

        return Ok(Self { bookmarks, paragraphs, relationships });
    }
}

/// A named position marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    /// The `w:name` attribute; `None` when the marker is malformed.
    pub name: Option<String>,
    /// Zero-based ordinal among all bookmark markers.
    pub position: usize,
}

/// A paragraph with its flattened text and its runs.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    /// Runs in document order, including those inside hyperlinks and fields.
    pub runs: Vec<Run>,
    /// `w:fldSimple` fields appearing in this paragraph.
    pub simple_fields: Vec<SimpleField>,
    /// Concatenated text of all runs.
    pub text: String,
}

/// A minimal span of uniformly formatted text (`w:r`).
#[derive(Debug, Clone, Default)]
pub struct Run {
    /// Attributes of the enclosing `w:hyperlink`, without its children.
    pub hyperlink: Option<Element>,
    /// The run's own markup subtree, without any text box it hosts.
    pub markup: Element,
    /// Flattened text of the run.
    pub text: String,
}

/// Where a run's structural hyperlink points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HyperlinkRef {
    /// `w:anchor`: a bookmark inside this document.
    Anchor(String),
    /// `r:id`: a key into the relationship table.
    Relationship(String),
}

/// Why a run's structural hyperlink could not be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HyperlinkError {
    /// The enclosing `w:hyperlink` has neither `r:id` nor `w:anchor`.
    #[error("hyperlink element has neither r:id nor w:anchor")]
    MissingTarget,
}

impl Run {
    /// The run's structural hyperlink attribute.
    ///
    /// `Ok(None)` means the run is not inside a `w:hyperlink`.
    ///
    /// # Errors
    ///
    /// Returns `HyperlinkError::MissingTarget` if the run sits inside a
    /// hyperlink that carries no usable target attribute.
    pub fn hyperlink_ref(&self) -> Result<Option<HyperlinkRef>, HyperlinkError> {
        let Some(hyperlink) = &self.hyperlink else {
            return Ok(None);
        };
        if let Some(id) = hyperlink.attribute("r:id").filter(|id| return !id.is_empty()) {
            return Ok(Some(HyperlinkRef::Relationship(id.to_string())));
        }
        if let Some(anchor) = hyperlink.attribute("w:anchor").filter(|a| return !a.is_empty()) {
            return Ok(Some(HyperlinkRef::Anchor(anchor.to_string())));
        }
        return Err(HyperlinkError::MissingTarget);
    }
}

/// A `w:fldSimple` field: instruction stored as an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleField {
    /// The `w:instr` attribute.
    pub instruction: String,
    /// Display text of the field's runs.
    pub text: String,
}

/// Mapping from relationship id to target.
#[derive(Debug, Clone, Default)]
pub struct RelationshipTable {
    /// `Target` attributes keyed by `Id`.
    entries: HashMap<String, String>,
}

impl RelationshipTable {
    /// Build the table from a parsed `Relationships` root element.
    pub fn from_element(root: &Element) -> Self {
        let entries = root
            .child_elements()
            .filter(|e| return e.is("Relationship"))
            .filter_map(|e| {
                let id = e.attribute("Id")?;
                let target = e.attribute("Target")?;
                return Some((id.to_string(), target.to_string()));
            })
            .collect();
        return Self { entries };
    }

    /// Target string for a relationship id.
    pub fn target(&self, id: &str) -> Option<&str> {
        return self.entries.get(id).map(String::as_str);
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }
}

/// Walk the tree and collect every `w:p` in document order. Paragraphs nested
/// in text boxes follow the paragraph that contains them.
fn collect_paragraphs(element: &Element, out: &mut Vec<Paragraph>) {
    for child in element.child_elements() {
        if child.is("p") {
            out.push(paragraph_from(child));
        }
        collect_paragraphs(child, out);
    }
}

/// Build a paragraph from its `w:p` element.
fn paragraph_from(element: &Element) -> Paragraph {
    let mut paragraph = Paragraph::default();
    collect_runs(element, None, &mut paragraph);
    paragraph.text = paragraph.runs.iter().map(|r| return r.text.as_str()).collect();
    return paragraph;
}

/// Gather runs under `element`, remembering the nearest enclosing hyperlink.
/// Does not descend into nested paragraphs.
fn collect_runs(element: &Element, hyperlink: Option<&Element>, paragraph: &mut Paragraph) {
    for child in element.child_elements() {
        match child.local_name() {
            "p" => {},
            "r" => {
                let markup = child.without(TEXT_BOX_CONTENT);
                let text = run_text(&markup);
                paragraph.runs.push(Run { hyperlink: hyperlink.map(Element::shallow), markup, text });
            },
            "hyperlink" => collect_runs(child, Some(child), paragraph),
            "fldSimple" => {
                let first = paragraph.runs.len();
                collect_runs(child, hyperlink, paragraph);
                let text = paragraph.runs.iter().skip(first).map(|r| return r.text.as_str()).collect();
                paragraph.simple_fields.push(SimpleField {
                    instruction: child.attribute("w:instr").unwrap_or_default().to_string(),
                    text,
                });
            },
            _ => collect_runs(child, hyperlink, paragraph),
        }
    }
}

/// Flattened text of a run: `w:t` content, tabs as `\t`, breaks as `\n`.
/// Text box content belongs to its own paragraphs and is skipped.
pub fn run_text(run: &Element) -> String {
    let mut text = String::new();
    push_run_text(run, &mut text);
    return text;
}

/// Recursive worker for [`run_text`].
fn push_run_text(element: &Element, text: &mut String) {
    for child in element.child_elements() {
        match child.local_name() {
            "br" | "cr" => text.push('\n'),
            "t" => text.push_str(&child.text()),
            "tab" => text.push('\t'),
            TEXT_BOX_CONTENT => {},
            _ => push_run_text(child, text),
        }
    }
}
