//! Owned XML element tree built from `quick-xml` events.
//!
//! Names are kept qualified (`w:hyperlink`) because WordprocessingML parts use
//! fixed conventional prefixes. Lookups by local name ignore the prefix.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::Error;

/// A node inside an element: either a child element or a run of character data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Unescaped character data.
    Text(String),
}

/// An XML element with its attributes and children in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Attributes as (qualified name, unescaped value) pairs.
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
    /// Qualified tag name, e.g. `w:r`.
    pub name: String,
}

impl Element {
    /// Create an empty element with the given qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        return Self { attributes: Vec::new(), children: Vec::new(), name: name.into() };
    }

    /// Value of the attribute with this exact qualified name (`r:id`).
    pub fn attribute(&self, qualified: &str) -> Option<&str> {
        return self
            .attributes
            .iter()
            .find(|(name, _)| return name == qualified)
            .map(|(_, value)| return value.as_str());
    }

    /// Direct child elements, skipping text nodes.
    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        return self.children.iter().filter_map(|node| {
            return match node {
                Node::Element(element) => Some(element),
                Node::Text(_) => None,
            };
        });
    }

    /// All descendant elements in document (pre-)order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        return Descendants { stack: self.child_elements().rev().collect() };
    }

    /// Whether this element's local name (the part after the prefix) matches.
    pub fn is(&self, local: &str) -> bool {
        return self.local_name() == local;
    }

    /// Tag name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        return match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        };
    }

    /// Concatenated direct character data of this element.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let Node::Text(text) = node {
                out.push_str(text);
            }
        }
        return out;
    }

    /// Deep copy of this element with every descendant named `local` removed,
    /// together with its subtree.
    pub fn without(&self, local: &str) -> Self {
        let children = self
            .children
            .iter()
            .filter_map(|node| {
                return match node {
                    Node::Element(element) if element.is(local) => None,
                    Node::Element(element) => Some(Node::Element(element.without(local))),
                    Node::Text(text) => Some(Node::Text(text.clone())),
                };
            })
            .collect();
        return Self { attributes: self.attributes.clone(), children, name: self.name.clone() };
    }

    /// Copy of this element with its attributes but no children.
    pub fn shallow(&self) -> Self {
        return Self { attributes: self.attributes.clone(), children: Vec::new(), name: self.name.clone() };
    }
}

/// Pre-order iterator over the descendants of an [`Element`].
pub struct Descendants<'a> {
    /// Elements still to visit; the next one is on top.
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        let element = self.stack.pop()?;
        self.stack.extend(element.child_elements().rev());
        return Some(element);
    }
}

/// Parse a complete XML part into its root element.
///
/// # Errors
///
/// Returns `Error::MalformedXml` naming `part` if the content is not
/// well-formed, has mismatched tags, or contains no root element.
pub fn parse(part: &str, xml: &str) -> Result<Element, Error> {
    let malformed = |reason: String| return Error::MalformedXml { part: part.to_string(), reason };

    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| return malformed(format!("at byte {}: {e}", reader.buffer_position())))?;
        match event {
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    parent.children.push(Node::Text(text));
                }
            },
            Event::Empty(start) => {
                let element = element_from_start(&start).map_err(malformed)?;
                attach(&mut stack, &mut root, element);
            },
            Event::End(_) => {
                let Some(element) = stack.pop() else {
                    return Err(malformed("closing tag without an open element".to_string()));
                };
                attach(&mut stack, &mut root, element);
            },
            Event::Eof => break,
            Event::Start(start) => {
                stack.push(element_from_start(&start).map_err(malformed)?);
            },
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let unescaped = text.unescape().map_err(|e| return malformed(e.to_string()))?;
                    if !unescaped.is_empty() {
                        parent.children.push(Node::Text(unescaped.into_owned()));
                    }
                }
            },
            _ => {},
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!("unclosed element <{}>", open.name)));
    }
    return root.ok_or_else(|| return malformed("no root element".to_string()));
}

/// Append a finished element to its parent, or make it the root.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        },
    }
}

/// Build an element (without children) from a start or empty tag.
fn element_from_start(start: &BytesStart<'_>) -> Result<Element, String> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(|e| return e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| return e.to_string())?.into_owned();
        element.attributes.push((key, value));
    }
    return Ok(element);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_with_attributes() {
        let root = parse("test.xml", r#"<w:p><w:r w:rsid="1"><w:t>a &amp; b</w:t></w:r></w:p>"#).unwrap();
        assert_eq!(root.local_name(), "p");

        let run = root.child_elements().next().unwrap();
        assert_eq!(run.attribute("w:rsid"), Some("1"));
        let t = run.child_elements().next().unwrap();
        assert_eq!(t.text(), "a & b");
    }

    #[test]
    fn descendants_are_in_document_order() {
        let root = parse("test.xml", "<a><b><c/></b><d/></a>").unwrap();
        let names: Vec<&str> = root.descendants().map(|e| return e.local_name()).collect();
        assert_eq!(names, vec!["b", "c", "d"]);
    }

    #[test]
    fn preserves_significant_whitespace() {
        let root = parse("test.xml", r#"<w:t xml:space="preserve"> x </w:t>"#).unwrap();
        assert_eq!(root.text(), " x ");
    }

    #[test]
    fn without_prunes_named_subtrees_at_any_depth() {
        let root = parse("test.xml", "<a><b><box><c/></box>x</b><box/><d/></a>").unwrap();
        let pruned = root.without("box");
        let names: Vec<&str> = pruned.descendants().map(|e| return e.local_name()).collect();
        assert_eq!(names, vec!["b", "d"]);
        assert_eq!(pruned.child_elements().next().unwrap().text(), "x");
    }

    #[test]
    fn rejects_mismatched_tags() {
        let err = parse("word/document.xml", "<a><b></a>").unwrap_err();
        assert!(matches!(err, Error::MalformedXml { ref part, .. } if part == "word/document.xml"));
    }

    #[test]
    fn rejects_unclosed_root() {
        assert!(parse("test.xml", "<a><b/>").is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse("test.xml", "").is_err());
    }
}
