//! Deduplication and grouping of link candidates.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::types::{LinkCandidate, LinkType};

/// Keep the first occurrence of every `(text, target)` pair, preserving order.
pub fn deduplicate(candidates: Vec<LinkCandidate>) -> Vec<LinkCandidate> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    return candidates
        .into_iter()
        .filter(|c| return seen.insert((c.text.clone(), c.target.clone())))
        .collect();
}

/// Candidates grouped by type. Groups iterate in `LinkType` order; each group
/// keeps the order of its input.
#[derive(Debug, Default)]
pub struct LinkGroups<'a> {
    /// Type to candidates of that type.
    groups: BTreeMap<LinkType, Vec<&'a LinkCandidate>>,
    /// Number of candidates across all groups.
    total: usize,
}

impl<'a> LinkGroups<'a> {
    /// Group a (deduplicated) sequence of candidates.
    pub fn new(links: &'a [LinkCandidate]) -> Self {
        let mut groups: BTreeMap<LinkType, Vec<&'a LinkCandidate>> = BTreeMap::new();
        for link in links {
            groups.entry(link.link_type).or_default().push(link);
        }
        return Self { groups, total: links.len() };
    }

    /// Number of candidates of one type.
    pub fn count(&self, link_type: LinkType) -> usize {
        return self.groups.get(&link_type).map_or(0, Vec::len);
    }

    /// Non-empty groups in type order.
    pub fn iter(&self) -> impl Iterator<Item = (LinkType, &[&'a LinkCandidate])> {
        return self.groups.iter().map(|(t, links)| return (*t, links.as_slice()));
    }

    /// Counts for every type, including empty ones, plus the total.
    pub fn summary(&self) -> Summary {
        let counts = LinkType::ALL
            .iter()
            .map(|t| {
                return TypeCount { count: self.count(*t), label: t.label(), link_type: *t };
            })
            .collect();
        return Summary { counts, total: self.total };
    }

    /// Number of candidates across all groups.
    pub fn total(&self) -> usize {
        return self.total;
    }
}

/// Per-type counts for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// One entry per link type, in type order.
    pub counts: Vec<TypeCount>,
    /// Sum of all counts.
    pub total: usize,
}

/// Count of one link type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    /// Number of candidates.
    pub count: usize,
    /// Report label of the type.
    pub label: &'static str,
    /// The type itself.
    #[serde(rename = "type")]
    pub link_type: LinkType,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(text: &str, target: &str, link_type: LinkType) -> LinkCandidate {
        return LinkCandidate {
            context: String::new(),
            link_type,
            link_text: text.to_string(),
            target: target.to_string(),
            text: text.to_string(),
        };
    }

    #[test]
    fn keeps_first_occurrence_in_order() {
        let mut second = link("a", "http://a.com", LinkType::External);
        second.context = "different context".to_string();
        let unique = deduplicate(vec![
            link("a", "http://a.com", LinkType::External),
            link("b", "#b", LinkType::Internal),
            second,
            link("a", "http://other.com", LinkType::External),
        ]);
        let keys: Vec<(&str, &str)> = unique.iter().map(LinkCandidate::key).collect();
        assert_eq!(keys, vec![("a", "http://a.com"), ("b", "#b"), ("a", "http://other.com")]);
        assert_eq!(unique[0].context, "");
    }

    #[test]
    fn groups_by_type_with_counts() {
        let links = vec![
            link("x", "bad", LinkType::Broken),
            link("a", "http://a.com", LinkType::External),
            link("b", "#b", LinkType::Internal),
            link("c", "http://c.com", LinkType::External),
        ];
        let groups = LinkGroups::new(&links);
        assert_eq!(groups.total(), 4);
        assert_eq!(groups.count(LinkType::External), 2);
        assert_eq!(groups.count(LinkType::Orphaned), 0);
        let order: Vec<LinkType> = groups.iter().map(|(t, _)| return t).collect();
        assert_eq!(order, vec![LinkType::Internal, LinkType::External, LinkType::Broken]);

        let (_, external) = groups.iter().find(|(t, _)| return *t == LinkType::External).unwrap();
        let texts: Vec<&str> = external.iter().map(|l| return l.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);

        let summary = groups.summary();
        assert_eq!(summary.counts.len(), LinkType::ALL.len());
        assert_eq!(summary.counts.iter().map(|c| return c.count).sum::<usize>(), summary.total);
    }
}
