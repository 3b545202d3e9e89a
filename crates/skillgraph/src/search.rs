//! Fuzzy label search over graph nodes.
//!
//! "Fuzzy" here means case-insensitive substring matching with a preference
//! for prefix matches, not edit-distance matching.

use petgraph::graph::NodeIndex;

use crate::graph::TaxonomyGraph;

/// How a label matched the search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchRank {
    /// The label starts with the term.
    Prefix,
    /// The term occurs elsewhere in the label.
    Substring,
}

/// A single search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    node: NodeIndex,
    rank: MatchRank,
}

impl SearchMatch {
    /// The matched node.
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    /// The match rank.
    pub fn rank(&self) -> MatchRank {
        self.rank
    }
}

/// Searches node labels for a term.
///
/// Matching is case-insensitive. Prefix matches rank above interior
/// substring matches; within a rank, results keep the graph's node order.
/// An empty or whitespace-only term matches nothing.
pub fn search(term: &str, graph: &TaxonomyGraph) -> Vec<SearchMatch> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut prefix_matches = Vec::new();
    let mut substring_matches = Vec::new();

    for (node_idx, node) in graph.nodes_with_indices() {
        let haystack = node.label().to_lowercase();
        if haystack.starts_with(&needle) {
            prefix_matches.push(SearchMatch {
                node: node_idx,
                rank: MatchRank::Prefix,
            });
        } else if haystack.contains(&needle) {
            substring_matches.push(SearchMatch {
                node: node_idx,
                rank: MatchRank::Substring,
            });
        }
    }

    prefix_matches.append(&mut substring_matches);
    prefix_matches
}

#[cfg(test)]
mod tests {
    use skillgraph_core::{
        dataset::{DatasetKind, RawRecord},
        taxonomy::Palette,
    };

    use super::*;
    use crate::ingest::DatasetCollection;

    fn labeled_graph(labels: &[&str]) -> TaxonomyGraph {
        let records = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let mut record = RawRecord::new();
                record.insert("ID", Some(format!("n{i}")));
                record.insert("PREFERREDLABEL", Some(label.to_string()));
                record
            })
            .collect();

        let mut datasets = DatasetCollection::new();
        datasets.set_records(DatasetKind::Skills, records);
        TaxonomyGraph::from_datasets(&datasets, &Palette::default())
    }

    fn labels_of(matches: &[SearchMatch], graph: &TaxonomyGraph) -> Vec<String> {
        matches
            .iter()
            .map(|m| graph.node_from_idx(m.node()).label().to_string())
            .collect()
    }

    #[test]
    fn test_prefix_ranks_above_substring() {
        let graph = labeled_graph(&["deep welding", "welding", "arc welding", "weld inspection"]);

        let matches = search("weld", &graph);
        let labels = labels_of(&matches, &graph);

        assert_eq!(
            labels,
            ["welding", "weld inspection", "deep welding", "arc welding"]
        );
        assert_eq!(matches[0].rank(), MatchRank::Prefix);
        assert_eq!(matches[1].rank(), MatchRank::Prefix);
        assert_eq!(matches[2].rank(), MatchRank::Substring);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let graph = labeled_graph(&["Welding", "BRAZING"]);

        assert_eq!(search("welding", &graph).len(), 1);
        assert_eq!(search("WELD", &graph).len(), 1);
        assert_eq!(search("braz", &graph).len(), 1);
    }

    #[test]
    fn test_blank_terms_match_nothing() {
        let graph = labeled_graph(&["welding", "baking"]);

        assert!(search("", &graph).is_empty());
        assert!(search("   ", &graph).is_empty());
        assert!(search("\t\n", &graph).is_empty());
    }

    #[test]
    fn test_no_match_returns_empty() {
        let graph = labeled_graph(&["welding"]);
        assert!(search("plumbing", &graph).is_empty());
    }

    #[test]
    fn test_ties_keep_original_order() {
        let graph = labeled_graph(&["saw milling", "saw sharpening", "sawing"]);

        let labels = labels_of(&search("saw", &graph), &graph);
        assert_eq!(labels, ["saw milling", "saw sharpening", "sawing"]);
    }
}
