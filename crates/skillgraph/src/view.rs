//! Cluster-limited view over a built graph.
//!
//! The full taxonomy is too large to render at once, so the view exposes it
//! cluster by cluster: only the largest clusters are visible initially, a
//! collapsed cluster shows just its representative node, and expanding a
//! cluster reveals a capped number of members. Edges are visible only when
//! both endpoints are.

use std::collections::HashSet;

use log::debug;
use petgraph::graph::{EdgeIndex, NodeIndex};

use skillgraph_core::taxonomy::NodeKind;

use crate::{
    cluster::{ClusterAssignment, ClusterId},
    config::LimitConfig,
    graph::TaxonomyGraph,
};

/// Interactive view state over an immutable graph.
pub struct ExplorerView<'g> {
    graph: &'g TaxonomyGraph,
    clusters: ClusterAssignment,
    limits: LimitConfig,
    visible_clusters: Vec<ClusterId>,
    expanded: HashSet<ClusterId>,
}

impl<'g> ExplorerView<'g> {
    /// Creates a view with the largest clusters visible and all collapsed.
    pub fn new(graph: &'g TaxonomyGraph, clusters: ClusterAssignment, limits: LimitConfig) -> Self {
        let visible_clusters: Vec<ClusterId> = clusters
            .clusters()
            .iter()
            .take(limits.max_visible_clusters)
            .map(|cluster| cluster.id())
            .collect();

        debug!(
            total_clusters = clusters.len(),
            visible_clusters = visible_clusters.len();
            "Created explorer view"
        );

        Self {
            graph,
            clusters,
            limits,
            visible_clusters,
            expanded: HashSet::new(),
        }
    }

    /// The underlying graph.
    pub fn graph(&self) -> &'g TaxonomyGraph {
        self.graph
    }

    /// The cluster assignment backing this view.
    pub fn clusters(&self) -> &ClusterAssignment {
        &self.clusters
    }

    /// Ids of the initially visible clusters, largest first.
    pub fn visible_clusters(&self) -> &[ClusterId] {
        &self.visible_clusters
    }

    /// Whether a cluster is currently expanded.
    pub fn is_expanded(&self, id: ClusterId) -> bool {
        self.expanded.contains(&id)
    }

    /// Expands a visible cluster. Idempotent; returns false for clusters
    /// that are not visible.
    pub fn expand(&mut self, id: ClusterId) -> bool {
        if !self.visible_clusters.contains(&id) {
            return false;
        }
        self.expanded.insert(id);
        true
    }

    /// Collapses a cluster back to its representative. Idempotent.
    pub fn collapse(&mut self, id: ClusterId) {
        self.expanded.remove(&id);
    }

    /// Expands the `count` largest visible clusters.
    pub fn expand_top(&mut self, count: usize) {
        let ids: Vec<ClusterId> = self.visible_clusters.iter().take(count).copied().collect();
        for id in ids {
            self.expand(id);
        }
    }

    /// The nodes currently visible.
    ///
    /// A collapsed cluster contributes its representative (largest member);
    /// an expanded cluster contributes all its groups, its occupations up to
    /// the occupation limit, and its skills up to the skill limit, each
    /// ordered by descending node size.
    pub fn visible_nodes(&self) -> Vec<NodeIndex> {
        let mut visible = Vec::new();

        for &cluster_id in &self.visible_clusters {
            let members = self.members_by_size(cluster_id);
            let Some(&representative) = members.first() else {
                continue;
            };

            if !self.expanded.contains(&cluster_id) {
                visible.push(representative);
                continue;
            }

            let mut occupations = 0;
            let mut skills = 0;
            for member in members {
                match self.graph.node_from_idx(member).kind() {
                    NodeKind::Occupation => {
                        if occupations < self.limits.cluster_occupation_limit {
                            occupations += 1;
                            visible.push(member);
                        }
                    }
                    NodeKind::Skill => {
                        if skills < self.limits.cluster_skill_limit {
                            skills += 1;
                            visible.push(member);
                        }
                    }
                    NodeKind::SkillGroup => visible.push(member),
                }
            }
        }

        visible
    }

    /// The edges whose endpoints are both visible.
    pub fn visible_edges(&self) -> Vec<EdgeIndex> {
        let visible: HashSet<NodeIndex> = self.visible_nodes().into_iter().collect();

        self.graph
            .edge_indices()
            .filter(|&edge_idx| {
                self.graph
                    .edge_endpoints(edge_idx)
                    .is_some_and(|(source, target)| {
                        visible.contains(&source) && visible.contains(&target)
                    })
            })
            .collect()
    }

    /// Cluster members ordered by descending node size, ties by node index.
    fn members_by_size(&self, cluster_id: ClusterId) -> Vec<NodeIndex> {
        let Some(cluster) = self.clusters.get(cluster_id) else {
            return Vec::new();
        };

        let mut members: Vec<NodeIndex> = cluster.members().to_vec();
        members.sort_by(|&a, &b| {
            let size_a = self.graph.node_from_idx(a).size();
            let size_b = self.graph.node_from_idx(b).size();
            size_b
                .partial_cmp(&size_a)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.index().cmp(&b.index()))
        });
        members
    }
}

#[cfg(test)]
mod tests {
    use skillgraph_core::{
        dataset::{DatasetKind, RawRecord},
        taxonomy::Palette,
    };

    use super::*;
    use crate::{cluster::detect_communities, ingest::DatasetCollection};

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        let mut record = RawRecord::new();
        for (column, value) in pairs {
            record.insert(*column, Some(value.to_string()));
        }
        record
    }

    /// One hub occupation with many essential skills, plus isolated extras.
    fn hub_graph(skill_count: usize) -> TaxonomyGraph {
        let mut datasets = DatasetCollection::new();
        datasets.set_records(
            DatasetKind::Occupations,
            vec![record(&[("ID", "hub"), ("PREFERREDLABEL", "hub occupation")])],
        );
        datasets.set_records(
            DatasetKind::Skills,
            (0..skill_count)
                .map(|i| {
                    record(&[
                        ("ID", &format!("s{i}")[..]),
                        ("PREFERREDLABEL", &format!("skill {i}")[..]),
                    ])
                })
                .collect(),
        );
        datasets.set_records(
            DatasetKind::OccupationToSkillRelations,
            (0..skill_count)
                .map(|i| {
                    record(&[
                        ("OCCUPATIONID", "hub"),
                        ("SKILLID", &format!("s{i}")[..]),
                        ("RELATIONTYPE", "essential"),
                    ])
                })
                .collect(),
        );
        TaxonomyGraph::from_datasets(&datasets, &Palette::default())
    }

    fn view_of(graph: &TaxonomyGraph, limits: LimitConfig) -> ExplorerView<'_> {
        let clusters = detect_communities(graph, 10);
        ExplorerView::new(graph, clusters, limits)
    }

    #[test]
    fn test_collapsed_cluster_shows_representative_only() {
        let graph = hub_graph(20);
        let view = view_of(&graph, LimitConfig::default());

        let visible = view.visible_nodes();
        assert_eq!(visible.len(), 1);
        // The representative is the largest node: the hub occupation.
        assert_eq!(graph.node_from_idx(visible[0]).label(), "hub occupation");
    }

    #[test]
    fn test_expansion_caps_skills_per_cluster() {
        let graph = hub_graph(40);
        let mut view = view_of(&graph, LimitConfig::default());

        let cluster_id = view.visible_clusters()[0];
        assert!(view.expand(cluster_id));

        let visible = view.visible_nodes();
        let skills = visible
            .iter()
            .filter(|&&idx| graph.node_from_idx(idx).kind() == NodeKind::Skill)
            .count();
        let occupations = visible
            .iter()
            .filter(|&&idx| graph.node_from_idx(idx).kind() == NodeKind::Occupation)
            .count();

        assert_eq!(skills, LimitConfig::default().cluster_skill_limit);
        assert_eq!(occupations, 1);
    }

    #[test]
    fn test_visible_cluster_count_is_capped() {
        // Many isolated skills, each its own cluster.
        let mut datasets = DatasetCollection::new();
        datasets.set_records(
            DatasetKind::Skills,
            (0..30)
                .map(|i| {
                    record(&[
                        ("ID", &format!("s{i}")[..]),
                        ("PREFERREDLABEL", &format!("skill {i}")[..]),
                    ])
                })
                .collect(),
        );
        let graph = TaxonomyGraph::from_datasets(&datasets, &Palette::default());
        let view = view_of(&graph, LimitConfig::default());

        assert_eq!(
            view.visible_clusters().len(),
            LimitConfig::default().max_visible_clusters
        );
    }

    #[test]
    fn test_expand_collapse_round_trip() {
        let graph = hub_graph(10);
        let mut view = view_of(&graph, LimitConfig::default());
        let cluster_id = view.visible_clusters()[0];

        let collapsed = view.visible_nodes().len();
        assert!(view.expand(cluster_id));
        assert!(view.expand(cluster_id), "expand is idempotent");
        let expanded = view.visible_nodes().len();
        assert!(expanded > collapsed);

        view.collapse(cluster_id);
        assert_eq!(view.visible_nodes().len(), collapsed);
    }

    #[test]
    fn test_expanding_unknown_cluster_is_rejected() {
        let graph = hub_graph(3);
        let mut view = view_of(&graph, LimitConfig::default());
        assert!(!view.expand(9999));
    }

    #[test]
    fn test_visible_edges_have_visible_endpoints() {
        let graph = hub_graph(25);
        let mut view = view_of(&graph, LimitConfig::default());

        // Collapsed: a single node, so no edges.
        assert!(view.visible_edges().is_empty());

        let cluster_id = view.visible_clusters()[0];
        view.expand(cluster_id);

        let visible: HashSet<NodeIndex> = view.visible_nodes().into_iter().collect();
        let edges = view.visible_edges();
        assert!(!edges.is_empty());
        for edge_idx in edges {
            let (source, target) = graph.edge_endpoints(edge_idx).unwrap();
            assert!(visible.contains(&source));
            assert!(visible.contains(&target));
        }
    }
}
