//! Community detection over the built graph.
//!
//! Clusters are detected with bounded label propagation on the undirected
//! view of the relation graph: every node starts in its own community and
//! repeatedly adopts the most common label among its neighbors until the
//! labels stop changing or the sweep budget runs out. Ties prefer the
//! smallest label, which makes the result deterministic for a given graph.

use std::{cmp::Reverse, collections::HashMap};

use log::debug;
use petgraph::graph::NodeIndex;

use crate::graph::TaxonomyGraph;

/// Identifier of a detected cluster.
///
/// Ids are assigned by descending member count: cluster 0 is the largest.
pub type ClusterId = usize;

/// One detected community and its members.
#[derive(Debug, Clone)]
pub struct Cluster {
    id: ClusterId,
    members: Vec<NodeIndex>,
}

impl Cluster {
    /// The cluster id.
    pub fn id(&self) -> ClusterId {
        self.id
    }

    /// Member nodes, in graph insertion order.
    pub fn members(&self) -> &[NodeIndex] {
        &self.members
    }

    /// Number of member nodes.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true for a cluster without members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The result of community detection.
#[derive(Debug, Clone, Default)]
pub struct ClusterAssignment {
    node_cluster: HashMap<NodeIndex, ClusterId>,
    clusters: Vec<Cluster>,
}

impl ClusterAssignment {
    /// The cluster a node belongs to.
    pub fn cluster_of(&self, node_idx: NodeIndex) -> Option<ClusterId> {
        self.node_cluster.get(&node_idx).copied()
    }

    /// All clusters, ordered by descending member count.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Looks up a cluster by id.
    pub fn get(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id)
    }

    /// Number of detected clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Returns true when no clusters were detected.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Detects communities via label propagation with a bounded sweep count.
pub fn detect_communities(graph: &TaxonomyGraph, max_sweeps: usize) -> ClusterAssignment {
    let node_count = graph.node_count();
    if node_count == 0 {
        return ClusterAssignment::default();
    }

    // Dense index mapping so labels and adjacency live in plain vectors.
    let nodes: Vec<NodeIndex> = graph.node_indices().collect();
    let index_of: HashMap<NodeIndex, usize> = nodes
        .iter()
        .enumerate()
        .map(|(dense, &idx)| (idx, dense))
        .collect();

    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for edge_idx in graph.edge_indices() {
        let (source, target) = graph
            .edge_endpoints(edge_idx)
            .expect("Edge index should exist");
        if source == target {
            continue;
        }
        let s = index_of[&source];
        let t = index_of[&target];
        neighbors[s].push(t);
        neighbors[t].push(s);
    }

    let mut labels: Vec<usize> = (0..node_count).collect();

    for sweep in 0..max_sweeps {
        let mut changed = false;

        for i in 0..node_count {
            if neighbors[i].is_empty() {
                continue;
            }

            let mut counts: HashMap<usize, usize> = HashMap::new();
            for &j in &neighbors[i] {
                *counts.entry(labels[j]).or_insert(0) += 1;
            }

            // Most frequent neighbor label; ties prefer the smallest label.
            let best = counts
                .iter()
                .map(|(&label, &count)| (count, Reverse(label)))
                .max()
                .map(|(_, Reverse(label))| label)
                .expect("neighbor list is non-empty");

            if best != labels[i] {
                labels[i] = best;
                changed = true;
            }
        }

        if !changed {
            debug!(sweeps = sweep + 1; "Label propagation converged");
            break;
        }
    }

    // Group members per label, then order clusters by descending size.
    let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, &label) in labels.iter().enumerate() {
        groups.entry(label).or_default().push(i);
    }

    let mut member_sets: Vec<Vec<usize>> = groups.into_values().collect();
    member_sets.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));

    let mut node_cluster = HashMap::new();
    let clusters: Vec<Cluster> = member_sets
        .into_iter()
        .enumerate()
        .map(|(id, members)| {
            let members: Vec<NodeIndex> = members.into_iter().map(|dense| nodes[dense]).collect();
            for &member in &members {
                node_cluster.insert(member, id);
            }
            Cluster { id, members }
        })
        .collect();

    debug!(clusters = clusters.len(); "Community detection finished");

    ClusterAssignment {
        node_cluster,
        clusters,
    }
}

#[cfg(test)]
mod tests {
    use skillgraph_core::{
        dataset::{DatasetKind, RawRecord},
        taxonomy::Palette,
    };

    use super::*;
    use crate::ingest::DatasetCollection;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        let mut record = RawRecord::new();
        for (column, value) in pairs {
            record.insert(*column, Some(value.to_string()));
        }
        record
    }

    /// Two tight occupation/skill communities with no edges between them.
    fn two_community_graph() -> TaxonomyGraph {
        let mut datasets = DatasetCollection::new();
        datasets.set_records(
            DatasetKind::Occupations,
            vec![
                record(&[("ID", "o1"), ("PREFERREDLABEL", "baker")]),
                record(&[("ID", "o2"), ("PREFERREDLABEL", "welder")]),
            ],
        );
        datasets.set_records(
            DatasetKind::Skills,
            vec![
                record(&[("ID", "s1"), ("PREFERREDLABEL", "baking")]),
                record(&[("ID", "s2"), ("PREFERREDLABEL", "kneading")]),
                record(&[("ID", "s3"), ("PREFERREDLABEL", "welding")]),
                record(&[("ID", "s4"), ("PREFERREDLABEL", "brazing")]),
            ],
        );
        datasets.set_records(
            DatasetKind::OccupationToSkillRelations,
            vec![
                record(&[("OCCUPATIONID", "o1"), ("SKILLID", "s1"), ("RELATIONTYPE", "essential")]),
                record(&[("OCCUPATIONID", "o1"), ("SKILLID", "s2"), ("RELATIONTYPE", "essential")]),
                record(&[("OCCUPATIONID", "o2"), ("SKILLID", "s3"), ("RELATIONTYPE", "essential")]),
                record(&[("OCCUPATIONID", "o2"), ("SKILLID", "s4"), ("RELATIONTYPE", "essential")]),
            ],
        );
        TaxonomyGraph::from_datasets(&datasets, &Palette::default())
    }

    #[test]
    fn test_disconnected_communities_get_distinct_clusters() {
        let graph = two_community_graph();
        let assignment = detect_communities(&graph, 10);

        let cluster = |id: &str| {
            let (idx, _) = graph
                .node_by_id(skillgraph_core::identifier::Id::new(id))
                .unwrap();
            assignment.cluster_of(idx).unwrap()
        };

        assert_eq!(cluster("o1"), cluster("s1"));
        assert_eq!(cluster("o1"), cluster("s2"));
        assert_eq!(cluster("o2"), cluster("s3"));
        assert_eq!(cluster("o2"), cluster("s4"));
        assert_ne!(cluster("o1"), cluster("o2"));
    }

    #[test]
    fn test_clusters_sorted_by_descending_size() {
        let graph = two_community_graph();
        let assignment = detect_communities(&graph, 10);

        let sizes: Vec<usize> = assignment.clusters().iter().map(Cluster::len).collect();
        let mut sorted = sizes.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(sizes, sorted);

        // Cluster ids index into the cluster list.
        for cluster in assignment.clusters() {
            assert_eq!(assignment.get(cluster.id()).unwrap().id(), cluster.id());
        }
    }

    #[test]
    fn test_every_node_is_assigned() {
        let graph = two_community_graph();
        let assignment = detect_communities(&graph, 10);

        for node_idx in graph.node_indices() {
            assert!(assignment.cluster_of(node_idx).is_some());
        }
        let total: usize = assignment.clusters().iter().map(Cluster::len).sum();
        assert_eq!(total, graph.node_count());
    }

    #[test]
    fn test_deterministic_assignment() {
        let graph = two_community_graph();
        let first = detect_communities(&graph, 10);
        let second = detect_communities(&graph, 10);

        for node_idx in graph.node_indices() {
            assert_eq!(first.cluster_of(node_idx), second.cluster_of(node_idx));
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = TaxonomyGraph::from_datasets(&DatasetCollection::new(), &Palette::default());
        let assignment = detect_communities(&graph, 10);
        assert!(assignment.is_empty());
    }
}
