//! Attributed graph construction from cleaned dataset records.
//!
//! [`TaxonomyGraph`] owns the node and edge sets. It is mutated only while
//! [`TaxonomyGraph::from_datasets`] runs; afterwards the layout, view,
//! search, and export stages read it through the accessor API.

use std::collections::HashMap;

use log::{debug, warn};
use petgraph::{
    Direction,
    graph::{DiGraph, EdgeIndex, NodeIndex},
};

use skillgraph_core::{
    color::Color,
    dataset::{DatasetKind, RawRecord, columns},
    draw::StrokeDefinition,
    identifier::Id,
    taxonomy::{self, NodeKind, Palette, RelationKind},
};

use crate::ingest::DatasetCollection;

/// Attributes of one taxonomy node.
#[derive(Debug, Clone)]
pub struct NodeData {
    id: Id,
    label: String,
    kind: NodeKind,
    description: Option<String>,
    size: f32,
    color: Color,
}

impl NodeData {
    /// The node's unique identifier, taken from the dataset's `ID` column.
    pub fn id(&self) -> Id {
        self.id
    }

    /// The display label shown next to the rendered node.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The node kind this node was ingested as.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The free-text description, when the dataset provided one.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The rendered radius, clamped from the node's relation count.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// The fill color, fixed per node kind.
    pub fn color(&self) -> Color {
        self.color
    }
}

/// Attributes of one relation edge.
#[derive(Debug, Clone, Copy)]
pub struct RelationData {
    kind: RelationKind,
}

impl RelationData {
    /// The relation kind carried by this edge.
    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    /// The stroke used to render this edge, a pure function of its kind.
    pub fn stroke(&self) -> StrokeDefinition {
        self.kind.stroke()
    }
}

/// The attributed taxonomy graph.
///
/// Nodes are occupations, skills, and skill groups; edges are the typed
/// relations between them. Node ids are unique: later rows reusing an id are
/// dropped. Relations referencing ids with no node are skipped.
#[derive(Debug)]
pub struct TaxonomyGraph {
    graph: DiGraph<NodeData, RelationData>,
    node_id_map: HashMap<Id, NodeIndex>,
    duplicate_nodes: usize,
    skipped_relations: usize,
}

impl TaxonomyGraph {
    /// Builds the graph from a parsed dataset collection.
    ///
    /// Construction is deterministic for identical input records: entity
    /// tables become nodes first (occupations, skills, skill groups, in that
    /// order), relation tables become edges second, and node sizes are
    /// derived from relation counts last.
    pub fn from_datasets(datasets: &DatasetCollection, palette: &Palette) -> Self {
        let mut builder = Self {
            graph: DiGraph::new(),
            node_id_map: HashMap::new(),
            duplicate_nodes: 0,
            skipped_relations: 0,
        };

        // First pass: entity tables become nodes.
        for record in datasets.records(DatasetKind::Occupations) {
            builder.add_entity(record, NodeKind::Occupation, palette);
        }
        for record in datasets.records(DatasetKind::Skills) {
            builder.add_entity(record, NodeKind::Skill, palette);
        }
        for record in datasets.records(DatasetKind::SkillGroups) {
            builder.add_entity(record, NodeKind::SkillGroup, palette);
        }

        // Second pass: relation tables become edges.
        for record in datasets.records(DatasetKind::OccupationToSkillRelations) {
            let kind = record
                .get(columns::RELATION_TYPE)
                .map(RelationKind::parse)
                .unwrap_or(RelationKind::Other);
            builder.add_relation(
                record.get(columns::OCCUPATION_ID),
                record.get(columns::SKILL_ID),
                kind,
            );
        }
        for record in datasets.records(DatasetKind::SkillHierarchy) {
            builder.add_relation(
                record.get(columns::PARENT_ID),
                record.get(columns::CHILD_ID),
                RelationKind::Hierarchy,
            );
        }

        builder.assign_sizes();

        if builder.duplicate_nodes > 0 || builder.skipped_relations > 0 {
            warn!(
                duplicate_nodes = builder.duplicate_nodes,
                skipped_relations = builder.skipped_relations;
                "Graph built with dropped input rows"
            );
        }

        builder
    }

    fn add_entity(&mut self, record: &RawRecord, kind: NodeKind, palette: &Palette) {
        let Some(id_value) = record.get(columns::ID) else {
            debug!(kind = kind.to_string(); "Skipping entity row without an id");
            return;
        };

        let id = Id::new(id_value);
        if self.node_id_map.contains_key(&id) {
            debug!(id = id_value; "Dropping duplicate node id");
            self.duplicate_nodes += 1;
            return;
        }

        let label = record
            .get_any(&[columns::PREFERRED_LABEL, columns::NAME])
            .unwrap_or(id_value)
            .to_string();
        let description = record.get(columns::DESCRIPTION).map(str::to_string);

        let node_idx = self.graph.add_node(NodeData {
            id,
            label,
            kind,
            description,
            size: taxonomy::MIN_NODE_SIZE,
            color: palette.color_for(Some(kind)),
        });
        self.node_id_map.insert(id, node_idx);
    }

    fn add_relation(&mut self, source: Option<&str>, target: Option<&str>, kind: RelationKind) {
        let (Some(source), Some(target)) = (source, target) else {
            self.skipped_relations += 1;
            return;
        };

        match (
            self.node_id_map.get(&Id::new(source)),
            self.node_id_map.get(&Id::new(target)),
        ) {
            (Some(&source_idx), Some(&target_idx)) => {
                self.graph
                    .add_edge(source_idx, target_idx, RelationData { kind });
            }
            _ => {
                debug!(source, target; "Relation refers to undefined nodes");
                self.skipped_relations += 1;
            }
        }
    }

    /// Derives node sizes from relation counts after all edges exist.
    fn assign_sizes(&mut self) {
        let counts: Vec<(NodeIndex, usize)> = self
            .graph
            .node_indices()
            .map(|idx| (idx, self.relation_count(idx)))
            .collect();

        for (idx, count) in counts {
            self.graph[idx].size = taxonomy::node_size(count);
        }
    }

    /// Number of relations incident to a node, in either direction.
    pub fn relation_count(&self, node_idx: NodeIndex) -> usize {
        self.graph.edges_directed(node_idx, Direction::Outgoing).count()
            + self.graph.edges_directed(node_idx, Direction::Incoming).count()
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    pub fn nodes_with_indices(&self) -> impl Iterator<Item = (NodeIndex, &NodeData)> {
        self.graph.node_indices().map(|idx| {
            (
                idx,
                self.graph.node_weight(idx).expect("Node idx should exist"),
            )
        })
    }

    pub fn node_from_idx(&self, node_idx: NodeIndex) -> &NodeData {
        self.graph
            .node_weight(node_idx)
            .expect("Node index should exist")
    }

    /// Looks up a node by its dataset identifier.
    pub fn node_by_id(&self, id: Id) -> Option<(NodeIndex, &NodeData)> {
        self.node_id_map
            .get(&id)
            .map(|&idx| (idx, self.node_from_idx(idx)))
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> {
        self.graph.edge_indices()
    }

    pub fn edge_weight(&self, edge_idx: EdgeIndex) -> Option<&RelationData> {
        self.graph.edge_weight(edge_idx)
    }

    pub fn edge_endpoints(&self, edge_idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(edge_idx)
    }

    /// Number of entity rows dropped because their id was already taken.
    pub fn duplicate_nodes(&self) -> usize {
        self.duplicate_nodes
    }

    /// Number of relation rows skipped for missing or undefined endpoints.
    pub fn skipped_relations(&self) -> usize {
        self.skipped_relations
    }
}
