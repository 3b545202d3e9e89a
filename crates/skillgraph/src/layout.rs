//! Force-directed layout engine.
//!
//! Positions graph nodes with a physics simulation: pairwise repulsion keeps
//! nodes apart, spring forces along relations pull connected nodes together,
//! and velocity damping settles the system. The iteration count is bounded
//! so layout cost stays predictable regardless of dataset size.

use std::collections::HashMap;

use log::debug;
use petgraph::graph::NodeIndex;

use skillgraph_core::geometry::Point;

use crate::{config::LayoutConfig, graph::TaxonomyGraph};

/// Computed 2-D positions for every node of a graph.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    positions: HashMap<NodeIndex, Point>,
}

impl Layout {
    /// The position of a node, if it was part of the layout run.
    pub fn position(&self, node_idx: NodeIndex) -> Option<Point> {
        self.positions.get(&node_idx).copied()
    }

    /// Iterates over all positioned nodes.
    pub fn positions(&self) -> impl Iterator<Item = (NodeIndex, Point)> + '_ {
        self.positions.iter().map(|(&idx, &point)| (idx, point))
    }

    /// Number of positioned nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true when no nodes were positioned.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Force layout engine.
///
/// Uses a simple force-directed algorithm: components are seeded on a jittered
/// grid, then attracted along edges and repelled pairwise for a fixed number
/// of iterations.
pub struct ForceLayout {
    iterations: usize,
    spring_constant: f32,
    repulsion_constant: f32,
    damping_factor: f32,
    min_distance: f32,
    max_dimension: f32,
}

impl ForceLayout {
    /// Create a new force layout engine with default parameters.
    pub fn new() -> Self {
        Self::from_config(&LayoutConfig::default())
    }

    /// Create a force layout engine from a configuration section.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            iterations: config.iterations,
            spring_constant: config.spring_constant,
            repulsion_constant: config.repulsion_constant,
            damping_factor: config.damping_factor,
            min_distance: config.min_distance,
            max_dimension: config.max_dimension,
        }
    }

    /// Set the number of iterations for the force simulation
    pub fn set_iterations(&mut self, iterations: usize) -> &mut Self {
        self.iterations = iterations;
        self
    }

    /// Set the minimum distance between node boundaries
    pub fn set_min_distance(&mut self, distance: f32) -> &mut Self {
        self.min_distance = distance;
        self
    }

    /// Runs the simulation and returns positions for every node.
    pub fn compute(&self, graph: &TaxonomyGraph) -> Layout {
        if graph.node_count() == 0 {
            return Layout::default();
        }

        debug!(
            node_count = graph.node_count(),
            iterations = self.iterations;
            "Running force layout"
        );

        let mut positions = self.initialize_positions(graph);
        let mut velocities: HashMap<NodeIndex, (f32, f32)> = HashMap::new();

        for &node_idx in positions.keys() {
            velocities.insert(node_idx, (0.0, 0.0));
        }

        let nodes: Vec<NodeIndex> = graph.node_indices().collect();

        // Run simulation for fixed number of iterations
        for _ in 0..self.iterations {
            let mut forces: HashMap<NodeIndex, (f32, f32)> = HashMap::new();
            for &node_idx in &nodes {
                forces.insert(node_idx, (0.0, 0.0));
            }

            // Repulsive forces between all node pairs
            for &node_i in &nodes {
                for &node_j in &nodes {
                    if node_i == node_j {
                        continue;
                    }

                    let pos_i = positions[&node_i];
                    let pos_j = positions[&node_j];
                    let trans = pos_i.sub_point(pos_j);

                    // Keep node boundaries apart: radii plus the configured margin
                    let min_dist = graph.node_from_idx(node_i).size()
                        + graph.node_from_idx(node_j).size()
                        + self.min_distance;

                    // Avoid division by zero
                    let distance = trans.hypot().max(1.0);

                    // Stronger repulsion when nodes overlap their margin
                    let force_factor = if distance < min_dist {
                        self.repulsion_constant * (min_dist / distance).powf(2.0)
                    } else {
                        self.repulsion_constant / distance
                    };

                    let force_x = force_factor * trans.x() / distance;
                    let force_y = force_factor * trans.y() / distance;

                    let (fx, fy) = forces[&node_i];
                    forces.insert(node_i, (fx + force_x, fy + force_y));
                }
            }

            // Attractive spring forces between related nodes
            for edge_idx in graph.edge_indices() {
                let (source, target) = graph
                    .edge_endpoints(edge_idx)
                    .expect("Edge index should exist");
                if source == target {
                    continue;
                }

                let dist = positions[&source].sub_point(positions[&target]);
                let distance = dist.hypot().max(1.0);

                // Spring force proportional to distance
                let force = self.spring_constant * distance;
                let force_x = force * dist.x() / distance;
                let force_y = force * dist.y() / distance;

                let (fx_source, fy_source) = forces[&source];
                forces.insert(source, (fx_source - force_x, fy_source - force_y));

                let (fx_target, fy_target) = forces[&target];
                forces.insert(target, (fx_target + force_x, fy_target + force_y));
            }

            // Update velocities and positions
            for &node_idx in &nodes {
                let (force_x, force_y) = forces[&node_idx];
                let (vel_x, vel_y) = velocities[&node_idx];

                let new_vel_x = (vel_x + force_x) * self.damping_factor;
                let new_vel_y = (vel_y + force_y) * self.damping_factor;
                velocities.insert(node_idx, (new_vel_x, new_vel_y));

                let pos = positions[&node_idx];
                positions.insert(
                    node_idx,
                    Point::new(pos.x() + new_vel_x, pos.y() + new_vel_y),
                );
            }
        }

        self.center_layout(&mut positions);

        Layout { positions }
    }

    /// Seed positions on a grid with some randomness to break symmetry.
    fn initialize_positions(&self, graph: &TaxonomyGraph) -> HashMap<NodeIndex, Point> {
        use rand::RngExt;
        let mut rng = rand::rng();

        let node_count = graph.node_count();
        let grid_size = ((node_count as f32).sqrt().ceil() as usize).max(1);
        let cell_size = self.min_distance * 1.5;

        graph
            .node_indices()
            .enumerate()
            .map(|(i, node_idx)| {
                let row = i / grid_size;
                let col = i % grid_size;

                let base = Point::new(col as f32 * cell_size, row as f32 * cell_size);
                let jitter =
                    Point::new(rng.random_range(-20.0..20.0), rng.random_range(-20.0..20.0));

                (node_idx, base.add_point(jitter))
            })
            .collect()
    }

    /// Center the layout around the origin and cap its overall dimension.
    fn center_layout(&self, positions: &mut HashMap<NodeIndex, Point>) {
        if positions.is_empty() {
            return;
        }

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;

        for pos in positions.values() {
            min_x = min_x.min(pos.x());
            min_y = min_y.min(pos.y());
            max_x = max_x.max(pos.x());
            max_y = max_y.max(pos.y());
        }

        let center_x = (min_x + max_x) / 2.0;
        let center_y = (min_y + max_y) / 2.0;

        for pos in positions.values_mut() {
            *pos = pos.sub_point(Point::new(center_x, center_y));
        }

        let width = max_x - min_x;
        let height = max_y - min_y;

        if width > self.max_dimension || height > self.max_dimension {
            let scale_factor = self.max_dimension / width.max(height);
            for pos in positions.values_mut() {
                *pos = pos.scale(scale_factor);
            }
        }
    }
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self::new()
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

    fn small_graph() -> TaxonomyGraph {
        let mut datasets = DatasetCollection::new();
        datasets.set_records(
            DatasetKind::Occupations,
            vec![
                record(&[("ID", "o1"), ("PREFERREDLABEL", "a")]),
                record(&[("ID", "o2"), ("PREFERREDLABEL", "b")]),
            ],
        );
        datasets.set_records(
            DatasetKind::Skills,
            vec![record(&[("ID", "s1"), ("PREFERREDLABEL", "c")])],
        );
        datasets.set_records(
            DatasetKind::OccupationToSkillRelations,
            vec![record(&[
                ("OCCUPATIONID", "o1"),
                ("SKILLID", "s1"),
                ("RELATIONTYPE", "essential"),
            ])],
        );
        TaxonomyGraph::from_datasets(&datasets, &Palette::default())
    }

    #[test]
    fn test_every_node_gets_a_position() {
        let graph = small_graph();
        let layout = ForceLayout::new().compute(&graph);

        assert_eq!(layout.len(), graph.node_count());
        for node_idx in graph.node_indices() {
            let pos = layout.position(node_idx).unwrap();
            assert!(pos.x().is_finite());
            assert!(pos.y().is_finite());
        }
    }

    #[test]
    fn test_empty_graph_yields_empty_layout() {
        let graph = TaxonomyGraph::from_datasets(&DatasetCollection::new(), &Palette::default());
        let layout = ForceLayout::new().compute(&graph);
        assert!(layout.is_empty());
    }

    #[test]
    fn test_nodes_end_up_separated() {
        let graph = small_graph();
        let mut engine = ForceLayout::new();
        engine.set_iterations(50);
        let layout = engine.compute(&graph);

        let positions: Vec<Point> = graph
            .node_indices()
            .map(|idx| layout.position(idx).unwrap())
            .collect();

        for (i, a) in positions.iter().enumerate() {
            for b in positions.iter().skip(i + 1) {
                assert!(a.sub_point(*b).hypot() > 1.0, "nodes collapsed together");
            }
        }
    }

    #[test]
    fn test_layout_dimension_is_capped() {
        let graph = small_graph();
        let layout = ForceLayout::new().compute(&graph);

        let max_dimension = LayoutConfig::default().max_dimension;
        for (_, pos) in layout.positions() {
            assert!(pos.x().abs() <= max_dimension);
            assert!(pos.y().abs() <= max_dimension);
        }
    }
}
