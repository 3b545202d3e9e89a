//! SVG rendering of laid-out taxonomy graphs.
//!
//! Nodes become circles sized and filled from their attributes, edges become
//! lines styled from their relation kind, and labels are drawn beneath each
//! node. The document is built in memory and returned as a string.

use log::debug;
use petgraph::graph::{EdgeIndex, NodeIndex};
use svg::{
    Document,
    node::element::{Circle, Line, Rectangle, Text},
};

use skillgraph_core::{apply_stroke, color::Color, geometry::Bounds};

use crate::{graph::TaxonomyGraph, layout::Layout, view::ExplorerView};

/// Renders graphs to SVG documents.
pub struct SvgRenderer {
    background: Option<Color>,
    label_font_size: f32,
    padding: f32,
}

impl SvgRenderer {
    /// Creates a renderer with default settings and no background.
    pub fn new() -> Self {
        Self {
            background: None,
            label_font_size: 11.0,
            padding: 40.0,
        }
    }

    /// Sets the background fill for the rendered document.
    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    /// Renders every node and edge of the graph.
    pub fn render_full(&self, graph: &TaxonomyGraph, layout: &Layout) -> String {
        let nodes: Vec<NodeIndex> = graph.node_indices().collect();
        let edges: Vec<EdgeIndex> = graph.edge_indices().collect();
        self.render(graph, layout, &nodes, &edges)
    }

    /// Renders only what an explorer view exposes.
    pub fn render_view(&self, view: &ExplorerView<'_>, layout: &Layout) -> String {
        self.render(
            view.graph(),
            layout,
            &view.visible_nodes(),
            &view.visible_edges(),
        )
    }

    fn render(
        &self,
        graph: &TaxonomyGraph,
        layout: &Layout,
        nodes: &[NodeIndex],
        edges: &[EdgeIndex],
    ) -> String {
        let bounds = self.content_bounds(graph, layout, nodes);
        let mut document = Document::new().set(
            "viewBox",
            (
                bounds.min_x(),
                bounds.min_y(),
                bounds.width(),
                bounds.height(),
            ),
        );

        if let Some(background) = &self.background {
            document = document.add(
                Rectangle::new()
                    .set("x", bounds.min_x())
                    .set("y", bounds.min_y())
                    .set("width", bounds.width())
                    .set("height", bounds.height())
                    .set("fill", background.to_string()),
            );
        }

        // Edges first so nodes draw on top of them.
        for &edge_idx in edges {
            let Some((source, target)) = graph.edge_endpoints(edge_idx) else {
                continue;
            };
            let Some(relation) = graph.edge_weight(edge_idx) else {
                continue;
            };
            let (Some(source_pos), Some(target_pos)) =
                (layout.position(source), layout.position(target))
            else {
                continue;
            };

            let line = Line::new()
                .set("x1", source_pos.x())
                .set("y1", source_pos.y())
                .set("x2", target_pos.x())
                .set("y2", target_pos.y());
            document = document.add(apply_stroke!(line, &relation.stroke()));
        }

        for &node_idx in nodes {
            let node = graph.node_from_idx(node_idx);
            let Some(position) = layout.position(node_idx) else {
                continue;
            };

            document = document.add(
                Circle::new()
                    .set("cx", position.x())
                    .set("cy", position.y())
                    .set("r", node.size())
                    .set("fill", node.color().to_string())
                    .set("stroke", "#ffffff")
                    .set("stroke-width", 1.0),
            );

            document = document.add(
                Text::new(node.label())
                    .set("x", position.x())
                    .set("y", position.y() + node.size() + self.label_font_size)
                    .set("font-size", self.label_font_size)
                    .set("font-family", "sans-serif")
                    .set("text-anchor", "middle")
                    .set("fill", "#333333"),
            );
        }

        debug!(nodes = nodes.len(), edges = edges.len(); "Rendered SVG document");

        document.to_string()
    }

    /// The bounding box of the rendered nodes, padded for labels.
    fn content_bounds(
        &self,
        graph: &TaxonomyGraph,
        layout: &Layout,
        nodes: &[NodeIndex],
    ) -> Bounds {
        let mut bounds: Option<Bounds> = None;

        for &node_idx in nodes {
            if let Some(position) = layout.position(node_idx) {
                let node_bounds = Bounds::around(position, graph.node_from_idx(node_idx).size());
                bounds = Some(match bounds {
                    Some(current) => current.merge(node_bounds),
                    None => node_bounds,
                });
            }
        }

        bounds
            .map(|b| b.pad(self.padding))
            .unwrap_or_else(|| Bounds::new(0.0, 0.0, 1.0, 1.0))
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}
