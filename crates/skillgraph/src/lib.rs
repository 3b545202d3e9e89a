//! Skillgraph - taxonomy dataset graph ingestion pipeline
//!
//! This library ingests taxonomy CSV exports (occupations, skills, skill
//! groups, and the relation tables between them), builds an attributed
//! graph, assigns positions with a force-directed layout, detects clusters,
//! and renders the result to SVG. A fuzzy search index over node labels and
//! a cluster-limited explorer view support interactive consumers.

pub mod cluster;
pub mod config;
pub mod export;
pub mod graph;
pub mod ingest;
pub mod layout;
pub mod search;
pub mod view;
pub mod worker;

mod error;

pub use skillgraph_core::{color, dataset, draw, geometry, identifier, taxonomy};
pub use skillgraph_parser::{DatasetMetrics, DatasetPayload, parse_dataset};

pub use error::SkillGraphError;

use std::path::Path;

use log::info;

use skillgraph_core::dataset::DatasetKind;

use cluster::ClusterAssignment;
use config::AppConfig;
use export::svg::SvgRenderer;
use graph::TaxonomyGraph;
use ingest::DatasetCollection;
use layout::{ForceLayout, Layout};
use view::ExplorerView;

/// Builder for running the ingestion pipeline.
///
/// Holds the application configuration and drives the stages: ingest CSV
/// sources, build the graph, compute layout and clusters, and render.
///
/// # Examples
///
/// ```rust,no_run
/// use skillgraph::{ExplorerBuilder, config::AppConfig};
///
/// let builder = ExplorerBuilder::new(AppConfig::default());
///
/// let datasets = builder.ingest_dir("exports/latest")
///     .expect("Failed to ingest export");
/// let graph = builder.build_graph(&datasets)
///     .expect("Failed to build graph");
///
/// let layout = builder.layout(&graph);
/// let clusters = builder.cluster(&graph);
/// let view = builder.view(&graph, clusters);
///
/// let svg = builder.render_svg(&view, &layout)
///     .expect("Failed to render");
/// println!("{}", svg);
/// ```
#[derive(Default)]
pub struct ExplorerBuilder {
    config: AppConfig,
}

impl ExplorerBuilder {
    /// Creates a builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// The configuration this builder runs with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Reads and parses the CSV files of an export directory.
    ///
    /// Parsing runs on the background worker; missing files are skipped so
    /// partial exports still load.
    ///
    /// # Errors
    ///
    /// Returns `SkillGraphError` for unreadable files, a directory without
    /// any known dataset files, or a dataset whose parse failed outright.
    pub fn ingest_dir(&self, dir: impl AsRef<Path>) -> Result<DatasetCollection, SkillGraphError> {
        let dir = dir.as_ref();
        info!(dir = dir.display().to_string(); "Ingesting taxonomy export directory");
        let sources = ingest::read_export_dir(dir)?;
        ingest::ingest_sources(sources)
    }

    /// Parses in-memory CSV sources through the background worker.
    ///
    /// # Errors
    ///
    /// Returns `SkillGraphError` when the worker stops unexpectedly or a
    /// dataset fails to parse.
    pub fn ingest(
        &self,
        sources: Vec<(DatasetKind, String)>,
    ) -> Result<DatasetCollection, SkillGraphError> {
        ingest::ingest_sources(sources)
    }

    /// Builds the attributed graph from parsed datasets.
    ///
    /// # Errors
    ///
    /// Returns `SkillGraphError::Config` when a configured style color does
    /// not parse.
    pub fn build_graph(
        &self,
        datasets: &DatasetCollection,
    ) -> Result<TaxonomyGraph, SkillGraphError> {
        let palette = self.config.style.palette().map_err(SkillGraphError::Config)?;
        let graph = TaxonomyGraph::from_datasets(datasets, &palette);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count();
            "Graph built"
        );
        Ok(graph)
    }

    /// Computes node positions with the configured force layout.
    pub fn layout(&self, graph: &TaxonomyGraph) -> Layout {
        ForceLayout::from_config(&self.config.layout).compute(graph)
    }

    /// Detects clusters with the configured sweep budget.
    pub fn cluster(&self, graph: &TaxonomyGraph) -> ClusterAssignment {
        cluster::detect_communities(graph, self.config.layout.cluster_sweeps)
    }

    /// Creates the cluster-limited explorer view over a built graph.
    pub fn view<'g>(
        &self,
        graph: &'g TaxonomyGraph,
        clusters: ClusterAssignment,
    ) -> ExplorerView<'g> {
        ExplorerView::new(graph, clusters, self.config.limits)
    }

    /// Renders an explorer view to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns `SkillGraphError::Config` when the configured background
    /// color does not parse.
    pub fn render_svg(
        &self,
        view: &ExplorerView<'_>,
        layout: &Layout,
    ) -> Result<String, SkillGraphError> {
        let background = self
            .config
            .style
            .background_color()
            .map_err(SkillGraphError::Config)?;
        Ok(SvgRenderer::new()
            .with_background(background)
            .render_view(view, layout))
    }

    /// Renders the whole graph to an SVG string, ignoring view limits.
    ///
    /// # Errors
    ///
    /// Returns `SkillGraphError::Config` when the configured background
    /// color does not parse.
    pub fn render_svg_full(
        &self,
        graph: &TaxonomyGraph,
        layout: &Layout,
    ) -> Result<String, SkillGraphError> {
        let background = self
            .config
            .style
            .background_color()
            .map_err(SkillGraphError::Config)?;
        Ok(SvgRenderer::new()
            .with_background(background)
            .render_full(graph, layout))
    }
}
