//! CLI logic for the skillgraph taxonomy explorer.
//!
//! This module contains the core CLI logic for the skillgraph tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use skillgraph::{ExplorerBuilder, SkillGraphError, search};

/// Run the skillgraph CLI application
///
/// This function processes the taxonomy export directory through the
/// ingestion pipeline and writes the resulting SVG to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `SkillGraphError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Dataset parsing errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), SkillGraphError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing taxonomy export"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    // Process the export using the ExplorerBuilder API
    let builder = ExplorerBuilder::new(app_config);
    let datasets = builder.ingest_dir(&args.input)?;
    let graph = builder.build_graph(&datasets)?;
    let layout = builder.layout(&graph);
    let clusters = builder.cluster(&graph);

    if let Some(term) = &args.search {
        for search_match in search::search(term, &graph) {
            let node = graph.node_from_idx(search_match.node());
            println!("{}\t{}\t{:?}", node.id(), node.label(), search_match.rank());
        }
    }

    let mut view = builder.view(&graph, clusters);
    if args.expand > 0 {
        view.expand_top(args.expand);
    }

    let svg = builder.render_svg(&view, &layout)?;

    // Write output file
    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
