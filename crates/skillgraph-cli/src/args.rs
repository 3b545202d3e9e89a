//! Command-line argument definitions for the skillgraph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, cluster expansion, search, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the skillgraph taxonomy explorer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the taxonomy export directory containing the CSV files
    #[arg(help = "Path to the taxonomy export directory")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "graph.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Number of top clusters to expand in the rendered view
    #[arg(short, long, default_value_t = 0)]
    pub expand: usize,

    /// Search node labels and print the ranked matches
    #[arg(short, long)]
    pub search: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
