//! Error types for pipeline operations.
//!
//! This module provides the main error type [`SkillGraphError`] which wraps
//! the error conditions that can occur while ingesting datasets and
//! producing rendered graphs.

use std::io;

use thiserror::Error;

use skillgraph_core::dataset::DatasetKind;

/// The main error type for skillgraph operations.
///
/// Individual malformed CSV rows never surface here; the parser drops them
/// and reports counts in the dataset metrics. A `Dataset` error means a whole
/// dataset failed to parse.
#[derive(Debug, Error)]
pub enum SkillGraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("dataset `{kind}` failed to parse: {message}")]
    Dataset { kind: DatasetKind, message: String },

    #[error("parse worker error: {0}")]
    Worker(String),

    #[error("configuration error: {0}")]
    Config(String),
}
