//! Error types for dataset parsing.
//!
//! Individual malformed rows never fail a parse; they are recorded as
//! [`RowIssue`]s in the dataset metrics. [`ParseError`] covers the few
//! conditions that make the whole document unusable.

use std::fmt;

use thiserror::Error;

/// Error type for a dataset parse that cannot proceed.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The header row itself did not match the record grammar.
    #[error("malformed header row: {0}")]
    Header(String),
}

/// A single dropped row and the reason it was rejected.
///
/// Rows are 1-based document positions, counting the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    row: usize,
    reason: String,
}

impl RowIssue {
    /// Creates a new row issue.
    pub fn new(row: usize, reason: impl Into<String>) -> Self {
        Self {
            row,
            reason: reason.into(),
        }
    }

    /// The 1-based row number within the source document.
    pub fn row(&self) -> usize {
        self.row
    }

    /// The human-readable drop reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.reason)
    }
}
