//! CSV cleaner/parser for skillgraph taxonomy datasets.
//!
//! This crate turns raw CSV text into cleaned [`RawRecord`]s plus
//! [`DatasetMetrics`]. Parsing is lenient by design: malformed rows are
//! dropped (and recorded in the metrics) rather than failing the parse, and
//! placeholder cell values are normalized to null.
//!
//! The public entry point is [`parse_dataset`], which never panics and never
//! returns an error: failures are captured in the returned
//! [`DatasetPayload`] so the result can cross a worker boundary as a plain
//! message.

pub mod error;

mod clean;
mod csv;
mod metrics;


pub use clean::clean_cell;
pub use metrics::DatasetMetrics;

use log::{debug, warn};

use skillgraph_core::dataset::{DatasetKind, RawRecord};

use crate::error::{ParseError, RowIssue};

/// The parse result for one dataset, shaped as a worker reply message.
///
/// Exactly one payload is produced per parse call. When `success` is false,
/// `records` is empty and `error` holds a human-readable description.
#[derive(Debug, Clone)]
pub struct DatasetPayload {
    /// Which dataset this payload belongs to.
    pub kind: DatasetKind,
    /// The cleaned records, one per well-formed data row.
    pub records: Vec<RawRecord>,
    /// Aggregate metrics collected during parsing.
    pub metrics: DatasetMetrics,
    /// Whether parsing completed.
    pub success: bool,
    /// Human-readable failure description when `success` is false.
    pub error: Option<String>,
}

impl DatasetPayload {
    /// Creates a failure payload with empty data.
    pub fn failure(kind: DatasetKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            records: Vec::new(),
            metrics: DatasetMetrics::default(),
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Parses one dataset's CSV text into a reply payload.
///
/// This is the infallible boundary: any parse failure is converted into a
/// `success: false` payload instead of an error or panic.
pub fn parse_dataset(kind: DatasetKind, csv_text: &str) -> DatasetPayload {
    match parse_records(csv_text) {
        Ok((records, metrics)) => {
            debug!(
                dataset = kind.to_string(),
                rows_kept = metrics.rows_kept(),
                rows_dropped = metrics.rows_dropped(),
                null_cells = metrics.null_cells();
                "Parsed dataset"
            );
            DatasetPayload {
                kind,
                records,
                metrics,
                success: true,
                error: None,
            }
        }
        Err(err) => {
            warn!(dataset = kind.to_string(), error = err.to_string(); "Dataset parse failed");
            DatasetPayload::failure(kind, err.to_string())
        }
    }
}

/// Parses CSV text into cleaned records and metrics.
///
/// The first non-blank line is the header. Data rows whose field count does
/// not match the header, or that do not match the record grammar, are
/// dropped and recorded in the metrics. Empty or header-only input yields
/// zero records and is not an error.
pub fn parse_records(csv_text: &str) -> Result<(Vec<RawRecord>, DatasetMetrics), ParseError> {
    let text = csv_text.strip_prefix('\u{feff}').unwrap_or(csv_text);

    let mut lines = csv::split_records(text)
        .into_iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        return Ok((Vec::new(), DatasetMetrics::default()));
    };

    let header = csv::parse_fields(header_line).map_err(ParseError::Header)?;
    let columns: Vec<String> = header.iter().map(|cell| cell.trim().to_string()).collect();

    let mut metrics = DatasetMetrics::new(columns.clone());
    let mut records = Vec::new();

    for (index, line) in lines {
        let row = index + 1;
        metrics.record_seen();

        let fields = match csv::parse_fields(line) {
            Ok(fields) => fields,
            Err(reason) => {
                debug!(row, reason = reason.as_str(); "Dropping malformed row");
                metrics.record_dropped(RowIssue::new(row, reason));
                continue;
            }
        };

        if fields.len() != columns.len() {
            let reason = format!(
                "expected {} columns, found {}",
                columns.len(),
                fields.len()
            );
            debug!(row, reason = reason.as_str(); "Dropping malformed row");
            metrics.record_dropped(RowIssue::new(row, reason));
            continue;
        }

        let record: RawRecord = columns
            .iter()
            .cloned()
            .zip(fields.iter().map(|cell| clean_cell(cell)))
            .collect();

        metrics.record_kept(record.null_count());
        records.push(record);
    }

    Ok((records, metrics))
}
