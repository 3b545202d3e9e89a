//! Dataset ingestion.
//!
//! Collects the parsed payloads of a taxonomy export into a
//! [`DatasetCollection`] and provides the file-system entry point for
//! reading an export directory.

use std::{fs, io, path::Path};

use indexmap::IndexMap;
use log::{info, warn};

use skillgraph_core::dataset::{DatasetKind, RawRecord};
use skillgraph_parser::{DatasetMetrics, DatasetPayload};

use crate::{error::SkillGraphError, worker::ParseWorker};

/// The cleaned records of a taxonomy export, one entry per dataset.
///
/// Datasets are independent: a collection may hold only a subset of the
/// known kinds when source files were missing, and consumers treat absent
/// datasets as empty.
#[derive(Debug, Clone, Default)]
pub struct DatasetCollection {
    records: IndexMap<DatasetKind, Vec<RawRecord>>,
    metrics: IndexMap<DatasetKind, DatasetMetrics>,
}

impl DatasetCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorbs one parsed payload.
    ///
    /// A `success: false` payload becomes a [`SkillGraphError::Dataset`]; the
    /// caller decides whether to retry the dataset or abandon the ingest.
    pub fn insert(&mut self, payload: DatasetPayload) -> Result<(), SkillGraphError> {
        if !payload.success {
            return Err(SkillGraphError::Dataset {
                kind: payload.kind,
                message: payload
                    .error
                    .unwrap_or_else(|| "unknown parse failure".to_string()),
            });
        }

        self.records.insert(payload.kind, payload.records);
        self.metrics.insert(payload.kind, payload.metrics);
        Ok(())
    }

    /// Replaces the records for one dataset directly.
    ///
    /// Intended for programmatic construction; file and worker based
    /// ingestion goes through [`DatasetCollection::insert`].
    pub fn set_records(&mut self, kind: DatasetKind, records: Vec<RawRecord>) {
        self.records.insert(kind, records);
    }

    /// The cleaned records for a dataset; absent datasets are empty.
    pub fn records(&self, kind: DatasetKind) -> &[RawRecord] {
        self.records
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The parse metrics for a dataset, when it was ingested via a payload.
    pub fn metrics(&self, kind: DatasetKind) -> Option<&DatasetMetrics> {
        self.metrics.get(&kind)
    }

    /// The dataset kinds present, in ingestion order.
    pub fn kinds(&self) -> impl Iterator<Item = DatasetKind> + '_ {
        self.records.keys().copied()
    }

    /// Total record count across all datasets.
    pub fn total_records(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

/// Parses a set of in-memory CSV sources through the background worker.
///
/// One request is submitted per source and exactly one reply collected per
/// request. Replies may arrive in any order; correlation ids keep the
/// bookkeeping straight.
pub fn ingest_sources(
    sources: Vec<(DatasetKind, String)>,
) -> Result<DatasetCollection, SkillGraphError> {
    let mut worker = ParseWorker::spawn();
    let mut pending = 0usize;

    for (kind, csv_text) in sources {
        worker.submit(kind, csv_text)?;
        pending += 1;
    }

    let mut collection = DatasetCollection::new();
    for _ in 0..pending {
        let reply = worker.recv()?;
        collection.insert(reply.payload)?;
    }

    info!(
        datasets = collection.kinds().count(),
        records = collection.total_records();
        "Ingested taxonomy export"
    );

    Ok(collection)
}

/// Reads the conventional CSV files of a taxonomy export directory.
///
/// Missing files are skipped with a warning so callers can proceed with
/// partial data; a directory containing none of the known files is an error.
pub fn read_export_dir(dir: &Path) -> Result<Vec<(DatasetKind, String)>, SkillGraphError> {
    let mut sources = Vec::new();

    for kind in DatasetKind::all() {
        let path = dir.join(kind.file_name());
        if !path.exists() {
            warn!(
                path = path.display().to_string();
                "Dataset file missing, proceeding without it"
            );
            continue;
        }
        let csv_text = fs::read_to_string(&path)?;
        sources.push((kind, csv_text));
    }

    if sources.is_empty() {
        return Err(SkillGraphError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no dataset files found in {}", dir.display()),
        )));
    }

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_failure_payload_is_an_error() {
        let mut collection = DatasetCollection::new();
        let payload = DatasetPayload::failure(DatasetKind::Skills, "broken header");

        let err = collection.insert(payload).unwrap_err();
        assert!(matches!(
            err,
            SkillGraphError::Dataset {
                kind: DatasetKind::Skills,
                ..
            }
        ));
        assert!(collection.records(DatasetKind::Skills).is_empty());
    }

    #[test]
    fn test_absent_datasets_read_as_empty() {
        let collection = DatasetCollection::new();
        assert!(collection.records(DatasetKind::Occupations).is_empty());
        assert_eq!(collection.total_records(), 0);
        assert_eq!(collection.kinds().count(), 0);
    }

    #[test]
    fn test_ingest_sources_end_to_end() {
        let sources = vec![
            (
                DatasetKind::Occupations,
                "ID,PREFERREDLABEL\nocc1,Welder\n".to_string(),
            ),
            (
                DatasetKind::Skills,
                "ID,PREFERREDLABEL\nsk1,welding\nsk2,brazing\n".to_string(),
            ),
        ];

        let collection = ingest_sources(sources).unwrap();
        assert_eq!(collection.records(DatasetKind::Occupations).len(), 1);
        assert_eq!(collection.records(DatasetKind::Skills).len(), 2);
        assert_eq!(collection.total_records(), 3);
        assert_eq!(
            collection
                .metrics(DatasetKind::Skills)
                .map(|m| m.rows_kept()),
            Some(2)
        );
    }
}
