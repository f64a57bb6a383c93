//! Backup export and import.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::io::snapshot::{self, SnapshotError};
use crate::io::storage::atomic_write;
use crate::model::event::TimelineData;

/// Error type for export/import
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not a timeline backup: {source}")]
    InvalidBackup {
        path: PathBuf,
        source: SnapshotError,
    },
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// `vertiline-backup-YYYY-MM-DD.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("vertiline-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Write the document into `dir` under today's backup name.
/// Returns the path written.
pub fn export_to(dir: &Path, doc: &TimelineData) -> Result<PathBuf, TransferError> {
    let path = dir.join(export_file_name(Local::now().date_naive()));
    let text = snapshot::serialize(doc)?;
    fs::create_dir_all(dir).map_err(|e| TransferError::WriteError {
        path: dir.to_path_buf(),
        source: e,
    })?;
    atomic_write(&path, text.as_bytes()).map_err(|e| TransferError::WriteError {
        path: path.clone(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "timeline exported");
    Ok(path)
}

/// Read and validate a backup file. Nothing is replaced here; the caller
/// swaps the document in only on success.
pub fn import_from(path: &Path) -> Result<TimelineData, TransferError> {
    let text = fs::read_to_string(path).map_err(|e| TransferError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    snapshot::deserialize(&text).map_err(|e| TransferError::InvalidBackup {
        path: path.to_path_buf(),
        source: e,
    })
}
