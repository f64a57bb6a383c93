use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::io::remote;
use crate::io::snapshot::{self, SnapshotError};
use crate::model::event::{TimelineData, TimelineMeta};

/// Error type for the stored document
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("stored document {path} is unreadable: {source}")]
    Corrupt {
        path: PathBuf,
        source: SnapshotError,
    },
    #[error("not overwriting {path}: {source}; fix or move the file, or use `vl import`/`vl clear`")]
    Unreadable {
        path: PathBuf,
        source: Box<StorageError>,
    },
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// How a write treats an already-stored document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Never replace stored events with an empty event list
    Guarded,
    /// Write unconditionally (explicit clear)
    Force,
}

/// Where the startup document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource {
    Stored,
    Fetched,
    Empty,
}

/// The persisted document, one JSON file named after the storage key.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(data_dir: &Path, key: &str) -> Self {
        Storage {
            path: data_dir.join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored document. `Ok(None)` when nothing has been stored yet.
    pub fn load(&self) -> Result<Option<TimelineData>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path).map_err(|e| StorageError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        snapshot::deserialize(&text)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                path: self.path.clone(),
                source: e,
            })
    }

    /// Write the document. Returns `false` if a guarded write was skipped
    /// because it would replace stored events with none.
    ///
    /// A guarded write over a stored file that cannot be read fails with
    /// [`StorageError::Unreadable`] and leaves the file alone.
    pub fn save(&self, doc: &TimelineData, policy: WritePolicy) -> Result<bool, StorageError> {
        if policy == WritePolicy::Guarded && !self.guarded_write_allowed(doc)? {
            tracing::debug!(path = %self.path.display(), "skipped writing empty timeline over stored events");
            return Ok(false);
        }
        let text = snapshot::serialize(doc)?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| StorageError::WriteError {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        atomic_write(&self.path, text.as_bytes()).map_err(|e| StorageError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %self.path.display(), events = doc.event_count(), "timeline stored");
        Ok(true)
    }

    fn guarded_write_allowed(&self, doc: &TimelineData) -> Result<bool, StorageError> {
        match self.load() {
            Ok(Some(stored)) => Ok(!(doc.events.is_empty() && !stored.events.is_empty())),
            Ok(None) => Ok(true),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "not overwriting unreadable timeline");
                Err(StorageError::Unreadable {
                    path: self.path.clone(),
                    source: Box::new(e),
                })
            }
        }
    }
}

/// Startup document: the stored one, else the default fetched from
/// `default_url`, else an empty document with `meta`.
pub fn load_document(
    storage: &Storage,
    default_url: Option<&str>,
    meta: TimelineMeta,
) -> (TimelineData, DocumentSource) {
    match storage.load() {
        Ok(Some(doc)) => return (doc, DocumentSource::Stored),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "failed to load stored timeline"),
    }

    if let Some(url) = default_url {
        match remote::fetch_default(url) {
            Ok(doc) => return (doc, DocumentSource::Fetched),
            Err(e) => tracing::warn!(url, error = %e, "failed to load default timeline"),
        }
    }

    (TimelineData::empty(meta), DocumentSource::Empty)
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
