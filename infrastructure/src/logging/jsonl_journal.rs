//! JSONL file journal for writes the voting chain gave up on.
//!
//! Each [`PendingWrite`] is serialized as one JSON line and appended to the
//! file, so entries from earlier runs survive until they are replayed.

use booklub_application::ports::reconciliation::{PendingWrite, ReconciliationJournal};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors reading a journal back
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Failed to read journal {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed journal entry at {path}:{line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Append-only JSONL reconciliation journal.
///
/// Thread-safe via `Mutex<BufWriter<File>>`; every entry is flushed as soon
/// as it is written.
pub struct JsonlReconciliationJournal {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlReconciliationJournal {
    /// Open (or create) the journal at `path`, creating parent directories.
    ///
    /// Returns `None` if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create journal directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open journal {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry of the journal at `path`, oldest first.
    ///
    /// A missing file is an empty journal.
    pub fn read_entries(path: impl AsRef<Path>) -> Result<Vec<PendingWrite>, JournalError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(JournalError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| JournalError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|source| JournalError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }
}

impl ReconciliationJournal for JsonlReconciliationJournal {
    fn record(&self, entry: PendingWrite) {
        let line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not serialize journal entry {}: {}", entry.key, e);
                return;
            }
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                warn!("Could not write journal entry {}: {}", entry.key, e);
                return;
            }
            debug!("Journaled pending {} {}", entry.kind.as_str(), entry.key);
        }
    }
}

impl Drop for JsonlReconciliationJournal {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
