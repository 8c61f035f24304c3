//! Persisted handoff slot between the upload flow and the dashboard.
//!
//! The slot is a single JSON file in the store directory. [`HandoffStore`] is
//! the only writer and is owned by the upload flow; everything else reads
//! through a cloneable [`HandoffReader`]. Writes go to a temp file first and
//! are renamed into place, so a reader never observes a half-written slot.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config;
use crate::error::StoreError;
use crate::models::UploadResult;

type StoreResult<T> = std::result::Result<T, StoreError>;

fn slot_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}.json", config::HANDOFF_SLOT))
}

/// Read the slot. A slot that cannot be parsed is reported, never touched.
fn read_slot(path: &Path) -> StoreResult<Option<UploadResult>> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_str(&contents) {
        Ok(value) => Ok(Some(UploadResult(value))),
        Err(e) => {
            warn!("Corrupt handoff slot {}: {}", path.display(), e);
            Err(StoreError::Corrupt {
                slot: config::HANDOFF_SLOT.to_string(),
                message: e.to_string(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// HandoffStore
// ---------------------------------------------------------------------------

/// Single-owner store for the last upload result.
#[derive(Debug)]
pub struct HandoffStore {
    dir: PathBuf,
}

impl HandoffStore {
    /// Open the store in `dir`, or the platform default when `None`.
    ///
    /// Creates the directory if it does not exist.
    pub fn open(dir: Option<PathBuf>) -> StoreResult<Self> {
        let dir = dir.unwrap_or_else(config::default_store_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read-only accessor for views that consume the slot on mount.
    pub fn reader(&self) -> HandoffReader {
        HandoffReader {
            path: slot_path(&self.dir),
        }
    }

    pub fn read(&self) -> StoreResult<Option<UploadResult>> {
        read_slot(&slot_path(&self.dir))
    }

    /// Replace the slot with `result`, atomically.
    ///
    /// Only the upload flow calls this, once per successful upload.
    pub(crate) fn write(&self, result: &UploadResult) -> StoreResult<()> {
        let dest = slot_path(&self.dir);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer(&mut tmp, result.as_value())?;
        tmp.flush()?;
        tmp.persist(&dest).map_err(|e| StoreError::Io(e.error))?;
        debug!("Handoff slot written to {}", dest.display());
        Ok(())
    }

    /// Drop the stored result, as clearing session storage would.
    pub fn clear(&self) -> StoreResult<()> {
        match fs::remove_file(slot_path(&self.dir)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the slot if it cannot be parsed. Returns whether it was removed.
    pub fn clear_if_corrupt(&self) -> StoreResult<bool> {
        match self.read() {
            Err(StoreError::Corrupt { .. }) => {
                self.clear()?;
                debug!("Removed corrupt handoff slot in {}", self.dir.display());
                Ok(true)
            }
            Err(e) => Err(e),
            Ok(_) => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------------
// HandoffReader
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HandoffReader {
    path: PathBuf,
}

impl HandoffReader {
    pub fn read(&self) -> StoreResult<Option<UploadResult>> {
        read_slot(&self.path)
    }
}
