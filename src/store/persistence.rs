//! Persistence providers - where committed tables end up.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::StoreError;
use crate::villa::Villa;

/// Durable backing for a `VillaStore`.
///
/// `commit` receives the complete table after every mutation. It must be
/// all-or-nothing: if it returns an error, a later `load` sees the previous
/// commit.
pub trait Persistence: Send + Sync {
    /// Load the last committed table. A fresh provider loads empty.
    fn load(&self) -> Result<Vec<Villa>, StoreError>;

    /// Durably persist the table.
    fn commit(&self, villas: &[Villa]) -> Result<(), StoreError>;
}

/// No-op provider: the table lives only as long as the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryPersistence;

impl Persistence for InMemoryPersistence {
    fn load(&self) -> Result<Vec<Villa>, StoreError> {
        Ok(Vec::new())
    }

    fn commit(&self, _villas: &[Villa]) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Stores the table as a pretty-printed JSON array.
///
/// Each commit writes a temp file next to the target and renames it over
/// the target, so readers of the file never see a partial write.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self) -> Result<Vec<Villa>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            StoreError::Persistence(format!("read {}: {}", self.path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            StoreError::Persistence(format!("parse {}: {}", self.path.display(), e))
        })
    }

    fn commit(&self, villas: &[Villa]) -> Result<(), StoreError> {
        let dir = self.dir();
        fs::create_dir_all(dir)
            .map_err(|e| StoreError::Persistence(format!("create {}: {}", dir.display(), e)))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| StoreError::Persistence(format!("temp file: {}", e)))?;
        serde_json::to_writer_pretty(&mut tmp, villas)
            .map_err(|e| StoreError::Persistence(format!("encode: {}", e)))?;
        tmp.write_all(b"\n")
            .and_then(|_| tmp.flush())
            .map_err(|e| StoreError::Persistence(format!("write: {}", e)))?;

        tmp.persist(&self.path).map_err(|e| {
            StoreError::Persistence(format!("rename to {}: {}", self.path.display(), e.error))
        })?;
        Ok(())
    }
}
