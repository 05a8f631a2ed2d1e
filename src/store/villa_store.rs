//! VillaStore - shared, lock-guarded handle over a `VillaTable`.

use std::sync::{Arc, RwLock};

use tracing::debug;

use super::{InMemoryPersistence, Persistence, StoreError, VillaTable};
use crate::villa::Villa;

/// The process-wide villa store. Clone-friendly via Arc.
///
/// Writers hold the exclusive lock for check + mutation + commit; readers
/// hold the shared lock and clone records out.
#[derive(Clone)]
pub struct VillaStore {
    table: Arc<RwLock<VillaTable>>,
    persistence: Arc<dyn Persistence>,
}

impl Default for VillaStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for VillaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VillaStore").finish_non_exhaustive()
    }
}

impl VillaStore {
    /// Create an empty store with no durable backing.
    pub fn in_memory() -> Self {
        Self {
            table: Arc::new(RwLock::new(VillaTable::new())),
            persistence: Arc::new(InMemoryPersistence),
        }
    }

    /// Open a store over a persistence provider, loading its last commit.
    pub fn open<P: Persistence + 'static>(persistence: P) -> Result<Self, StoreError> {
        let table = VillaTable::from_records(persistence.load()?)?;
        debug!(villas = table.len(), "opened villa store");
        Ok(Self {
            table: Arc::new(RwLock::new(table)),
            persistence: Arc::new(persistence),
        })
    }

    /// Insert `villas` if the store is empty. Returns how many were added.
    pub fn seed(&self, villas: Vec<Villa>) -> Result<usize, StoreError> {
        self.write(|table| {
            if !table.is_empty() {
                return Ok(0);
            }
            let count = villas.len();
            for villa in villas {
                table.insert(villa)?;
            }
            Ok(count)
        })
    }

    /// Run `f` against the canonical table under the shared lock.
    pub fn read<T>(&self, f: impl FnOnce(&VillaTable) -> T) -> Result<T, StoreError> {
        let table = self
            .table
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(f(&table))
    }

    /// Run `f` against a working copy of the table under the exclusive lock.
    ///
    /// When `f` succeeds the working copy is committed through the
    /// persistence provider and swapped in. When `f` or the commit fails,
    /// the canonical table is left as it was.
    pub fn write<T, E>(&self, f: impl FnOnce(&mut VillaTable) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut table = self
            .table
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;

        let mut working = table.clone();
        let value = f(&mut working)?;

        if working != *table {
            self.persistence.commit(working.records())?;
            *table = working;
        }
        Ok(value)
    }

    pub fn list(&self) -> Result<Vec<Villa>, StoreError> {
        self.read(|table| table.records().to_vec())
    }

    pub fn get(&self, id: i64) -> Result<Option<Villa>, StoreError> {
        self.read(|table| table.get(id).cloned())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        self.read(|table| table.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.read(|table| table.is_empty())
    }

    pub fn insert(&self, villa: Villa) -> Result<Villa, StoreError> {
        self.write(|table| table.insert(villa))
    }

    pub fn remove(&self, id: i64) -> Result<Villa, StoreError> {
        self.write(|table| table.remove(id))
    }

    pub fn replace(&self, id: i64, villa: Villa) -> Result<Villa, StoreError> {
        self.write(|table| table.replace(id, villa))
    }
}
