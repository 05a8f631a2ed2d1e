//! VillaTable - the ordered record collection and its primitive mutations.

use chrono::Utc;

use super::StoreError;
use crate::villa::Villa;

/// Insertion-ordered villa records with unique positive ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VillaTable {
    villas: Vec<Villa>,
}

impl VillaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from persisted records, checking the id invariants.
    pub fn from_records(villas: Vec<Villa>) -> Result<Self, StoreError> {
        let mut seen = std::collections::HashSet::with_capacity(villas.len());
        for villa in &villas {
            if villa.id <= 0 {
                return Err(StoreError::Corrupt(format!(
                    "record '{}' has non-positive id {}",
                    villa.name, villa.id
                )));
            }
            if !seen.insert(villa.id) {
                return Err(StoreError::Corrupt(format!("duplicate id {}", villa.id)));
            }
        }
        Ok(Self { villas })
    }

    pub fn records(&self) -> &[Villa] {
        &self.villas
    }

    pub fn len(&self) -> usize {
        self.villas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.villas.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Villa> {
        self.villas.iter().find(|v| v.id == id)
    }

    /// Max existing id + 1, or 1 when empty.
    pub fn next_id(&self) -> Result<i64, StoreError> {
        let max = self.villas.iter().map(|v| v.id).max().unwrap_or(0);
        max.checked_add(1).ok_or(StoreError::IdExhausted)
    }

    /// Assign the next id, stamp both dates, and append.
    ///
    /// Names are stored trimmed, matching the uniqueness key.
    pub fn insert(&mut self, mut villa: Villa) -> Result<Villa, StoreError> {
        if villa.id > 0 {
            return Err(StoreError::InvalidState(villa.id));
        }
        let now = Utc::now();
        villa.id = self.next_id()?;
        villa.name = villa.name.trim().to_string();
        villa.created_date = Some(now);
        villa.updated_date = Some(now);
        self.villas.push(villa.clone());
        Ok(villa)
    }

    pub fn remove(&mut self, id: i64) -> Result<Villa, StoreError> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        Ok(self.villas.remove(index))
    }

    /// Overwrite every mutable field of the record at `id`.
    ///
    /// `created_date` is carried over from the stored record.
    pub fn replace(&mut self, id: i64, mut villa: Villa) -> Result<Villa, StoreError> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        if villa.id != id {
            return Err(StoreError::IdentityMismatch {
                expected: id,
                actual: villa.id,
            });
        }
        villa.name = villa.name.trim().to_string();
        villa.created_date = self.villas[index].created_date;
        villa.updated_date = Some(Utc::now());
        self.villas[index] = villa.clone();
        Ok(villa)
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.villas.iter().position(|v| v.id == id)
    }
}
