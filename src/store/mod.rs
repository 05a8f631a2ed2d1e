//! Store - the exclusive owner of canonical Villa records.
//!
//! `VillaStore` keeps the table in memory behind an `RwLock` and commits
//! every mutation through a [`Persistence`] provider before it becomes
//! visible. Records handed in or out are always detached clones.
//!
//! ## Example
//!
//! ```ignore
//! use villa_api::{Villa, VillaStore};
//!
//! let store = VillaStore::in_memory();
//! let saved = store.insert(Villa::new("Pine View", 100.0, 800, 3))?;
//! assert_eq!(saved.id, 1);
//!
//! // Check + mutate as one critical section
//! store.write(|table| {
//!     let next = table.next_id()?;
//!     // ...
//!     Ok::<_, villa_api::StoreError>(next)
//! })?;
//! ```

mod persistence;
mod table;
mod villa_store;

use thiserror::Error;

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record presented for insertion already carries an id.
    #[error("villa already has id {0}; ids are assigned by the store")]
    InvalidState(i64),
    /// No record with this id.
    #[error("villa {0} not found")]
    NotFound(i64),
    /// The record's id does not match the id it is stored under.
    #[error("identity mismatch: expected id {expected}, got {actual}")]
    IdentityMismatch { expected: i64, actual: i64 },
    /// The highest stored id leaves no room for another.
    #[error("villa ids exhausted")]
    IdExhausted,
    /// Loaded data breaks a table invariant.
    #[error("corrupt villa table: {0}")]
    Corrupt(String),
    /// A thread panicked while holding the table lock.
    #[error("villa store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// The persistence provider failed to load or commit.
    #[error("persistence error: {0}")]
    Persistence(String),
}

pub use persistence::{InMemoryPersistence, JsonFilePersistence, Persistence};
pub use table::VillaTable;
pub use villa_store::VillaStore;
