//! Villa service - the six resource operations over a `VillaStore`.
//!
//! Every operation runs its checks in a fixed order and terminates in
//! exactly one `ResultKind`. Mutations validate against the table inside
//! the store's write section, then commit; nothing is persisted before it
//! has been validated.

use json_patch::Patch;
use tracing::{error, info, warn};

use super::error::ServiceError;
use crate::patch::{apply as apply_patch, op_name};
use crate::store::VillaStore;
use crate::validation::{validate_for_create, validate_for_update};
use crate::villa::Villa;

/// Route prefix that `location` references point at.
pub const VILLA_ROUTE: &str = "/api/VillaAPI";

/// Location reference for the villa `id`.
pub fn location_for(id: i64) -> String {
    format!("{}/{}", VILLA_ROUTE, id)
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq)]
pub struct Created {
    pub villa: Villa,
    /// Where the new villa can be fetched with `get`.
    pub location: String,
}

/// Resource service over a villa store.
#[derive(Debug, Clone, Default)]
pub struct VillaService {
    store: VillaStore,
}

impl VillaService {
    pub fn new(store: VillaStore) -> Self {
        Self { store }
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &VillaStore {
        &self.store
    }

    pub fn list(&self) -> Result<Vec<Villa>, ServiceError> {
        info!("getting all villas");
        self.store.list().map_err(|e| internal("list", e.into()))
    }

    pub fn get(&self, id: i64) -> Result<Villa, ServiceError> {
        require_positive_id("get", id)?;
        match self.store.get(id) {
            Ok(Some(villa)) => Ok(villa),
            Ok(None) => {
                warn!(villa_id = id, "get: villa not found");
                Err(ServiceError::NotFound(id))
            }
            Err(e) => Err(internal("get", e.into())),
        }
    }

    pub fn create(&self, villa: Option<Villa>) -> Result<Created, ServiceError> {
        let villa = villa.ok_or_else(|| rejected("create", "request body is required"))?;
        if villa.id > 0 {
            error!(villa_id = villa.id, "create: client supplied an id");
            return Err(ServiceError::Internal(format!(
                "villa id must not be set on create (got {})",
                villa.id
            )));
        }
        if villa.id < 0 {
            return Err(rejected("create", "villa id must be 0 or absent"));
        }

        let result = self.store.write(|table| {
            validate_for_create(table.records(), &villa).into_result()?;
            Ok::<_, ServiceError>(table.insert(villa)?)
        });

        match result {
            Ok(villa) => {
                info!(villa_id = villa.id, name = %villa.name, "created villa");
                Ok(Created {
                    location: location_for(villa.id),
                    villa,
                })
            }
            Err(e) => Err(log_failure("create", e)),
        }
    }

    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        require_positive_id("delete", id)?;
        match self.store.remove(id) {
            Ok(villa) => {
                info!(villa_id = id, name = %villa.name, "deleted villa");
                Ok(())
            }
            Err(e) => Err(log_failure("delete", e.into())),
        }
    }

    pub fn replace(&self, id: i64, villa: Option<Villa>) -> Result<(), ServiceError> {
        let villa = villa.ok_or_else(|| rejected("replace", "request body is required"))?;
        if villa.id != id {
            return Err(rejected(
                "replace",
                format!("route id {} does not match villa id {}", id, villa.id),
            ));
        }
        require_positive_id("replace", id)?;

        let result = self.store.write(|table| {
            if table.get(id).is_none() {
                return Err(ServiceError::NotFound(id));
            }
            validate_for_update(table.records(), id, &villa).into_result()?;
            table.replace(id, villa)?;
            Ok::<_, ServiceError>(())
        });

        match result {
            Ok(()) => {
                info!(villa_id = id, "replaced villa");
                Ok(())
            }
            Err(e) => Err(log_failure("replace", e)),
        }
    }

    pub fn patch(&self, id: i64, patch: Option<Patch>) -> Result<(), ServiceError> {
        let patch = patch.ok_or_else(|| rejected("patch", "patch document is required"))?;
        require_positive_id("patch", id)?;

        let result = self.store.write(|table| {
            let current = table.get(id).cloned().ok_or(ServiceError::NotFound(id))?;
            let candidate = apply_patch(&current, &patch)?;
            validate_for_update(table.records(), id, &candidate).into_result()?;
            table.replace(id, candidate)?;
            Ok::<_, ServiceError>(())
        });

        match result {
            Ok(()) => {
                let ops: Vec<&str> = patch.0.iter().map(op_name).collect();
                info!(villa_id = id, ?ops, "patched villa");
                Ok(())
            }
            Err(e) => Err(log_failure("patch", e)),
        }
    }
}

fn require_positive_id(operation: &str, id: i64) -> Result<(), ServiceError> {
    if id <= 0 {
        return Err(rejected(
            operation,
            format!("id must be a positive integer (got {})", id),
        ));
    }
    Ok(())
}

fn rejected(operation: &str, message: impl Into<String>) -> ServiceError {
    let err = ServiceError::bad_request(message);
    warn!(operation, error = %err, "request rejected");
    err
}

fn internal(operation: &str, err: ServiceError) -> ServiceError {
    error!(operation, error = %err, "villa store failure");
    err
}

fn log_failure(operation: &str, err: ServiceError) -> ServiceError {
    match &err {
        ServiceError::Internal(_) => error!(operation, error = %err, "operation failed"),
        _ => warn!(operation, error = %err, "operation rejected"),
    }
    err
}
