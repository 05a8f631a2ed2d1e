//! Framework-agnostic request/reply types for villa service dispatch.
//!
//! These types bridge a transport (axum, a CLI, a test harness) and the
//! `VillaService`. The transport builds a `VillaRequest`, calls
//! `VillaService::dispatch`, and renders the `Reply`.

use json_patch::Patch;
use serde::Serialize;
use serde_json::{json, Value};

use super::error::{ResultKind, ServiceError};
use super::villa_service::{Created, VillaService};
use crate::villa::Villa;

/// One inbound operation.
#[derive(Debug, Clone)]
pub enum VillaRequest {
    List,
    Get { id: i64 },
    Create { villa: Option<Villa> },
    Delete { id: i64 },
    Replace { id: i64, villa: Option<Villa> },
    Patch { id: i64, patch: Option<Patch> },
}

/// The rendered outcome of one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub kind: ResultKind,
    /// HTTP-style status code.
    pub status: u16,
    /// Response body; `None` for NoContent.
    pub body: Option<Value>,
    /// Location reference, set only for Created.
    pub location: Option<String>,
}

impl Reply {
    fn new(kind: ResultKind, body: Option<Value>, location: Option<String>) -> Self {
        Self {
            kind,
            status: kind.status_code(),
            body,
            location,
        }
    }

    /// Build an Ok (200) reply carrying `payload`.
    pub fn ok<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(body) => Self::new(ResultKind::Ok, Some(body), None),
            Err(e) => Self::from_error(ServiceError::Internal(e.to_string())),
        }
    }

    /// Build a Created (201) reply with the stored villa and its location.
    pub fn created(created: Created) -> Self {
        match serde_json::to_value(&created.villa) {
            Ok(body) => Self::new(ResultKind::Created, Some(body), Some(created.location)),
            Err(e) => Self::from_error(ServiceError::Internal(e.to_string())),
        }
    }

    pub fn no_content() -> Self {
        Self::new(ResultKind::NoContent, None, None)
    }

    /// Build an error reply. Field-level failures are listed under `errors`.
    pub fn from_error(err: ServiceError) -> Self {
        let body = match err.field_errors() {
            Some(errors) => json!({ "error": err.to_string(), "errors": errors }),
            None => json!({ "error": err.to_string() }),
        };
        Self::new(err.kind(), Some(body), None)
    }
}

impl From<ServiceError> for Reply {
    fn from(err: ServiceError) -> Self {
        Self::from_error(err)
    }
}

impl VillaService {
    /// Run one request and render its outcome.
    pub fn dispatch(&self, request: VillaRequest) -> Reply {
        let outcome = match request {
            VillaRequest::List => self.list().map(|villas| Reply::ok(&villas)),
            VillaRequest::Get { id } => self.get(id).map(|villa| Reply::ok(&villa)),
            VillaRequest::Create { villa } => self.create(villa).map(Reply::created),
            VillaRequest::Delete { id } => self.delete(id).map(|()| Reply::no_content()),
            VillaRequest::Replace { id, villa } => {
                self.replace(id, villa).map(|()| Reply::no_content())
            }
            VillaRequest::Patch { id, patch } => {
                self.patch(id, patch).map(|()| Reply::no_content())
            }
        };
        outcome.unwrap_or_else(Reply::from_error)
    }
}
