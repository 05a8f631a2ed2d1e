//! Patch engine - JSON Patch (RFC 6902) applied to a detached Villa copy.
//!
//! Only the Villa's top-level mutable fields are addressable. A patch is
//! checked in full before anything is applied, then applied in order to a
//! JSON copy of the record; a failing `test` aborts the whole patch. The
//! engine never sees the store: callers validate and commit the candidate.
//!
//! ## Example
//!
//! ```ignore
//! use villa_api::apply_patch;
//! use serde_json::json;
//!
//! let ops: json_patch::Patch = serde_json::from_value(json!([
//!     { "op": "test", "path": "/sqft", "value": 500 },
//!     { "op": "replace", "path": "/sqft", "value": 600 }
//! ]))?;
//! let candidate = apply_patch(&villa, &ops)?;
//! assert_eq!(candidate.sqft, 600);
//! ```

use json_patch::{Patch, PatchErrorKind, PatchOperation};
use serde_json::Value;
use thiserror::Error;

use crate::validation::FieldError;
use crate::villa::{Villa, MUTABLE_FIELDS, READ_ONLY_FIELDS};

/// Error type for patch application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// The operation addresses something other than a mutable top-level field.
    #[error("invalid patch target '{path}': {reason}")]
    InvalidPatchTarget { path: String, reason: String },
    /// A `test` operation did not match.
    #[error("test failed at '{path}'")]
    PatchTestFailed { path: String },
    /// The patched document no longer fits the Villa shape.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
    /// Any other failure reported while applying an operation.
    #[error("patch failed at '{path}': {message}")]
    Failed { path: String, message: String },
}

impl PatchError {
    /// The field this error is reported against.
    pub fn field(&self) -> &str {
        match self {
            PatchError::InvalidPatchTarget { path, .. }
            | PatchError::PatchTestFailed { path }
            | PatchError::Failed { path, .. } => path.strip_prefix('/').unwrap_or(path),
            PatchError::InvalidValue { field, .. } => field,
        }
    }

    pub fn to_field_error(&self) -> FieldError {
        FieldError::new(self.field(), self.to_string())
    }
}

/// Apply `patch` to a copy of `villa` and return the candidate.
///
/// `villa` itself is never modified.
pub fn apply(villa: &Villa, patch: &Patch) -> Result<Villa, PatchError> {
    for op in patch.0.iter() {
        check_targets(op)?;
    }

    let mut doc = serde_json::to_value(villa).map_err(|e| PatchError::Failed {
        path: String::new(),
        message: e.to_string(),
    })?;

    json_patch::patch(&mut doc, &patch.0).map_err(|e| {
        let path = patch
            .0
            .get(e.operation)
            .map(|op| target(op).to_string())
            .unwrap_or_default();
        match e.kind {
            PatchErrorKind::TestFailed => PatchError::PatchTestFailed { path },
            _ => PatchError::Failed {
                path,
                message: e.to_string(),
            },
        }
    })?;

    let candidate = decode(doc)?;
    Ok(Villa {
        id: villa.id,
        created_date: villa.created_date,
        updated_date: villa.updated_date,
        ..candidate
    })
}

/// Operation name as it appears on the wire.
pub fn op_name(op: &PatchOperation) -> &'static str {
    match op {
        PatchOperation::Add(_) => "add",
        PatchOperation::Remove(_) => "remove",
        PatchOperation::Replace(_) => "replace",
        PatchOperation::Move(_) => "move",
        PatchOperation::Copy(_) => "copy",
        PatchOperation::Test(_) => "test",
    }
}

fn target(op: &PatchOperation) -> String {
    match op {
        PatchOperation::Add(o) => o.path.to_string(),
        PatchOperation::Remove(o) => o.path.to_string(),
        PatchOperation::Replace(o) => o.path.to_string(),
        PatchOperation::Move(o) => o.path.to_string(),
        PatchOperation::Copy(o) => o.path.to_string(),
        PatchOperation::Test(o) => o.path.to_string(),
    }
}

fn source(op: &PatchOperation) -> Option<String> {
    match op {
        PatchOperation::Move(o) => Some(o.from.to_string()),
        PatchOperation::Copy(o) => Some(o.from.to_string()),
        _ => None,
    }
}

fn check_targets(op: &PatchOperation) -> Result<(), PatchError> {
    // `test` may read any field, including read-only ones.
    let read_only_ok = matches!(op, PatchOperation::Test(_));
    check_pointer(&target(op), read_only_ok)?;
    if let Some(from) = source(op) {
        // `copy` only reads its source; `move` also removes it.
        check_pointer(&from, matches!(op, PatchOperation::Copy(_)))?;
    }
    Ok(())
}

fn check_pointer(path: &str, read_only_ok: bool) -> Result<(), PatchError> {
    let invalid = |reason: &str| PatchError::InvalidPatchTarget {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let field = path
        .strip_prefix('/')
        .ok_or_else(|| invalid("the whole record cannot be patched"))?;
    if field.contains('/') {
        return Err(invalid("only top-level fields can be patched"));
    }
    if MUTABLE_FIELDS.contains(&field) {
        return Ok(());
    }
    if READ_ONLY_FIELDS.contains(&field) {
        if read_only_ok {
            return Ok(());
        }
        return Err(invalid("field is read-only"));
    }
    Err(invalid("unknown field"))
}

fn decode(doc: Value) -> Result<Villa, PatchError> {
    match serde_json::from_value::<Villa>(doc.clone()) {
        Ok(villa) => Ok(villa),
        Err(err) => Err(blame_field(&doc).unwrap_or_else(|| PatchError::InvalidValue {
            field: String::new(),
            message: err.to_string(),
        })),
    }
}

/// Find the first mutable field whose value does not decode on its own.
fn blame_field(doc: &Value) -> Option<PatchError> {
    let object = doc.as_object()?;
    MUTABLE_FIELDS.iter().find_map(|field| {
        let value = object.get(*field)?;
        let mut single = serde_json::Map::new();
        single.insert((*field).to_string(), value.clone());
        serde_json::from_value::<Villa>(Value::Object(single))
            .err()
            .map(|err| PatchError::InvalidValue {
                field: (*field).to_string(),
                message: err.to_string(),
            })
    })
}
