//! Error types and result kinds for the villa service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::patch::PatchError;
use crate::store::StoreError;
use crate::validation::ValidationErrors;

/// The fixed set of outcomes every service operation terminates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    Ok,
    Created,
    NoContent,
    BadRequest,
    NotFound,
    InternalError,
}

impl ResultKind {
    /// HTTP-style status code for this outcome.
    pub fn status_code(self) -> u16 {
        match self {
            ResultKind::Ok => 200,
            ResultKind::Created => 201,
            ResultKind::NoContent => 204,
            ResultKind::BadRequest => 400,
            ResultKind::NotFound => 404,
            ResultKind::InternalError => 500,
        }
    }
}

/// Error type for villa service operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// Malformed or semantically invalid input. `errors` carries the
    /// field-level failures when there are any.
    #[error("bad request: {message}")]
    BadRequest {
        message: String,
        errors: ValidationErrors,
    },
    /// No villa with this id.
    #[error("villa {0} not found")]
    NotFound(i64),
    /// Invariant violation or store fault.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ServiceError::BadRequest {
            message: message.into(),
            errors: ValidationErrors::new(),
        }
    }

    pub fn kind(&self) -> ResultKind {
        match self {
            ServiceError::BadRequest { .. } => ResultKind::BadRequest,
            ServiceError::NotFound(_) => ResultKind::NotFound,
            ServiceError::Internal(_) => ResultKind::InternalError,
        }
    }

    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Field-level failures, empty unless this is a validation rejection.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ServiceError::BadRequest { errors, .. } if !errors.is_empty() => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::BadRequest {
            message: "validation failed".into(),
            errors,
        }
    }
}

impl From<PatchError> for ServiceError {
    fn from(err: PatchError) -> Self {
        ServiceError::BadRequest {
            message: err.to_string(),
            errors: err.to_field_error().into(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            StoreError::IdentityMismatch { .. } => ServiceError::bad_request(err.to_string()),
            StoreError::InvalidState(_)
            | StoreError::IdExhausted
            | StoreError::Corrupt(_)
            | StoreError::LockPoisoned(_)
            | StoreError::Persistence(_) => ServiceError::Internal(err.to_string()),
        }
    }
}
