mod config;
mod patch;
mod service;
mod store;
mod validation;
mod villa;

pub use config::Config;
pub use patch::{apply as apply_patch, op_name, PatchError};
pub use service::{
    location_for, Created, Reply, ResultKind, ServiceError, VillaRequest, VillaService,
    VILLA_ROUTE,
};
pub use store::{
    InMemoryPersistence, JsonFilePersistence, Persistence, StoreError, VillaStore, VillaTable,
};
pub use validation::{
    validate_for_create, validate_for_update, FieldError, ValidationErrors, DETAILS_MAX_CHARS,
    IMAGE_URL_MAX_CHARS, NAME_MAX_CHARS,
};
pub use villa::{seed_villas, Villa, MUTABLE_FIELDS, READ_ONLY_FIELDS};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
pub use service::http;

// Re-export the patch document types so callers don't need a direct dependency
pub use json_patch::{Patch, PatchOperation};
