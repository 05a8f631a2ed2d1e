//! Villa Service - the resource operations and their outcome taxonomy.
//!
//! `VillaService` composes the store, validation and patch engine into
//! list, get, create, delete, replace and patch. Each operation returns a
//! typed `Result`; `dispatch` renders any of them into a `Reply` carrying
//! one of the fixed `ResultKind`s.
//!
//! ## Quick Start
//!
//! ```ignore
//! use villa_api::{Villa, VillaRequest, VillaService, VillaStore};
//!
//! let service = VillaService::new(VillaStore::in_memory());
//!
//! let created = service.create(Some(Villa::new("Pine View", 100.0, 800, 3)))?;
//! assert_eq!(created.location, "/api/VillaAPI/1");
//!
//! let reply = service.dispatch(VillaRequest::Get { id: 1 });
//! assert_eq!(reply.status, 200);
//! ```

mod error;
#[cfg(feature = "http")]
pub mod http;
mod reply;
mod villa_service;

pub use error::{ResultKind, ServiceError};
pub use reply::{Reply, VillaRequest};
pub use villa_service::{location_for, Created, VillaService, VILLA_ROUTE};
