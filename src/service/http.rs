//! HTTP transport for the villa service.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /api/VillaAPI` - list villas.
//! - `GET /api/VillaAPI/:id` - get one villa.
//! - `POST /api/VillaAPI` - create; replies 201 with a `Location` header.
//! - `PUT /api/VillaAPI/:id` - replace.
//! - `PATCH /api/VillaAPI/:id` - JSON Patch (RFC 6902) body.
//! - `DELETE /api/VillaAPI/:id` - delete.
//! - `GET /health` - health check returning `{ "ok": true, "villas": n }`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use villa_api::{http, VillaService, VillaStore};
//!
//! let service = Arc::new(VillaService::new(VillaStore::in_memory()));
//!
//! // Get the router to compose with other axum routes
//! let app = http::router(service.clone());
//!
//! // Or serve directly
//! http::serve(service, "127.0.0.1:5000".parse()?).await?;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use json_patch::Patch;
use serde_json::json;

use super::error::ServiceError;
use super::reply::{Reply, VillaRequest};
use super::villa_service::{VillaService, VILLA_ROUTE};
use crate::villa::Villa;

type SharedService = Arc<VillaService>;

/// Build an axum `Router` serving the villa resource.
pub fn router(service: SharedService) -> Router {
    let item_route = format!("{}/:id", VILLA_ROUTE);
    Router::new()
        .route("/health", get(health_handler))
        .route(VILLA_ROUTE, get(list_handler).post(create_handler))
        .route(
            &item_route,
            get(get_handler)
                .put(replace_handler)
                .patch(patch_handler)
                .delete(delete_handler),
        )
        .with_state(service)
}

/// Serve the villa resource over HTTP at `addr`.
pub async fn serve(service: SharedService, addr: SocketAddr) -> Result<(), std::io::Error> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// `GET /health`
async fn health_handler(State(service): State<SharedService>) -> Response {
    match service.store().len() {
        Ok(villas) => Json(json!({ "ok": true, "villas": villas })).into_response(),
        Err(e) => render(Reply::from_error(e.into())),
    }
}

async fn list_handler(State(service): State<SharedService>) -> Response {
    render(service.dispatch(VillaRequest::List))
}

async fn get_handler(
    State(service): State<SharedService>,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    match id {
        Ok(Path(id)) => render(service.dispatch(VillaRequest::Get { id })),
        Err(rejection) => bad_input(rejection.body_text()),
    }
}

async fn create_handler(
    State(service): State<SharedService>,
    body: Result<Json<Option<Villa>>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(villa)) => render(service.dispatch(VillaRequest::Create { villa })),
        Err(rejection) => bad_input(rejection.body_text()),
    }
}

async fn delete_handler(
    State(service): State<SharedService>,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    match id {
        Ok(Path(id)) => render(service.dispatch(VillaRequest::Delete { id })),
        Err(rejection) => bad_input(rejection.body_text()),
    }
}

async fn replace_handler(
    State(service): State<SharedService>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Option<Villa>>, JsonRejection>,
) -> Response {
    match (id, body) {
        (Ok(Path(id)), Ok(Json(villa))) => {
            render(service.dispatch(VillaRequest::Replace { id, villa }))
        }
        (Err(rejection), _) => bad_input(rejection.body_text()),
        (_, Err(rejection)) => bad_input(rejection.body_text()),
    }
}

async fn patch_handler(
    State(service): State<SharedService>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Option<Patch>>, JsonRejection>,
) -> Response {
    match (id, body) {
        (Ok(Path(id)), Ok(Json(patch))) => {
            render(service.dispatch(VillaRequest::Patch { id, patch }))
        }
        (Err(rejection), _) => bad_input(rejection.body_text()),
        (_, Err(rejection)) => bad_input(rejection.body_text()),
    }
}

/// Extractor failures (bad path, bad JSON, wrong content type) are all 400s.
fn bad_input(message: String) -> Response {
    render(Reply::from_error(ServiceError::bad_request(message)))
}

fn render(reply: Reply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = match reply.body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    };
    if let Some(location) = reply.location {
        if let Ok(value) = location.parse() {
            response.headers_mut().insert(header::LOCATION, value);
        }
    }
    response
}
