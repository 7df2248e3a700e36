//! # MEGA Backend
//!
//! REST API for the MEGA rental business: suppliers, clients, products,
//! classifications, construction sites, rentals and stock movements (notas).
//!
//! ## Architecture
//!
//! ```text
//! controllers::all() ──▶ routing::bind_all ──▶ axum Router
//!        │                      │
//!   Route descriptors     middleware chain (validation, existence, auth)
//!                               │
//!                          handlers ──▶ Repository<E> ──▶ Storage
//!                                                         ├─ MemoryStore (NODE_ENV=test)
//!                                                         └─ PgStore
//! ```
//!
//! Every response uses the envelope in [`response`].
//!
//! ## API Overview
//!
//! For each entity `E` in `fornecedor`, `cliente`, `produto`,
//! `classificacao`, `obras`, `aluguel` and `nota`:
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/{E}/list?page=&limit=` | GET | Paginated list |
//! | `/{E}/:id` | GET | One record |
//! | `/{E}/create` | POST | Create (validated) |
//! | `/{E}/:id` | PUT | Merge update |
//! | `/{E}/:id` | DELETE | Delete |
//!
//! Plus `GET /aluguel/:id/notas`, `GET /api-docs` and `GET /favicon.ico`.

pub mod auth;
pub mod config;
pub mod controllers;
pub mod error;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod pagination;
pub mod response;
pub mod routing;
pub mod state;
pub mod store;
pub mod validation;

pub use config::Config;
pub use error::ApiError;
pub use routing::RoutingError;
pub use state::AppState;

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::{DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

/// Maximum request body size (100 KiB).
pub const MAX_BODY_SIZE: usize = 100 * 1024;

/// Message for requests that match no route
pub const ROUTE_NOT_FOUND: &str = "Rota não encontrada";

/// Build the application: bind every controller, then add the docs and
/// favicon routes and the middleware stack.
pub fn build_app(state: AppState) -> Result<Router, RoutingError> {
    let controllers = controllers::all();
    let (router, table) = routing::bind_all(&controllers, &state)?;
    if state.config.request_logging() {
        routing::log_routes(&table);
    }

    let mut schemas = Vec::new();
    for controller in &controllers {
        controller.schemas(&mut schemas);
    }
    let docs = Arc::new(openapi::generate(&openapi::INFO, &table, schemas));

    let router = router
        .route(
            "/api-docs",
            get(move || {
                let docs = docs.clone();
                async move { Json(docs.as_ref().clone()) }
            }),
        )
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .fallback(|| async { response::not_found(ROUTE_NOT_FOUND) });

    // One access line per request; demoted below the default filter under test
    let response_level = if state.config.request_logging() {
        Level::INFO
    } else {
        Level::DEBUG
    };

    // Middleware stack (order matters: last added = outermost)
    Ok(router
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(
            TraceLayer::new_for_http().on_response(
                DefaultOnResponse::new()
                    .level(response_level)
                    .latency_unit(LatencyUnit::Millis),
            ),
        )
        .with_state(state))
}
