//! Declarative route registration.
//!
//! Controllers describe their endpoints as plain [`Route`] values (verb,
//! sub-path, handler, ordered middleware). The [`binder`] turns those
//! descriptions into axum routes once at startup and records every binding
//! in a [`RouteTable`] used for logging and API documentation.

pub mod binder;
mod controller;
mod middleware;
mod route;

pub use binder::{bind_all, bind_routes, log_routes, RouteEntry, RouteTable, RoutingError};
pub use controller::Controller;
pub use middleware::{middleware, Middleware};
pub use route::Route;
