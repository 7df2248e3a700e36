//! Route binder: controller descriptions to live axum routes.

use super::{Controller, Middleware};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::Method,
    middleware::{from_fn_with_state, Next},
    routing::MethodFilter,
    Router,
};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};

/// Startup binding errors
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("route {method} {path} is bound more than once")]
    Duplicate { method: Method, path: String },
}

/// A bound route as recorded for logging and documentation
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub method: Method,
    pub path: String,
    pub tag: &'static str,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub paginated: bool,
}

/// Every route bound so far, in binding order
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    seen: HashSet<(Method, String)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, method: &Method, path: &str) -> bool {
        self.seen.contains(&(method.clone(), path.to_string()))
    }
}

/// Bind every route of `controller` onto `router`.
///
/// Each route is registered at `base_path + path` under its verb, wrapped by
/// its middleware so that the first one listed runs first. Routes with a
/// verb axum cannot dispatch, or a sub-path that is empty or lacks its
/// leading `/`, are skipped with a warning. Binding the same verb and path twice is an error.
pub fn bind_routes(
    mut router: Router<AppState>,
    table: &mut RouteTable,
    controller: &dyn Controller,
    state: &AppState,
) -> Result<Router<AppState>, RoutingError> {
    let base = controller.base_path();

    for route in controller.routes() {
        if !route.path.starts_with('/') || !(base.is_empty() || base.starts_with('/')) {
            warn!(
                method = %route.method,
                base,
                path = route.path,
                "Skipping route with missing or malformed path"
            );
            continue;
        }
        let full_path = format!("{base}{}", route.path);

        let Ok(filter) = MethodFilter::try_from(route.method.clone()) else {
            warn!(method = %route.method, path = %full_path, "Skipping route with unsupported HTTP method");
            continue;
        };

        if !table.seen.insert((route.method.clone(), full_path.clone())) {
            return Err(RoutingError::Duplicate {
                method: route.method,
                path: full_path,
            });
        }

        let mut method_router = (route.bind)(filter);
        // route_layer wraps outward, so the first middleware must be applied last
        for mw in route.middleware.into_iter().rev() {
            method_router = method_router.route_layer(from_fn_with_state(
                state.clone(),
                move |State(state): State<AppState>, request: Request, next: Next| {
                    mw(state, request, next)
                },
            ));
        }
        router = router.route(&full_path, method_router);

        table.entries.push(RouteEntry {
            method: route.method,
            path: full_path,
            tag: controller.tag(),
            summary: route.summary,
            body: route.body,
            paginated: route.paginated,
        });
    }

    Ok(router)
}

/// Bind all controllers in the given order
pub fn bind_all(
    controllers: &[Box<dyn Controller>],
    state: &AppState,
) -> Result<(Router<AppState>, RouteTable), RoutingError> {
    let mut table = RouteTable::new();
    let mut router = Router::new();
    for controller in controllers {
        router = bind_routes(router, &mut table, controller.as_ref(), state)?;
    }
    Ok((router, table))
}

/// Log every bound route at startup
pub fn log_routes(table: &RouteTable) {
    for entry in table.entries() {
        info!("{} {}", entry.method, entry.path);
    }
    info!(routes = table.len(), "Routes bound");
}
