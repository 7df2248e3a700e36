//! Route middleware shared by the controllers.

use crate::error::ApiError;
use crate::models::Entity;
use crate::routing::{middleware, Middleware};
use crate::state::AppState;
use axum::{
    extract::{FromRequestParts, Path, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Parse a path id. A malformed id cannot name an existing record, so it is
/// reported the same way as a missing one.
pub fn parse_id<E: Entity>(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(E::NOT_FOUND))
}

/// Answer 404 unless the `:id` path parameter names an existing `E`.
pub fn exists<E: Entity>() -> Middleware {
    middleware(|state: AppState, request: Request, next: Next| async move {
        let (mut parts, body) = request.into_parts();
        match check_exists::<E>(&state, &mut parts).await {
            Ok(()) => next.run(Request::from_parts(parts, body)).await,
            Err(err) => err.into_response(),
        }
    })
}

async fn check_exists<E: Entity>(state: &AppState, parts: &mut Parts) -> Result<(), ApiError> {
    let Path(raw) = Path::<String>::from_request_parts(parts, state)
        .await
        .map_err(|_| ApiError::not_found(E::NOT_FOUND))?;
    let id = parse_id::<E>(&raw)?;

    if state.repo::<E>().exists(id).await? {
        Ok(())
    } else {
        Err(ApiError::not_found(E::NOT_FOUND))
    }
}

