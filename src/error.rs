//! Request-level error taxonomy.
//!
//! Every variant renders through the response envelope, so handlers can use
//! `?` freely without a framework-formatted error ever reaching a client.

use crate::response;
use crate::store::StoreError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Message attached to every 400 produced by the validation gate
pub const INVALID_DATA: &str = "Dados inválidos";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Rule violations, already flattened into readable messages
    #[error("Dados inválidos")]
    Validation(Vec<String>),

    /// Body could not be read or mapped onto the expected shape
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(StoreError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Invalid(errors) => Self::Validation(errors),
            StoreError::Patch(message) => Self::BadRequest(message),
            StoreError::Conflict(message) => Self::Conflict(message),
            StoreError::Missing(message) => Self::not_found(message),
            other => Self::Store(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => response::bad_request(json!({
                "message": INVALID_DATA,
                "errors": errors,
            })),
            ApiError::BadRequest(message) => response::bad_request(json!({
                "message": INVALID_DATA,
                "errors": [message],
            })),
            ApiError::Unauthorized(message) => response::unauthorized(Some(&message)),
            ApiError::Forbidden(message) => response::forbidden(&message),
            ApiError::NotFound(message) => response::not_found(&message),
            ApiError::Conflict(message) => response::conflict_error(message),
            ApiError::Store(err) => {
                error!(error = %err, "Storage failure");
                response::server_error(err.to_string())
            }
            ApiError::Internal(message) => {
                error!(error = %message, "Internal error");
                response::server_error(message)
            }
        }
    }
}

/// JSON body extractor whose rejection is an [`ApiError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Payload<T>(pub T);
