//! Uniform response envelope.
//!
//! Every handler answers through these helpers so consumers always see
//! `{status, date, data}` on success and `{status, date, error}` on failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

/// Default message for 401 responses
pub const UNAUTHORIZED: &str = "Unauthorized";

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: bool,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl<T: Serialize> Envelope<T> {
    fn ok(data: Option<T>) -> Self {
        Self {
            status: true,
            date: now(),
            data,
            error: None,
        }
    }
}

impl Envelope<()> {
    fn failed(error: Value) -> Self {
        Self {
            status: false,
            date: now(),
            data: None,
            error: Some(error),
        }
    }
}

/// ISO-8601 timestamp with millisecond precision, `Z` suffix
fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// === Success ===

/// 200 with `data`
pub fn success<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(Envelope::ok(Some(data)))).into_response()
}

/// 201, `data` optional
pub fn success_created<T: Serialize>(data: Option<T>) -> Response {
    (StatusCode::CREATED, Json(Envelope::ok(data))).into_response()
}

/// 204 with no body at all
pub fn success_empty() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

// === Failure ===

fn failure(status: StatusCode, error: Value) -> Response {
    (status, Json(Envelope::failed(error))).into_response()
}

pub fn bad_request(error: impl Into<Value>) -> Response {
    failure(StatusCode::BAD_REQUEST, error.into())
}

/// 401; falls back to "Unauthorized" when no message is given
pub fn unauthorized(message: Option<&str>) -> Response {
    failure(
        StatusCode::UNAUTHORIZED,
        Value::from(message.unwrap_or(UNAUTHORIZED)),
    )
}

pub fn forbidden(message: &str) -> Response {
    failure(StatusCode::FORBIDDEN, Value::from(message))
}

pub fn not_found(message: &str) -> Response {
    failure(StatusCode::NOT_FOUND, Value::from(message))
}

pub fn conflict_error(error: impl Into<Value>) -> Response {
    failure(StatusCode::CONFLICT, error.into())
}

pub fn server_error(error: impl Into<Value>) -> Response {
    failure(StatusCode::INTERNAL_SERVER_ERROR, error.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn success_wraps_data() {
        let response = success(serde_json::json!({"id": 1}));
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], true);
        assert_eq!(body["data"]["id"], 1);
        assert!(body.get("error").is_none());
        assert!(body["date"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn created_without_data_omits_field() {
        let response = success_created::<Value>(None);
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["status"], true);
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn empty_has_no_body() {
        let response = success_empty();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_defaults_message() {
        let body = body_json(unauthorized(None)).await;
        assert_eq!(body["status"], false);
        assert_eq!(body["error"], UNAUTHORIZED);
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn failure_status_codes() {
        assert_eq!(bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(conflict_error("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            server_error("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
