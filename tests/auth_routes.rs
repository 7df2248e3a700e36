//! Integration tests for bearer-token middleware on declaratively bound routes.

use axum::{
    extract::{Extension, State},
    http::{header, StatusCode},
    response::Response,
};
use axum_test::TestServer;
use mega_backend::{
    auth::{self, Claims},
    response::success,
    routing::{bind_all, Controller, Route},
    store::MemoryStore,
    AppState, Config,
};
use serde_json::{json, Value};
use std::sync::Arc;

const SECRET: &str = "integration-secret";

struct AdminController;

async fn whoami(State(_state): State<AppState>, Extension(claims): Extension<Claims>) -> Response {
    success(json!({ "sub": claims.sub, "role": claims.role }))
}

async fn ping() -> Response {
    success("pong")
}

impl Controller for AdminController {
    fn base_path(&self) -> &'static str {
        "/admin"
    }

    fn tag(&self) -> &'static str {
        "Admin"
    }

    fn routes(&self) -> Vec<Route> {
        vec![
            Route::get("/me", whoami)
                .with(auth::private_route())
                .with(auth::roles(&["admin", "gerente"])),
            Route::get("/ping", ping),
        ]
    }
}

fn build_test_server(secret: Option<&str>) -> TestServer {
    let mut config = Config::for_tests();
    config.jwt_secret = secret.map(str::to_string);
    let state = AppState::new(Arc::new(MemoryStore::new()), config);

    let controllers: Vec<Box<dyn Controller>> = vec![Box::new(AdminController)];
    let (router, _table) = bind_all(&controllers, &state).unwrap();
    TestServer::new(router.with_state(state)).unwrap()
}

fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let server = build_test_server(Some(SECRET));

    let response = server.get("/admin/me").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], auth::MISSING_TOKEN);
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let server = build_test_server(Some(SECRET));
    let token = auth::make_token("other-secret", "ana", Some("admin")).unwrap();

    let response = server
        .get("/admin/me")
        .add_header(header::AUTHORIZATION, auth_header(&token))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], auth::INVALID_TOKEN);
}

#[tokio::test]
async fn test_role_outside_list_is_forbidden() {
    let server = build_test_server(Some(SECRET));
    let token = auth::make_token(SECRET, "bruno", Some("operador")).unwrap();

    let response = server
        .get("/admin/me")
        .add_header(header::AUTHORIZATION, auth_header(&token))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"], auth::ACCESS_DENIED);
}

#[tokio::test]
async fn test_allowed_role_reaches_handler() {
    let server = build_test_server(Some(SECRET));
    let token = auth::make_token(SECRET, "ana", Some("gerente")).unwrap();

    let response = server
        .get("/admin/me")
        .add_header(header::AUTHORIZATION, auth_header(&token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["sub"], "ana");
    assert_eq!(body["data"]["role"], "gerente");
}

#[tokio::test]
async fn test_unconfigured_secret_rejects_every_token() {
    let server = build_test_server(None);
    let token = auth::make_token(SECRET, "ana", Some("admin")).unwrap();

    let response = server
        .get("/admin/me")
        .add_header(header::AUTHORIZATION, auth_header(&token))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_route_on_same_controller() {
    let server = build_test_server(Some(SECRET));

    let response = server.get("/admin/ping").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"], "pong");
}
