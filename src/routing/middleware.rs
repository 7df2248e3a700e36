use crate::state::AppState;
use axum::{extract::Request, middleware::Next, response::Response};
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// A route interceptor. It either produces a response itself (halting the
/// chain) or hands the request to `next`.
pub type Middleware =
    Arc<dyn Fn(AppState, Request, Next) -> BoxFuture<'static, Response> + Send + Sync>;

/// Erase an async interceptor into a [`Middleware`]
pub fn middleware<F, Fut>(f: F) -> Middleware
where
    F: Fn(AppState, Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(
        move |state: AppState, request: Request, next: Next| -> BoxFuture<'static, Response> {
            Box::pin(f(state, request, next))
        },
    )
}
