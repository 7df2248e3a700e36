use super::Middleware;
use crate::state::AppState;
use axum::{
    handler::Handler,
    http::Method,
    routing::{MethodFilter, MethodRouter},
};
use utoipa::ToSchema;

type Bind = Box<dyn FnOnce(MethodFilter) -> MethodRouter<AppState> + Send>;

/// One endpoint: verb, sub-path, handler and its middleware chain.
///
/// Middleware runs in the order it is added, before the handler.
pub struct Route {
    pub(crate) method: Method,
    pub(crate) path: &'static str,
    pub(crate) bind: Bind,
    pub(crate) middleware: Vec<Middleware>,
    pub(crate) summary: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) paginated: bool,
}

impl Route {
    pub fn new<H, T>(method: Method, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self {
            method,
            path,
            bind: Box::new(move |filter| axum::routing::on(filter, handler)),
            middleware: Vec::new(),
            summary: None,
            body: None,
            paginated: false,
        }
    }

    pub fn get<H, T>(path: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(Method::GET, path, handler)
    }

    pub fn post<H, T>(path: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(Method::POST, path, handler)
    }

    pub fn put<H, T>(path: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(Method::PUT, path, handler)
    }

    pub fn delete<H, T>(path: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(Method::DELETE, path, handler)
    }

    pub fn patch<H, T>(path: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(Method::PATCH, path, handler)
    }

    /// Append a middleware to the chain
    #[must_use]
    pub fn with(mut self, middleware: Middleware) -> Self {
        self.middleware.push(middleware);
        self
    }

    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Document the JSON request body as `T`
    #[must_use]
    pub fn body<T: ToSchema>(mut self) -> Self {
        self.body = Some(T::name().into_owned());
        self
    }

    /// Document `page`/`limit` query parameters
    #[must_use]
    pub fn paginated(mut self) -> Self {
        self.paginated = true;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &'static str {
        self.path
    }
}
