use super::Route;
use utoipa::openapi::{RefOr, Schema};

/// A group of routes sharing a base path.
///
/// Instances are built once at startup and never change afterwards.
pub trait Controller: Send + Sync {
    /// Prefix for every route, e.g. `/cliente`
    fn base_path(&self) -> &'static str;

    /// Documentation tag
    fn tag(&self) -> &'static str;

    /// Routes in binding order
    fn routes(&self) -> Vec<Route>;

    /// Named schemas referenced by this controller's request bodies
    fn schemas(&self, _schemas: &mut Vec<(String, RefOr<Schema>)>) {}
}
