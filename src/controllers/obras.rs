use super::crud;
use crate::models::Obras;
use crate::openapi;
use crate::routing::{Controller, Route};
use utoipa::openapi::{RefOr, Schema};

pub struct ObrasController;

impl Controller for ObrasController {
    fn base_path(&self) -> &'static str {
        "/obras"
    }

    fn tag(&self) -> &'static str {
        "Obras"
    }

    fn routes(&self) -> Vec<Route> {
        crud::routes::<Obras>("uma obra", "obras")
    }

    fn schemas(&self, schemas: &mut Vec<(String, RefOr<Schema>)>) {
        openapi::collect::<Obras>(schemas);
    }
}
