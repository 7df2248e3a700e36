use super::crud;
use crate::models::Produto;
use crate::openapi;
use crate::routing::{Controller, Route};
use utoipa::openapi::{RefOr, Schema};

pub struct ProdutoController;

impl Controller for ProdutoController {
    fn base_path(&self) -> &'static str {
        "/produto"
    }

    fn tag(&self) -> &'static str {
        "Produto"
    }

    fn routes(&self) -> Vec<Route> {
        crud::routes::<Produto>("um produto", "produtos")
    }

    fn schemas(&self, schemas: &mut Vec<(String, RefOr<Schema>)>) {
        openapi::collect::<Produto>(schemas);
    }
}
