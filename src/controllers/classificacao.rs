use super::crud;
use crate::models::Classificacao;
use crate::openapi;
use crate::routing::{Controller, Route};
use utoipa::openapi::{RefOr, Schema};

pub struct ClassificacaoController;

impl Controller for ClassificacaoController {
    fn base_path(&self) -> &'static str {
        "/classificacao"
    }

    fn tag(&self) -> &'static str {
        "Classificacao"
    }

    fn routes(&self) -> Vec<Route> {
        crud::routes::<Classificacao>("uma classificação", "classificações")
    }

    fn schemas(&self, schemas: &mut Vec<(String, RefOr<Schema>)>) {
        openapi::collect::<Classificacao>(schemas);
    }
}
