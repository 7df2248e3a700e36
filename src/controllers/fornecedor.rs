use super::crud;
use crate::models::Fornecedor;
use crate::openapi;
use crate::routing::{Controller, Route};
use utoipa::openapi::{RefOr, Schema};

/// `/fornecedor`: suppliers, unique by `cpf_cnpj`
pub struct FornecedorController;

impl Controller for FornecedorController {
    fn base_path(&self) -> &'static str {
        "/fornecedor"
    }

    fn tag(&self) -> &'static str {
        "Fornecedor"
    }

    fn routes(&self) -> Vec<Route> {
        crud::routes::<Fornecedor>("um fornecedor", "fornecedores")
    }

    fn schemas(&self, schemas: &mut Vec<(String, RefOr<Schema>)>) {
        openapi::collect::<Fornecedor>(schemas);
    }
}
