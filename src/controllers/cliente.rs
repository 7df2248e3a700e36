use super::crud;
use crate::models::Cliente;
use crate::openapi;
use crate::routing::{Controller, Route};
use utoipa::openapi::{RefOr, Schema};

/// `/cliente`: clients, unique by `cnpj_cpf`
pub struct ClienteController;

impl Controller for ClienteController {
    fn base_path(&self) -> &'static str {
        "/cliente"
    }

    fn tag(&self) -> &'static str {
        "Cliente"
    }

    fn routes(&self) -> Vec<Route> {
        crud::routes::<Cliente>("um cliente", "clientes")
    }

    fn schemas(&self, schemas: &mut Vec<(String, RefOr<Schema>)>) {
        openapi::collect::<Cliente>(schemas);
    }
}
