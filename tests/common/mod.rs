//! Shared helpers for the HTTP integration tests.
#![allow(dead_code)]

use axum::http::StatusCode;
use axum_test::TestServer;
use mega_backend::{build_app, store::MemoryStore, AppState, Config};
use serde_json::{json, Value};
use std::sync::Arc;

/// Every entity base path served by the API
pub const ENTITIES: &[&str] = &[
    "aluguel",
    "classificacao",
    "cliente",
    "fornecedor",
    "nota",
    "obras",
    "produto",
];

/// Build a test server over a fresh in-memory store
pub fn build_test_server() -> TestServer {
    build_test_server_with(Config::for_tests())
}

pub fn build_test_server_with(config: Config) -> TestServer {
    let state = AppState::new(Arc::new(MemoryStore::new()), config);
    let app = build_app(state).unwrap();
    TestServer::new(app).unwrap()
}

/// POST `body` to `/{entity}/create`, expect 201 and return the new id
pub async fn create(server: &TestServer, entity: &str, body: Value) -> String {
    let response = server.post(&format!("/{entity}/create")).json(&body).await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["data"]["id"].as_str().unwrap().to_string()
}

/// Number of records reported by `/{entity}/list`
pub async fn total(server: &TestServer, entity: &str) -> u64 {
    let body: Value = server.get(&format!("/{entity}/list")).await.json();
    body["data"]["meta"]["total"].as_u64().unwrap()
}

// =============================================================================
// Valid payloads
// =============================================================================

pub fn classificacao() -> Value {
    json!({ "nome": "Andaimes", "descricao": "Andaimes tubulares" })
}

pub fn fornecedor(cpf_cnpj: &str) -> Value {
    json!({
        "razao_social": "Metalúrgica Souza LTDA",
        "nome_fantasia": "Souza",
        "cpf_cnpj": cpf_cnpj,
        "cep": "01310-100",
        "uf": "SP",
        "email": "contato@souza.com.br"
    })
}

pub fn cliente(cnpj_cpf: &str) -> Value {
    json!({
        "name": "Construtora Horizonte",
        "cnpj_cpf": cnpj_cpf,
        "cellphone": "11987654321",
        "client_state": "ativo",
        "address": "Rua das Flores",
        "address_number": 120,
        "address_cep": "01310100",
        "address_uf": "SP",
        "address_city": "São Paulo",
        "person_type": "PJ",
        "address_neighborhood": "Centro"
    })
}

pub fn obras() -> Value {
    json!({
        "name": "Edifício Aurora",
        "address": "Av. Paulista",
        "address_number": 1500,
        "address_cep": "01310-200",
        "address_uf": "SP",
        "address_city": "São Paulo",
        "address_neighborhood": "Bela Vista"
    })
}

pub fn produto(nome: &str) -> Value {
    json!({ "nome": nome, "preco": 12.5, "estoque": 40 })
}

pub fn aluguel() -> Value {
    json!({
        "nome": "Locação Aurora",
        "data_inicio": "2024-03-01",
        "data_devolucao": "2024-04-01",
        "subtotal": 250.0
    })
}

pub fn nota(aluguel: &str) -> Value {
    json!({
        "aluguel": aluguel,
        "data_movimentacao": "2024-03-02",
        "tipo": "entrega"
    })
}

/// Valid create payload for any entity, creating its required references
pub async fn valid_payload(server: &TestServer, entity: &str) -> Value {
    match entity {
        "aluguel" => aluguel(),
        "classificacao" => classificacao(),
        "cliente" => cliente("12345678000190"),
        "fornecedor" => fornecedor("12345678000190"),
        "nota" => {
            let aluguel = create(server, "aluguel", aluguel()).await;
            nota(&aluguel)
        }
        "obras" => obras(),
        "produto" => produto("Andaime 1m"),
        other => panic!("unknown entity {other}"),
    }
}
