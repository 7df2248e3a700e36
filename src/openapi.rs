//! OpenAPI 3 document built from the bound route table.

use crate::routing::{RouteEntry, RouteTable};
use axum::http::Method;
use serde_json::{json, Map, Value};
use utoipa::openapi::{RefOr, Schema};
use utoipa::ToSchema;

/// Top-level API info for the document.
pub struct Info {
    pub title: &'static str,
    pub version: &'static str,
}

pub const INFO: Info = Info {
    title: "Api de gerenciamento da MEGA",
    version: "1.0.0",
};

/// Push `T`'s schema, and every schema it references, into `out`
pub fn collect<T: ToSchema>(out: &mut Vec<(String, RefOr<Schema>)>) {
    out.push((T::name().into_owned(), T::schema()));
    T::schemas(out);
}

/// `/aluguel/:id/notas` becomes `/aluguel/{id}/notas`, plus the param names
fn openapi_path(path: &str) -> (String, Vec<&str>) {
    let mut params = Vec::new();
    let segments: Vec<String> = path
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => {
                params.push(name);
                format!("{{{name}}}")
            }
            None => segment.to_string(),
        })
        .collect();
    (segments.join("/"), params)
}

fn responses(method: &Method, has_params: bool) -> Value {
    let mut responses = Map::new();
    let ok = match *method {
        Method::POST => ("201", "Criado"),
        Method::DELETE => ("204", "Removido"),
        _ => ("200", "Sucesso"),
    };
    responses.insert(ok.0.into(), json!({ "description": ok.1 }));

    if matches!(*method, Method::POST | Method::PUT | Method::PATCH) {
        responses.insert("400".into(), json!({ "description": "Dados inválidos" }));
    }
    if has_params {
        responses.insert("404".into(), json!({ "description": "Não encontrado" }));
    }
    Value::Object(responses)
}

fn operation(entry: &RouteEntry, params: &[&str]) -> Value {
    let mut op = Map::new();
    op.insert("tags".into(), json!([entry.tag]));
    if let Some(summary) = &entry.summary {
        op.insert("summary".into(), Value::String(summary.clone()));
    }

    let mut parameters: Vec<Value> = params
        .iter()
        .map(|name| {
            json!({
                "in": "path",
                "name": name,
                "required": true,
                "schema": { "type": "string", "format": "uuid" }
            })
        })
        .collect();
    if entry.paginated {
        parameters.push(json!({
            "in": "query",
            "name": "page",
            "schema": { "type": "integer", "default": 1 },
            "description": "Número da página"
        }));
        parameters.push(json!({
            "in": "query",
            "name": "limit",
            "schema": { "type": "integer", "default": 10 },
            "description": "Número de itens por página"
        }));
    }
    if !parameters.is_empty() {
        op.insert("parameters".into(), Value::Array(parameters));
    }

    if let Some(body) = &entry.body {
        op.insert(
            "requestBody".into(),
            json!({
                "required": true,
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{body}") }
                    }
                }
            }),
        );
    }

    op.insert("responses".into(), responses(&entry.method, !params.is_empty()));
    Value::Object(op)
}

/// Build the document. Later duplicates of a schema name are ignored.
pub fn generate(info: &Info, table: &RouteTable, schemas: Vec<(String, RefOr<Schema>)>) -> Value {
    let mut paths: Map<String, Value> = Map::new();
    for entry in table.entries() {
        let (path, params) = openapi_path(&entry.path);
        let item = paths
            .entry(path)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(item) = item {
            item.insert(
                entry.method.as_str().to_ascii_lowercase(),
                operation(entry, &params),
            );
        }
    }

    let mut components: Map<String, Value> = Map::new();
    for (name, schema) in schemas {
        if !components.contains_key(&name) {
            components.insert(name, serde_json::to_value(schema).unwrap_or(json!({})));
        }
    }

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": info.title,
            "version": info.version,
        },
        "paths": paths,
        "components": { "schemas": components },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::Classificacao;
    use crate::routing::{bind_all, Controller, Route};
    use crate::state::AppState;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    struct Docs;

    async fn noop() {}

    impl Controller for Docs {
        fn base_path(&self) -> &'static str {
            "/classificacao"
        }

        fn tag(&self) -> &'static str {
            "Classificacao"
        }

        fn routes(&self) -> Vec<Route> {
            vec![
                Route::get("/list", noop).summary("Lista").paginated(),
                Route::get("/:id", noop),
                Route::post("/create", noop).body::<Classificacao>(),
            ]
        }

        fn schemas(&self, out: &mut Vec<(String, RefOr<Schema>)>) {
            collect::<Classificacao>(out);
        }
    }

    fn document() -> Value {
        let state = AppState::new(Arc::new(MemoryStore::new()), Config::for_tests());
        let controllers: Vec<Box<dyn Controller>> = vec![Box::new(Docs)];
        let (_, table) = bind_all(&controllers, &state).unwrap();

        let mut schemas = Vec::new();
        Docs.schemas(&mut schemas);
        generate(&INFO, &table, schemas)
    }

    #[test]
    fn path_params_are_rewritten() {
        let (path, params) = openapi_path("/aluguel/:id/notas");
        assert_eq!(path, "/aluguel/{id}/notas");
        assert_eq!(params, vec!["id"]);
    }

    #[test]
    fn document_lists_bound_routes() {
        let doc = document();

        assert_eq!(doc["info"]["title"], "Api de gerenciamento da MEGA");
        assert_eq!(doc["paths"]["/classificacao/list"]["get"]["tags"][0], "Classificacao");
        assert_eq!(
            doc["paths"]["/classificacao/list"]["get"]["parameters"]
                .as_array()
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            doc["paths"]["/classificacao/{id}"]["get"]["parameters"][0]["name"],
            "id"
        );
        assert!(doc["paths"]["/classificacao/{id}"]["get"]["responses"]["404"].is_object());
    }

    #[test]
    fn request_bodies_reference_schemas() {
        let doc = document();

        let post = &doc["paths"]["/classificacao/create"]["post"];
        assert_eq!(
            post["requestBody"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/Classificacao"
        );
        assert!(post["responses"]["201"].is_object());
        assert!(doc["components"]["schemas"]["Classificacao"]["properties"]["nome"].is_object());
    }
}
