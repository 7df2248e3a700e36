//! Notas (stock movements) and their line items.

use super::crud::{require, take_items};
use crate::error::{ApiError, Payload};
use crate::middleware::{exists, parse_id};
use crate::models::{
    Entity, Nota, NotaInput, NotaItemInput, NotaItemView, NotaView, Produto,
    ProdutoNota, Record,
};
use crate::openapi;
use crate::pagination::{Page, PageQuery};
use crate::response::{success, success_created, success_empty};
use crate::routing::{Controller, Route};
use crate::state::AppState;
use crate::store::Document;
use crate::validation::validated;
use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use tracing::debug;
use utoipa::openapi::{RefOr, Schema};
use uuid::Uuid;

pub struct NotaController;

impl Controller for NotaController {
    fn base_path(&self) -> &'static str {
        "/nota"
    }

    fn tag(&self) -> &'static str {
        "Nota"
    }

    fn routes(&self) -> Vec<Route> {
        vec![
            Route::get("/list", list)
                .summary("Retorna uma lista paginada de notas")
                .paginated(),
            Route::get("/:id", get_one)
                .with(exists::<Nota>())
                .summary("Retorna uma nota pelo ID"),
            Route::post("/create", create)
                .with(validated::<NotaInput>())
                .summary("Cria uma nova nota")
                .body::<NotaInput>(),
            Route::put("/:id", update)
                .with(exists::<Nota>())
                .summary("Atualiza uma nota")
                .body::<NotaInput>(),
            Route::delete("/:id", remove)
                .with(exists::<Nota>())
                .summary("Remove uma nota"),
        ]
    }

    fn schemas(&self, schemas: &mut Vec<(String, RefOr<Schema>)>) {
        openapi::collect::<Nota>(schemas);
        openapi::collect::<NotaItemInput>(schemas);
        openapi::collect::<NotaInput>(schemas);
    }
}

async fn view(state: &AppState, nota: Record<Nota>) -> Result<NotaView, ApiError> {
    let lines = state.repo::<ProdutoNota>().find_by("nota", nota.id).await?;

    let produtos = state.repo::<Produto>();
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let produto = match line.fields.produto {
            Some(id) => produtos.find(id).await?,
            None => None,
        };
        items.push(NotaItemView {
            id: line.id,
            quantidade: line.fields.quantidade,
            produto,
        });
    }

    Ok(NotaView {
        nota,
        produtos: items,
    })
}

async fn require_products(state: &AppState, items: &[NotaItemInput]) -> Result<(), ApiError> {
    for produto in items.iter().filter_map(|item| item.produto) {
        require::<Produto>(state, produto).await?;
    }
    Ok(())
}

async fn insert_items(state: &AppState, nota: Uuid, items: Vec<NotaItemInput>) -> Result<(), ApiError> {
    let lines = state.repo::<ProdutoNota>();
    for item in items {
        lines.create(&item.into_line(nota)).await?;
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let page = state.repo::<Nota>().page(query.resolve()).await?;

    let mut result = Vec::with_capacity(page.result.len());
    for nota in page.result {
        result.push(view(&state, nota).await?);
    }

    Ok(success(Page {
        result,
        meta: page.meta,
    }))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id::<Nota>(&id)?;
    let nota = state
        .repo::<Nota>()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(Nota::NOT_FOUND))?;
    Ok(success(view(&state, nota).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Payload(input): Payload<NotaInput>,
) -> Result<Response, ApiError> {
    let items = input.produtos.unwrap_or_default();
    require_products(&state, &items).await?;

    let nota = state.repo::<Nota>().create(&input.nota).await?;
    insert_items(&state, nota.id, items).await?;

    Ok(success_created(Some(view(&state, nota).await?)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(mut patch): Payload<Document>,
) -> Result<Response, ApiError> {
    let id = parse_id::<Nota>(&id)?;
    let items = take_items::<NotaItemInput>(&mut patch, &["produtos", "produtos_nota"])?;
    if let Some(items) = &items {
        require_products(&state, items).await?;
    }

    let nota = state
        .repo::<Nota>()
        .update(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found(Nota::NOT_FOUND))?;

    if let Some(items) = items {
        let removed = state.repo::<ProdutoNota>().delete_by("nota", id).await?;
        debug!(nota = %id, removed, added = items.len(), "Replacing line items");
        insert_items(&state, id, items).await?;
    }

    Ok(success(view(&state, nota).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id::<Nota>(&id)?;
    state.repo::<ProdutoNota>().delete_by("nota", id).await?;

    if state.repo::<Nota>().delete(id).await? {
        Ok(success_empty())
    } else {
        Err(ApiError::not_found(Nota::NOT_FOUND))
    }
}
