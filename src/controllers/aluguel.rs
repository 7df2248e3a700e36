//! Rentals and their line items.
//!
//! A rental is always returned with its products and notas. Updating the
//! `produtos` list replaces every line item; there is no diffing and no guard
//! against concurrent replacements of the same rental.

use super::crud::{require, take_items};
use crate::error::{ApiError, Payload};
use crate::middleware::{exists, parse_id};
use crate::models::{
    Aluguel, AluguelInput, AluguelItemInput, AluguelItemView, AluguelProduto, AluguelView,
    Entity, Nota, Produto, Record,
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

/// Refused while notas still point at the rental
pub const HAS_NOTAS: &str = "Aluguel possui notas vinculadas";

pub struct AluguelController;

impl Controller for AluguelController {
    fn base_path(&self) -> &'static str {
        "/aluguel"
    }

    fn tag(&self) -> &'static str {
        "Aluguel"
    }

    fn routes(&self) -> Vec<Route> {
        vec![
            Route::get("/list", list)
                .summary("Retorna uma lista paginada de alugueis")
                .paginated(),
            Route::get("/:id", get_one)
                .with(exists::<Aluguel>())
                .summary("Retorna um aluguel pelo ID"),
            Route::get("/:id/notas", notas)
                .with(exists::<Aluguel>())
                .summary("Retorna notas associadas a um aluguel pelo ID"),
            Route::post("/create", create)
                .with(validated::<AluguelInput>())
                .summary("Cria um novo aluguel")
                .body::<AluguelInput>(),
            Route::put("/:id", update)
                .with(exists::<Aluguel>())
                .summary("Atualiza um aluguel")
                .body::<AluguelInput>(),
            Route::delete("/:id", remove)
                .with(exists::<Aluguel>())
                .summary("Remove um aluguel"),
        ]
    }

    fn schemas(&self, schemas: &mut Vec<(String, RefOr<Schema>)>) {
        openapi::collect::<Aluguel>(schemas);
        openapi::collect::<AluguelItemInput>(schemas);
        openapi::collect::<AluguelInput>(schemas);
    }
}

async fn view(state: &AppState, aluguel: Record<Aluguel>) -> Result<AluguelView, ApiError> {
    let lines = state
        .repo::<AluguelProduto>()
        .find_by("aluguel", aluguel.id)
        .await?;

    let produtos = state.repo::<Produto>();
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let produto = match line.fields.produto {
            Some(id) => produtos.find(id).await?.map(|p| p.fields),
            None => None,
        };
        items.push(AluguelItemView::new(line.fields, produto));
    }

    let notas = state.repo::<Nota>().find_by("aluguel", aluguel.id).await?;

    Ok(AluguelView {
        aluguel,
        produtos: items,
        notas,
    })
}

async fn require_products(state: &AppState, items: &[AluguelItemInput]) -> Result<(), ApiError> {
    for produto in items.iter().filter_map(|item| item.produto) {
        require::<Produto>(state, produto).await?;
    }
    Ok(())
}

async fn insert_items(
    state: &AppState,
    aluguel: Uuid,
    items: Vec<AluguelItemInput>,
) -> Result<(), ApiError> {
    let lines = state.repo::<AluguelProduto>();
    for item in items {
        lines.create(&item.into_line(aluguel)).await?;
    }
    Ok(())
}

async fn load(state: &AppState, id: Uuid) -> Result<Record<Aluguel>, ApiError> {
    state
        .repo::<Aluguel>()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(Aluguel::NOT_FOUND))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let page = state.repo::<Aluguel>().page(query.resolve()).await?;
    let mut result = Vec::with_capacity(page.result.len());
    for aluguel in page.result {
        result.push(view(&state, aluguel).await?);
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
    let aluguel = load(&state, parse_id::<Aluguel>(&id)?).await?;
    Ok(success(view(&state, aluguel).await?))
}

pub async fn notas(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id::<Aluguel>(&id)?;
    let notas = state.repo::<Nota>().find_by("aluguel", id).await?;
    Ok(success(notas))
}

pub async fn create(
    State(state): State<AppState>,
    Payload(input): Payload<AluguelInput>,
) -> Result<Response, ApiError> {
    let items = input.produtos.unwrap_or_default();
    require_products(&state, &items).await?;

    let aluguel = state.repo::<Aluguel>().create(&input.aluguel).await?;
    let count = items.len();
    insert_items(&state, aluguel.id, items).await?;
    debug!(aluguel = %aluguel.id, items = count, "Aluguel created");

    Ok(success_created(Some(view(&state, aluguel).await?)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(mut patch): Payload<Document>,
) -> Result<Response, ApiError> {
    let id = parse_id::<Aluguel>(&id)?;
    let items = take_items::<AluguelItemInput>(&mut patch, &["produtos"])?;
    if let Some(items) = &items {
        require_products(&state, items).await?;
    }

    let aluguel = state
        .repo::<Aluguel>()
        .update(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found(Aluguel::NOT_FOUND))?;

    if let Some(items) = items {
        let removed = state
            .repo::<AluguelProduto>()
            .delete_by("aluguel", id)
            .await?;
        debug!(aluguel = %id, removed, added = items.len(), "Replacing line items");
        insert_items(&state, id, items).await?;
    }

    Ok(success(view(&state, aluguel).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id::<Aluguel>(&id)?;
    if !state.repo::<Nota>().find_by("aluguel", id).await?.is_empty() {
        return Err(ApiError::Conflict(HAS_NOTAS.to_string()));
    }

    state
        .repo::<AluguelProduto>()
        .delete_by("aluguel", id)
        .await?;
    if state.repo::<Aluguel>().delete(id).await? {
        Ok(success_empty())
    } else {
        Err(ApiError::not_found(Aluguel::NOT_FOUND))
    }
}
