//! Generic list/get/create/update/delete endpoints for a plain entity.

use crate::error::{ApiError, Payload};
use crate::middleware::{exists, parse_id};
use crate::models::Entity;
use crate::pagination::PageQuery;
use crate::response::{success, success_created, success_empty};
use crate::routing::Route;
use crate::state::AppState;
use crate::store::Document;
use crate::validation::{flatten_errors, nest_list, validated};
use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// The five standard routes. `one` and `many` name the entity in summaries.
pub fn routes<E: Entity>(one: &str, many: &str) -> Vec<Route> {
    vec![
        Route::get("/list", list::<E>)
            .summary(format!("Retorna uma lista paginada de {many}"))
            .paginated(),
        Route::get("/:id", get_one::<E>)
            .with(exists::<E>())
            .summary(format!("Retorna {one} pelo ID")),
        Route::post("/create", create::<E>)
            .with(validated::<E>())
            .summary(format!("Cria {one}"))
            .body::<E>(),
        Route::put("/:id", update::<E>)
            .with(exists::<E>())
            .summary(format!("Atualiza {one}"))
            .body::<E>(),
        Route::delete("/:id", remove::<E>)
            .with(exists::<E>())
            .summary(format!("Remove {one}")),
    ]
}

pub async fn list<E: Entity>(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let page = state.repo::<E>().page(query.resolve()).await?;
    Ok(success(page))
}

pub async fn get_one<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id::<E>(&id)?;
    let record = state
        .repo::<E>()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(E::NOT_FOUND))?;
    Ok(success(record))
}

pub async fn create<E: Entity>(
    State(state): State<AppState>,
    Payload(entity): Payload<E>,
) -> Result<Response, ApiError> {
    let record = state.repo::<E>().create(&entity).await?;
    Ok(success_created(Some(record)))
}

pub async fn update<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(patch): Payload<Document>,
) -> Result<Response, ApiError> {
    let id = parse_id::<E>(&id)?;
    let record = state
        .repo::<E>()
        .update(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found(E::NOT_FOUND))?;
    Ok(success(record))
}

pub async fn remove<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id::<E>(&id)?;
    if state.repo::<E>().delete(id).await? {
        Ok(success_empty())
    } else {
        Err(ApiError::not_found(E::NOT_FOUND))
    }
}

/// 404 with `E`'s message unless `id` names an existing record
pub async fn require<E: Entity>(state: &AppState, id: Uuid) -> Result<(), ApiError> {
    if state.repo::<E>().exists(id).await? {
        Ok(())
    } else {
        Err(ApiError::not_found(E::NOT_FOUND))
    }
}

/// Remove the line items from an update payload and check their rules.
///
/// The first of `keys` present wins; every listed key is removed so none
/// leaks into the parent document. `None` means the items were not sent.
pub fn take_items<T>(patch: &mut Document, keys: &[&str]) -> Result<Option<Vec<T>>, ApiError>
where
    T: DeserializeOwned + Validate,
{
    let mut found = None;
    for key in keys {
        if let Some(value) = patch.remove(*key) {
            found.get_or_insert(value);
        }
    }
    let raw = match found {
        None | Some(Value::Null) => return Ok(None),
        Some(raw) => raw,
    };

    let items: Vec<T> =
        serde_json::from_value(raw).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let mut errors = ValidationErrors::new();
    nest_list(&mut errors, "produtos", &items);
    if !errors.is_empty() {
        return Err(ApiError::Validation(flatten_errors(&errors)));
    }
    Ok(Some(items))
}
