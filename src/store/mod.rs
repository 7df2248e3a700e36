//! Persistence handle.
//!
//! Entities are kept as JSON documents keyed by a generated UUID, alongside a
//! sequential `codigo` and creation/update timestamps. Two backends implement
//! [`Storage`]: [`MemoryStore`] for `NODE_ENV=test` and [`PgStore`] otherwise.
//! Handlers never touch a backend directly; they go through [`Repository`].
//!
//! Repository unique and reference checks read before they write. PostgreSQL
//! also enforces unique fields with an index; reference checks can still race
//! with a concurrent delete.

mod memory;
mod postgres;
mod repository;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::Repository;

use crate::config::Config;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Entity fields as stored (everything except the generated columns)
pub type Document = serde_json::Map<String, Value>;

/// A persisted row
#[derive(Debug, Clone)]
pub struct StoredRow {
    pub id: Uuid,
    pub codigo: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub data: Document,
}

/// Table-oriented document storage.
///
/// `page` and `find_by` return rows in insertion (`codigo`) order.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn insert(&self, table: &'static str, data: Document) -> Result<StoredRow, StoreError>;

    async fn get(&self, table: &'static str, id: Uuid) -> Result<Option<StoredRow>, StoreError>;

    /// One page of rows plus the table's total row count
    async fn page(
        &self,
        table: &'static str,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<StoredRow>, u64), StoreError>;

    /// Rows whose top-level `field` equals `value`
    async fn find_by(
        &self,
        table: &'static str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredRow>, StoreError>;

    /// Overwrite a row's document, bumping `updated_at`. `None` if absent.
    async fn replace(
        &self,
        table: &'static str,
        id: Uuid,
        data: Document,
    ) -> Result<Option<StoredRow>, StoreError>;

    async fn delete(&self, table: &'static str, id: Uuid) -> Result<bool, StoreError>;

    /// Delete every row whose `field` equals `value`, returning the count
    async fn delete_by(
        &self,
        table: &'static str,
        field: &str,
        value: &Value,
    ) -> Result<u64, StoreError>;
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unique field already taken, or the row is still referenced
    #[error("{0}")]
    Conflict(String),

    /// A reference field names a row that does not exist
    #[error("{0}")]
    Missing(&'static str),

    /// Merged record no longer satisfies its rules
    #[error("invalid record")]
    Invalid(Vec<String>),

    /// Update payload could not be applied to the record
    #[error("{0}")]
    Patch(String),

    #[error("corrupt record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl StoreError {
    pub fn duplicate(field: &str) -> Self {
        Self::Conflict(format!("{field} já cadastrado"))
    }

    pub fn in_use(table: &str) -> Self {
        Self::Conflict(format!("Registro possui vínculos em {table}"))
    }
}

/// Open the backend selected by the configuration.
///
/// `NODE_ENV=test` gets a fresh [`MemoryStore`]; anything else connects to
/// PostgreSQL and creates missing tables and unique indexes.
pub async fn connect(config: &Config) -> Result<Arc<dyn Storage>, StoreError> {
    if config.in_memory() {
        info!("Using in-memory storage");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgStore::connect(&config.database).await?;
    store.migrate(crate::models::TABLES).await?;
    Ok(Arc::new(store))
}
