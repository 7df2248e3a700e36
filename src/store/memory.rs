//! In-memory backend.
//!
//! Data lives only as long as the process. Used for `NODE_ENV=test` and by
//! the integration tests.

use super::{Document, Storage, StoreError, StoredRow};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Table {
    next_codigo: i64,
    rows: Vec<StoredRow>,
}

/// Thread-safe in-memory store
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<DashMap<&'static str, Table>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held in `table`
    pub fn count(&self, table: &'static str) -> usize {
        self.tables.get(table).map(|t| t.rows.len()).unwrap_or(0)
    }
}

fn matches(row: &StoredRow, field: &str, value: &Value) -> bool {
    row.data.get(field) == Some(value)
}

#[async_trait]
impl Storage for MemoryStore {
    async fn insert(&self, table: &'static str, data: Document) -> Result<StoredRow, StoreError> {
        let mut entry = self.tables.entry(table).or_default();
        entry.next_codigo += 1;

        let now = Utc::now();
        let row = StoredRow {
            id: Uuid::new_v4(),
            codigo: entry.next_codigo,
            created_at: now,
            updated_at: now,
            data,
        };
        entry.rows.push(row.clone());

        debug!(table, codigo = row.codigo, "Inserted row");
        Ok(row)
    }

    async fn get(&self, table: &'static str, id: Uuid) -> Result<Option<StoredRow>, StoreError> {
        Ok(self
            .tables
            .get(table)
            .and_then(|t| t.rows.iter().find(|r| r.id == id).cloned()))
    }

    async fn page(
        &self,
        table: &'static str,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<StoredRow>, u64), StoreError> {
        let Some(t) = self.tables.get(table) else {
            return Ok((Vec::new(), 0));
        };

        let rows = t
            .rows
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((rows, t.rows.len() as u64))
    }

    async fn find_by(
        &self,
        table: &'static str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredRow>, StoreError> {
        Ok(self
            .tables
            .get(table)
            .map(|t| {
                t.rows
                    .iter()
                    .filter(|r| matches(r, field, value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn replace(
        &self,
        table: &'static str,
        id: Uuid,
        data: Document,
    ) -> Result<Option<StoredRow>, StoreError> {
        let Some(mut t) = self.tables.get_mut(table) else {
            return Ok(None);
        };
        let Some(row) = t.rows.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        row.data = data;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, table: &'static str, id: Uuid) -> Result<bool, StoreError> {
        let Some(mut t) = self.tables.get_mut(table) else {
            return Ok(false);
        };
        let before = t.rows.len();
        t.rows.retain(|r| r.id != id);
        Ok(t.rows.len() < before)
    }

    async fn delete_by(
        &self,
        table: &'static str,
        field: &str,
        value: &Value,
    ) -> Result<u64, StoreError> {
        let Some(mut t) = self.tables.get_mut(table) else {
            return Ok(0);
        };
        let before = t.rows.len();
        t.rows.retain(|r| !matches(r, field, value));
        let removed = (before - t.rows.len()) as u64;

        debug!(table, field, removed, "Deleted rows by field");
        Ok(removed)
    }
}
