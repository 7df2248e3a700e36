//! PostgreSQL backend.
//!
//! One table per entity: generated columns plus a `data` JSONB document.
//! Table names come from compile-time constants, never from requests.

use super::{Document, Storage, StoreError, StoredRow};
use crate::config::DatabaseConfig;
use crate::models::TableSpec;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use sqlx::types::Json;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);
const COLUMNS: &str = "id, codigo, created_at, updated_at, data";

#[derive(sqlx::FromRow)]
struct Row {
    id: Uuid,
    codigo: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    data: Json<Document>,
}

impl From<Row> for StoredRow {
    fn from(row: Row) -> Self {
        Self {
            id: row.id,
            codigo: row.codigo,
            created_at: row.created_at,
            updated_at: row.updated_at,
            data: row.data.0,
        }
    }
}

/// Pooled PostgreSQL store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .ssl_mode(if config.ssl {
                PgSslMode::Require
            } else {
                PgSslMode::Prefer
            });
        if let Some(user) = &config.user {
            options = options.username(user);
        }
        if let Some(password) = &config.password {
            options = options.password(password);
        }
        if let Some(name) = &config.name {
            options = options.database(name);
        }

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        info!(
            host = %config.host,
            port = config.port,
            ssl = config.ssl,
            "Connected to PostgreSQL"
        );
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create any missing entity tables, plus one unique index per unique field
    pub async fn migrate(&self, tables: &[TableSpec]) -> Result<(), StoreError> {
        for spec in tables {
            let table = spec.name;
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {table} (\
                 id UUID PRIMARY KEY, \
                 codigo BIGSERIAL NOT NULL, \
                 created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
                 updated_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
                 data JSONB NOT NULL)"
            ))
            .execute(&self.pool)
            .await?;

            for field in spec.unique {
                sqlx::query(&format!(
                    "CREATE UNIQUE INDEX IF NOT EXISTS {table}_{field}_key \
                     ON {table} ((data ->> '{field}'))"
                ))
                .execute(&self.pool)
                .await?;
            }
            debug!(table, unique = spec.unique.len(), "Table ready");
        }
        Ok(())
    }
}

/// Map a write failure. Unique index violations surface as the same conflict
/// the repository reports for its own check.
fn write_error(table: &str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let field = db
                .constraint()
                .and_then(|name| index_field(table, name))
                .unwrap_or("registro");
            return StoreError::duplicate(field);
        }
    }
    StoreError::Database(err)
}

/// Field of a `{table}_{field}_key` index created by [`PgStore::migrate`]
fn index_field<'a>(table: &str, index: &'a str) -> Option<&'a str> {
    index
        .strip_prefix(table)?
        .strip_prefix('_')?
        .strip_suffix("_key")
}

#[async_trait]
impl Storage for PgStore {
    async fn insert(&self, table: &'static str, data: Document) -> Result<StoredRow, StoreError> {
        let row: Row = sqlx::query_as(&format!(
            "INSERT INTO {table} (id, data) VALUES ($1, $2) RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(Json(&data))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(table, e))?;
        Ok(row.into())
    }

    async fn get(&self, table: &'static str, id: Uuid) -> Result<Option<StoredRow>, StoreError> {
        let row: Option<Row> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM {table} WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    async fn page(
        &self,
        table: &'static str,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<StoredRow>, u64), StoreError> {
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await?;

        let rows: Vec<Row> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM {table} ORDER BY codigo LIMIT $1 OFFSET $2"
        ))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok((
            rows.into_iter().map(Into::into).collect(),
            u64::try_from(total).unwrap_or(0),
        ))
    }

    async fn find_by(
        &self,
        table: &'static str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredRow>, StoreError> {
        let rows: Vec<Row> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM {table} WHERE data -> $1 = $2 ORDER BY codigo"
        ))
        .bind(field)
        .bind(Json(value))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn replace(
        &self,
        table: &'static str,
        id: Uuid,
        data: Document,
    ) -> Result<Option<StoredRow>, StoreError> {
        let row: Option<Row> = sqlx::query_as(&format!(
            "UPDATE {table} SET data = $2, updated_at = now() WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(Json(&data))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(table, e))?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, table: &'static str, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by(
        &self,
        table: &'static str,
        field: &str,
        value: &Value,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE data -> $1 = $2"))
            .bind(field)
            .bind(Json(value))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_index_names_map_back_to_fields() {
        assert_eq!(index_field("cliente", "cliente_cnpj_cpf_key"), Some("cnpj_cpf"));
        assert_eq!(index_field("fornecedor", "fornecedor_cpf_cnpj_key"), Some("cpf_cnpj"));
        assert_eq!(index_field("cliente", "fornecedor_cpf_cnpj_key"), None);
        assert_eq!(index_field("cliente", "cliente_pkey"), None);
    }
}
