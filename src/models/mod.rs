//! Business records.
//!
//! Each entity is a plain field set. Generated columns (`id`, `codigo`,
//! timestamps) live in [`Record`], which flattens the fields next to them.
//! Fields are `Option` so a missing value surfaces as a rule violation
//! instead of a deserialization failure.

mod aluguel;
mod cliente;
mod classificacao;
mod fornecedor;
mod nota;
mod obras;
mod produto;

pub use aluguel::{Aluguel, AluguelInput, AluguelItemInput, AluguelItemView, AluguelProduto, AluguelView};
pub use classificacao::Classificacao;
pub use cliente::Cliente;
pub use fornecedor::Fornecedor;
pub use nota::{Nota, NotaInput, NotaItemInput, NotaItemView, NotaView, ProdutoNota};
pub use obras::Obras;
pub use produto::Produto;

use crate::store::{StoreError, StoredRow};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A persisted business entity
pub trait Entity:
    Serialize + DeserializeOwned + Validate + ToSchema + Send + Sync + 'static
{
    /// Storage table
    const TABLE: &'static str;

    /// 404 message when an id does not resolve
    const NOT_FOUND: &'static str;

    /// Fields that must not repeat across rows
    const UNIQUE: &'static [&'static str] = &[];

    /// Fields holding the id of a row in another table
    const REFERENCES: &'static [Reference] = &[];
}

/// A field that points at a row of another entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub field: &'static str,
    pub table: &'static str,
    /// Reported when the referenced row does not exist
    pub not_found: &'static str,
}

impl Reference {
    pub const fn to<T: Entity>(field: &'static str) -> Self {
        Self {
            field,
            table: T::TABLE,
            not_found: T::NOT_FOUND,
        }
    }
}

/// Storage layout of one entity
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub unique: &'static [&'static str],
    pub references: &'static [Reference],
}

impl TableSpec {
    pub const fn of<E: Entity>() -> Self {
        Self {
            name: E::TABLE,
            unique: E::UNIQUE,
            references: E::REFERENCES,
        }
    }
}

/// Every table the service owns, created at startup
pub const TABLES: &[TableSpec] = &[
    TableSpec::of::<Fornecedor>(),
    TableSpec::of::<Cliente>(),
    TableSpec::of::<Classificacao>(),
    TableSpec::of::<Produto>(),
    TableSpec::of::<Obras>(),
    TableSpec::of::<Aluguel>(),
    TableSpec::of::<AluguelProduto>(),
    TableSpec::of::<Nota>(),
    TableSpec::of::<ProdutoNota>(),
];

/// `(table, field)` pairs whose field points at rows of `table`
pub fn referrers(table: &str) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
    TABLES.iter().flat_map(move |spec| {
        spec.references
            .iter()
            .filter(move |reference| reference.table == table)
            .map(move |reference| (spec.name, reference.field))
    })
}

/// Columns a client can never overwrite
pub const GENERATED: &[&str] = &["id", "codigo", "created_at", "updated_at"];

/// An entity together with its generated columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record<E> {
    pub id: Uuid,
    pub codigo: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: E,
}

impl<E: Entity> Record<E> {
    pub fn from_row(row: StoredRow) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.id,
            codigo: row.codigo,
            created_at: row.created_at,
            updated_at: row.updated_at,
            fields: serde_json::from_value(Value::Object(row.data))?,
        })
    }
}
