use super::{Classificacao, Entity, Fornecedor, Reference};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Unit assumed when a product is created without one
pub const DEFAULT_UNIDADE: &str = "PÇ";

fn default_unidade() -> Option<String> {
    Some(DEFAULT_UNIDADE.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct Produto {
    #[validate(required, length(min = 1, max = 255))]
    pub nome: Option<String>,

    /// Classificacao id
    pub categoria: Option<Uuid>,

    #[validate(required, range(min = 0.0))]
    pub preco: Option<f64>,

    #[validate(required, range(min = 0))]
    pub estoque: Option<i64>,

    #[serde(default = "default_unidade")]
    #[validate(length(min = 1, max = 50))]
    #[schema(example = "PÇ")]
    pub unidade: Option<String>,

    /// Amount charged when the product is lost or damaged
    #[validate(range(min = 0.0))]
    pub indenizacao: Option<f64>,

    /// Fornecedor id
    pub fornecedor: Option<Uuid>,
}

impl Default for Produto {
    fn default() -> Self {
        Self {
            nome: None,
            categoria: None,
            preco: None,
            estoque: None,
            unidade: default_unidade(),
            indenizacao: None,
            fornecedor: None,
        }
    }
}

impl Entity for Produto {
    const TABLE: &'static str = "produto";
    const NOT_FOUND: &'static str = "Produto não encontrado";
    const REFERENCES: &'static [Reference] = &[
        Reference::to::<Classificacao>("categoria"),
        Reference::to::<Fornecedor>("fornecedor"),
    ];
}
