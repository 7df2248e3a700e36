use super::Entity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Product classification (category)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct Classificacao {
    #[validate(required, length(min = 1, max = 100))]
    #[schema(example = "Andaimes")]
    pub nome: Option<String>,

    #[validate(required, length(min = 1))]
    pub descricao: Option<String>,
}

impl Entity for Classificacao {
    const TABLE: &'static str = "classificacao";
    const NOT_FOUND: &'static str = "Classificação não encontrada";
}
