use super::Entity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Construction site where rented products are used
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct Obras {
    #[validate(required, length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(required, length(min = 1, max = 255))]
    pub address: Option<String>,

    #[validate(required)]
    pub address_number: Option<i64>,

    #[validate(required, length(min = 8, max = 20))]
    pub address_cep: Option<String>,

    #[validate(required, length(equal = 2))]
    pub address_uf: Option<String>,

    #[validate(required, length(min = 1, max = 100))]
    pub address_city: Option<String>,

    #[validate(required, length(min = 1, max = 100))]
    pub address_neighborhood: Option<String>,

    #[validate(length(max = 255))]
    pub address_complement: Option<String>,
}

impl Entity for Obras {
    const TABLE: &'static str = "obras";
    const NOT_FOUND: &'static str = "Obra não encontrada";
}
