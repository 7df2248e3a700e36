use super::Entity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Client. `cnpj_cpf` is unique across clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct Cliente {
    #[validate(required, length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(max = 255))]
    pub fantasy_name: Option<String>,

    #[validate(required, length(min = 1, max = 18))]
    pub cnpj_cpf: Option<String>,

    #[validate(length(max = 15))]
    pub phone: Option<String>,

    #[validate(required, length(min = 1, max = 15))]
    pub cellphone: Option<String>,

    #[validate(required, length(min = 1, max = 50))]
    pub client_state: Option<String>,

    #[validate(required, length(min = 1, max = 255))]
    pub address: Option<String>,

    #[validate(required)]
    pub address_number: Option<i64>,

    #[validate(required, length(min = 1, max = 9))]
    pub address_cep: Option<String>,

    #[validate(required, length(equal = 2))]
    pub address_uf: Option<String>,

    #[validate(required, length(min = 1, max = 100))]
    pub address_city: Option<String>,

    /// Natural (`PF`) or legal (`PJ`) person
    #[validate(required, length(min = 1, max = 50))]
    pub person_type: Option<String>,

    #[validate(required, length(min = 1, max = 100))]
    pub address_neighborhood: Option<String>,

    #[validate(length(max = 100))]
    pub address_complement: Option<String>,

    #[validate(length(max = 255))]
    pub contact: Option<String>,
}

impl Entity for Cliente {
    const TABLE: &'static str = "cliente";
    const NOT_FOUND: &'static str = "Cliente não encontrado";
    const UNIQUE: &'static [&'static str] = &["cnpj_cpf"];
}
