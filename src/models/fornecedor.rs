use super::Entity;
use crate::validation::rules;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Supplier. `cpf_cnpj` is unique across suppliers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct Fornecedor {
    #[validate(required, length(min = 1, max = 255))]
    pub razao_social: Option<String>,

    #[validate(custom(function = "rules::date"))]
    pub data: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub nome_fantasia: Option<String>,

    #[validate(
        required,
        length(min = 11, max = 18),
        custom(function = "rules::cpf_cnpj")
    )]
    #[schema(example = "12345678000190")]
    pub cpf_cnpj: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub endereco: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub bairro: Option<String>,

    #[validate(length(equal = 2))]
    pub uf: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub cidade: Option<String>,

    #[validate(custom(function = "rules::cep"))]
    #[schema(example = "01310-100")]
    pub cep: Option<String>,

    #[validate(length(min = 10, max = 15), custom(function = "rules::telefone"))]
    pub telefone: Option<String>,

    #[validate(length(min = 10, max = 15), custom(function = "rules::telefone_fax"))]
    pub telefone_fax: Option<String>,

    #[validate(email, length(min = 1, max = 255))]
    pub email: Option<String>,

    pub observacoes: Option<String>,
}

impl Entity for Fornecedor {
    const TABLE: &'static str = "fornecedor";
    const NOT_FOUND: &'static str = "Fornecedor não encontrado";
    const UNIQUE: &'static [&'static str] = &["cpf_cnpj"];
}
