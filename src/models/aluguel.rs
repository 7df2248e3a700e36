use super::{Cliente, Entity, Nota, Obras, Produto, Record, Reference};
use crate::validation::{nest_list, rules};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// Rental of products to a client for a construction site
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct Aluguel {
    #[validate(required, length(min = 1, max = 255))]
    pub nome: Option<String>,

    /// Cliente id
    pub cliente: Option<Uuid>,

    /// Obras id
    pub obra: Option<Uuid>,

    #[validate(required, custom(function = "rules::date"))]
    #[schema(example = "2024-03-01")]
    pub data_inicio: Option<String>,

    #[validate(required, custom(function = "rules::date"))]
    #[schema(example = "2024-04-01")]
    pub data_devolucao: Option<String>,

    #[validate(required, range(min = 0.0))]
    pub subtotal: Option<f64>,

    pub observacao: Option<String>,
}

impl Entity for Aluguel {
    const TABLE: &'static str = "aluguel";
    const NOT_FOUND: &'static str = "Aluguel não encontrado";
    const REFERENCES: &'static [Reference] = &[
        Reference::to::<Cliente>("cliente"),
        Reference::to::<Obras>("obra"),
    ];
}

/// Rental line item
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct AluguelProduto {
    /// Aluguel id
    #[validate(required)]
    pub aluguel: Option<Uuid>,

    /// Produto id
    #[validate(required)]
    pub produto: Option<Uuid>,

    #[validate(required, range(min = 1))]
    pub quantidade: Option<i64>,

    #[validate(required, range(min = 0.0))]
    pub preco_unitario: Option<f64>,
}

impl Entity for AluguelProduto {
    const TABLE: &'static str = "aluguel_produto";
    const NOT_FOUND: &'static str = "Item do aluguel não encontrado";
    const REFERENCES: &'static [Reference] = &[
        Reference::to::<Aluguel>("aluguel"),
        Reference::to::<Produto>("produto"),
    ];
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct AluguelItemInput {
    #[validate(required)]
    pub produto: Option<Uuid>,

    #[validate(required, range(min = 1))]
    pub quantidade: Option<i64>,

    #[validate(required, range(min = 0.0))]
    pub preco_unitario: Option<f64>,
}

impl AluguelItemInput {
    pub fn into_line(self, aluguel: Uuid) -> AluguelProduto {
        AluguelProduto {
            aluguel: Some(aluguel),
            produto: self.produto,
            quantidade: self.quantidade,
            preco_unitario: self.preco_unitario,
        }
    }
}

/// Create/update payload: rental fields plus its line items
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AluguelInput {
    #[serde(flatten)]
    pub aluguel: Aluguel,

    /// Replaces every line item when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produtos: Option<Vec<AluguelItemInput>>,
}

impl Validate for AluguelInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.aluguel.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if let Some(items) = &self.produtos {
            nest_list(&mut errors, "produtos", items);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A line item joined with its product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AluguelItemView {
    /// Produto id
    pub id: Option<Uuid>,
    pub nome: Option<String>,
    pub preco: Option<f64>,
    pub quantidade: Option<i64>,
    pub preco_unitario: Option<f64>,
    pub unidade: Option<String>,
    pub indenizacao: Option<f64>,
}

impl AluguelItemView {
    pub fn new(line: AluguelProduto, produto: Option<Produto>) -> Self {
        let produto = produto.unwrap_or_default();
        Self {
            id: line.produto,
            nome: produto.nome,
            preco: produto.preco,
            quantidade: line.quantidade,
            preco_unitario: line.preco_unitario,
            unidade: produto.unidade,
            indenizacao: produto.indenizacao,
        }
    }
}

/// Rental as returned by the API: the record plus items and notas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AluguelView {
    #[serde(flatten)]
    pub aluguel: Record<Aluguel>,
    pub produtos: Vec<AluguelItemView>,
    pub notas: Vec<Record<Nota>>,
}
