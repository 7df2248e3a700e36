use super::{Aluguel, Entity, Produto, Record, Reference};
use crate::validation::{nest_list, rules};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// Stock movement against a rental (delivery or return)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct Nota {
    /// Aluguel id
    #[validate(required)]
    pub aluguel: Option<Uuid>,

    #[validate(required, custom(function = "rules::date"))]
    #[schema(example = "2024-03-01")]
    pub data_movimentacao: Option<String>,

    #[validate(required, length(min = 1))]
    #[schema(example = "entrega")]
    pub tipo: Option<String>,

    pub observacao: Option<String>,
}

impl Entity for Nota {
    const TABLE: &'static str = "nota";
    const NOT_FOUND: &'static str = "Nota não encontrada";
    const REFERENCES: &'static [Reference] = &[Reference::to::<Aluguel>("aluguel")];
}

/// Nota line item
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProdutoNota {
    /// Nota id
    #[validate(required)]
    pub nota: Option<Uuid>,

    /// Produto id
    #[validate(required)]
    pub produto: Option<Uuid>,

    #[validate(required, range(min = 1))]
    pub quantidade: Option<i64>,
}

impl Entity for ProdutoNota {
    const TABLE: &'static str = "produto_nota";
    const NOT_FOUND: &'static str = "Item da nota não encontrado";
    const REFERENCES: &'static [Reference] = &[
        Reference::to::<Nota>("nota"),
        Reference::to::<Produto>("produto"),
    ];
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct NotaItemInput {
    #[validate(required)]
    pub produto: Option<Uuid>,

    #[validate(required, range(min = 1))]
    pub quantidade: Option<i64>,
}

impl NotaItemInput {
    pub fn into_line(self, nota: Uuid) -> ProdutoNota {
        ProdutoNota {
            nota: Some(nota),
            produto: self.produto,
            quantidade: self.quantidade,
        }
    }
}

/// Create/update payload. Items are accepted as `produtos` or `produtos_nota`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NotaInput {
    #[serde(flatten)]
    pub nota: Nota,

    #[serde(default, alias = "produtos_nota", skip_serializing_if = "Option::is_none")]
    pub produtos: Option<Vec<NotaItemInput>>,
}

impl Validate for NotaInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.nota.validate() {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotaItemView {
    pub id: Uuid,
    pub quantidade: Option<i64>,
    pub produto: Option<Record<Produto>>,
}

/// Nota as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotaView {
    #[serde(flatten)]
    pub nota: Record<Nota>,
    pub produtos: Vec<NotaItemView>,
}
