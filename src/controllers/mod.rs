//! HTTP controllers, one per entity.
//!
//! [`all`] is the single place where controllers are registered; the order
//! here is the binding order.

mod aluguel;
mod classificacao;
mod cliente;
pub mod crud;
mod fornecedor;
mod nota;
mod obras;
mod produto;

pub use aluguel::{AluguelController, HAS_NOTAS};
pub use classificacao::ClassificacaoController;
pub use cliente::ClienteController;
pub use fornecedor::FornecedorController;
pub use nota::NotaController;
pub use obras::ObrasController;
pub use produto::ProdutoController;

use crate::routing::Controller;

/// Every controller the API serves
pub fn all() -> Vec<Box<dyn Controller>> {
    vec![
        Box::new(AluguelController),
        Box::new(ClassificacaoController),
        Box::new(ClienteController),
        Box::new(FornecedorController),
        Box::new(NotaController),
        Box::new(ObrasController),
        Box::new(ProdutoController),
    ]
}
