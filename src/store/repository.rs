use super::{Document, Storage, StoreError};
use crate::models::{referrers, Entity, Record, GENERATED};
use crate::pagination::{Page, PageMeta, PageRequest};
use crate::validation::flatten_errors;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

/// Typed access to one entity's table
pub struct Repository<E> {
    store: Arc<dyn Storage>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

fn reference(id: Uuid) -> Value {
    Value::String(id.to_string())
}

impl<E: Entity> Repository<E> {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    fn document(entity: &E) -> Result<Document, StoreError> {
        match serde_json::to_value(entity)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::Patch("expected a JSON object".to_string())),
        }
    }

    /// Reject the document if any unique field is already used by another row
    async fn ensure_unique(&self, data: &Document, except: Option<Uuid>) -> Result<(), StoreError> {
        for field in E::UNIQUE {
            let Some(value) = data.get(*field).filter(|v| !v.is_null()) else {
                continue;
            };
            let rows = self.store.find_by(E::TABLE, field, value).await?;
            if rows.iter().any(|row| Some(row.id) != except) {
                return Err(StoreError::duplicate(field));
            }
        }
        Ok(())
    }

    /// Reject the document if a reference field names a missing row
    async fn ensure_references(&self, data: &Document) -> Result<(), StoreError> {
        for reference in E::REFERENCES {
            let Some(value) = data.get(reference.field).filter(|v| !v.is_null()) else {
                continue;
            };
            let found = match value.as_str().and_then(|raw| Uuid::parse_str(raw).ok()) {
                Some(id) => self.store.get(reference.table, id).await?.is_some(),
                None => false,
            };
            if !found {
                return Err(StoreError::Missing(reference.not_found));
            }
        }
        Ok(())
    }

    pub async fn create(&self, entity: &E) -> Result<Record<E>, StoreError> {
        let data = Self::document(entity)?;
        self.ensure_unique(&data, None).await?;
        self.ensure_references(&data).await?;

        let row = self.store.insert(E::TABLE, data).await?;
        debug!(table = E::TABLE, codigo = row.codigo, "Created record");
        Record::from_row(row)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Record<E>>, StoreError> {
        self.store
            .get(E::TABLE, id)
            .await?
            .map(Record::from_row)
            .transpose()
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.store.get(E::TABLE, id).await?.is_some())
    }

    pub async fn page(&self, request: PageRequest) -> Result<Page<Record<E>>, StoreError> {
        let (rows, total) = self
            .store
            .page(E::TABLE, request.offset(), request.limit)
            .await?;

        Ok(Page {
            result: rows
                .into_iter()
                .map(Record::from_row)
                .collect::<Result<_, _>>()?,
            meta: PageMeta::new(request, total),
        })
    }

    /// Rows whose reference `field` points at `id`
    pub async fn find_by(&self, field: &str, id: Uuid) -> Result<Vec<Record<E>>, StoreError> {
        self.store
            .find_by(E::TABLE, field, &reference(id))
            .await?
            .into_iter()
            .map(Record::from_row)
            .collect()
    }

    /// Merge `patch` over the stored fields, re-check the rules and persist.
    ///
    /// Generated columns in the patch are ignored. Returns `None` when the
    /// record does not exist.
    pub async fn update(&self, id: Uuid, patch: Document) -> Result<Option<Record<E>>, StoreError> {
        let Some(row) = self.store.get(E::TABLE, id).await? else {
            return Ok(None);
        };

        let mut data = row.data;
        for (key, value) in patch {
            if !GENERATED.contains(&key.as_str()) {
                data.insert(key, value);
            }
        }

        let entity: E = serde_json::from_value(Value::Object(data))
            .map_err(|e| StoreError::Patch(e.to_string()))?;
        entity
            .validate()
            .map_err(|e| StoreError::Invalid(flatten_errors(&e)))?;

        let data = Self::document(&entity)?;
        self.ensure_unique(&data, Some(id)).await?;
        self.ensure_references(&data).await?;

        let row = self.store.replace(E::TABLE, id, data).await?;
        debug!(table = E::TABLE, %id, "Updated record");
        row.map(Record::from_row).transpose()
    }

    /// Delete one row. Refused with a conflict while another row references it.
    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        for (table, field) in referrers(E::TABLE) {
            if !self.store.find_by(table, field, &reference(id)).await?.is_empty() {
                debug!(table = E::TABLE, %id, referrer = table, "Delete refused");
                return Err(StoreError::in_use(table));
            }
        }
        self.store.delete(E::TABLE, id).await
    }

    /// Delete every row whose reference `field` points at `id`
    pub async fn delete_by(&self, field: &str, id: Uuid) -> Result<u64, StoreError> {
        self.store.delete_by(E::TABLE, field, &reference(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Aluguel, AluguelProduto, Classificacao, Fornecedor, Produto};
    use crate::pagination::PageRequest;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn repo<E: Entity>() -> Repository<E> {
        Repository::new(Arc::new(MemoryStore::new()))
    }

    fn patch(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn classificacao(nome: &str) -> Classificacao {
        Classificacao {
            nome: Some(nome.to_string()),
            descricao: Some("descricao".to_string()),
        }
    }

    fn produto() -> Produto {
        Produto {
            nome: Some("Andaime".to_string()),
            preco: Some(10.0),
            estoque: Some(5),
            ..Produto::default()
        }
    }

    fn aluguel() -> Aluguel {
        Aluguel {
            nome: Some("Locação".to_string()),
            data_inicio: Some("2024-03-01".to_string()),
            data_devolucao: Some("2024-04-01".to_string()),
            subtotal: Some(100.0),
            ..Aluguel::default()
        }
    }

    fn line(aluguel: Uuid, produto: Uuid) -> AluguelProduto {
        AluguelProduto {
            aluguel: Some(aluguel),
            produto: Some(produto),
            quantidade: Some(1),
            preco_unitario: Some(10.0),
        }
    }

    fn fornecedor(cpf_cnpj: &str) -> Fornecedor {
        Fornecedor {
            razao_social: Some("Acme".to_string()),
            cpf_cnpj: Some(cpf_cnpj.to_string()),
            ..Fornecedor::default()
        }
    }

    #[tokio::test]
    async fn create_then_find() {
        let repo = repo::<Classificacao>();

        let created = repo.create(&classificacao("Andaimes")).await.unwrap();
        let found = repo.find(created.id).await.unwrap().unwrap();

        assert_eq!(found.fields.nome.as_deref(), Some("Andaimes"));
        assert_eq!(found.codigo, 1);
        assert!(repo.exists(created.id).await.unwrap());
        assert!(!repo.exists(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn page_reports_meta() {
        let repo = repo::<Classificacao>();
        for i in 0..3 {
            repo.create(&classificacao(&format!("c{i}"))).await.unwrap();
        }

        let page = repo.page(PageRequest { page: 2, limit: 2 }).await.unwrap();
        assert_eq!(page.result.len(), 1);
        assert_eq!(page.meta.total, 3);
        assert_eq!(page.meta.total_pages, 2);
    }

    #[tokio::test]
    async fn update_merges_and_ignores_generated_columns() {
        let repo = repo::<Classificacao>();
        let created = repo.create(&classificacao("Andaimes")).await.unwrap();

        let updated = repo
            .update(
                created.id,
                patch(json!({"descricao": "nova", "codigo": 99, "id": Uuid::new_v4()})),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.codigo, created.codigo);
        assert_eq!(updated.fields.nome.as_deref(), Some("Andaimes"));
        assert_eq!(updated.fields.descricao.as_deref(), Some("nova"));
    }

    #[tokio::test]
    async fn update_missing_returns_none() {
        let repo = repo::<Classificacao>();
        let result = repo
            .update(Uuid::new_v4(), patch(json!({"nome": "x"})))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn update_revalidates_merged_record() {
        let repo = repo::<Classificacao>();
        let created = repo.create(&classificacao("Andaimes")).await.unwrap();

        let err = repo
            .update(created.id, patch(json!({"nome": null})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(ref e) if !e.is_empty()));

        let err = repo
            .update(created.id, patch(json!({"nome": 42})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Patch(_)));
    }

    #[tokio::test]
    async fn unique_fields_conflict() {
        let repo = repo::<Fornecedor>();
        let first = repo.create(&fornecedor("12345678901")).await.unwrap();

        let err = repo.create(&fornecedor("12345678901")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Updating a row with its own value is not a conflict
        repo.update(first.id, patch(json!({"cpf_cnpj": "12345678901"})))
            .await
            .unwrap()
            .unwrap();

        let second = repo.create(&fornecedor("12345678000190")).await.unwrap();
        let err = repo
            .update(second.id, patch(json!({"cpf_cnpj": "12345678901"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn find_and_delete_by_reference() {
        let store: Arc<dyn Storage> = Arc::new(MemoryStore::new());
        let aluguel = Repository::<Aluguel>::new(store.clone())
            .create(&aluguel())
            .await
            .unwrap();
        let produto = Repository::<Produto>::new(store.clone())
            .create(&produto())
            .await
            .unwrap();
        let lines = Repository::<AluguelProduto>::new(store);

        for _ in 0..2 {
            lines.create(&line(aluguel.id, produto.id)).await.unwrap();
        }

        assert_eq!(lines.find_by("aluguel", aluguel.id).await.unwrap().len(), 2);
        assert_eq!(lines.delete_by("aluguel", aluguel.id).await.unwrap(), 2);
        assert!(lines.find_by("aluguel", aluguel.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_reference_is_rejected() {
        let store: Arc<dyn Storage> = Arc::new(MemoryStore::new());
        let produtos = Repository::<Produto>::new(store.clone());

        let err = produtos
            .create(&Produto {
                categoria: Some(Uuid::new_v4()),
                ..produto()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Missing("Classificação não encontrada")));

        let categoria = Repository::<Classificacao>::new(store)
            .create(&classificacao("Andaimes"))
            .await
            .unwrap();
        let created = produtos
            .create(&Produto {
                categoria: Some(categoria.id),
                ..produto()
            })
            .await
            .unwrap();

        let err = produtos
            .update(created.id, patch(json!({"fornecedor": Uuid::new_v4()})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Missing("Fornecedor não encontrado")));
    }

    #[tokio::test]
    async fn referenced_row_cannot_be_deleted() {
        let store: Arc<dyn Storage> = Arc::new(MemoryStore::new());
        let alugueis = Repository::<Aluguel>::new(store.clone());
        let produtos = Repository::<Produto>::new(store.clone());
        let lines = Repository::<AluguelProduto>::new(store);
        let aluguel = alugueis.create(&aluguel()).await.unwrap();
        let produto = produtos.create(&produto()).await.unwrap();
        lines.create(&line(aluguel.id, produto.id)).await.unwrap();

        let err = produtos.delete(produto.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref m) if m.contains("aluguel_produto")));

        lines.delete_by("produto", produto.id).await.unwrap();
        assert!(produtos.delete(produto.id).await.unwrap());
    }
}
