// src/services/fornecedor_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    db::FornecedorRepository,
    domain::fornecedores::{self, FORNECEDOR_OUTRO},
    models::fornecedores::{ItemFornecedor, ItemFornecedorFiltro, ItemFornecedorPayload},
};

#[derive(Clone)]
pub struct FornecedorService {
    repo: FornecedorRepository,
}

impl FornecedorService {
    pub fn new(repo: FornecedorRepository) -> Self {
        Self { repo }
    }

    pub async fn create_item<'e, E>(&self, executor: E, payload: &ItemFornecedorPayload) -> Result<ItemFornecedor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let fornecedor = fornecedor_validado(payload)?;
        self.repo.create(executor, &fornecedor, payload).await
    }

    pub async fn update_item<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &ItemFornecedorPayload,
    ) -> Result<ItemFornecedor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let fornecedor = fornecedor_validado(payload)?;
        self.repo.update(executor, id, &fornecedor, payload).await
    }

    pub async fn get_item<'e, E>(&self, executor: E, id: Uuid) -> Result<ItemFornecedor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.get(executor, id).await
    }

    pub async fn list_itens<'e, E>(&self, executor: E, filtro: &ItemFornecedorFiltro) -> Result<Vec<ItemFornecedor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor, filtro).await
    }

    pub async fn delete_item<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete(executor, id).await
    }
}

/// Nome normalizado do fornecedor; "OUTRO FORNECEDOR" exige o nome em `outroFornecedor`.
fn fornecedor_validado(payload: &ItemFornecedorPayload) -> Result<String, AppError> {
    let fornecedor = fornecedores::normalizar(&payload.fornecedor);

    let outro_vazio = payload.outro_fornecedor.as_deref().map_or(true, |o| o.trim().is_empty());
    if fornecedor == FORNECEDOR_OUTRO && outro_vazio {
        let mut errors = ValidationErrors::new();
        errors.add("outroFornecedor", ValidationError::new("required"));
        return Err(AppError::ValidationError(errors));
    }

    Ok(fornecedor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fornecedores::TipoItemFornecedor;
    use rust_decimal::Decimal;

    fn payload(fornecedor: &str, outro: Option<&str>) -> ItemFornecedorPayload {
        ItemFornecedorPayload {
            fornecedor: fornecedor.into(),
            outro_fornecedor: outro.map(str::to_string),
            tipo: TipoItemFornecedor::Produto,
            sku: "SKU-1".into(),
            descricao: "Appliance".into(),
            unidade: "UN".into(),
            valor_unitario: Decimal::from(100),
            observacoes: None,
        }
    }

    #[test]
    fn fornecedor_e_normalizado() {
        assert_eq!(fornecedor_validado(&payload(" Red hat ", None)).unwrap(), "RED HAT");
    }

    #[test]
    fn outro_fornecedor_exige_nome() {
        let err = fornecedor_validado(&payload("Outro Fornecedor", Some("  "))).unwrap_err();
        match err {
            AppError::ValidationError(errors) => assert!(errors.field_errors().contains_key("outroFornecedor")),
            outro => panic!("erro inesperado: {:?}", outro),
        }

        assert!(fornecedor_validado(&payload("OUTRO FORNECEDOR", Some("Acme"))).is_ok());
    }
}
