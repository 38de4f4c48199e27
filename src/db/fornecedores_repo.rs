// src/db/fornecedores_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_foreign_key_violation, error::AppError},
    models::fornecedores::{ItemFornecedor, ItemFornecedorFiltro, ItemFornecedorPayload, TipoItemFornecedor},
};

#[derive(Clone, Default)]
pub struct FornecedorRepository;

impl FornecedorRepository {
    pub fn new() -> Self {
        Self
    }

    /// `fornecedor` chega já normalizado.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        fornecedor: &str,
        payload: &ItemFornecedorPayload,
    ) -> Result<ItemFornecedor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, ItemFornecedor>(
            r#"
            INSERT INTO itens_fornecedor (
                fornecedor, outro_fornecedor, tipo, sku, descricao, unidade, valor_unitario, observacoes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(fornecedor)
        .bind(&payload.outro_fornecedor)
        .bind(payload.tipo)
        .bind(payload.sku.trim())
        .bind(&payload.descricao)
        .bind(&payload.unidade)
        .bind(payload.valor_unitario)
        .bind(&payload.observacoes)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        fornecedor: &str,
        payload: &ItemFornecedorPayload,
    ) -> Result<ItemFornecedor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ItemFornecedor>(
            r#"
            UPDATE itens_fornecedor SET
                fornecedor = $2, outro_fornecedor = $3, tipo = $4, sku = $5, descricao = $6,
                unidade = $7, valor_unitario = $8, observacoes = $9, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fornecedor)
        .bind(&payload.outro_fornecedor)
        .bind(payload.tipo)
        .bind(payload.sku.trim())
        .bind(&payload.descricao)
        .bind(&payload.unidade)
        .bind(payload.valor_unitario)
        .bind(&payload.observacoes)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Item do fornecedor".into()))
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<ItemFornecedor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ItemFornecedor>("SELECT * FROM itens_fornecedor WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Item do fornecedor".into()))
    }

    pub async fn list<'e, E>(&self, executor: E, filtro: &ItemFornecedorFiltro) -> Result<Vec<ItemFornecedor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let fornecedor = filtro.fornecedor.as_deref().map(|f| format!("%{}%", f.trim()));

        let itens = sqlx::query_as::<_, ItemFornecedor>(
            r#"
            SELECT * FROM itens_fornecedor
            WHERE ($1::text IS NULL OR fornecedor ILIKE $1 OR outro_fornecedor ILIKE $1)
              AND ($2::tipo_item_fornecedor IS NULL OR tipo = $2)
            ORDER BY fornecedor, sku
            "#,
        )
        .bind(fornecedor)
        .bind(filtro.tipo)
        .fetch_all(executor)
        .await?;

        Ok(itens)
    }

    /// Itens de um tipo cujos fornecedores constam na lista do contrato.
    pub async fn list_por_tipo_e_fornecedores<'e, E>(
        &self,
        executor: E,
        tipo: TipoItemFornecedor,
        fornecedores: &[String],
    ) -> Result<Vec<ItemFornecedor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let itens = sqlx::query_as::<_, ItemFornecedor>(
            r#"
            SELECT * FROM itens_fornecedor
            WHERE tipo = $1 AND fornecedor = ANY($2)
            ORDER BY fornecedor, sku
            "#,
        )
        .bind(tipo)
        .bind(fornecedores)
        .fetch_all(executor)
        .await?;

        Ok(itens)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM itens_fornecedor WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(map_foreign_key_violation)?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Item do fornecedor".into()));
        }
        Ok(())
    }
}
