// src/db/itens_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_foreign_key_violation, map_unique_violation},
        error::AppError,
    },
    domain::saldo::{Consumo, TipoOrdem},
    models::contratos::{ItemContrato, ItemContratoPayload},
};

/// Consumo faturado agrupado por item.
#[derive(Debug, Clone, FromRow)]
pub struct ConsumoPorItem {
    pub item_contrato_id: Uuid,
    pub quantidade: Decimal,
    pub valor: Decimal,
}

impl ConsumoPorItem {
    pub fn consumo(&self) -> Consumo {
        Consumo { quantidade: self.quantidade, valor: self.valor }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AtivacaoItem {
    pub item_contrato_id: Uuid,
    pub data_ativacao: NaiveDate,
}

fn tabela_ordens(tipo: TipoOrdem) -> &'static str {
    match tipo {
        TipoOrdem::Fornecimento => "ordens_fornecimento",
        TipoOrdem::Servico => "ordens_servico",
    }
}

#[derive(Clone, Default)]
pub struct ItemContratoRepository;

impl ItemContratoRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        contrato_id: Uuid,
        payload: &ItemContratoPayload,
        vigencia_produto: Option<i32>,
        valor_total: Decimal,
    ) -> Result<ItemContrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ItemContrato>(
            r#"
            INSERT INTO itens_contrato (
                contrato_id, lote, numero_item, descricao, tipo, unidade, quantidade,
                saldo_quantidade_inicial, valor_unitario, valor_total, vigencia_produto
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(contrato_id)
        .bind(payload.lote)
        .bind(payload.numero_item.trim())
        .bind(&payload.descricao)
        .bind(payload.tipo)
        .bind(&payload.unidade)
        .bind(payload.quantidade)
        .bind(payload.valor_unitario)
        .bind(valor_total)
        .bind(vigencia_produto)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "numeroItem"))
    }

    /// `saldo_quantidade_inicial` fica com o valor da criação.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &ItemContratoPayload,
        vigencia_produto: Option<i32>,
        valor_total: Decimal,
    ) -> Result<ItemContrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ItemContrato>(
            r#"
            UPDATE itens_contrato SET
                lote = $2, numero_item = $3, descricao = $4, tipo = $5, unidade = $6,
                quantidade = $7, valor_unitario = $8,
                valor_total = $9, vigencia_produto = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.lote)
        .bind(payload.numero_item.trim())
        .bind(&payload.descricao)
        .bind(payload.tipo)
        .bind(&payload.unidade)
        .bind(payload.quantidade)
        .bind(payload.valor_unitario)
        .bind(valor_total)
        .bind(vigencia_produto)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, "numeroItem"))?
        .ok_or_else(|| AppError::ResourceNotFound("Item do contrato".into()))
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<ItemContrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ItemContrato>("SELECT * FROM itens_contrato WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Item do contrato".into()))
    }

    /// Serializa emissões concorrentes contra o mesmo saldo.
    pub async fn get_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<ItemContrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ItemContrato>("SELECT * FROM itens_contrato WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Item do contrato".into()))
    }

    pub async fn list_by_contrato<'e, E>(&self, executor: E, contrato_id: Uuid) -> Result<Vec<ItemContrato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let itens = sqlx::query_as::<_, ItemContrato>(
            r#"
            SELECT * FROM itens_contrato
            WHERE contrato_id = $1
            ORDER BY lote, LPAD(numero_item, 10, '0'), numero_item
            "#,
        )
        .bind(contrato_id)
        .fetch_all(executor)
        .await?;

        Ok(itens)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM itens_contrato WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(map_foreign_key_violation)?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Item do contrato".into()));
        }
        Ok(())
    }

    pub async fn soma_valor_total<'e, E>(&self, executor: E, contrato_id: Uuid) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: Decimal =
            sqlx::query_scalar("SELECT COALESCE(SUM(valor_total), 0) FROM itens_contrato WHERE contrato_id = $1")
                .bind(contrato_id)
                .fetch_one(executor)
                .await?;

        Ok(total)
    }

    // =========================================================================
    //  CONSUMO (apenas ordens faturadas)
    // =========================================================================

    pub async fn consumo_por_item<'e, E>(
        &self,
        executor: E,
        contrato_id: Uuid,
        tipo: TipoOrdem,
    ) -> Result<Vec<ConsumoPorItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT item_contrato_id,
                   COALESCE(SUM(quantidade), 0) AS quantidade,
                   COALESCE(SUM(valor_total), 0) AS valor
            FROM {}
            WHERE contrato_id = $1 AND status = 'faturada'
            GROUP BY item_contrato_id
            "#,
            tabela_ordens(tipo)
        );

        let consumos = sqlx::query_as::<_, ConsumoPorItem>(&sql)
            .bind(contrato_id)
            .fetch_all(executor)
            .await?;

        Ok(consumos)
    }

    /// Consumo faturado de um item, desconsiderando a ordem `excluindo`.
    pub async fn consumo_item<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        tipo: TipoOrdem,
        excluindo: Option<Uuid>,
    ) -> Result<Consumo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT COALESCE(SUM(quantidade), 0) AS quantidade,
                   COALESCE(SUM(valor_total), 0) AS valor
            FROM {}
            WHERE item_contrato_id = $1
              AND status = 'faturada'
              AND ($2::uuid IS NULL OR id <> $2)
            "#,
            tabela_ordens(tipo)
        );

        let consumo = sqlx::query_as::<_, Consumo>(&sql)
            .bind(item_id)
            .bind(excluindo)
            .fetch_one(executor)
            .await?;

        Ok(consumo)
    }

    /// Datas de ativação das OFs faturadas do contrato.
    pub async fn ativacoes<'e, E>(&self, executor: E, contrato_id: Uuid) -> Result<Vec<AtivacaoItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ativacoes = sqlx::query_as::<_, AtivacaoItem>(
            r#"
            SELECT item_contrato_id, data_ativacao
            FROM ordens_fornecimento
            WHERE contrato_id = $1 AND status = 'faturada' AND data_ativacao IS NOT NULL
            "#,
        )
        .bind(contrato_id)
        .fetch_all(executor)
        .await?;

        Ok(ativacoes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cada_tipo_de_ordem_le_sua_tabela() {
        assert_eq!(tabela_ordens(TipoOrdem::Fornecimento), "ordens_fornecimento");
        assert_eq!(tabela_ordens(TipoOrdem::Servico), "ordens_servico");
    }
}
