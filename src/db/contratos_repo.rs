// src/db/contratos_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_foreign_key_violation, map_unique_violation},
        error::AppError,
    },
    domain::rollup::ContratoRollup,
    models::{
        contratos::{
            AditivoPayload, Contrato, ContratoFiltro, ContratoPayload, OrigemContrato, RegimeLegal,
            SituacaoContrato, TermoAditivo,
        },
        lookup::ContratoOpcao,
    },
};

/// Campos do contrato já normalizados pelo serviço.
#[derive(Debug, Clone)]
pub struct DadosContrato<'a> {
    pub payload: &'a ContratoPayload,
    pub regime_legal: RegimeLegal,
    pub origem_contrato: OrigemContrato,
    pub fornecedores: Vec<String>,
}

#[derive(Clone, Default)]
pub struct ContratoRepository;

impl ContratoRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  CONTRATOS
    // =========================================================================

    pub async fn create<'e, E>(
        &self,
        executor: E,
        dados: &DadosContrato<'_>,
        data_fim_atual: NaiveDate,
    ) -> Result<Contrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let p = dados.payload;
        sqlx::query_as::<_, Contrato>(
            r#"
            INSERT INTO contratos (
                cliente_id, numero_contrato, objeto, ata_registro_preco, pregao_eletronico,
                processo, termo_referencia, regime_legal, origem_contrato, vigencia,
                data_assinatura, fornecedores, vigencia_total_meses, data_fim_atual
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $10, $13)
            RETURNING *
            "#,
        )
        .bind(p.cliente_id)
        .bind(p.numero_contrato.trim())
        .bind(&p.objeto)
        .bind(&p.ata_registro_preco)
        .bind(&p.pregao_eletronico)
        .bind(&p.processo)
        .bind(&p.termo_referencia)
        .bind(dados.regime_legal)
        .bind(dados.origem_contrato)
        .bind(p.vigencia)
        .bind(p.data_assinatura)
        .bind(&dados.fornecedores)
        .bind(data_fim_atual)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "numeroContrato"))
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, dados: &DadosContrato<'_>) -> Result<Contrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let p = dados.payload;
        sqlx::query_as::<_, Contrato>(
            r#"
            UPDATE contratos SET
                cliente_id = $2, numero_contrato = $3, objeto = $4, ata_registro_preco = $5,
                pregao_eletronico = $6, processo = $7, termo_referencia = $8,
                regime_legal = $9, origem_contrato = $10, vigencia = $11,
                data_assinatura = $12, fornecedores = $13, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(p.cliente_id)
        .bind(p.numero_contrato.trim())
        .bind(&p.objeto)
        .bind(&p.ata_registro_preco)
        .bind(&p.pregao_eletronico)
        .bind(&p.processo)
        .bind(&p.termo_referencia)
        .bind(dados.regime_legal)
        .bind(dados.origem_contrato)
        .bind(p.vigencia)
        .bind(p.data_assinatura)
        .bind(&dados.fornecedores)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, "numeroContrato"))?
        .ok_or_else(|| AppError::ResourceNotFound("Contrato".into()))
    }

    /// Copia o novo cliente para as ordens e feedbacks do contrato.
    pub async fn propagar_cliente<'e, E>(&self, executor: E, contrato_id: Uuid, cliente_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            WITH ofs AS (
                UPDATE ordens_fornecimento SET cliente_id = $2, updated_at = NOW()
                WHERE contrato_id = $1 AND cliente_id <> $2
            ),
            oss AS (
                UPDATE ordens_servico SET cliente_id = $2, updated_at = NOW()
                WHERE contrato_id = $1 AND cliente_id <> $2
            )
            UPDATE feedbacks_contato SET cliente_id = $2
            WHERE contrato_id = $1 AND cliente_id <> $2
            "#,
        )
        .bind(contrato_id)
        .bind(cliente_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<Contrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Contrato>("SELECT * FROM contratos WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Contrato".into()))
    }

    /// Trava a linha do contrato até o fim da transação.
    pub async fn get_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Contrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Contrato>("SELECT * FROM contratos WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Contrato".into()))
    }

    pub async fn find_by_numero<'e, E>(&self, executor: E, numero: &str) -> Result<Option<Contrato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contrato = sqlx::query_as::<_, Contrato>("SELECT * FROM contratos WHERE numero_contrato = $1")
            .bind(numero.trim())
            .fetch_optional(executor)
            .await?;

        Ok(contrato)
    }

    pub async fn list<'e, E>(&self, executor: E, filtro: &ContratoFiltro) -> Result<Vec<Contrato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let numero = filtro.numero.as_deref().map(|n| format!("%{}%", n.trim()));

        let contratos = sqlx::query_as::<_, Contrato>(
            r#"
            SELECT * FROM contratos
            WHERE ($1::uuid IS NULL OR cliente_id = $1)
              AND ($2::situacao_contrato IS NULL OR situacao = $2)
              AND ($3::text IS NULL OR numero_contrato ILIKE $3)
            ORDER BY data_assinatura DESC, numero_contrato
            "#,
        )
        .bind(filtro.cliente_id)
        .bind(filtro.situacao)
        .bind(numero)
        .fetch_all(executor)
        .await?;

        Ok(contratos)
    }

    /// Contratos ativos que vencem no intervalo (hoje, ate].
    pub async fn list_vencendo<'e, E>(&self, executor: E, hoje: NaiveDate, ate: NaiveDate) -> Result<Vec<Contrato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contratos = sqlx::query_as::<_, Contrato>(
            r#"
            SELECT * FROM contratos
            WHERE situacao = 'ATIVO' AND data_fim_atual > $1 AND data_fim_atual <= $2
            ORDER BY data_fim_atual
            "#,
        )
        .bind(hoje)
        .bind(ate)
        .fetch_all(executor)
        .await?;

        Ok(contratos)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM contratos WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(map_foreign_key_violation)?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Contrato".into()));
        }
        Ok(())
    }

    pub async fn update_rollup<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        rollup: &ContratoRollup,
        situacao: SituacaoContrato,
    ) -> Result<Contrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contrato = sqlx::query_as::<_, Contrato>(
            r#"
            UPDATE contratos SET
                valor_inicial = $2, valor_atual = $3, vigencia_total_meses = $4,
                data_fim_atual = $5, situacao = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(rollup.valor_inicial)
        .bind(rollup.valor_atual)
        .bind(rollup.vigencia_total_meses)
        .bind(rollup.data_fim_atual)
        .bind(situacao)
        .fetch_one(executor)
        .await?;

        Ok(contrato)
    }

    /// Reavalia a situação de todos os contratos em relação a `hoje`.
    pub async fn atualizar_situacoes<'e, E>(&self, executor: E, hoje: NaiveDate) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE contratos SET
                situacao = CASE WHEN data_fim_atual >= $1
                                THEN 'ATIVO'::situacao_contrato
                                ELSE 'INATIVO'::situacao_contrato END,
                updated_at = NOW()
            WHERE situacao <> CASE WHEN data_fim_atual >= $1
                                   THEN 'ATIVO'::situacao_contrato
                                   ELSE 'INATIVO'::situacao_contrato END
            "#,
        )
        .bind(hoje)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_opcoes_por_cliente<'e, E>(&self, executor: E, cliente_id: Uuid) -> Result<Vec<ContratoOpcao>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let opcoes = sqlx::query_as::<_, ContratoOpcao>(
            "SELECT id, numero_contrato AS numero FROM contratos WHERE cliente_id = $1 ORDER BY numero_contrato",
        )
        .bind(cliente_id)
        .fetch_all(executor)
        .await?;

        Ok(opcoes)
    }

    // =========================================================================
    //  TERMOS ADITIVOS
    // =========================================================================

    pub async fn create_aditivo<'e, E>(
        &self,
        executor: E,
        contrato_id: Uuid,
        payload: &AditivoPayload,
    ) -> Result<TermoAditivo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, TermoAditivo>(
            r#"
            INSERT INTO termos_aditivos (
                contrato_id, numero_termo, tipo, meses_acrescimo, valor_acrescimo,
                data_assinatura, justificativa
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(contrato_id)
        .bind(payload.numero_termo.trim())
        .bind(payload.tipo)
        .bind(payload.meses_acrescimo)
        .bind(payload.valor_acrescimo)
        .bind(payload.data_assinatura)
        .bind(&payload.justificativa)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "numeroTermo"))
    }

    pub async fn update_aditivo<'e, E>(
        &self,
        executor: E,
        contrato_id: Uuid,
        aditivo_id: Uuid,
        payload: &AditivoPayload,
    ) -> Result<TermoAditivo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, TermoAditivo>(
            r#"
            UPDATE termos_aditivos SET
                numero_termo = $3, tipo = $4, meses_acrescimo = $5, valor_acrescimo = $6,
                data_assinatura = $7, justificativa = $8
            WHERE id = $1 AND contrato_id = $2
            RETURNING *
            "#,
        )
        .bind(aditivo_id)
        .bind(contrato_id)
        .bind(payload.numero_termo.trim())
        .bind(payload.tipo)
        .bind(payload.meses_acrescimo)
        .bind(payload.valor_acrescimo)
        .bind(payload.data_assinatura)
        .bind(&payload.justificativa)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, "numeroTermo"))?
        .ok_or_else(|| AppError::ResourceNotFound("Termo aditivo".into()))
    }

    pub async fn list_aditivos<'e, E>(&self, executor: E, contrato_id: Uuid) -> Result<Vec<TermoAditivo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let aditivos = sqlx::query_as::<_, TermoAditivo>(
            "SELECT * FROM termos_aditivos WHERE contrato_id = $1 ORDER BY data_assinatura, created_at",
        )
        .bind(contrato_id)
        .fetch_all(executor)
        .await?;

        Ok(aditivos)
    }

    pub async fn delete_aditivo<'e, E>(&self, executor: E, contrato_id: Uuid, aditivo_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM termos_aditivos WHERE id = $1 AND contrato_id = $2")
            .bind(aditivo_id)
            .bind(contrato_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Termo aditivo".into()));
        }
        Ok(())
    }
}
