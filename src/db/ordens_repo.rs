// src/db/ordens_repo.rs

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::ordens::{AtualizaOrdemFornecimento, OrdemFiltro, OrdemFornecimento, OrdemServico, StatusOrdem},
};

/// Referências comuns a OF e OS.
#[derive(Debug, Clone, Copy)]
pub struct VinculoOrdem {
    pub cliente_id: Uuid,
    pub contrato_id: Uuid,
    pub item_contrato_id: Uuid,
    pub item_fornecedor_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct DadosOrdemFornecimento {
    pub numero_of_cliente: Option<String>,
    pub unidade: String,
    pub quantidade: Decimal,
    pub vigencia_produto: Option<i32>,
    pub valor_unitario: Decimal,
    pub valor_total: Decimal,
    pub observacoes: Option<String>,
}

/// Campos editáveis da OS, com horas e término já calculados.
#[derive(Debug, Clone)]
pub struct DadosOrdemServico {
    pub numero_os_cliente: Option<String>,
    pub gerente_projetos: Option<String>,
    pub consultor_tecnico: Option<String>,
    pub quantidade: Decimal,
    pub valor_unitario: Decimal,
    pub valor_total: Decimal,
    pub custo_previsto: Decimal,
    pub data_inicio: NaiveDate,
    pub hora_inicio: NaiveTime,
    pub data_termino: Option<NaiveDate>,
    pub hora_termino: Option<NaiveTime>,
    pub horas_consultor: Option<Decimal>,
    pub horas_gerente: Option<Decimal>,
    pub horas_totais: Decimal,
    pub observacoes: Option<String>,
}

/// Campos alterados por uma mudança de status.
#[derive(Debug, Clone)]
pub struct MudancaStatus {
    pub status: StatusOrdem,
    pub data_conclusao: Option<NaiveDate>,
    pub data_faturamento: Option<NaiveDate>,
    pub numero_nota_fiscal: Option<String>,
}

#[derive(Clone, Default)]
pub struct OrdemRepository;

impl OrdemRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  ORDENS DE FORNECIMENTO
    // =========================================================================

    pub async fn create_of<'e, E>(
        &self,
        executor: E,
        numero_of: &str,
        vinculo: VinculoOrdem,
        dados: &DadosOrdemFornecimento,
    ) -> Result<OrdemFornecimento, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, OrdemFornecimento>(
            r#"
            INSERT INTO ordens_fornecimento (
                numero_of, numero_of_cliente, cliente_id, contrato_id, item_contrato_id,
                item_fornecedor_id, unidade, quantidade, vigencia_produto, valor_unitario,
                valor_total, observacoes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(numero_of)
        .bind(&dados.numero_of_cliente)
        .bind(vinculo.cliente_id)
        .bind(vinculo.contrato_id)
        .bind(vinculo.item_contrato_id)
        .bind(vinculo.item_fornecedor_id)
        .bind(&dados.unidade)
        .bind(dados.quantidade)
        .bind(dados.vigencia_produto)
        .bind(dados.valor_unitario)
        .bind(dados.valor_total)
        .bind(&dados.observacoes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "numeroOf"))
    }

    pub async fn update_of<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &AtualizaOrdemFornecimento,
        valor_total: Decimal,
    ) -> Result<OrdemFornecimento, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, OrdemFornecimento>(
            r#"
            UPDATE ordens_fornecimento SET
                numero_of_cliente = $2, quantidade = $3, valor_total = $4,
                data_ativacao = COALESCE($5, data_ativacao), observacoes = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.numero_of_cliente)
        .bind(payload.quantidade)
        .bind(valor_total)
        .bind(payload.data_ativacao)
        .bind(&payload.observacoes)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Ordem de fornecimento".into()))
    }

    pub async fn get_of<'e, E>(&self, executor: E, id: Uuid) -> Result<OrdemFornecimento, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, OrdemFornecimento>("SELECT * FROM ordens_fornecimento WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Ordem de fornecimento".into()))
    }

    pub async fn get_of_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<OrdemFornecimento, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, OrdemFornecimento>("SELECT * FROM ordens_fornecimento WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Ordem de fornecimento".into()))
    }

    pub async fn list_of<'e, E>(&self, executor: E, filtro: &OrdemFiltro) -> Result<Vec<OrdemFornecimento>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ordens = sqlx::query_as::<_, OrdemFornecimento>(
            r#"
            SELECT * FROM ordens_fornecimento
            WHERE ($1::uuid IS NULL OR contrato_id = $1)
              AND ($2::uuid IS NULL OR item_contrato_id = $2)
              AND ($3::status_ordem IS NULL OR status = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filtro.contrato_id)
        .bind(filtro.item_contrato_id)
        .bind(filtro.status)
        .fetch_all(executor)
        .await?;

        Ok(ordens)
    }

    pub async fn update_status_of<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        mudanca: &MudancaStatus,
    ) -> Result<OrdemFornecimento, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ordem = sqlx::query_as::<_, OrdemFornecimento>(
            r#"
            UPDATE ordens_fornecimento SET
                status = $2, data_ativacao = $3, data_faturamento = $4,
                numero_nota_fiscal = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mudanca.status)
        .bind(mudanca.data_conclusao)
        .bind(mudanca.data_faturamento)
        .bind(&mudanca.numero_nota_fiscal)
        .fetch_one(executor)
        .await?;

        Ok(ordem)
    }

    pub async fn delete_of<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM ordens_fornecimento WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Ordem de fornecimento".into()));
        }
        Ok(())
    }

    // =========================================================================
    //  ORDENS DE SERVIÇO
    // =========================================================================

    pub async fn create_os<'e, E>(
        &self,
        executor: E,
        numero_os: &str,
        vinculo: VinculoOrdem,
        unidade: &str,
        dados: &DadosOrdemServico,
    ) -> Result<OrdemServico, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, OrdemServico>(
            r#"
            INSERT INTO ordens_servico (
                numero_os, numero_os_cliente, cliente_id, contrato_id, item_contrato_id,
                item_fornecedor_id, gerente_projetos, consultor_tecnico, unidade, quantidade,
                valor_unitario, valor_total, custo_previsto, data_inicio, hora_inicio,
                data_termino, hora_termino, horas_consultor, horas_gerente, horas_totais,
                observacoes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21)
            RETURNING *
            "#,
        )
        .bind(numero_os)
        .bind(&dados.numero_os_cliente)
        .bind(vinculo.cliente_id)
        .bind(vinculo.contrato_id)
        .bind(vinculo.item_contrato_id)
        .bind(vinculo.item_fornecedor_id)
        .bind(&dados.gerente_projetos)
        .bind(&dados.consultor_tecnico)
        .bind(unidade)
        .bind(dados.quantidade)
        .bind(dados.valor_unitario)
        .bind(dados.valor_total)
        .bind(dados.custo_previsto)
        .bind(dados.data_inicio)
        .bind(dados.hora_inicio)
        .bind(dados.data_termino)
        .bind(dados.hora_termino)
        .bind(dados.horas_consultor)
        .bind(dados.horas_gerente)
        .bind(dados.horas_totais)
        .bind(&dados.observacoes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "numeroOs"))
    }

    pub async fn update_os<'e, E>(&self, executor: E, id: Uuid, dados: &DadosOrdemServico) -> Result<OrdemServico, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, OrdemServico>(
            r#"
            UPDATE ordens_servico SET
                numero_os_cliente = $2, gerente_projetos = $3, consultor_tecnico = $4,
                quantidade = $5, valor_unitario = $6, valor_total = $7, custo_previsto = $8,
                data_inicio = $9, hora_inicio = $10, data_termino = $11, hora_termino = $12,
                horas_consultor = $13, horas_gerente = $14, horas_totais = $15,
                observacoes = $16, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dados.numero_os_cliente)
        .bind(&dados.gerente_projetos)
        .bind(&dados.consultor_tecnico)
        .bind(dados.quantidade)
        .bind(dados.valor_unitario)
        .bind(dados.valor_total)
        .bind(dados.custo_previsto)
        .bind(dados.data_inicio)
        .bind(dados.hora_inicio)
        .bind(dados.data_termino)
        .bind(dados.hora_termino)
        .bind(dados.horas_consultor)
        .bind(dados.horas_gerente)
        .bind(dados.horas_totais)
        .bind(&dados.observacoes)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Ordem de serviço".into()))
    }

    pub async fn get_os<'e, E>(&self, executor: E, id: Uuid) -> Result<OrdemServico, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, OrdemServico>("SELECT * FROM ordens_servico WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Ordem de serviço".into()))
    }

    pub async fn get_os_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<OrdemServico, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, OrdemServico>("SELECT * FROM ordens_servico WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Ordem de serviço".into()))
    }

    pub async fn list_os<'e, E>(&self, executor: E, filtro: &OrdemFiltro) -> Result<Vec<OrdemServico>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ordens = sqlx::query_as::<_, OrdemServico>(
            r#"
            SELECT * FROM ordens_servico
            WHERE ($1::uuid IS NULL OR contrato_id = $1)
              AND ($2::uuid IS NULL OR item_contrato_id = $2)
              AND ($3::status_ordem IS NULL OR status = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filtro.contrato_id)
        .bind(filtro.item_contrato_id)
        .bind(filtro.status)
        .fetch_all(executor)
        .await?;

        Ok(ordens)
    }

    pub async fn update_status_os<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        mudanca: &MudancaStatus,
    ) -> Result<OrdemServico, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ordem = sqlx::query_as::<_, OrdemServico>(
            r#"
            UPDATE ordens_servico SET
                status = $2, data_emissao_trd = $3, data_faturamento = $4,
                numero_nota_fiscal = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mudanca.status)
        .bind(mudanca.data_conclusao)
        .bind(mudanca.data_faturamento)
        .bind(&mudanca.numero_nota_fiscal)
        .fetch_one(executor)
        .await?;

        Ok(ordem)
    }

    pub async fn delete_os<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM ordens_servico WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Ordem de serviço".into()));
        }
        Ok(())
    }

    /// Copia para a OS vinculada ao projeto as horas planejadas e lançadas nas tarefas.
    /// Recalcula pela OS, útil quando o projeto vinculado já foi removido.
    pub async fn recalcular_horas_da_os<'e, E>(&self, executor: E, ordem_servico_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE ordens_servico os SET
                horas_planejadas = COALESCE(
                    (SELECT SUM(t.horas_planejadas)
                     FROM tarefas t
                     JOIN projetos p ON p.id = t.projeto_id
                     WHERE p.ordem_servico_id = os.id), 0),
                horas_realizadas = COALESCE(
                    (SELECT SUM(l.horas)
                     FROM lancamentos_hora l
                     JOIN tarefas t ON t.id = l.tarefa_id
                     JOIN projetos p ON p.id = t.projeto_id
                     WHERE p.ordem_servico_id = os.id), 0),
                updated_at = NOW()
            WHERE os.id = $1
            "#,
        )
        .bind(ordem_servico_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn recalcular_horas_os<'e, E>(&self, executor: E, projeto_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE ordens_servico os SET
                horas_planejadas = COALESCE(
                    (SELECT SUM(t.horas_planejadas) FROM tarefas t WHERE t.projeto_id = p.id), 0),
                horas_realizadas = COALESCE(
                    (SELECT SUM(l.horas)
                     FROM lancamentos_hora l
                     JOIN tarefas t ON t.id = l.tarefa_id
                     WHERE t.projeto_id = p.id), 0),
                updated_at = NOW()
            FROM projetos p
            WHERE p.id = $1 AND os.id = p.ordem_servico_id
            "#,
        )
        .bind(projeto_id)
        .execute(executor)
        .await?;

        Ok(())
    }
}
