// src/db/projetos_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::projetos::{
        FeedbackContato, FeedbackFiltro, LancamentoHora, LancamentoHoraPayload, Projeto, ProjetoFiltro,
        ProjetoPayload, Sprint, SprintPayload, StatusProjeto, StatusSprint, StatusTarefa, Tarefa, TarefaPayload,
    },
};

#[derive(Clone, Default)]
pub struct ProjetoRepository;

impl ProjetoRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  PROJETOS
    // =========================================================================

    pub async fn create<'e, E>(&self, executor: E, payload: &ProjetoPayload) -> Result<Projeto, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Projeto>(
            r#"
            INSERT INTO projetos (contrato_id, ordem_servico_id, nome, descricao, data_inicio, data_fim_prevista)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(payload.contrato_id)
        .bind(payload.ordem_servico_id)
        .bind(&payload.nome)
        .bind(&payload.descricao)
        .bind(payload.data_inicio)
        .bind(payload.data_fim_prevista)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "ordemServicoId"))
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<Projeto, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Projeto>("SELECT * FROM projetos WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Projeto".into()))
    }

    pub async fn list<'e, E>(&self, executor: E, filtro: &ProjetoFiltro) -> Result<Vec<Projeto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let projetos = sqlx::query_as::<_, Projeto>(
            r#"
            SELECT * FROM projetos
            WHERE ($1::uuid IS NULL OR contrato_id = $1)
              AND ($2::status_projeto IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filtro.contrato_id)
        .bind(filtro.status)
        .fetch_all(executor)
        .await?;

        Ok(projetos)
    }

    pub async fn update_status<'e, E>(&self, executor: E, id: Uuid, status: StatusProjeto) -> Result<Projeto, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Projeto>("UPDATE projetos SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Projeto".into()))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM projetos WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Projeto".into()));
        }
        Ok(())
    }

    // =========================================================================
    //  SPRINTS
    // =========================================================================

    pub async fn create_sprint<'e, E>(&self, executor: E, projeto_id: Uuid, payload: &SprintPayload) -> Result<Sprint, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sprint = sqlx::query_as::<_, Sprint>(
            r#"
            INSERT INTO sprints (projeto_id, nome, data_inicio, data_fim)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(projeto_id)
        .bind(&payload.nome)
        .bind(payload.data_inicio)
        .bind(payload.data_fim)
        .fetch_one(executor)
        .await?;

        Ok(sprint)
    }

    pub async fn get_sprint<'e, E>(&self, executor: E, id: Uuid) -> Result<Sprint, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Sprint>("SELECT * FROM sprints WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Sprint".into()))
    }

    pub async fn list_sprints<'e, E>(&self, executor: E, projeto_id: Uuid) -> Result<Vec<Sprint>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sprints = sqlx::query_as::<_, Sprint>("SELECT * FROM sprints WHERE projeto_id = $1 ORDER BY data_inicio")
            .bind(projeto_id)
            .fetch_all(executor)
            .await?;

        Ok(sprints)
    }

    pub async fn update_sprint_status<'e, E>(&self, executor: E, id: Uuid, status: StatusSprint) -> Result<Sprint, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Sprint>("UPDATE sprints SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Sprint".into()))
    }

    pub async fn delete_sprint<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM sprints WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Sprint".into()));
        }
        Ok(())
    }

    // =========================================================================
    //  TAREFAS
    // =========================================================================

    pub async fn create_tarefa<'e, E>(&self, executor: E, projeto_id: Uuid, payload: &TarefaPayload) -> Result<Tarefa, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tarefa = sqlx::query_as::<_, Tarefa>(
            r#"
            INSERT INTO tarefas (
                projeto_id, sprint_id, titulo, descricao, responsavel, horas_planejadas, status, ordem_sprint
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(projeto_id)
        .bind(payload.sprint_id)
        .bind(&payload.titulo)
        .bind(&payload.descricao)
        .bind(&payload.responsavel)
        .bind(payload.horas_planejadas)
        .bind(payload.status.unwrap_or(StatusTarefa::Pendente))
        .bind(payload.ordem_sprint)
        .fetch_one(executor)
        .await?;

        Ok(tarefa)
    }

    pub async fn update_tarefa<'e, E>(&self, executor: E, id: Uuid, payload: &TarefaPayload) -> Result<Tarefa, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tarefa>(
            r#"
            UPDATE tarefas SET
                sprint_id = $2, titulo = $3, descricao = $4, responsavel = $5,
                horas_planejadas = $6, status = COALESCE($7, status), ordem_sprint = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.sprint_id)
        .bind(&payload.titulo)
        .bind(&payload.descricao)
        .bind(&payload.responsavel)
        .bind(payload.horas_planejadas)
        .bind(payload.status)
        .bind(payload.ordem_sprint)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Tarefa".into()))
    }

    pub async fn get_tarefa<'e, E>(&self, executor: E, id: Uuid) -> Result<Tarefa, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tarefa>("SELECT * FROM tarefas WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Tarefa".into()))
    }

    pub async fn list_tarefas<'e, E>(&self, executor: E, projeto_id: Uuid) -> Result<Vec<Tarefa>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tarefas = sqlx::query_as::<_, Tarefa>(
            "SELECT * FROM tarefas WHERE projeto_id = $1 ORDER BY sprint_id NULLS LAST, ordem_sprint, created_at",
        )
        .bind(projeto_id)
        .fetch_all(executor)
        .await?;

        Ok(tarefas)
    }

    pub async fn delete_tarefa<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM tarefas WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Tarefa".into()));
        }
        Ok(())
    }

    // =========================================================================
    //  LANÇAMENTOS DE HORAS
    // =========================================================================

    pub async fn create_lancamento<'e, E>(
        &self,
        executor: E,
        tarefa_id: Uuid,
        payload: &LancamentoHoraPayload,
    ) -> Result<LancamentoHora, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lancamento = sqlx::query_as::<_, LancamentoHora>(
            r#"
            INSERT INTO lancamentos_hora (tarefa_id, colaborador, data, horas, descricao)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(tarefa_id)
        .bind(&payload.colaborador)
        .bind(payload.data)
        .bind(payload.horas)
        .bind(&payload.descricao)
        .fetch_one(executor)
        .await?;

        Ok(lancamento)
    }

    pub async fn get_lancamento<'e, E>(&self, executor: E, id: Uuid) -> Result<LancamentoHora, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LancamentoHora>("SELECT * FROM lancamentos_hora WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Lançamento de horas".into()))
    }

    pub async fn list_lancamentos<'e, E>(&self, executor: E, tarefa_id: Uuid) -> Result<Vec<LancamentoHora>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lancamentos = sqlx::query_as::<_, LancamentoHora>(
            "SELECT * FROM lancamentos_hora WHERE tarefa_id = $1 ORDER BY data DESC, created_at DESC",
        )
        .bind(tarefa_id)
        .fetch_all(executor)
        .await?;

        Ok(lancamentos)
    }

    pub async fn delete_lancamento<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM lancamentos_hora WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Lançamento de horas".into()));
        }
        Ok(())
    }

    // =========================================================================
    //  FEEDBACKS
    // =========================================================================

    /// Abre o ticket da OS; `None` quando já existe um.
    pub async fn create_feedback_os<'e, E>(&self, executor: E, ordem_servico_id: Uuid) -> Result<Option<FeedbackContato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let feedback = sqlx::query_as::<_, FeedbackContato>(
            r#"
            INSERT INTO feedbacks_contato (cliente_id, contrato_id, ordem_servico_id)
            SELECT os.cliente_id, os.contrato_id, os.id
            FROM ordens_servico os
            WHERE os.id = $1
            ON CONFLICT (ordem_servico_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(ordem_servico_id)
        .fetch_optional(executor)
        .await?;

        Ok(feedback)
    }

    /// Abre o ticket da sprint com cliente e contrato do projeto; `None` quando já existe um.
    pub async fn create_feedback_sprint<'e, E>(&self, executor: E, sprint_id: Uuid) -> Result<Option<FeedbackContato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let feedback = sqlx::query_as::<_, FeedbackContato>(
            r#"
            INSERT INTO feedbacks_contato (cliente_id, contrato_id, sprint_id)
            SELECT c.cliente_id, c.id, s.id
            FROM sprints s
            JOIN projetos p ON p.id = s.projeto_id
            JOIN contratos c ON c.id = p.contrato_id
            WHERE s.id = $1
            ON CONFLICT (sprint_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(sprint_id)
        .fetch_optional(executor)
        .await?;

        Ok(feedback)
    }

    pub async fn list_feedbacks<'e, E>(&self, executor: E, filtro: &FeedbackFiltro) -> Result<Vec<FeedbackContato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let feedbacks = sqlx::query_as::<_, FeedbackContato>(
            r#"
            SELECT * FROM feedbacks_contato
            WHERE ($1::uuid IS NULL OR contrato_id = $1)
              AND ($2::status_feedback IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filtro.contrato_id)
        .bind(filtro.status)
        .fetch_all(executor)
        .await?;

        Ok(feedbacks)
    }

    pub async fn concluir_feedback<'e, E>(&self, executor: E, id: Uuid) -> Result<FeedbackContato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, FeedbackContato>(
            "UPDATE feedbacks_contato SET status = 'concluido' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Feedback".into()))
    }
}
