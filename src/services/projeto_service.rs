// src/services/projeto_service.rs

use sqlx::{Acquire, Executor, PgConnection, Postgres};
use tracing::info;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{OrdemRepository, ProjetoRepository},
    models::projetos::{
        FeedbackContato, FeedbackFiltro, LancamentoHora, LancamentoHoraPayload, Projeto, ProjetoFiltro,
        ProjetoPayload, Sprint, SprintPayload, StatusProjeto, StatusSprint, Tarefa, TarefaPayload,
    },
};

#[derive(Clone)]
pub struct ProjetoService {
    repo: ProjetoRepository,
    ordem_repo: OrdemRepository,
}

impl ProjetoService {
    pub fn new(repo: ProjetoRepository, ordem_repo: OrdemRepository) -> Self {
        Self { repo, ordem_repo }
    }

    // =========================================================================
    //  PROJETOS
    // =========================================================================

    pub async fn create_projeto<'e, E>(&self, executor: E, payload: &ProjetoPayload) -> Result<Projeto, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        if let Some(os_id) = payload.ordem_servico_id {
            let os = self.ordem_repo.get_os(&mut *tx, os_id).await?;
            if os.contrato_id != payload.contrato_id {
                return Err(AppError::EstadoInvalido("projeto.os_outro_contrato"));
            }
        }

        let projeto = self.repo.create(&mut *tx, payload).await?;
        tx.commit().await?;

        info!("Projeto '{}' criado", projeto.nome);
        Ok(projeto)
    }

    pub async fn get_projeto<'e, E>(&self, executor: E, id: Uuid) -> Result<Projeto, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.get(executor, id).await
    }

    pub async fn list_projetos<'e, E>(&self, executor: E, filtro: &ProjetoFiltro) -> Result<Vec<Projeto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor, filtro).await
    }

    pub async fn update_status_projeto<'e, E>(&self, executor: E, id: Uuid, status: StatusProjeto) -> Result<Projeto, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.update_status(executor, id, status).await
    }

    /// Remove o projeto e zera as horas que ele alimentava na OS.
    pub async fn delete_projeto<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let projeto = self.repo.get(&mut *tx, id).await?;
        self.repo.delete(&mut *tx, id).await?;
        if let Some(ordem_servico_id) = projeto.ordem_servico_id {
            self.ordem_repo.recalcular_horas_da_os(&mut *tx, ordem_servico_id).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  SPRINTS
    // =========================================================================

    pub async fn create_sprint<'e, E>(&self, executor: E, projeto_id: Uuid, payload: &SprintPayload) -> Result<Sprint, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.repo.get(&mut *tx, projeto_id).await?;
        let sprint = self.repo.create_sprint(&mut *tx, projeto_id, payload).await?;

        tx.commit().await?;
        Ok(sprint)
    }

    pub async fn list_sprints<'e, E>(&self, executor: E, projeto_id: Uuid) -> Result<Vec<Sprint>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_sprints(executor, projeto_id).await
    }

    /// Sprint faturada abre um ticket de feedback (uma única vez).
    pub async fn update_status_sprint<'e, E>(&self, executor: E, id: Uuid, status: StatusSprint) -> Result<Sprint, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let sprint = self.repo.update_sprint_status(&mut *tx, id, status).await?;
        if status == StatusSprint::Faturada {
            if let Some(feedback) = self.repo.create_feedback_sprint(&mut *tx, id).await? {
                info!("Ticket de feedback {} aberto para a sprint '{}'", feedback.id, sprint.nome);
            }
        }

        tx.commit().await?;
        Ok(sprint)
    }

    pub async fn delete_sprint<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete_sprint(executor, id).await
    }

    // =========================================================================
    //  TAREFAS
    // =========================================================================

    pub async fn create_tarefa<'e, E>(&self, executor: E, projeto_id: Uuid, payload: &TarefaPayload) -> Result<Tarefa, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.repo.get(&mut *tx, projeto_id).await?;
        self.exigir_sprint_do_projeto(&mut tx, projeto_id, payload.sprint_id).await?;

        let tarefa = self.repo.create_tarefa(&mut *tx, projeto_id, payload).await?;
        self.ordem_repo.recalcular_horas_os(&mut *tx, projeto_id).await?;

        tx.commit().await?;
        Ok(tarefa)
    }

    pub async fn update_tarefa<'e, E>(&self, executor: E, id: Uuid, payload: &TarefaPayload) -> Result<Tarefa, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let atual = self.repo.get_tarefa(&mut *tx, id).await?;
        self.exigir_sprint_do_projeto(&mut tx, atual.projeto_id, payload.sprint_id).await?;

        let tarefa = self.repo.update_tarefa(&mut *tx, id, payload).await?;
        self.ordem_repo.recalcular_horas_os(&mut *tx, tarefa.projeto_id).await?;

        tx.commit().await?;
        Ok(tarefa)
    }

    pub async fn list_tarefas<'e, E>(&self, executor: E, projeto_id: Uuid) -> Result<Vec<Tarefa>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_tarefas(executor, projeto_id).await
    }

    pub async fn delete_tarefa<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let tarefa = self.repo.get_tarefa(&mut *tx, id).await?;
        self.repo.delete_tarefa(&mut *tx, id).await?;
        self.ordem_repo.recalcular_horas_os(&mut *tx, tarefa.projeto_id).await?;

        tx.commit().await?;
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
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let tarefa = self.repo.get_tarefa(&mut *tx, tarefa_id).await?;
        let lancamento = self.repo.create_lancamento(&mut *tx, tarefa_id, payload).await?;
        self.ordem_repo.recalcular_horas_os(&mut *tx, tarefa.projeto_id).await?;

        tx.commit().await?;
        Ok(lancamento)
    }

    pub async fn list_lancamentos<'e, E>(&self, executor: E, tarefa_id: Uuid) -> Result<Vec<LancamentoHora>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_lancamentos(executor, tarefa_id).await
    }

    pub async fn delete_lancamento<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let lancamento = self.repo.get_lancamento(&mut *tx, id).await?;
        let tarefa = self.repo.get_tarefa(&mut *tx, lancamento.tarefa_id).await?;
        self.repo.delete_lancamento(&mut *tx, id).await?;
        self.ordem_repo.recalcular_horas_os(&mut *tx, tarefa.projeto_id).await?;

        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  FEEDBACKS
    // =========================================================================

    pub async fn list_feedbacks<'e, E>(&self, executor: E, filtro: &FeedbackFiltro) -> Result<Vec<FeedbackContato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_feedbacks(executor, filtro).await
    }

    pub async fn concluir_feedback<'e, E>(&self, executor: E, id: Uuid) -> Result<FeedbackContato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.concluir_feedback(executor, id).await
    }

    async fn exigir_sprint_do_projeto(
        &self,
        conn: &mut PgConnection,
        projeto_id: Uuid,
        sprint_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let Some(sprint_id) = sprint_id else {
            return Ok(());
        };
        let sprint = self.repo.get_sprint(&mut *conn, sprint_id).await?;
        sprint_pertence_ao_projeto(&sprint, projeto_id)
    }
}

fn sprint_pertence_ao_projeto(sprint: &Sprint, projeto_id: Uuid) -> Result<(), AppError> {
    if sprint.projeto_id != projeto_id {
        return Err(AppError::EstadoInvalido("tarefa.sprint_outro_projeto"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn sprint_de_outro_projeto_e_rejeitada() {
        let projeto_id = Uuid::new_v4();
        let sprint = Sprint {
            id: Uuid::new_v4(),
            projeto_id,
            nome: "Sprint 1".into(),
            data_inicio: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            data_fim: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            status: StatusSprint::Planejada,
            created_at: Utc::now(),
        };

        assert!(sprint_pertence_ao_projeto(&sprint, projeto_id).is_ok());
        assert!(matches!(
            sprint_pertence_ao_projeto(&sprint, Uuid::new_v4()),
            Err(AppError::EstadoInvalido("tarefa.sprint_outro_projeto"))
        ));
    }
}
