// src/models/projetos.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{horas_validas, valor_positivo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_projeto", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatusProjeto {
    Planejado,
    EmAndamento,
    Concluido,
    Cancelado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_sprint", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatusSprint {
    Planejada,
    EmAndamento,
    Finalizada,
    Faturada,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_tarefa", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatusTarefa {
    Pendente,
    EmAndamento,
    Concluida,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_feedback", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatusFeedback {
    Pendente,
    Concluido,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Projeto {
    pub id: Uuid,
    pub contrato_id: Uuid,
    pub ordem_servico_id: Option<Uuid>,
    #[schema(example = "Implantação OpenShift")]
    pub nome: String,
    pub descricao: Option<String>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim_prevista: Option<NaiveDate>,
    pub status: StatusProjeto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: Uuid,
    pub projeto_id: Uuid,
    #[schema(example = "Sprint 1")]
    pub nome: String,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub status: StatusSprint,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tarefa {
    pub id: Uuid,
    pub projeto_id: Uuid,
    pub sprint_id: Option<Uuid>,
    pub titulo: String,
    pub descricao: Option<String>,
    pub responsavel: Option<String>,
    #[schema(example = "16")]
    pub horas_planejadas: Decimal,
    pub status: StatusTarefa,
    pub ordem_sprint: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LancamentoHora {
    pub id: Uuid,
    pub tarefa_id: Uuid,
    pub colaborador: String,
    pub data: NaiveDate,
    #[schema(example = "7.5")]
    pub horas: Decimal,
    pub descricao: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Ticket de contato com o cliente aberto ao faturar uma OS ou sprint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackContato {
    pub id: Uuid,
    pub cliente_id: Uuid,
    pub contrato_id: Uuid,
    pub ordem_servico_id: Option<Uuid>,
    pub sprint_id: Option<Uuid>,
    #[schema(example = "feedback_servico")]
    pub motivador: String,
    pub status: StatusFeedback,
    pub created_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "periodo_projeto_valido"))]
pub struct ProjetoPayload {
    pub contrato_id: Uuid,
    pub ordem_servico_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255, message = "required"))]
    pub nome: String,
    pub descricao: Option<String>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim_prevista: Option<NaiveDate>,
}

fn periodo_projeto_valido(payload: &ProjetoPayload) -> Result<(), ValidationError> {
    match (payload.data_inicio, payload.data_fim_prevista) {
        (Some(inicio), Some(fim)) if fim < inicio => Err(ValidationError::new("invalid_period")),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "periodo_sprint_valido"))]
pub struct SprintPayload {
    #[validate(length(min = 1, max = 255, message = "required"))]
    pub nome: String,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
}

fn periodo_sprint_valido(payload: &SprintPayload) -> Result<(), ValidationError> {
    if payload.data_fim < payload.data_inicio {
        return Err(ValidationError::new("invalid_period"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TarefaPayload {
    pub sprint_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255, message = "required"))]
    pub titulo: String,
    pub descricao: Option<String>,
    #[validate(length(max = 100))]
    pub responsavel: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "horas_validas"))]
    pub horas_planejadas: Decimal,
    pub status: Option<StatusTarefa>,
    #[serde(default)]
    #[validate(range(min = 0, message = "non_negative"))]
    pub ordem_sprint: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "horas_no_dia"))]
pub struct LancamentoHoraPayload {
    #[validate(length(min = 1, max = 100, message = "required"))]
    pub colaborador: String,
    pub data: NaiveDate,
    #[validate(custom(function = "valor_positivo"))]
    #[schema(example = "7.5")]
    pub horas: Decimal,
    pub descricao: Option<String>,
}

fn horas_no_dia(payload: &LancamentoHoraPayload) -> Result<(), ValidationError> {
    if payload.horas > Decimal::from(24) {
        return Err(ValidationError::new("max_24_hours"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusProjetoPayload {
    pub status: StatusProjeto,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusSprintPayload {
    pub status: StatusSprint,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Query)]
pub struct ProjetoFiltro {
    pub contrato_id: Option<Uuid>,
    pub status: Option<StatusProjeto>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Query)]
pub struct FeedbackFiltro {
    pub contrato_id: Option<Uuid>,
    pub status: Option<StatusFeedback>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprint_com_fim_antes_do_inicio_e_rejeitada() {
        let payload = SprintPayload {
            nome: "Sprint 1".into(),
            data_inicio: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            data_fim: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn lancamento_acima_de_24_horas_e_rejeitado() {
        let mut payload = LancamentoHoraPayload {
            colaborador: "Ana".into(),
            data: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            horas: Decimal::from(25),
            descricao: None,
        };
        assert!(payload.validate().is_err());

        payload.horas = Decimal::new(75, 1);
        assert!(payload.validate().is_ok());
    }
}
