// src/models/ordens.rs

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::domain::margem::MargemOrdem;
use crate::models::{horas_validas, quantidade_valida, valor_monetario_valido};

/// Status compartilhado por OF e OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_ordem", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StatusOrdem {
    Aberta,
    Execucao,
    Finalizada,
    Faturada,
}

impl StatusOrdem {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusOrdem::Aberta => "aberta",
            StatusOrdem::Execucao => "execucao",
            StatusOrdem::Finalizada => "finalizada",
            StatusOrdem::Faturada => "faturada",
        }
    }
}

impl fmt::Display for StatusOrdem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
//  ORDEM DE FORNECIMENTO
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrdemFornecimento {
    pub id: Uuid,
    #[schema(example = "OF-2025-0001")]
    pub numero_of: String,
    pub numero_of_cliente: Option<String>,
    pub cliente_id: Uuid,
    pub contrato_id: Uuid,
    pub item_contrato_id: Uuid,
    pub item_fornecedor_id: Uuid,
    pub unidade: String,
    #[schema(example = "10")]
    pub quantidade: Decimal,
    pub vigencia_produto: Option<i32>,
    pub valor_unitario: Decimal,
    pub valor_total: Decimal,
    pub status: StatusOrdem,
    pub data_ativacao: Option<NaiveDate>,
    pub data_faturamento: Option<NaiveDate>,
    #[schema(example = "NF-2025-0007")]
    pub numero_nota_fiscal: Option<String>,
    pub observacoes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NovaOrdemFornecimento {
    #[validate(length(max = 100))]
    pub numero_of_cliente: Option<String>,
    pub contrato_id: Uuid,
    pub item_contrato_id: Uuid,
    pub item_fornecedor_id: Uuid,
    #[validate(custom(function = "quantidade_valida"))]
    #[schema(example = "10")]
    pub quantidade: Decimal,
    pub observacoes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizaOrdemFornecimento {
    #[validate(length(max = 100))]
    pub numero_of_cliente: Option<String>,
    #[validate(custom(function = "quantidade_valida"))]
    pub quantidade: Decimal,
    pub data_ativacao: Option<NaiveDate>,
    pub observacoes: Option<String>,
}

// =============================================================================
//  ORDEM DE SERVIÇO
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrdemServico {
    pub id: Uuid,
    #[schema(example = "OS-2025-0001")]
    pub numero_os: String,
    pub numero_os_cliente: Option<String>,
    pub cliente_id: Uuid,
    pub contrato_id: Uuid,
    pub item_contrato_id: Uuid,
    pub item_fornecedor_id: Uuid,
    pub gerente_projetos: Option<String>,
    pub consultor_tecnico: Option<String>,
    pub unidade: String,
    pub quantidade: Decimal,
    pub valor_unitario: Decimal,
    pub valor_total: Decimal,
    #[schema(example = "200.00")]
    pub custo_previsto: Decimal,
    pub data_inicio: NaiveDate,
    #[schema(value_type = String, example = "09:00:00")]
    pub hora_inicio: NaiveTime,
    pub data_termino: Option<NaiveDate>,
    #[schema(value_type = Option<String>, example = "19:00:00")]
    pub hora_termino: Option<NaiveTime>,
    pub horas_consultor: Option<Decimal>,
    pub horas_gerente: Option<Decimal>,
    pub horas_totais: Decimal,
    pub horas_planejadas: Decimal,
    pub horas_realizadas: Decimal,
    pub status: StatusOrdem,
    pub data_emissao_trd: Option<NaiveDate>,
    pub data_faturamento: Option<NaiveDate>,
    pub numero_nota_fiscal: Option<String>,
    pub observacoes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// OS com o cálculo de margem.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrdemServicoDetalhe {
    #[serde(flatten)]
    pub ordem: OrdemServico,
    #[serde(flatten)]
    pub margem: MargemOrdem,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NovaOrdemServico {
    #[validate(length(max = 50))]
    pub numero_os_cliente: Option<String>,
    pub contrato_id: Uuid,
    pub item_contrato_id: Uuid,
    pub item_fornecedor_id: Uuid,
    #[validate(length(max = 100))]
    pub gerente_projetos: Option<String>,
    #[validate(length(max = 100))]
    pub consultor_tecnico: Option<String>,
    #[validate(custom(function = "quantidade_valida"))]
    #[schema(example = "40")]
    pub quantidade: Decimal,
    pub data_inicio: NaiveDate,
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub hora_inicio: Option<NaiveTime>,
    #[validate(custom(function = "horas_validas"))]
    pub horas_consultor: Option<Decimal>,
    #[validate(custom(function = "horas_validas"))]
    pub horas_gerente: Option<Decimal>,
    /// Quando ausente: quantidade x valor unitário do item do fornecedor
    #[validate(custom(function = "valor_monetario_valido"))]
    pub custo_previsto: Option<Decimal>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizaOrdemServico {
    #[validate(length(max = 50))]
    pub numero_os_cliente: Option<String>,
    #[validate(length(max = 100))]
    pub gerente_projetos: Option<String>,
    #[validate(length(max = 100))]
    pub consultor_tecnico: Option<String>,
    #[validate(custom(function = "quantidade_valida"))]
    pub quantidade: Decimal,
    pub data_inicio: NaiveDate,
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub hora_inicio: Option<NaiveTime>,
    #[validate(custom(function = "horas_validas"))]
    pub horas_consultor: Option<Decimal>,
    #[validate(custom(function = "horas_validas"))]
    pub horas_gerente: Option<Decimal>,
    #[validate(custom(function = "valor_monetario_valido"))]
    pub custo_previsto: Option<Decimal>,
    pub observacoes: Option<String>,
}

// =============================================================================
//  COMUM
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransicaoStatusPayload {
    #[schema(example = "execucao")]
    pub status: StatusOrdem,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Query)]
pub struct OrdemFiltro {
    pub contrato_id: Option<Uuid>,
    pub item_contrato_id: Option<Uuid>,
    pub status: Option<StatusOrdem>,
}
