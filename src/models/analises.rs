// src/models/analises.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_analise", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatusAnalise {
    Pendente,
    Processando,
    Analisado,
    Aplicado,
    Erro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_documento", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatusDocumento {
    Pendente,
    Analisado,
    Erro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_plano", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatusPlano {
    PendenteAprovacao,
    Aprovado,
    Rejeitado,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnaliseContrato {
    pub id: Uuid,
    #[schema(example = "Contrato Prefeitura 2025")]
    pub titulo: String,
    pub status: StatusAnalise,
    #[schema(value_type = Option<Object>)]
    pub dados_extraidos: Option<Value>,
    pub mensagem_erro: Option<String>,
    pub cliente_id: Option<Uuid>,
    pub contrato_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentoContrato {
    pub id: Uuid,
    pub analise_id: Uuid,
    #[schema(example = "contrato_assinado.pdf")]
    pub nome_arquivo: String,
    pub texto_extraido: Option<String>,
    pub status: StatusDocumento,
    pub mensagem_erro: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanoTrabalho {
    pub id: Uuid,
    pub projeto_id: Uuid,
    #[schema(value_type = Object)]
    pub conteudo: Value,
    pub status: StatusPlano,
    pub observacoes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnaliseDetalhe {
    #[serde(flatten)]
    pub analise: AnaliseContrato,
    pub documentos: Vec<DocumentoContrato>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoAplicacao {
    pub analise: AnaliseContrato,
    pub cliente_id: Uuid,
    pub contrato_id: Uuid,
    pub cliente_criado: bool,
    pub contrato_criado: bool,
    pub itens_criados: usize,
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalisePayload {
    #[validate(length(min = 1, max = 255, message = "required"))]
    pub titulo: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentoPayload {
    #[validate(length(min = 1, max = 255, message = "required"))]
    pub nome_arquivo: String,
    /// Texto já extraído do arquivo pelo serviço externo
    pub texto_extraido: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoAnalisePayload {
    /// Resposta bruta do extrator (JSON, possivelmente entre cercas de markdown)
    #[validate(length(min = 1, message = "required"))]
    pub resposta: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanoTrabalhoPayload {
    #[schema(value_type = Object)]
    pub conteudo: Value,
    pub observacoes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisaoPlanoPayload {
    pub aprovado: bool,
    pub observacoes: Option<String>,
}
