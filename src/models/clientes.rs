// src/models/clientes.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_cliente", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoCliente {
    Publico,
    Privado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_pessoa", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoPessoa {
    Fisica,
    Juridica,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: Uuid,
    #[schema(example = "Prefeitura Municipal de Campinas")]
    pub nome_razao_social: String,
    pub nome_fantasia: Option<String>,
    pub tipo_cliente: TipoCliente,
    pub tipo_pessoa: TipoPessoa,
    #[schema(example = "12345678000190")]
    pub cnpj_cpf: String,
    pub endereco: String,
    pub numero: String,
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    #[schema(example = "SP")]
    pub estado: String,
    pub cep: String,
    pub nome_responsavel: String,
    pub cargo_responsavel: String,
    pub telefone_contato: String,
    pub email_contato: String,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContatoCliente {
    pub id: Uuid,
    pub cliente_id: Uuid,
    pub nome: String,
    pub cargo: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub principal: bool,
    pub created_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientePayload {
    #[validate(length(min = 1, max = 255, message = "required"))]
    #[schema(example = "Prefeitura Municipal de Campinas")]
    pub nome_razao_social: String,
    pub nome_fantasia: Option<String>,
    pub tipo_cliente: TipoCliente,
    pub tipo_pessoa: TipoPessoa,
    #[validate(length(min = 11, max = 18, message = "invalid_document"))]
    #[schema(example = "12.345.678/0001-90")]
    pub cnpj_cpf: String,
    #[validate(length(min = 1, message = "required"))]
    pub endereco: String,
    #[validate(length(min = 1, max = 10, message = "required"))]
    pub numero: String,
    pub complemento: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub bairro: String,
    #[validate(length(min = 1, message = "required"))]
    pub cidade: String,
    #[validate(length(equal = 2, message = "invalid_uf"))]
    #[schema(example = "SP")]
    pub estado: String,
    #[validate(length(min = 8, max = 10, message = "invalid_cep"))]
    pub cep: String,
    #[validate(length(min = 1, message = "required"))]
    pub nome_responsavel: String,
    #[validate(length(min = 1, message = "required"))]
    pub cargo_responsavel: String,
    #[validate(length(min = 1, max = 20, message = "required"))]
    pub telefone_contato: String,
    #[validate(email(message = "invalid_email"))]
    pub email_contato: String,
    #[serde(default = "default_true")]
    pub ativo: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContatoPayload {
    #[validate(length(min = 1, max = 255, message = "required"))]
    pub nome: String,
    pub cargo: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub telefone: Option<String>,
    #[serde(default)]
    pub principal: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Query)]
pub struct ClienteFiltro {
    /// Busca por razão social, nome fantasia ou documento
    pub busca: Option<String>,
    pub tipo_cliente: Option<TipoCliente>,
    pub ativo: Option<bool>,
}
