// src/models/contratos.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{quantidade_valida, valor_monetario_valido, valor_unitario_valido};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "regime_legal")]
pub enum RegimeLegal {
    #[sqlx(rename = "LEI_14133")]
    #[serde(rename = "LEI_14133")]
    Lei14133,
    #[sqlx(rename = "LEI_13303")]
    #[serde(rename = "LEI_13303")]
    Lei13303,
    #[sqlx(rename = "PRIVADO")]
    #[serde(rename = "PRIVADO")]
    Privado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "origem_contrato")]
pub enum OrigemContrato {
    #[sqlx(rename = "LIC_14133_PROPRIA")]
    #[serde(rename = "LIC_14133_PROPRIA")]
    Licitacao14133Propria,
    #[sqlx(rename = "ARP_GERENCIADOR")]
    #[serde(rename = "ARP_GERENCIADOR")]
    ArpGerenciador,
    #[sqlx(rename = "ARP_PARTICIPANTE")]
    #[serde(rename = "ARP_PARTICIPANTE")]
    ArpParticipante,
    #[sqlx(rename = "ARP_ADESAO_CARONA")]
    #[serde(rename = "ARP_ADESAO_CARONA")]
    ArpAdesaoCarona,
    #[sqlx(rename = "DISPENSA_14133")]
    #[serde(rename = "DISPENSA_14133")]
    Dispensa14133,
    #[sqlx(rename = "INEXIGIBILIDADE_14133")]
    #[serde(rename = "INEXIGIBILIDADE_14133")]
    Inexigibilidade14133,
    #[sqlx(rename = "LIC_13303_PROPRIA")]
    #[serde(rename = "LIC_13303_PROPRIA")]
    Licitacao13303Propria,
    #[sqlx(rename = "CONTR_ESTATAL_DIRETA")]
    #[serde(rename = "CONTR_ESTATAL_DIRETA")]
    ContratacaoEstatalDireta,
    #[sqlx(rename = "RFP_PRIVADA")]
    #[serde(rename = "RFP_PRIVADA")]
    RfpPrivada,
    #[sqlx(rename = "RFQ_PRIVADA")]
    #[serde(rename = "RFQ_PRIVADA")]
    RfqPrivada,
    #[sqlx(rename = "NEGOCIACAO_DIRETA_PRIVADA")]
    #[serde(rename = "NEGOCIACAO_DIRETA_PRIVADA")]
    NegociacaoDiretaPrivada,
    #[sqlx(rename = "FRAMEWORK_PRIVADO")]
    #[serde(rename = "FRAMEWORK_PRIVADO")]
    FrameworkPrivado,
    #[sqlx(rename = "OUTRO")]
    #[serde(rename = "OUTRO")]
    Outro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "situacao_contrato", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SituacaoContrato {
    Ativo,
    Inativo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_termo_aditivo", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoTermoAditivo {
    Prorrogacao,
    Valor,
    Reequilibrio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_item_contrato", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoItemContrato {
    Hardware,
    Software,
    Solucao,
    Servico,
    Treinamento,
}

// --- Entidades ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contrato {
    pub id: Uuid,
    pub cliente_id: Uuid,
    #[schema(example = "CT-045/2024")]
    pub numero_contrato: String,
    pub objeto: Option<String>,
    pub ata_registro_preco: Option<String>,
    pub pregao_eletronico: Option<String>,
    pub processo: Option<String>,
    pub termo_referencia: Option<String>,
    pub regime_legal: RegimeLegal,
    pub origem_contrato: OrigemContrato,
    #[schema(example = 12)]
    pub vigencia: i32,
    pub data_assinatura: NaiveDate,
    #[schema(example = json!(["RED HAT", "FORTINET"]))]
    pub fornecedores: Vec<String>,
    #[schema(example = "150000.00")]
    pub valor_inicial: Decimal,
    #[schema(example = "187500.00")]
    pub valor_atual: Decimal,
    #[schema(example = 18)]
    pub vigencia_total_meses: i32,
    pub data_fim_atual: NaiveDate,
    pub situacao: SituacaoContrato,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TermoAditivo {
    pub id: Uuid,
    pub contrato_id: Uuid,
    #[schema(example = "1º TA")]
    pub numero_termo: String,
    pub tipo: TipoTermoAditivo,
    #[schema(example = 6)]
    pub meses_acrescimo: i32,
    #[schema(example = "0.00")]
    pub valor_acrescimo: Decimal,
    pub data_assinatura: NaiveDate,
    pub justificativa: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemContrato {
    pub id: Uuid,
    pub contrato_id: Uuid,
    #[schema(example = 1)]
    pub lote: i32,
    #[schema(example = "3")]
    pub numero_item: String,
    pub descricao: String,
    pub tipo: TipoItemContrato,
    #[schema(example = "Licença")]
    pub unidade: String,
    #[schema(example = "100")]
    pub quantidade: Decimal,
    pub saldo_quantidade_inicial: Decimal,
    #[schema(example = "1500.00")]
    pub valor_unitario: Decimal,
    pub valor_total: Decimal,
    #[schema(example = 36)]
    pub vigencia_produto: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Item com saldos calculados a partir das ordens faturadas.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemContratoDetalhe {
    #[serde(flatten)]
    pub item: ItemContrato,
    pub quantidade_consumida: Decimal,
    pub saldo_quantidade_atual: Decimal,
    pub valor_consumido: Decimal,
    pub saldo_disponivel: Decimal,
    pub vigencia_restante: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContratoDetalhe {
    #[serde(flatten)]
    pub contrato: Contrato,
    /// Nomes de exibição dos fornecedores ("RED HAT" -> "Red Hat")
    pub fornecedores_exibicao: Vec<String>,
    pub aditivos: Vec<TermoAditivo>,
    pub itens: Vec<ItemContratoDetalhe>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContratoResumo {
    pub contrato_id: Uuid,
    pub numero_contrato: String,
    pub regime_legal: RegimeLegal,
    pub origem_contrato: OrigemContrato,
    pub valor_inicial: Decimal,
    pub valor_atual: Decimal,
    pub data_assinatura: NaiveDate,
    pub data_fim_atual: NaiveDate,
    pub vigencia_original: i32,
    pub vigencia_total_meses: i32,
    pub limite_vigencia_meses: i32,
    pub situacao: SituacaoContrato,
    pub dias_para_vencimento: i64,
    pub renovacao_pendente: bool,
    pub total_prorrogacoes: i64,
    pub total_aditivos_valor: i64,
    pub total_reequilibrios: i64,
    /// Aviso quando a origem não combina com o regime legal
    pub alerta_origem: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenovacaoPendente {
    pub contrato_id: Uuid,
    pub numero_contrato: String,
    pub cliente_id: Uuid,
    pub data_fim_atual: NaiveDate,
    pub dias_para_vencimento: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidacaoAditivo {
    pub valido: bool,
    pub vigencia_total_resultante: i32,
    pub valor_atual_resultante: Decimal,
    pub erro: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizacaoSituacoes {
    pub contratos_atualizados: u64,
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContratoPayload {
    pub cliente_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "required"))]
    #[schema(example = "CT-045/2024")]
    pub numero_contrato: String,
    pub objeto: Option<String>,
    pub ata_registro_preco: Option<String>,
    pub pregao_eletronico: Option<String>,
    pub processo: Option<String>,
    pub termo_referencia: Option<String>,
    pub regime_legal: Option<RegimeLegal>,
    pub origem_contrato: Option<OrigemContrato>,
    #[validate(range(min = 1, message = "positive"))]
    #[schema(example = 12)]
    pub vigencia: i32,
    pub data_assinatura: NaiveDate,
    #[serde(default)]
    #[schema(example = json!(["Red Hat", "fortinet "]))]
    pub fornecedores: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AditivoPayload {
    #[validate(length(min = 1, max = 50, message = "required"))]
    #[schema(example = "1º TA")]
    pub numero_termo: String,
    pub tipo: TipoTermoAditivo,
    #[serde(default)]
    #[validate(range(min = 0, message = "non_negative"))]
    pub meses_acrescimo: i32,
    #[serde(default)]
    #[validate(custom(function = "valor_monetario_valido"))]
    pub valor_acrescimo: Decimal,
    pub data_assinatura: NaiveDate,
    pub justificativa: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemContratoPayload {
    #[serde(default = "lote_padrao")]
    #[validate(range(min = 1, message = "positive"))]
    pub lote: i32,
    #[validate(length(min = 1, max = 50, message = "required"))]
    pub numero_item: String,
    #[validate(length(min = 1, message = "required"))]
    pub descricao: String,
    pub tipo: TipoItemContrato,
    #[validate(length(min = 1, max = 50, message = "required"))]
    pub unidade: String,
    #[validate(custom(function = "quantidade_valida"))]
    pub quantidade: Decimal,
    #[validate(custom(function = "valor_unitario_valido"))]
    pub valor_unitario: Decimal,
    pub vigencia_produto: Option<i32>,
}

fn lote_padrao() -> i32 {
    1
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Query)]
pub struct ContratoFiltro {
    pub cliente_id: Option<Uuid>,
    pub situacao: Option<SituacaoContrato>,
    /// Trecho do número do contrato
    pub numero: Option<String>,
}
