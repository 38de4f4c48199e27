// src/models/fornecedores.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::domain::fornecedores::FORNECEDOR_OUTRO;
use crate::models::valor_unitario_valido;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_item_fornecedor", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoItemFornecedor {
    Produto,
    Servico,
    Treinamento,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemFornecedor {
    pub id: Uuid,
    #[schema(example = "RED HAT")]
    pub fornecedor: String,
    pub outro_fornecedor: Option<String>,
    pub tipo: TipoItemFornecedor,
    #[schema(example = "RH-RHEL-PREM")]
    pub sku: String,
    pub descricao: String,
    pub unidade: String,
    #[schema(example = "980.00")]
    pub valor_unitario: Decimal,
    pub observacoes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ItemFornecedor {
    pub fn nome_fornecedor(&self) -> &str {
        match &self.outro_fornecedor {
            Some(outro) if self.fornecedor == FORNECEDOR_OUTRO && !outro.trim().is_empty() => outro,
            _ => &self.fornecedor,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemFornecedorPayload {
    #[validate(length(min = 1, max = 100, message = "required"))]
    #[schema(example = "Red Hat")]
    pub fornecedor: String,
    #[validate(length(max = 100))]
    pub outro_fornecedor: Option<String>,
    pub tipo: TipoItemFornecedor,
    #[validate(length(min = 1, max = 100, message = "required"))]
    pub sku: String,
    #[validate(length(min = 1, message = "required"))]
    pub descricao: String,
    #[validate(length(min = 1, max = 50, message = "required"))]
    pub unidade: String,
    #[validate(custom(function = "valor_unitario_valido"))]
    pub valor_unitario: Decimal,
    pub observacoes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Query)]
pub struct ItemFornecedorFiltro {
    pub fornecedor: Option<String>,
    pub tipo: Option<TipoItemFornecedor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(fornecedor: &str, outro: Option<&str>) -> ItemFornecedor {
        ItemFornecedor {
            id: Uuid::new_v4(),
            fornecedor: fornecedor.to_string(),
            outro_fornecedor: outro.map(str::to_string),
            tipo: TipoItemFornecedor::Produto,
            sku: "SKU-1".into(),
            descricao: "Licença".into(),
            unidade: "UN".into(),
            valor_unitario: Decimal::from(10),
            observacoes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn nome_do_outro_fornecedor_prevalece() {
        assert_eq!(item("OUTRO FORNECEDOR", Some("Acme")).nome_fornecedor(), "Acme");
        assert_eq!(item("OUTRO FORNECEDOR", None).nome_fornecedor(), "OUTRO FORNECEDOR");
        assert_eq!(item("RED HAT", Some("Acme")).nome_fornecedor(), "RED HAT");
    }
}
