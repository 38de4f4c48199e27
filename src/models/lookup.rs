// src/models/lookup.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::contratos::TipoItemContrato;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContratoOpcao {
    pub id: Uuid,
    #[schema(example = "CT-045/2024")]
    pub numero: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemContratoOpcao {
    pub id: Uuid,
    #[schema(example = "3 - Subscrição RHEL Premium")]
    pub descricao: String,
    pub valor_unitario: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemFornecedorOpcao {
    pub id: Uuid,
    #[schema(example = "RH-RHEL-PREM - Subscrição RHEL Premium (Red Hat)")]
    pub descricao: String,
    pub valor_unitario: Decimal,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Query)]
pub struct ContratosPorClienteQuery {
    pub cliente_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Query)]
pub struct ItensContratoQuery {
    pub contrato_id: Option<Uuid>,
    /// Lista separada por vírgula, ex.: `servico,treinamento`
    pub tipos: Option<String>,
}

impl ItensContratoQuery {
    /// Tipos reconhecidos no filtro; valores desconhecidos são ignorados.
    pub fn tipos(&self) -> Vec<TipoItemContrato> {
        self.tipos
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|t| {
                serde_json::from_value(serde_json::Value::String(t.trim().to_lowercase())).ok()
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Query)]
pub struct ItensFornecedorQuery {
    pub contrato_id: Option<Uuid>,
    pub item_contrato_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filtro_de_tipos_ignora_valores_desconhecidos() {
        let query = ItensContratoQuery {
            contrato_id: None,
            tipos: Some("servico, TREINAMENTO,xyz,".into()),
        };
        assert_eq!(query.tipos(), vec![TipoItemContrato::Servico, TipoItemContrato::Treinamento]);
    }

    #[test]
    fn sem_filtro_de_tipos_retorna_vazio() {
        assert!(ItensContratoQuery::default().tipos().is_empty());
    }
}
