// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;
use crate::models::ordens::StatusOrdem;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Registro duplicado: {0}")]
    UniqueConstraintViolation(String),

    // --- Regras de negócio ---
    #[error("Quantidade solicitada ({solicitado}) excede o saldo disponível ({disponivel})")]
    SaldoInsuficiente { solicitado: Decimal, disponivel: Decimal },

    #[error("Margem de {percentual}% abaixo do mínimo de {minimo}%")]
    MargemInsuficiente { percentual: Decimal, minimo: Decimal },

    #[error("Transição de status inválida: {de} -> {para}")]
    TransicaoInvalida { de: StatusOrdem, para: StatusOrdem },

    #[error("Vigência total de {total} meses excede o limite de {limite} meses ({regime})")]
    LimiteVigenciaExcedido { total: i32, limite: i32, regime: &'static str },

    #[error("Acréscimo de {acrescimo} excede o limite de 25% ({limite}) sobre o valor atual {valor_atual}")]
    LimiteAditivoExcedido { acrescimo: Decimal, limite: Decimal, valor_atual: Decimal },

    // As variantes abaixo carregam o código da mensagem no catálogo de traduções
    #[error("Termo aditivo inválido: {0}")]
    AditivoInvalido(&'static str),

    #[error("Tipo de item incompatível: {0}")]
    TipoItemIncompativel(&'static str),

    #[error("Operação não permitida no estado atual: {0}")]
    EstadoInvalido(&'static str),

    #[error("Fornecedor {0} não vinculado ao contrato")]
    FornecedorNaoVinculado(String),

    #[error("Resultado de análise inválido: {0}")]
    AnaliseInvalida(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

/// Erro já traduzido, pronto para virar resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ResourceNotFound(_) | AppError::DatabaseError(sqlx::Error::RowNotFound) => {
                StatusCode::NOT_FOUND
            }
            AppError::UniqueConstraintViolation(_) | AppError::EstadoInvalido(_) => StatusCode::CONFLICT,
            AppError::SaldoInsuficiente { .. }
            | AppError::MargemInsuficiente { .. }
            | AppError::TransicaoInvalida { .. }
            | AppError::LimiteVigenciaExcedido { .. }
            | AppError::LimiteAditivoExcedido { .. }
            | AppError::AditivoInvalido(_)
            | AppError::TipoItemIncompativel(_)
            | AppError::FornecedorNaoVinculado(_)
            | AppError::AnaliseInvalida(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Código da mensagem no catálogo e os parâmetros que ela interpola.
    fn message_key(&self) -> (&'static str, Vec<(&'static str, String)>) {
        match self {
            AppError::ValidationError(_) => ("validation.invalid_fields", vec![]),
            AppError::ResourceNotFound(recurso) => ("resource.not_found", vec![("recurso", recurso.clone())]),
            AppError::DatabaseError(sqlx::Error::RowNotFound) => {
                ("resource.not_found", vec![("recurso", "registro".to_string())])
            }
            AppError::UniqueConstraintViolation(campo) => ("resource.duplicated", vec![("campo", campo.clone())]),
            AppError::SaldoInsuficiente { solicitado, disponivel } => (
                "ordem.saldo_insuficiente",
                vec![
                    ("solicitado", solicitado.normalize().to_string()),
                    ("disponivel", disponivel.normalize().to_string()),
                ],
            ),
            AppError::MargemInsuficiente { percentual, minimo } => (
                "ordem.margem_insuficiente",
                vec![
                    ("percentual", format!("{:.2}", percentual)),
                    ("minimo", minimo.normalize().to_string()),
                ],
            ),
            AppError::TransicaoInvalida { de, para } => (
                "ordem.transicao_invalida",
                vec![("de", de.to_string()), ("para", para.to_string())],
            ),
            AppError::LimiteVigenciaExcedido { total, limite, regime } => (
                "contrato.limite_vigencia",
                vec![
                    ("total", total.to_string()),
                    ("limite", limite.to_string()),
                    ("regime", regime.to_string()),
                ],
            ),
            AppError::LimiteAditivoExcedido { acrescimo, limite, valor_atual } => (
                "contrato.limite_aditivo",
                vec![
                    ("acrescimo", format!("{:.2}", acrescimo)),
                    ("limite", format!("{:.2}", limite)),
                    ("valorAtual", format!("{:.2}", valor_atual)),
                ],
            ),
            AppError::AditivoInvalido(code)
            | AppError::TipoItemIncompativel(code)
            | AppError::EstadoInvalido(code) => (code, vec![]),
            AppError::FornecedorNaoVinculado(fornecedor) => {
                ("ordem.fornecedor_nao_vinculado", vec![("fornecedor", fornecedor.clone())])
            }
            AppError::AnaliseInvalida(detalhe) => ("analise.resultado_invalido", vec![("detalhe", detalhe.clone())]),
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => ("server.internal_error", vec![]),
        }
    }

    /// Erro de validação (400) para um valor numérico que não cabe na coluna.
    pub fn fora_do_intervalo(campo: &'static str) -> Self {
        let mut errors = validator::ValidationErrors::new();
        errors.add(campo, validator::ValidationError::new("range"));
        AppError::ValidationError(errors)
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        let (code, params) = self.message_key();
        let message = store.translate(&locale.0, code, &params);

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            let code = e.message.as_deref().unwrap_or(&e.code);
                            store
                                .lookup(&locale.0, &format!("validation.{}", code))
                                .map(str::to_string)
                                .unwrap_or_else(|| code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            _ => None,
        };

        ApiError { status, message, details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn store() -> I18nStore {
        I18nStore::load().expect("catálogo embutido deve ser válido")
    }

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "required"))]
        nome: String,
    }

    #[test]
    fn saldo_insuficiente_vira_422_com_mensagem_traduzida() {
        let err = AppError::SaldoInsuficiente {
            solicitado: Decimal::from(80),
            disponivel: Decimal::from(70),
        };
        let api = err.to_api_error(&Locale("pt".into()), &store());

        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(api.message.contains("80"));
        assert!(api.message.contains("70"));
        assert!(api.details.is_none());
    }

    #[test]
    fn idioma_desconhecido_cai_no_portugues() {
        let err = AppError::ResourceNotFound("Contrato".into());
        let pt = err.to_api_error(&Locale("pt".into()), &store());
        let fr = err.to_api_error(&Locale("fr".into()), &store());

        assert_eq!(fr.status, StatusCode::NOT_FOUND);
        assert_eq!(pt.message, fr.message);
    }

    #[test]
    fn row_not_found_vira_404() {
        let err = AppError::DatabaseError(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn erro_interno_nao_vaza_detalhes() {
        let err = AppError::InternalServerError(anyhow::anyhow!("senha do banco: 123"));
        let api = err.to_api_error(&Locale("en".into()), &store());

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.message.contains("123"));
    }

    #[test]
    fn validacao_lista_campos_com_erro() {
        let errors = Payload { nome: String::new() }.validate().unwrap_err();
        let api = AppError::ValidationError(errors).to_api_error(&Locale("en".into()), &store());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.unwrap();
        assert_eq!(details["nome"][0], "This field is required.");
    }

    #[test]
    fn valor_fora_do_intervalo_vira_400_no_campo() {
        let api = AppError::fora_do_intervalo("valorTotal").to_api_error(&Locale("en".into()), &store());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.details.unwrap()["valorTotal"][0], "Value out of the allowed range.");
    }

    #[test]
    fn codigos_de_regra_sao_traduzidos() {
        let err = AppError::AditivoInvalido("aditivo.prorrogacao_sem_meses");
        let api = err.to_api_error(&Locale("pt".into()), &store());

        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_ne!(api.message, "aditivo.prorrogacao_sem_meses");
    }
}
