// src/handlers/lookup.rs
//
// Endpoints que alimentam os selects encadeados do formulário de ordens.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::lookup::{
        ContratoOpcao, ContratosPorClienteQuery, ItemContratoOpcao, ItemFornecedorOpcao, ItensContratoQuery,
        ItensFornecedorQuery,
    },
};

// GET /api/lookup/contratos?clienteId=
#[utoipa::path(
    get,
    path = "/api/lookup/contratos",
    tag = "Lookup",
    params(ContratosPorClienteQuery),
    responses(
        (status = 200, description = "Contratos do cliente", body = Vec<ContratoOpcao>),
        (status = 400, description = "clienteId ausente")
    )
)]
pub async fn contratos_por_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ContratosPorClienteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let opcoes = app_state
        .lookup_service
        .contratos_por_cliente(&app_state.db_pool, query.cliente_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(opcoes)))
}

// GET /api/lookup/itens-contrato?contratoId=&tipos=
#[utoipa::path(
    get,
    path = "/api/lookup/itens-contrato",
    tag = "Lookup",
    params(ItensContratoQuery),
    responses(
        (status = 200, description = "Itens do contrato", body = Vec<ItemContratoOpcao>)
    )
)]
pub async fn itens_contrato(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ItensContratoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let opcoes = app_state
        .lookup_service
        .itens_contrato(&app_state.db_pool, query.contrato_id, &query.tipos())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(opcoes)))
}

// GET /api/lookup/itens-fornecedor?contratoId=&itemContratoId=
#[utoipa::path(
    get,
    path = "/api/lookup/itens-fornecedor",
    tag = "Lookup",
    params(ItensFornecedorQuery),
    responses(
        (status = 200, description = "Itens de fornecedor compatíveis", body = Vec<ItemFornecedorOpcao>)
    )
)]
pub async fn itens_fornecedor(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ItensFornecedorQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let opcoes = app_state
        .lookup_service
        .itens_fornecedor(&app_state.db_pool, query.contrato_id, query.item_contrato_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(opcoes)))
}
