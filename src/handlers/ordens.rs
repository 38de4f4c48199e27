// src/handlers/ordens.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::ordens::{
        AtualizaOrdemFornecimento, AtualizaOrdemServico, NovaOrdemFornecimento, NovaOrdemServico, OrdemFiltro,
        OrdemFornecimento, OrdemServicoDetalhe, TransicaoStatusPayload,
    },
};

// =============================================================================
//  ORDENS DE FORNECIMENTO
// =============================================================================

// POST /api/ordens-fornecimento
#[utoipa::path(
    post,
    path = "/api/ordens-fornecimento",
    tag = "Ordens de Fornecimento",
    request_body = NovaOrdemFornecimento,
    responses(
        (status = 201, description = "OF emitida", body = OrdemFornecimento),
        (status = 400, description = "Dados inválidos"),
        (status = 422, description = "Saldo insuficiente, item ou fornecedor incompatível")
    )
)]
pub async fn create_ordem_fornecimento(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<NovaOrdemFornecimento>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let ordem = app_state
        .ordem_service
        .create_of(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(ordem)))
}

// GET /api/ordens-fornecimento
#[utoipa::path(
    get,
    path = "/api/ordens-fornecimento",
    tag = "Ordens de Fornecimento",
    params(OrdemFiltro),
    responses(
        (status = 200, description = "Lista de OFs", body = Vec<OrdemFornecimento>)
    )
)]
pub async fn list_ordens_fornecimento(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filtro): Query<OrdemFiltro>,
) -> Result<impl IntoResponse, ApiError> {
    let ordens = app_state
        .ordem_service
        .list_of(&app_state.db_pool, &filtro)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ordens)))
}

// GET /api/ordens-fornecimento/{id}
#[utoipa::path(
    get,
    path = "/api/ordens-fornecimento/{id}",
    tag = "Ordens de Fornecimento",
    params(("id" = Uuid, Path, description = "ID da OF")),
    responses(
        (status = 200, description = "OF", body = OrdemFornecimento),
        (status = 404, description = "OF não encontrada")
    )
)]
pub async fn get_ordem_fornecimento(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let ordem = app_state
        .ordem_service
        .get_of(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ordem)))
}

// PUT /api/ordens-fornecimento/{id}
#[utoipa::path(
    put,
    path = "/api/ordens-fornecimento/{id}",
    tag = "Ordens de Fornecimento",
    request_body = AtualizaOrdemFornecimento,
    params(("id" = Uuid, Path, description = "ID da OF")),
    responses(
        (status = 200, description = "OF atualizada", body = OrdemFornecimento),
        (status = 422, description = "Saldo insuficiente")
    )
)]
pub async fn update_ordem_fornecimento(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizaOrdemFornecimento>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let ordem = app_state
        .ordem_service
        .update_of(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ordem)))
}

// DELETE /api/ordens-fornecimento/{id}
#[utoipa::path(
    delete,
    path = "/api/ordens-fornecimento/{id}",
    tag = "Ordens de Fornecimento",
    params(("id" = Uuid, Path, description = "ID da OF")),
    responses(
        (status = 204, description = "OF removida"),
        (status = 404, description = "OF não encontrada")
    )
)]
pub async fn delete_ordem_fornecimento(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .ordem_service
        .delete_of(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/ordens-fornecimento/{id}/status
#[utoipa::path(
    post,
    path = "/api/ordens-fornecimento/{id}/status",
    tag = "Ordens de Fornecimento",
    request_body = TransicaoStatusPayload,
    params(("id" = Uuid, Path, description = "ID da OF")),
    responses(
        (status = 200, description = "Status alterado", body = OrdemFornecimento),
        (status = 422, description = "Transição inválida ou saldo insuficiente no faturamento")
    )
)]
pub async fn transicionar_ordem_fornecimento(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransicaoStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let ordem = app_state
        .ordem_service
        .transicionar_of(&app_state.db_pool, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ordem)))
}

// =============================================================================
//  ORDENS DE SERVIÇO
// =============================================================================

// POST /api/ordens-servico
#[utoipa::path(
    post,
    path = "/api/ordens-servico",
    tag = "Ordens de Serviço",
    request_body = NovaOrdemServico,
    responses(
        (status = 201, description = "OS emitida, com a análise de margem", body = OrdemServicoDetalhe),
        (status = 400, description = "Dados inválidos"),
        (status = 422, description = "Saldo ou margem insuficiente, item ou fornecedor incompatível")
    )
)]
pub async fn create_ordem_servico(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<NovaOrdemServico>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let ordem = app_state
        .ordem_service
        .create_os(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(ordem)))
}

// GET /api/ordens-servico
#[utoipa::path(
    get,
    path = "/api/ordens-servico",
    tag = "Ordens de Serviço",
    params(OrdemFiltro),
    responses(
        (status = 200, description = "Lista de OSs", body = Vec<OrdemServicoDetalhe>)
    )
)]
pub async fn list_ordens_servico(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filtro): Query<OrdemFiltro>,
) -> Result<impl IntoResponse, ApiError> {
    let ordens = app_state
        .ordem_service
        .list_os(&app_state.db_pool, &filtro)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ordens)))
}

// GET /api/ordens-servico/{id}
#[utoipa::path(
    get,
    path = "/api/ordens-servico/{id}",
    tag = "Ordens de Serviço",
    params(("id" = Uuid, Path, description = "ID da OS")),
    responses(
        (status = 200, description = "OS com a análise de margem", body = OrdemServicoDetalhe),
        (status = 404, description = "OS não encontrada")
    )
)]
pub async fn get_ordem_servico(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let ordem = app_state
        .ordem_service
        .get_os(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ordem)))
}

// PUT /api/ordens-servico/{id}
#[utoipa::path(
    put,
    path = "/api/ordens-servico/{id}",
    tag = "Ordens de Serviço",
    request_body = AtualizaOrdemServico,
    params(("id" = Uuid, Path, description = "ID da OS")),
    responses(
        (status = 200, description = "OS atualizada", body = OrdemServicoDetalhe),
        (status = 422, description = "Saldo ou margem insuficiente")
    )
)]
pub async fn update_ordem_servico(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizaOrdemServico>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let ordem = app_state
        .ordem_service
        .update_os(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ordem)))
}

// DELETE /api/ordens-servico/{id}
#[utoipa::path(
    delete,
    path = "/api/ordens-servico/{id}",
    tag = "Ordens de Serviço",
    params(("id" = Uuid, Path, description = "ID da OS")),
    responses(
        (status = 204, description = "OS removida"),
        (status = 404, description = "OS não encontrada")
    )
)]
pub async fn delete_ordem_servico(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .ordem_service
        .delete_os(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/ordens-servico/{id}/status
#[utoipa::path(
    post,
    path = "/api/ordens-servico/{id}/status",
    tag = "Ordens de Serviço",
    request_body = TransicaoStatusPayload,
    params(("id" = Uuid, Path, description = "ID da OS")),
    responses(
        (status = 200, description = "Status alterado", body = OrdemServicoDetalhe),
        (status = 422, description = "Transição inválida ou saldo insuficiente no faturamento")
    )
)]
pub async fn transicionar_ordem_servico(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransicaoStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let ordem = app_state
        .ordem_service
        .transicionar_os(&app_state.db_pool, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ordem)))
}
