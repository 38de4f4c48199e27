// src/handlers/analises.rs

use axum::{
    extract::{Path, State},
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
    models::analises::{
        AnaliseContrato, AnaliseDetalhe, AnalisePayload, DecisaoPlanoPayload, DocumentoContrato, DocumentoPayload,
        PlanoTrabalho, PlanoTrabalhoPayload, ResultadoAnalisePayload, ResultadoAplicacao,
    },
};

// POST /api/analises
#[utoipa::path(
    post,
    path = "/api/analises",
    tag = "Análise de Contratos",
    request_body = AnalisePayload,
    responses(
        (status = 201, description = "Análise aberta", body = AnaliseContrato),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_analise(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<AnalisePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let analise = app_state
        .analise_service
        .create_analise(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(analise)))
}

// GET /api/analises
#[utoipa::path(
    get,
    path = "/api/analises",
    tag = "Análise de Contratos",
    responses(
        (status = 200, description = "Análises", body = Vec<AnaliseContrato>)
    )
)]
pub async fn list_analises(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let analises = app_state
        .analise_service
        .list_analises(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(analises)))
}

// GET /api/analises/{id}
#[utoipa::path(
    get,
    path = "/api/analises/{id}",
    tag = "Análise de Contratos",
    params(("id" = Uuid, Path, description = "ID da análise")),
    responses(
        (status = 200, description = "Análise com os documentos", body = AnaliseDetalhe),
        (status = 404, description = "Análise não encontrada")
    )
)]
pub async fn get_analise(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let analise = app_state
        .analise_service
        .get_analise(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(analise)))
}

// POST /api/analises/{id}/documentos
#[utoipa::path(
    post,
    path = "/api/analises/{id}/documentos",
    tag = "Análise de Contratos",
    request_body = DocumentoPayload,
    params(("id" = Uuid, Path, description = "ID da análise")),
    responses(
        (status = 201, description = "Documento anexado", body = DocumentoContrato),
        (status = 404, description = "Análise não encontrada")
    )
)]
pub async fn add_documento(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(analise_id): Path<Uuid>,
    Json(payload): Json<DocumentoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let documento = app_state
        .analise_service
        .add_documento(&app_state.db_pool, analise_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(documento)))
}

// POST /api/analises/{id}/resultado
#[utoipa::path(
    post,
    path = "/api/analises/{id}/resultado",
    tag = "Análise de Contratos",
    request_body = ResultadoAnalisePayload,
    params(("id" = Uuid, Path, description = "ID da análise")),
    responses(
        (status = 200, description = "Extração registrada", body = AnaliseContrato),
        (status = 409, description = "Análise já aplicada"),
        (status = 422, description = "Resposta do extrator não é um JSON válido")
    )
)]
pub async fn registrar_resultado(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResultadoAnalisePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let analise = app_state
        .analise_service
        .registrar_resultado(&app_state.db_pool, id, &payload.resposta)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(analise)))
}

// POST /api/analises/{id}/aplicar
#[utoipa::path(
    post,
    path = "/api/analises/{id}/aplicar",
    tag = "Análise de Contratos",
    params(("id" = Uuid, Path, description = "ID da análise")),
    responses(
        (status = 200, description = "Cliente, contrato e itens gerados a partir da extração", body = ResultadoAplicacao),
        (status = 409, description = "Análise ainda não analisada")
    )
)]
pub async fn aplicar_analise(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let resultado = app_state
        .analise_service
        .aplicar(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(resultado)))
}

// =============================================================================
//  PLANOS DE TRABALHO
// =============================================================================

// POST /api/projetos/{id}/planos
#[utoipa::path(
    post,
    path = "/api/projetos/{id}/planos",
    tag = "Análise de Contratos",
    request_body = PlanoTrabalhoPayload,
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 201, description = "Plano de trabalho registrado", body = PlanoTrabalho),
        (status = 404, description = "Projeto não encontrado")
    )
)]
pub async fn create_plano(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(projeto_id): Path<Uuid>,
    Json(payload): Json<PlanoTrabalhoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let plano = app_state
        .analise_service
        .create_plano(&app_state.db_pool, projeto_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(plano)))
}

// GET /api/projetos/{id}/planos
#[utoipa::path(
    get,
    path = "/api/projetos/{id}/planos",
    tag = "Análise de Contratos",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 200, description = "Planos do projeto", body = Vec<PlanoTrabalho>)
    )
)]
pub async fn list_planos(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(projeto_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let planos = app_state
        .analise_service
        .list_planos(&app_state.db_pool, projeto_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(planos)))
}

// POST /api/planos/{id}/decisao
#[utoipa::path(
    post,
    path = "/api/planos/{id}/decisao",
    tag = "Análise de Contratos",
    request_body = DecisaoPlanoPayload,
    params(("id" = Uuid, Path, description = "ID do plano")),
    responses(
        (status = 200, description = "Plano aprovado ou rejeitado", body = PlanoTrabalho),
        (status = 409, description = "Plano já decidido")
    )
)]
pub async fn decidir_plano(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecisaoPlanoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let plano = app_state
        .analise_service
        .decidir_plano(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(plano)))
}
