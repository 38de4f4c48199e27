// src/handlers/contratos.rs

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
    models::contratos::{
        AditivoPayload, AtualizacaoSituacoes, Contrato, ContratoDetalhe, ContratoFiltro, ContratoPayload,
        ContratoResumo, ItemContrato, ItemContratoDetalhe, ItemContratoPayload, RenovacaoPendente, TermoAditivo,
        ValidacaoAditivo,
    },
};

// =============================================================================
//  CONTRATOS
// =============================================================================

// POST /api/contratos
#[utoipa::path(
    post,
    path = "/api/contratos",
    tag = "Contratos",
    request_body = ContratoPayload,
    responses(
        (status = 201, description = "Contrato criado", body = Contrato),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Número de contrato já cadastrado"),
        (status = 422, description = "Vigência acima do limite do regime legal")
    )
)]
pub async fn create_contrato(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ContratoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let contrato = app_state
        .contrato_service
        .create_contrato(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(contrato)))
}

// GET /api/contratos
#[utoipa::path(
    get,
    path = "/api/contratos",
    tag = "Contratos",
    params(ContratoFiltro),
    responses(
        (status = 200, description = "Lista de contratos", body = Vec<Contrato>)
    )
)]
pub async fn list_contratos(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filtro): Query<ContratoFiltro>,
) -> Result<impl IntoResponse, ApiError> {
    let contratos = app_state
        .contrato_service
        .list_contratos(&app_state.db_pool, &filtro)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(contratos)))
}

// GET /api/contratos/{id}
#[utoipa::path(
    get,
    path = "/api/contratos/{id}",
    tag = "Contratos",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 200, description = "Contrato com aditivos e itens", body = ContratoDetalhe),
        (status = 404, description = "Contrato não encontrado")
    )
)]
pub async fn get_contrato(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let contrato = app_state
        .contrato_service
        .get_contrato(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(contrato)))
}

// PUT /api/contratos/{id}
#[utoipa::path(
    put,
    path = "/api/contratos/{id}",
    tag = "Contratos",
    request_body = ContratoPayload,
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 200, description = "Contrato atualizado", body = Contrato),
        (status = 404, description = "Contrato não encontrado"),
        (status = 422, description = "Vigência acima do limite do regime legal")
    )
)]
pub async fn update_contrato(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContratoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let contrato = app_state
        .contrato_service
        .update_contrato(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(contrato)))
}

// DELETE /api/contratos/{id}
#[utoipa::path(
    delete,
    path = "/api/contratos/{id}",
    tag = "Contratos",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 204, description = "Contrato removido"),
        (status = 404, description = "Contrato não encontrado"),
        (status = 409, description = "Contrato com ordens de fornecimento")
    )
)]
pub async fn delete_contrato(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .contrato_service
        .delete_contrato(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/contratos/{id}/resumo
#[utoipa::path(
    get,
    path = "/api/contratos/{id}/resumo",
    tag = "Contratos",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 200, description = "Situação legal e financeira do contrato", body = ContratoResumo),
        (status = 404, description = "Contrato não encontrado")
    )
)]
pub async fn resumo_contrato(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let resumo = app_state
        .contrato_service
        .resumo(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(resumo)))
}

// GET /api/contratos/renovacoes
#[utoipa::path(
    get,
    path = "/api/contratos/renovacoes",
    tag = "Contratos",
    responses(
        (status = 200, description = "Contratos ativos perto do vencimento", body = Vec<RenovacaoPendente>)
    )
)]
pub async fn renovacoes_pendentes(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let renovacoes = app_state
        .contrato_service
        .renovacoes_pendentes(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(renovacoes)))
}

// POST /api/contratos/situacao/atualizar
#[utoipa::path(
    post,
    path = "/api/contratos/situacao/atualizar",
    tag = "Contratos",
    responses(
        (status = 200, description = "Situações recalculadas para a data de hoje", body = AtualizacaoSituacoes)
    )
)]
pub async fn atualizar_situacoes(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let resultado = app_state
        .contrato_service
        .atualizar_situacoes(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(resultado)))
}

// =============================================================================
//  TERMOS ADITIVOS
// =============================================================================

// POST /api/contratos/{id}/aditivos
#[utoipa::path(
    post,
    path = "/api/contratos/{id}/aditivos",
    tag = "Termos Aditivos",
    request_body = AditivoPayload,
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 201, description = "Aditivo registrado e contrato recalculado", body = TermoAditivo),
        (status = 422, description = "Aditivo viola os limites legais")
    )
)]
pub async fn create_aditivo(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(contrato_id): Path<Uuid>,
    Json(payload): Json<AditivoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let aditivo = app_state
        .contrato_service
        .create_aditivo(&app_state.db_pool, contrato_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(aditivo)))
}

// GET /api/contratos/{id}/aditivos
#[utoipa::path(
    get,
    path = "/api/contratos/{id}/aditivos",
    tag = "Termos Aditivos",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 200, description = "Aditivos do contrato", body = Vec<TermoAditivo>)
    )
)]
pub async fn list_aditivos(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(contrato_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let aditivos = app_state
        .contrato_service
        .list_aditivos(&app_state.db_pool, contrato_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(aditivos)))
}

// PUT /api/contratos/{id}/aditivos/{aditivo_id}
#[utoipa::path(
    put,
    path = "/api/contratos/{id}/aditivos/{aditivo_id}",
    tag = "Termos Aditivos",
    request_body = AditivoPayload,
    params(
        ("id" = Uuid, Path, description = "ID do contrato"),
        ("aditivo_id" = Uuid, Path, description = "ID do aditivo")
    ),
    responses(
        (status = 200, description = "Aditivo atualizado", body = TermoAditivo),
        (status = 404, description = "Aditivo não encontrado"),
        (status = 422, description = "Aditivo viola os limites legais")
    )
)]
pub async fn update_aditivo(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((contrato_id, aditivo_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AditivoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let aditivo = app_state
        .contrato_service
        .update_aditivo(&app_state.db_pool, contrato_id, aditivo_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(aditivo)))
}

// DELETE /api/contratos/{id}/aditivos/{aditivo_id}
#[utoipa::path(
    delete,
    path = "/api/contratos/{id}/aditivos/{aditivo_id}",
    tag = "Termos Aditivos",
    params(
        ("id" = Uuid, Path, description = "ID do contrato"),
        ("aditivo_id" = Uuid, Path, description = "ID do aditivo")
    ),
    responses(
        (status = 204, description = "Aditivo removido e contrato recalculado"),
        (status = 404, description = "Aditivo não encontrado")
    )
)]
pub async fn delete_aditivo(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((contrato_id, aditivo_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .contrato_service
        .delete_aditivo(&app_state.db_pool, contrato_id, aditivo_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/contratos/{id}/aditivos/validar
#[utoipa::path(
    post,
    path = "/api/contratos/{id}/aditivos/validar",
    tag = "Termos Aditivos",
    request_body = AditivoPayload,
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 200, description = "Resultado da validação, sem gravar nada", body = ValidacaoAditivo),
        (status = 404, description = "Contrato não encontrado")
    )
)]
pub async fn validar_aditivo(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(contrato_id): Path<Uuid>,
    Json(payload): Json<AditivoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let simulacao = app_state
        .contrato_service
        .simular_aditivo(&app_state.db_pool, contrato_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let validacao = match simulacao.resultado {
        Ok(efeito) => ValidacaoAditivo {
            valido: true,
            vigencia_total_resultante: efeito.vigencia_total_meses,
            valor_atual_resultante: efeito.valor_atual,
            erro: None,
        },
        // só regras de negócio viram resposta; o resto continua sendo erro
        Err(e) if e.status_code() == StatusCode::UNPROCESSABLE_ENTITY => ValidacaoAditivo {
            valido: false,
            vigencia_total_resultante: simulacao.contrato.vigencia_total_meses,
            valor_atual_resultante: simulacao.contrato.valor_atual,
            erro: Some(e.to_api_error(&locale, &app_state.i18n_store).message),
        },
        Err(e) => return Err(e.to_api_error(&locale, &app_state.i18n_store)),
    };

    Ok((StatusCode::OK, Json(validacao)))
}

// =============================================================================
//  ITENS DO CONTRATO
// =============================================================================

// POST /api/contratos/{id}/itens
#[utoipa::path(
    post,
    path = "/api/contratos/{id}/itens",
    tag = "Itens do Contrato",
    request_body = ItemContratoPayload,
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 201, description = "Item criado e contrato recalculado", body = ItemContrato),
        (status = 409, description = "Número de item repetido no contrato"),
        (status = 422, description = "Vigência do produto inválida")
    )
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(contrato_id): Path<Uuid>,
    Json(payload): Json<ItemContratoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let item = app_state
        .contrato_service
        .create_item(&app_state.db_pool, contrato_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(item)))
}

// GET /api/contratos/{id}/itens
#[utoipa::path(
    get,
    path = "/api/contratos/{id}/itens",
    tag = "Itens do Contrato",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 200, description = "Itens com saldos", body = Vec<ItemContratoDetalhe>)
    )
)]
pub async fn list_itens(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(contrato_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let itens = app_state
        .contrato_service
        .list_itens(&app_state.db_pool, contrato_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(itens)))
}

// GET /api/itens-contrato/{id}
#[utoipa::path(
    get,
    path = "/api/itens-contrato/{id}",
    tag = "Itens do Contrato",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Item com saldos", body = ItemContratoDetalhe),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn get_item(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .contrato_service
        .get_item(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(item)))
}

// PUT /api/itens-contrato/{id}
#[utoipa::path(
    put,
    path = "/api/itens-contrato/{id}",
    tag = "Itens do Contrato",
    request_body = ItemContratoPayload,
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Item atualizado e contrato recalculado", body = ItemContrato),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<ItemContratoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let item = app_state
        .contrato_service
        .update_item(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(item)))
}

// DELETE /api/itens-contrato/{id}
#[utoipa::path(
    delete,
    path = "/api/itens-contrato/{id}",
    tag = "Itens do Contrato",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 204, description = "Item removido e contrato recalculado"),
        (status = 404, description = "Item não encontrado"),
        (status = 409, description = "Item com ordens emitidas")
    )
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .contrato_service
        .delete_item(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
