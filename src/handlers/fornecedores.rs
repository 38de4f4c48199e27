// src/handlers/fornecedores.rs

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
    models::fornecedores::{ItemFornecedor, ItemFornecedorFiltro, ItemFornecedorPayload},
};

// POST /api/itens-fornecedor
#[utoipa::path(
    post,
    path = "/api/itens-fornecedor",
    tag = "Fornecedores",
    request_body = ItemFornecedorPayload,
    responses(
        (status = 201, description = "Item do fornecedor criado", body = ItemFornecedor),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "SKU já cadastrado para o fornecedor")
    )
)]
pub async fn create_item_fornecedor(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ItemFornecedorPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let item = app_state
        .fornecedor_service
        .create_item(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(item)))
}

// GET /api/itens-fornecedor
#[utoipa::path(
    get,
    path = "/api/itens-fornecedor",
    tag = "Fornecedores",
    params(ItemFornecedorFiltro),
    responses(
        (status = 200, description = "Catálogo dos fornecedores", body = Vec<ItemFornecedor>)
    )
)]
pub async fn list_itens_fornecedor(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filtro): Query<ItemFornecedorFiltro>,
) -> Result<impl IntoResponse, ApiError> {
    let itens = app_state
        .fornecedor_service
        .list_itens(&app_state.db_pool, &filtro)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(itens)))
}

// GET /api/itens-fornecedor/{id}
#[utoipa::path(
    get,
    path = "/api/itens-fornecedor/{id}",
    tag = "Fornecedores",
    params(("id" = Uuid, Path, description = "ID do item do fornecedor")),
    responses(
        (status = 200, description = "Item do fornecedor", body = ItemFornecedor),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn get_item_fornecedor(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .fornecedor_service
        .get_item(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(item)))
}

// PUT /api/itens-fornecedor/{id}
#[utoipa::path(
    put,
    path = "/api/itens-fornecedor/{id}",
    tag = "Fornecedores",
    request_body = ItemFornecedorPayload,
    params(("id" = Uuid, Path, description = "ID do item do fornecedor")),
    responses(
        (status = 200, description = "Item atualizado", body = ItemFornecedor),
        (status = 404, description = "Item não encontrado")
    )
)]
pub async fn update_item_fornecedor(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<ItemFornecedorPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let item = app_state
        .fornecedor_service
        .update_item(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(item)))
}

// DELETE /api/itens-fornecedor/{id}
#[utoipa::path(
    delete,
    path = "/api/itens-fornecedor/{id}",
    tag = "Fornecedores",
    params(("id" = Uuid, Path, description = "ID do item do fornecedor")),
    responses(
        (status = 204, description = "Item removido"),
        (status = 404, description = "Item não encontrado"),
        (status = 409, description = "Item usado em ordens")
    )
)]
pub async fn delete_item_fornecedor(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .fornecedor_service
        .delete_item(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
