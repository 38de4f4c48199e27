// src/handlers/clientes.rs

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
    models::clientes::{Cliente, ClienteFiltro, ClientePayload, ContatoCliente, ContatoPayload},
};

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = ClientePayload,
    responses(
        (status = 201, description = "Cliente criado", body = Cliente),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "CNPJ/CPF já cadastrado")
    )
)]
pub async fn create_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ClientePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let cliente = app_state
        .cliente_service
        .create_cliente(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(cliente)))
}

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    params(ClienteFiltro),
    responses(
        (status = 200, description = "Lista de clientes", body = Vec<Cliente>)
    )
)]
pub async fn list_clientes(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filtro): Query<ClienteFiltro>,
) -> Result<impl IntoResponse, ApiError> {
    let clientes = app_state
        .cliente_service
        .list_clientes(&app_state.db_pool, &filtro)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(clientes)))
}

// GET /api/clientes/{id}
#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Cliente),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn get_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let cliente = app_state
        .cliente_service
        .get_cliente(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(cliente)))
}

// PUT /api/clientes/{id}
#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    request_body = ClientePayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado", body = Cliente),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn update_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let cliente = app_state
        .cliente_service
        .update_cliente(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(cliente)))
}

// DELETE /api/clientes/{id}
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "Cliente com ordens emitidas")
    )
)]
pub async fn delete_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .cliente_service
        .delete_cliente(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  CONTATOS
// =============================================================================

// POST /api/clientes/{id}/contatos
#[utoipa::path(
    post,
    path = "/api/clientes/{id}/contatos",
    tag = "Clientes",
    request_body = ContatoPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 201, description = "Contato adicionado", body = ContatoCliente),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn add_contato(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(cliente_id): Path<Uuid>,
    Json(payload): Json<ContatoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let contato = app_state
        .cliente_service
        .add_contato(&app_state.db_pool, cliente_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(contato)))
}

// GET /api/clientes/{id}/contatos
#[utoipa::path(
    get,
    path = "/api/clientes/{id}/contatos",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Contatos do cliente", body = Vec<ContatoCliente>)
    )
)]
pub async fn list_contatos(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(cliente_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let contatos = app_state
        .cliente_service
        .list_contatos(&app_state.db_pool, cliente_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(contatos)))
}

// DELETE /api/clientes/{id}/contatos/{contato_id}
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}/contatos/{contato_id}",
    tag = "Clientes",
    params(
        ("id" = Uuid, Path, description = "ID do cliente"),
        ("contato_id" = Uuid, Path, description = "ID do contato")
    ),
    responses(
        (status = 204, description = "Contato removido"),
        (status = 404, description = "Contato não encontrado")
    )
)]
pub async fn delete_contato(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((cliente_id, contato_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .cliente_service
        .delete_contato(&app_state.db_pool, cliente_id, contato_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
