// src/handlers/projetos.rs

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
    models::projetos::{
        FeedbackContato, FeedbackFiltro, LancamentoHora, LancamentoHoraPayload, Projeto, ProjetoFiltro,
        ProjetoPayload, Sprint, SprintPayload, StatusProjetoPayload, StatusSprintPayload, Tarefa, TarefaPayload,
    },
};

// POST /api/projetos
#[utoipa::path(
    post,
    path = "/api/projetos",
    tag = "Projetos",
    request_body = ProjetoPayload,
    responses(
        (status = 201, description = "Projeto criado", body = Projeto),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "OS de outro contrato")
    )
)]
pub async fn create_projeto(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ProjetoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let projeto = app_state
        .projeto_service
        .create_projeto(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(projeto)))
}

// GET /api/projetos
#[utoipa::path(
    get,
    path = "/api/projetos",
    tag = "Projetos",
    params(ProjetoFiltro),
    responses(
        (status = 200, description = "Lista de projetos", body = Vec<Projeto>)
    )
)]
pub async fn list_projetos(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filtro): Query<ProjetoFiltro>,
) -> Result<impl IntoResponse, ApiError> {
    let projetos = app_state
        .projeto_service
        .list_projetos(&app_state.db_pool, &filtro)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(projetos)))
}

// GET /api/projetos/{id}
#[utoipa::path(
    get,
    path = "/api/projetos/{id}",
    tag = "Projetos",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 200, description = "Projeto", body = Projeto),
        (status = 404, description = "Projeto não encontrado")
    )
)]
pub async fn get_projeto(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let projeto = app_state
        .projeto_service
        .get_projeto(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(projeto)))
}

// PUT /api/projetos/{id}/status
#[utoipa::path(
    put,
    path = "/api/projetos/{id}/status",
    tag = "Projetos",
    request_body = StatusProjetoPayload,
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 200, description = "Status alterado", body = Projeto),
        (status = 404, description = "Projeto não encontrado")
    )
)]
pub async fn update_status_projeto(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusProjetoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let projeto = app_state
        .projeto_service
        .update_status_projeto(&app_state.db_pool, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(projeto)))
}

// DELETE /api/projetos/{id}
#[utoipa::path(
    delete,
    path = "/api/projetos/{id}",
    tag = "Projetos",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 204, description = "Projeto removido"),
        (status = 404, description = "Projeto não encontrado")
    )
)]
pub async fn delete_projeto(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .projeto_service
        .delete_projeto(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  SPRINTS
// =============================================================================

// POST /api/projetos/{id}/sprints
#[utoipa::path(
    post,
    path = "/api/projetos/{id}/sprints",
    tag = "Projetos",
    request_body = SprintPayload,
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 201, description = "Sprint criada", body = Sprint),
        (status = 400, description = "Período inválido")
    )
)]
pub async fn create_sprint(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(projeto_id): Path<Uuid>,
    Json(payload): Json<SprintPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let sprint = app_state
        .projeto_service
        .create_sprint(&app_state.db_pool, projeto_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(sprint)))
}

// GET /api/projetos/{id}/sprints
#[utoipa::path(
    get,
    path = "/api/projetos/{id}/sprints",
    tag = "Projetos",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 200, description = "Sprints do projeto", body = Vec<Sprint>)
    )
)]
pub async fn list_sprints(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(projeto_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let sprints = app_state
        .projeto_service
        .list_sprints(&app_state.db_pool, projeto_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(sprints)))
}

// PUT /api/sprints/{id}/status
#[utoipa::path(
    put,
    path = "/api/sprints/{id}/status",
    tag = "Projetos",
    request_body = StatusSprintPayload,
    params(("id" = Uuid, Path, description = "ID da sprint")),
    responses(
        (status = 200, description = "Status alterado; faturada gera feedback ao contato", body = Sprint),
        (status = 404, description = "Sprint não encontrada")
    )
)]
pub async fn update_status_sprint(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusSprintPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let sprint = app_state
        .projeto_service
        .update_status_sprint(&app_state.db_pool, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(sprint)))
}

// DELETE /api/sprints/{id}
#[utoipa::path(
    delete,
    path = "/api/sprints/{id}",
    tag = "Projetos",
    params(("id" = Uuid, Path, description = "ID da sprint")),
    responses(
        (status = 204, description = "Sprint removida"),
        (status = 404, description = "Sprint não encontrada")
    )
)]
pub async fn delete_sprint(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .projeto_service
        .delete_sprint(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  TAREFAS
// =============================================================================

// POST /api/projetos/{id}/tarefas
#[utoipa::path(
    post,
    path = "/api/projetos/{id}/tarefas",
    tag = "Projetos",
    request_body = TarefaPayload,
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 201, description = "Tarefa criada", body = Tarefa),
        (status = 409, description = "Sprint de outro projeto")
    )
)]
pub async fn create_tarefa(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(projeto_id): Path<Uuid>,
    Json(payload): Json<TarefaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let tarefa = app_state
        .projeto_service
        .create_tarefa(&app_state.db_pool, projeto_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(tarefa)))
}

// GET /api/projetos/{id}/tarefas
#[utoipa::path(
    get,
    path = "/api/projetos/{id}/tarefas",
    tag = "Projetos",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 200, description = "Tarefas do projeto", body = Vec<Tarefa>)
    )
)]
pub async fn list_tarefas(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(projeto_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let tarefas = app_state
        .projeto_service
        .list_tarefas(&app_state.db_pool, projeto_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tarefas)))
}

// PUT /api/tarefas/{id}
#[utoipa::path(
    put,
    path = "/api/tarefas/{id}",
    tag = "Projetos",
    request_body = TarefaPayload,
    params(("id" = Uuid, Path, description = "ID da tarefa")),
    responses(
        (status = 200, description = "Tarefa atualizada", body = Tarefa),
        (status = 404, description = "Tarefa não encontrada")
    )
)]
pub async fn update_tarefa(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<TarefaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let tarefa = app_state
        .projeto_service
        .update_tarefa(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tarefa)))
}

// DELETE /api/tarefas/{id}
#[utoipa::path(
    delete,
    path = "/api/tarefas/{id}",
    tag = "Projetos",
    params(("id" = Uuid, Path, description = "ID da tarefa")),
    responses(
        (status = 204, description = "Tarefa removida"),
        (status = 404, description = "Tarefa não encontrada")
    )
)]
pub async fn delete_tarefa(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .projeto_service
        .delete_tarefa(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  LANÇAMENTOS DE HORAS
// =============================================================================

// POST /api/tarefas/{id}/lancamentos
#[utoipa::path(
    post,
    path = "/api/tarefas/{id}/lancamentos",
    tag = "Projetos",
    request_body = LancamentoHoraPayload,
    params(("id" = Uuid, Path, description = "ID da tarefa")),
    responses(
        (status = 201, description = "Horas lançadas", body = LancamentoHora),
        (status = 400, description = "Horas fora do intervalo (0, 24]")
    )
)]
pub async fn create_lancamento(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(tarefa_id): Path<Uuid>,
    Json(payload): Json<LancamentoHoraPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let lancamento = app_state
        .projeto_service
        .create_lancamento(&app_state.db_pool, tarefa_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(lancamento)))
}

// GET /api/tarefas/{id}/lancamentos
#[utoipa::path(
    get,
    path = "/api/tarefas/{id}/lancamentos",
    tag = "Projetos",
    params(("id" = Uuid, Path, description = "ID da tarefa")),
    responses(
        (status = 200, description = "Lançamentos da tarefa", body = Vec<LancamentoHora>)
    )
)]
pub async fn list_lancamentos(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(tarefa_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let lancamentos = app_state
        .projeto_service
        .list_lancamentos(&app_state.db_pool, tarefa_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(lancamentos)))
}

// DELETE /api/lancamentos/{id}
#[utoipa::path(
    delete,
    path = "/api/lancamentos/{id}",
    tag = "Projetos",
    params(("id" = Uuid, Path, description = "ID do lançamento")),
    responses(
        (status = 204, description = "Lançamento removido"),
        (status = 404, description = "Lançamento não encontrado")
    )
)]
pub async fn delete_lancamento(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .projeto_service
        .delete_lancamento(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  FEEDBACKS
// =============================================================================

// GET /api/feedbacks
#[utoipa::path(
    get,
    path = "/api/feedbacks",
    tag = "Projetos",
    params(FeedbackFiltro),
    responses(
        (status = 200, description = "Pedidos de feedback ao contato do cliente", body = Vec<FeedbackContato>)
    )
)]
pub async fn list_feedbacks(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filtro): Query<FeedbackFiltro>,
) -> Result<impl IntoResponse, ApiError> {
    let feedbacks = app_state
        .projeto_service
        .list_feedbacks(&app_state.db_pool, &filtro)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(feedbacks)))
}

// POST /api/feedbacks/{id}/concluir
#[utoipa::path(
    post,
    path = "/api/feedbacks/{id}/concluir",
    tag = "Projetos",
    params(("id" = Uuid, Path, description = "ID do feedback")),
    responses(
        (status = 200, description = "Feedback concluído", body = FeedbackContato),
        (status = 404, description = "Feedback não encontrado")
    )
)]
pub async fn concluir_feedback(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let feedback = app_state
        .projeto_service
        .concluir_feedback(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(feedback)))
}
