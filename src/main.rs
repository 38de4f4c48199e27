//src/main.rs

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod domain;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new().await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let addr = app_state.settings.server_addr.clone();
    let app = router(app_state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(app_state: AppState) -> Router {
    let cliente_routes = Router::new()
        .route("/", post(handlers::clientes::create_cliente).get(handlers::clientes::list_clientes))
        .route(
            "/{id}",
            get(handlers::clientes::get_cliente)
                .put(handlers::clientes::update_cliente)
                .delete(handlers::clientes::delete_cliente),
        )
        .route(
            "/{id}/contatos",
            post(handlers::clientes::add_contato).get(handlers::clientes::list_contatos),
        )
        .route("/{id}/contatos/{contato_id}", delete(handlers::clientes::delete_contato));

    let contrato_routes = Router::new()
        .route("/", post(handlers::contratos::create_contrato).get(handlers::contratos::list_contratos))
        .route("/renovacoes", get(handlers::contratos::renovacoes_pendentes))
        .route("/situacao/atualizar", post(handlers::contratos::atualizar_situacoes))
        .route(
            "/{id}",
            get(handlers::contratos::get_contrato)
                .put(handlers::contratos::update_contrato)
                .delete(handlers::contratos::delete_contrato),
        )
        .route("/{id}/resumo", get(handlers::contratos::resumo_contrato))
        .route(
            "/{id}/aditivos",
            post(handlers::contratos::create_aditivo).get(handlers::contratos::list_aditivos),
        )
        .route("/{id}/aditivos/validar", post(handlers::contratos::validar_aditivo))
        .route(
            "/{id}/aditivos/{aditivo_id}",
            put(handlers::contratos::update_aditivo).delete(handlers::contratos::delete_aditivo),
        )
        .route(
            "/{id}/itens",
            post(handlers::contratos::create_item).get(handlers::contratos::list_itens),
        );

    let item_contrato_routes = Router::new().route(
        "/{id}",
        get(handlers::contratos::get_item)
            .put(handlers::contratos::update_item)
            .delete(handlers::contratos::delete_item),
    );

    let item_fornecedor_routes = Router::new()
        .route(
            "/",
            post(handlers::fornecedores::create_item_fornecedor).get(handlers::fornecedores::list_itens_fornecedor),
        )
        .route(
            "/{id}",
            get(handlers::fornecedores::get_item_fornecedor)
                .put(handlers::fornecedores::update_item_fornecedor)
                .delete(handlers::fornecedores::delete_item_fornecedor),
        );

    let of_routes = Router::new()
        .route(
            "/",
            post(handlers::ordens::create_ordem_fornecimento).get(handlers::ordens::list_ordens_fornecimento),
        )
        .route(
            "/{id}",
            get(handlers::ordens::get_ordem_fornecimento)
                .put(handlers::ordens::update_ordem_fornecimento)
                .delete(handlers::ordens::delete_ordem_fornecimento),
        )
        .route("/{id}/status", post(handlers::ordens::transicionar_ordem_fornecimento));

    let os_routes = Router::new()
        .route(
            "/",
            post(handlers::ordens::create_ordem_servico).get(handlers::ordens::list_ordens_servico),
        )
        .route(
            "/{id}",
            get(handlers::ordens::get_ordem_servico)
                .put(handlers::ordens::update_ordem_servico)
                .delete(handlers::ordens::delete_ordem_servico),
        )
        .route("/{id}/status", post(handlers::ordens::transicionar_ordem_servico));

    let projeto_routes = Router::new()
        .route("/", post(handlers::projetos::create_projeto).get(handlers::projetos::list_projetos))
        .route(
            "/{id}",
            get(handlers::projetos::get_projeto).delete(handlers::projetos::delete_projeto),
        )
        .route("/{id}/status", put(handlers::projetos::update_status_projeto))
        .route(
            "/{id}/sprints",
            post(handlers::projetos::create_sprint).get(handlers::projetos::list_sprints),
        )
        .route(
            "/{id}/tarefas",
            post(handlers::projetos::create_tarefa).get(handlers::projetos::list_tarefas),
        )
        .route(
            "/{id}/planos",
            post(handlers::analises::create_plano).get(handlers::analises::list_planos),
        );

    let analise_routes = Router::new()
        .route("/", post(handlers::analises::create_analise).get(handlers::analises::list_analises))
        .route("/{id}", get(handlers::analises::get_analise))
        .route("/{id}/documentos", post(handlers::analises::add_documento))
        .route("/{id}/resultado", post(handlers::analises::registrar_resultado))
        .route("/{id}/aplicar", post(handlers::analises::aplicar_analise));

    let lookup_routes = Router::new()
        .route("/contratos", get(handlers::lookup::contratos_por_cliente))
        .route("/itens-contrato", get(handlers::lookup::itens_contrato))
        .route("/itens-fornecedor", get(handlers::lookup::itens_fornecedor));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/clientes", cliente_routes)
        .nest("/api/contratos", contrato_routes)
        .nest("/api/itens-contrato", item_contrato_routes)
        .nest("/api/itens-fornecedor", item_fornecedor_routes)
        .nest("/api/ordens-fornecimento", of_routes)
        .nest("/api/ordens-servico", os_routes)
        .nest("/api/projetos", projeto_routes)
        .route("/api/sprints/{id}", delete(handlers::projetos::delete_sprint))
        .route("/api/sprints/{id}/status", put(handlers::projetos::update_status_sprint))
        .route(
            "/api/tarefas/{id}",
            put(handlers::projetos::update_tarefa).delete(handlers::projetos::delete_tarefa),
        )
        .route(
            "/api/tarefas/{id}/lancamentos",
            post(handlers::projetos::create_lancamento).get(handlers::projetos::list_lancamentos),
        )
        .route("/api/lancamentos/{id}", delete(handlers::projetos::delete_lancamento))
        .route("/api/feedbacks", get(handlers::projetos::list_feedbacks))
        .route("/api/feedbacks/{id}/concluir", post(handlers::projetos::concluir_feedback))
        .nest("/api/analises", analise_routes)
        .route("/api/planos/{id}/decisao", post(handlers::analises::decidir_plano))
        .nest("/api/lookup", lookup_routes)
        .with_state(app_state)
}
