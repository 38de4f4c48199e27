// src/db/analises_repo.rs

use serde_json::Value;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::analises::{
        AnaliseContrato, DocumentoContrato, DocumentoPayload, PlanoTrabalho, PlanoTrabalhoPayload, StatusAnalise,
        StatusDocumento, StatusPlano,
    },
};

#[derive(Clone, Default)]
pub struct AnaliseRepository;

impl AnaliseRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  ANÁLISES
    // =========================================================================

    pub async fn create<'e, E>(&self, executor: E, titulo: &str) -> Result<AnaliseContrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let analise = sqlx::query_as::<_, AnaliseContrato>("INSERT INTO analises_contrato (titulo) VALUES ($1) RETURNING *")
            .bind(titulo)
            .fetch_one(executor)
            .await?;

        Ok(analise)
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<AnaliseContrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AnaliseContrato>("SELECT * FROM analises_contrato WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Análise".into()))
    }

    pub async fn get_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<AnaliseContrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AnaliseContrato>("SELECT * FROM analises_contrato WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Análise".into()))
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<AnaliseContrato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let analises = sqlx::query_as::<_, AnaliseContrato>("SELECT * FROM analises_contrato ORDER BY created_at DESC")
            .fetch_all(executor)
            .await?;

        Ok(analises)
    }

    pub async fn registrar_sucesso<'e, E>(&self, executor: E, id: Uuid, dados: &Value) -> Result<AnaliseContrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AnaliseContrato>(
            r#"
            UPDATE analises_contrato SET
                status = 'analisado', dados_extraidos = $2, mensagem_erro = NULL, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dados)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Análise".into()))
    }

    pub async fn registrar_erro<'e, E>(&self, executor: E, id: Uuid, mensagem: &str) -> Result<AnaliseContrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AnaliseContrato>(
            r#"
            UPDATE analises_contrato SET status = 'erro', mensagem_erro = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mensagem)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Análise".into()))
    }

    pub async fn marcar_aplicada<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cliente_id: Uuid,
        contrato_id: Uuid,
    ) -> Result<AnaliseContrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let analise = sqlx::query_as::<_, AnaliseContrato>(
            r#"
            UPDATE analises_contrato SET
                status = $2, cliente_id = $3, contrato_id = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(StatusAnalise::Aplicado)
        .bind(cliente_id)
        .bind(contrato_id)
        .fetch_one(executor)
        .await?;

        Ok(analise)
    }

    // =========================================================================
    //  DOCUMENTOS
    // =========================================================================

    pub async fn create_documento<'e, E>(
        &self,
        executor: E,
        analise_id: Uuid,
        payload: &DocumentoPayload,
        status: StatusDocumento,
    ) -> Result<DocumentoContrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let documento = sqlx::query_as::<_, DocumentoContrato>(
            r#"
            INSERT INTO documentos_contrato (analise_id, nome_arquivo, texto_extraido, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(analise_id)
        .bind(&payload.nome_arquivo)
        .bind(&payload.texto_extraido)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(documento)
    }

    pub async fn list_documentos<'e, E>(&self, executor: E, analise_id: Uuid) -> Result<Vec<DocumentoContrato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let documentos = sqlx::query_as::<_, DocumentoContrato>(
            "SELECT * FROM documentos_contrato WHERE analise_id = $1 ORDER BY created_at",
        )
        .bind(analise_id)
        .fetch_all(executor)
        .await?;

        Ok(documentos)
    }

    // =========================================================================
    //  PLANOS DE TRABALHO
    // =========================================================================

    pub async fn create_plano<'e, E>(
        &self,
        executor: E,
        projeto_id: Uuid,
        payload: &PlanoTrabalhoPayload,
    ) -> Result<PlanoTrabalho, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let plano = sqlx::query_as::<_, PlanoTrabalho>(
            r#"
            INSERT INTO planos_trabalho (projeto_id, conteudo, observacoes)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(projeto_id)
        .bind(&payload.conteudo)
        .bind(&payload.observacoes)
        .fetch_one(executor)
        .await?;

        Ok(plano)
    }

    pub async fn get_plano_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<PlanoTrabalho, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PlanoTrabalho>("SELECT * FROM planos_trabalho WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Plano de trabalho".into()))
    }

    pub async fn list_planos<'e, E>(&self, executor: E, projeto_id: Uuid) -> Result<Vec<PlanoTrabalho>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let planos = sqlx::query_as::<_, PlanoTrabalho>(
            "SELECT * FROM planos_trabalho WHERE projeto_id = $1 ORDER BY created_at DESC",
        )
        .bind(projeto_id)
        .fetch_all(executor)
        .await?;

        Ok(planos)
    }

    pub async fn decidir_plano<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: StatusPlano,
        observacoes: Option<&str>,
    ) -> Result<PlanoTrabalho, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let plano = sqlx::query_as::<_, PlanoTrabalho>(
            r#"
            UPDATE planos_trabalho SET
                status = $2, observacoes = COALESCE($3, observacoes), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(observacoes)
        .fetch_one(executor)
        .await?;

        Ok(plano)
    }
}
