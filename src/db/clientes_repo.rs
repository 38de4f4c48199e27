// src/db/clientes_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_foreign_key_violation, map_unique_violation},
        error::AppError,
    },
    models::clientes::{Cliente, ClienteFiltro, ClientePayload, ContatoCliente, ContatoPayload},
};

#[derive(Clone, Default)]
pub struct ClienteRepository;

impl ClienteRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn create<'e, E>(&self, executor: E, payload: &ClientePayload) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Cliente>(
            r#"
            INSERT INTO clientes (
                nome_razao_social, nome_fantasia, tipo_cliente, tipo_pessoa, cnpj_cpf,
                endereco, numero, complemento, bairro, cidade, estado, cep,
                nome_responsavel, cargo_responsavel, telefone_contato, email_contato, ativo
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(&payload.nome_razao_social)
        .bind(&payload.nome_fantasia)
        .bind(payload.tipo_cliente)
        .bind(payload.tipo_pessoa)
        .bind(&payload.cnpj_cpf)
        .bind(&payload.endereco)
        .bind(&payload.numero)
        .bind(&payload.complemento)
        .bind(&payload.bairro)
        .bind(&payload.cidade)
        .bind(&payload.estado)
        .bind(&payload.cep)
        .bind(&payload.nome_responsavel)
        .bind(&payload.cargo_responsavel)
        .bind(&payload.telefone_contato)
        .bind(&payload.email_contato)
        .bind(payload.ativo)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "cnpjCpf"))
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, payload: &ClientePayload) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes SET
                nome_razao_social = $2, nome_fantasia = $3, tipo_cliente = $4, tipo_pessoa = $5,
                cnpj_cpf = $6, endereco = $7, numero = $8, complemento = $9, bairro = $10,
                cidade = $11, estado = $12, cep = $13, nome_responsavel = $14,
                cargo_responsavel = $15, telefone_contato = $16, email_contato = $17,
                ativo = $18, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.nome_razao_social)
        .bind(&payload.nome_fantasia)
        .bind(payload.tipo_cliente)
        .bind(payload.tipo_pessoa)
        .bind(&payload.cnpj_cpf)
        .bind(&payload.endereco)
        .bind(&payload.numero)
        .bind(&payload.complemento)
        .bind(&payload.bairro)
        .bind(&payload.cidade)
        .bind(&payload.estado)
        .bind(&payload.cep)
        .bind(&payload.nome_responsavel)
        .bind(&payload.cargo_responsavel)
        .bind(&payload.telefone_contato)
        .bind(&payload.email_contato)
        .bind(payload.ativo)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, "cnpjCpf"))?
        .ok_or_else(|| AppError::ResourceNotFound("Cliente".into()))
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Cliente".into()))
    }

    pub async fn find_by_documento<'e, E>(&self, executor: E, cnpj_cpf: &str) -> Result<Option<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE cnpj_cpf = $1")
            .bind(cnpj_cpf)
            .fetch_optional(executor)
            .await?;

        Ok(cliente)
    }

    pub async fn list<'e, E>(&self, executor: E, filtro: &ClienteFiltro) -> Result<Vec<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let busca = filtro.busca.as_deref().map(|b| format!("%{}%", b.trim()));

        let clientes = sqlx::query_as::<_, Cliente>(
            r#"
            SELECT * FROM clientes
            WHERE ($1::text IS NULL
                   OR nome_razao_social ILIKE $1
                   OR nome_fantasia ILIKE $1
                   OR cnpj_cpf ILIKE $1)
              AND ($2::tipo_cliente IS NULL OR tipo_cliente = $2)
              AND ($3::boolean IS NULL OR ativo = $3)
            ORDER BY nome_razao_social
            "#,
        )
        .bind(busca)
        .bind(filtro.tipo_cliente)
        .bind(filtro.ativo)
        .fetch_all(executor)
        .await?;

        Ok(clientes)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM clientes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(map_foreign_key_violation)?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Cliente".into()));
        }
        Ok(())
    }

    // =========================================================================
    //  CONTATOS
    // =========================================================================

    pub async fn create_contato<'e, E>(
        &self,
        executor: E,
        cliente_id: Uuid,
        payload: &ContatoPayload,
    ) -> Result<ContatoCliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contato = sqlx::query_as::<_, ContatoCliente>(
            r#"
            INSERT INTO contatos_cliente (cliente_id, nome, cargo, email, telefone, principal)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(cliente_id)
        .bind(&payload.nome)
        .bind(&payload.cargo)
        .bind(&payload.email)
        .bind(&payload.telefone)
        .bind(payload.principal)
        .fetch_one(executor)
        .await?;

        Ok(contato)
    }

    pub async fn list_contatos<'e, E>(&self, executor: E, cliente_id: Uuid) -> Result<Vec<ContatoCliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contatos = sqlx::query_as::<_, ContatoCliente>(
            "SELECT * FROM contatos_cliente WHERE cliente_id = $1 ORDER BY principal DESC, nome",
        )
        .bind(cliente_id)
        .fetch_all(executor)
        .await?;

        Ok(contatos)
    }

    pub async fn delete_contato<'e, E>(&self, executor: E, cliente_id: Uuid, contato_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM contatos_cliente WHERE id = $1 AND cliente_id = $2")
            .bind(contato_id)
            .bind(cliente_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Contato".into()));
        }
        Ok(())
    }
}
