// src/db/numeracao_repo.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    domain::numeracao::{formatar_numero, TipoDocumento},
};

#[derive(Clone, Default)]
pub struct NumeracaoRepository;

impl NumeracaoRepository {
    pub fn new() -> Self {
        Self
    }

    /// Reserva o próximo número do ano. O upsert trava a linha da sequência,
    /// então duas transações nunca recebem o mesmo valor.
    pub async fn proximo<'e, E>(&self, executor: E, tipo: TipoDocumento, ano: i32) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sequencia: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO sequencias_documento (tipo, ano, ultimo)
            VALUES ($1, $2, 1)
            ON CONFLICT (tipo, ano) DO UPDATE SET ultimo = sequencias_documento.ultimo + 1
            RETURNING ultimo
            "#,
        )
        .bind(tipo.prefixo())
        .bind(ano)
        .fetch_one(executor)
        .await?;

        Ok(formatar_numero(tipo, ano, sequencia))
    }
}
