// src/services/cliente_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::somente_digitos, error::AppError},
    db::ClienteRepository,
    models::clientes::{Cliente, ClienteFiltro, ClientePayload, ContatoCliente, ContatoPayload},
};

#[derive(Clone)]
pub struct ClienteService {
    repo: ClienteRepository,
}

impl ClienteService {
    pub fn new(repo: ClienteRepository) -> Self {
        Self { repo }
    }

    pub async fn create_cliente<'e, E>(&self, executor: E, payload: &ClientePayload) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.create(executor, &normalizar(payload)).await
    }

    pub async fn update_cliente<'e, E>(&self, executor: E, id: Uuid, payload: &ClientePayload) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.update(executor, id, &normalizar(payload)).await
    }

    pub async fn get_cliente<'e, E>(&self, executor: E, id: Uuid) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.get(executor, id).await
    }

    pub async fn list_clientes<'e, E>(&self, executor: E, filtro: &ClienteFiltro) -> Result<Vec<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor, filtro).await
    }

    /// Contratos do cliente são removidos em cascata.
    pub async fn delete_cliente<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete(executor, id).await
    }

    // --- CONTATOS ---

    pub async fn add_contato<'e, E>(
        &self,
        executor: E,
        cliente_id: Uuid,
        payload: &ContatoPayload,
    ) -> Result<ContatoCliente, AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // 404 explícito em vez de violação de FK
        self.repo.get(&mut *tx, cliente_id).await?;
        let contato = self.repo.create_contato(&mut *tx, cliente_id, payload).await?;

        tx.commit().await?;
        Ok(contato)
    }

    pub async fn list_contatos<'e, E>(&self, executor: E, cliente_id: Uuid) -> Result<Vec<ContatoCliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_contatos(executor, cliente_id).await
    }

    pub async fn delete_contato<'e, E>(&self, executor: E, cliente_id: Uuid, contato_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete_contato(executor, cliente_id, contato_id).await
    }
}

/// Documento e CEP só com dígitos, UF em maiúsculas.
fn normalizar(payload: &ClientePayload) -> ClientePayload {
    let mut normalizado = payload.clone();
    normalizado.cnpj_cpf = somente_digitos(&payload.cnpj_cpf);
    normalizado.cep = somente_digitos(&payload.cep);
    normalizado.estado = payload.estado.trim().to_uppercase();
    normalizado.nome_razao_social = payload.nome_razao_social.trim().to_string();
    normalizado
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clientes::{TipoCliente, TipoPessoa};

    #[test]
    fn normaliza_documento_cep_e_uf() {
        let payload = ClientePayload {
            nome_razao_social: " Prefeitura de Campinas ".into(),
            nome_fantasia: None,
            tipo_cliente: TipoCliente::Publico,
            tipo_pessoa: TipoPessoa::Juridica,
            cnpj_cpf: "12.345.678/0001-90".into(),
            endereco: "Av. Anchieta".into(),
            numero: "200".into(),
            complemento: None,
            bairro: "Centro".into(),
            cidade: "Campinas".into(),
            estado: "sp".into(),
            cep: "13015-904".into(),
            nome_responsavel: "Maria".into(),
            cargo_responsavel: "Secretária".into(),
            telefone_contato: "1932320000".into(),
            email_contato: "ti@campinas.sp.gov.br".into(),
            ativo: true,
        };

        let normalizado = normalizar(&payload);
        assert_eq!(normalizado.cnpj_cpf, "12345678000190");
        assert_eq!(normalizado.cep, "13015904");
        assert_eq!(normalizado.estado, "SP");
        assert_eq!(normalizado.nome_razao_social, "Prefeitura de Campinas");
    }
}
