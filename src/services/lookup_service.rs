// src/services/lookup_service.rs
//
// Opções para os selects encadeados cliente -> contrato -> item -> item do fornecedor.

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    db::{ContratoRepository, FornecedorRepository, ItemContratoRepository},
    domain::fornecedores::nome_exibicao,
    models::{
        contratos::{ItemContrato, TipoItemContrato},
        fornecedores::ItemFornecedor,
        lookup::{ContratoOpcao, ItemContratoOpcao, ItemFornecedorOpcao},
    },
};

#[derive(Clone)]
pub struct LookupService {
    contrato_repo: ContratoRepository,
    item_repo: ItemContratoRepository,
    fornecedor_repo: FornecedorRepository,
}

impl LookupService {
    pub fn new(contrato_repo: ContratoRepository, item_repo: ItemContratoRepository, fornecedor_repo: FornecedorRepository) -> Self {
        Self {
            contrato_repo,
            item_repo,
            fornecedor_repo,
        }
    }

    pub async fn contratos_por_cliente<'e, E>(&self, executor: E, cliente_id: Option<Uuid>) -> Result<Vec<ContratoOpcao>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(cliente_id) = cliente_id else {
            let mut errors = ValidationErrors::new();
            errors.add("clienteId", ValidationError::new("required"));
            return Err(AppError::ValidationError(errors));
        };
        self.contrato_repo.list_opcoes_por_cliente(executor, cliente_id).await
    }

    /// Itens do contrato, opcionalmente restritos a alguns tipos.
    pub async fn itens_contrato<'e, E>(
        &self,
        executor: E,
        contrato_id: Option<Uuid>,
        tipos: &[TipoItemContrato],
    ) -> Result<Vec<ItemContratoOpcao>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(contrato_id) = contrato_id else {
            return Ok(Vec::new());
        };
        let itens = self.item_repo.list_by_contrato(executor, contrato_id).await?;
        Ok(opcoes_de_itens(itens, tipos))
    }

    /// Itens de fornecedor compatíveis com o item do contrato e listados no contrato.
    pub async fn itens_fornecedor<'e, E>(
        &self,
        executor: E,
        contrato_id: Option<Uuid>,
        item_contrato_id: Option<Uuid>,
    ) -> Result<Vec<ItemFornecedorOpcao>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let (Some(contrato_id), Some(item_contrato_id)) = (contrato_id, item_contrato_id) else {
            return Ok(Vec::new());
        };

        let mut conn = executor.acquire().await?;

        let contrato = match self.contrato_repo.get(&mut *conn, contrato_id).await {
            Ok(contrato) => contrato,
            Err(AppError::ResourceNotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let item = match self.item_repo.get(&mut *conn, item_contrato_id).await {
            Ok(item) if item.contrato_id == contrato.id => item,
            Ok(_) | Err(AppError::ResourceNotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let itens = self
            .fornecedor_repo
            .list_por_tipo_e_fornecedores(&mut *conn, item.tipo.tipo_fornecedor(), &contrato.fornecedores)
            .await?;

        Ok(itens.iter().map(opcao_de_fornecedor).collect())
    }
}

fn opcoes_de_itens(itens: Vec<ItemContrato>, tipos: &[TipoItemContrato]) -> Vec<ItemContratoOpcao> {
    itens
        .into_iter()
        .filter(|item| tipos.is_empty() || tipos.contains(&item.tipo))
        .map(|item| ItemContratoOpcao {
            id: item.id,
            descricao: format!("{} - {}", item.numero_item, item.descricao),
            valor_unitario: item.valor_unitario,
        })
        .collect()
}

fn opcao_de_fornecedor(item: &ItemFornecedor) -> ItemFornecedorOpcao {
    ItemFornecedorOpcao {
        id: item.id,
        descricao: format!("{} - {} ({})", item.sku, item.descricao, nome_exibicao(item.nome_fornecedor())),
        valor_unitario: item.valor_unitario,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fornecedores::TipoItemFornecedor;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn item(numero: &str, tipo: TipoItemContrato) -> ItemContrato {
        ItemContrato {
            id: Uuid::new_v4(),
            contrato_id: Uuid::new_v4(),
            lote: 1,
            numero_item: numero.into(),
            descricao: "Subscrição RHEL".into(),
            tipo,
            unidade: "UN".into(),
            quantidade: Decimal::from(10),
            saldo_quantidade_inicial: Decimal::from(10),
            valor_unitario: Decimal::from(1500),
            valor_total: Decimal::from(15_000),
            vigencia_produto: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn itens_filtrados_por_tipo() {
        let itens = vec![item("1", TipoItemContrato::Software), item("2", TipoItemContrato::Servico)];

        let todos = opcoes_de_itens(itens.clone(), &[]);
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].descricao, "1 - Subscrição RHEL");

        let servicos = opcoes_de_itens(itens, &[TipoItemContrato::Servico, TipoItemContrato::Treinamento]);
        assert_eq!(servicos.len(), 1);
        assert_eq!(servicos[0].descricao, "2 - Subscrição RHEL");
    }

    #[test]
    fn opcao_de_fornecedor_usa_nome_de_exibicao() {
        let item = ItemFornecedor {
            id: Uuid::new_v4(),
            fornecedor: "RED HAT".into(),
            outro_fornecedor: None,
            tipo: TipoItemFornecedor::Produto,
            sku: "RH-RHEL-PREM".into(),
            descricao: "Subscrição RHEL Premium".into(),
            unidade: "UN".into(),
            valor_unitario: Decimal::from(980),
            observacoes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(opcao_de_fornecedor(&item).descricao, "RH-RHEL-PREM - Subscrição RHEL Premium (Red Hat)");
    }
}
