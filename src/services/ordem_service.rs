// src/services/ordem_service.rs

use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgConnection, Postgres};
use tracing::info;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        ordens_repo::{DadosOrdemFornecimento, DadosOrdemServico, MudancaStatus, VinculoOrdem},
        ContratoRepository, FornecedorRepository, ItemContratoRepository, NumeracaoRepository, OrdemRepository,
        ProjetoRepository,
    },
    domain::{
        agenda,
        fornecedores::nome_exibicao,
        margem::MargemOrdem,
        numeracao::TipoDocumento,
        saldo::{self, TipoOrdem},
        status::{self, DatasOrdem, MarcoConclusao},
        multiplicar_no_limite, RegrasNegocio, DIGITOS_VALOR,
    },
    models::{
        contratos::{Contrato, ItemContrato, TipoItemContrato},
        fornecedores::{ItemFornecedor, TipoItemFornecedor},
        ordens::{
            AtualizaOrdemFornecimento, AtualizaOrdemServico, NovaOrdemFornecimento, NovaOrdemServico, OrdemFiltro,
            OrdemFornecimento, OrdemServico, OrdemServicoDetalhe, StatusOrdem,
        },
    },
};

fn hora_padrao() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[derive(Clone)]
pub struct OrdemService {
    ordem_repo: OrdemRepository,
    contrato_repo: ContratoRepository,
    item_repo: ItemContratoRepository,
    fornecedor_repo: FornecedorRepository,
    numeracao_repo: NumeracaoRepository,
    projeto_repo: ProjetoRepository,
    regras: RegrasNegocio,
}

impl OrdemService {
    pub fn new(
        ordem_repo: OrdemRepository,
        contrato_repo: ContratoRepository,
        item_repo: ItemContratoRepository,
        fornecedor_repo: FornecedorRepository,
        numeracao_repo: NumeracaoRepository,
        projeto_repo: ProjetoRepository,
        regras: RegrasNegocio,
    ) -> Self {
        Self {
            ordem_repo,
            contrato_repo,
            item_repo,
            fornecedor_repo,
            numeracao_repo,
            projeto_repo,
            regras,
        }
    }

    // =========================================================================
    //  ORDENS DE FORNECIMENTO
    // =========================================================================

    pub async fn create_of<'e, E>(&self, executor: E, payload: &NovaOrdemFornecimento) -> Result<OrdemFornecimento, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let contrato = self.contrato_repo.get(&mut *tx, payload.contrato_id).await?;
        // a trava no item serializa emissões concorrentes contra o mesmo saldo
        let item = self.item_repo.get_for_update(&mut *tx, payload.item_contrato_id).await?;
        let fornecedor = self.fornecedor_repo.get(&mut *tx, payload.item_fornecedor_id).await?;
        validar_vinculo_of(&contrato, &item, &fornecedor)?;

        let consumo = self
            .item_repo
            .consumo_item(&mut *tx, item.id, TipoOrdem::Fornecimento, None)
            .await?;
        saldo::validar_quantidade(item.quantidade, consumo, payload.quantidade)?;

        let ano = Utc::now().year();
        let numero = self
            .numeracao_repo
            .proximo(&mut *tx, TipoDocumento::OrdemFornecimento, ano)
            .await?;

        let dados = DadosOrdemFornecimento {
            numero_of_cliente: payload.numero_of_cliente.clone(),
            unidade: item.unidade.clone(),
            quantidade: payload.quantidade,
            vigencia_produto: item.vigencia_produto,
            valor_unitario: item.valor_unitario,
            valor_total: saldo::valor_total_item(payload.quantidade, item.valor_unitario)?,
            observacoes: payload.observacoes.clone(),
        };
        let vinculo = VinculoOrdem {
            cliente_id: contrato.cliente_id,
            contrato_id: contrato.id,
            item_contrato_id: item.id,
            item_fornecedor_id: fornecedor.id,
        };
        let ordem = self.ordem_repo.create_of(&mut *tx, &numero, vinculo, &dados).await?;

        tx.commit().await?;

        info!("{} emitida para o contrato {}", ordem.numero_of, contrato.numero_contrato);
        Ok(ordem)
    }

    pub async fn update_of<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &AtualizaOrdemFornecimento,
    ) -> Result<OrdemFornecimento, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let ordem = self.ordem_repo.get_of_for_update(&mut *tx, id).await?;
        let item = self.item_repo.get_for_update(&mut *tx, ordem.item_contrato_id).await?;
        let consumo = self
            .item_repo
            .consumo_item(&mut *tx, item.id, TipoOrdem::Fornecimento, Some(ordem.id))
            .await?;
        saldo::validar_quantidade(item.quantidade, consumo, payload.quantidade)?;

        let valor_total = saldo::valor_total_item(payload.quantidade, ordem.valor_unitario)?;
        let atualizada = self.ordem_repo.update_of(&mut *tx, id, payload, valor_total).await?;

        tx.commit().await?;
        Ok(atualizada)
    }

    pub async fn get_of<'e, E>(&self, executor: E, id: Uuid) -> Result<OrdemFornecimento, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.ordem_repo.get_of(executor, id).await
    }

    pub async fn list_of<'e, E>(&self, executor: E, filtro: &OrdemFiltro) -> Result<Vec<OrdemFornecimento>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.ordem_repo.list_of(executor, filtro).await
    }

    pub async fn delete_of<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.ordem_repo.delete_of(executor, id).await
    }

    pub async fn transicionar_of<'e, E>(&self, executor: E, id: Uuid, destino: StatusOrdem) -> Result<OrdemFornecimento, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let ordem = self.ordem_repo.get_of_for_update(&mut *tx, id).await?;
        status::validar_transicao(ordem.status, destino)?;
        if destino == ordem.status {
            tx.commit().await?;
            return Ok(ordem);
        }

        let hoje = Utc::now().date_naive();
        let datas = status::datas_apos_transicao(
            destino,
            DatasOrdem { conclusao: ordem.data_ativacao, faturamento: ordem.data_faturamento },
            hoje,
            MarcoConclusao::Ativacao,
        );

        let mut numero_nota_fiscal = ordem.numero_nota_fiscal.clone();
        if destino == StatusOrdem::Faturada {
            numero_nota_fiscal = self
                .faturar(&mut tx, ordem.item_contrato_id, TipoOrdem::Fornecimento, ordem.id, ordem.quantidade, numero_nota_fiscal, hoje)
                .await?;
        }

        let mudanca = MudancaStatus {
            status: destino,
            data_conclusao: datas.conclusao,
            data_faturamento: datas.faturamento,
            numero_nota_fiscal,
        };
        let atualizada = self.ordem_repo.update_status_of(&mut *tx, id, &mudanca).await?;

        tx.commit().await?;

        info!("{}: {} -> {}", atualizada.numero_of, ordem.status, destino);
        Ok(atualizada)
    }

    // =========================================================================
    //  ORDENS DE SERVIÇO
    // =========================================================================

    pub async fn create_os<'e, E>(&self, executor: E, payload: &NovaOrdemServico) -> Result<OrdemServicoDetalhe, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let contrato = self.contrato_repo.get(&mut *tx, payload.contrato_id).await?;
        let item = self.item_repo.get_for_update(&mut *tx, payload.item_contrato_id).await?;
        let fornecedor = self.fornecedor_repo.get(&mut *tx, payload.item_fornecedor_id).await?;
        validar_vinculo_os(&contrato, &item, &fornecedor)?;

        let consumo = self
            .item_repo
            .consumo_item(&mut *tx, item.id, TipoOrdem::Servico, None)
            .await?;
        saldo::validar_quantidade(item.quantidade, consumo, payload.quantidade)?;

        let mut dados = DadosOrdemServico {
            numero_os_cliente: payload.numero_os_cliente.clone(),
            gerente_projetos: payload.gerente_projetos.clone(),
            consultor_tecnico: payload.consultor_tecnico.clone(),
            quantidade: payload.quantidade,
            valor_unitario: Decimal::ZERO,
            valor_total: Decimal::ZERO,
            custo_previsto: Decimal::ZERO,
            data_inicio: payload.data_inicio,
            hora_inicio: payload.hora_inicio.unwrap_or_else(hora_padrao),
            data_termino: None,
            hora_termino: None,
            horas_consultor: payload.horas_consultor,
            horas_gerente: payload.horas_gerente,
            horas_totais: Decimal::ZERO,
            observacoes: payload.observacoes.clone(),
        };
        completar_os(&mut dados, &item, fornecedor.valor_unitario, payload.custo_previsto)?;

        let margem = MargemOrdem::calcular(dados.valor_total, dados.custo_previsto, &self.regras);
        margem.exigir_exequivel(&self.regras)?;

        let numero = self
            .numeracao_repo
            .proximo(&mut *tx, TipoDocumento::OrdemServico, Utc::now().year())
            .await?;
        let vinculo = VinculoOrdem {
            cliente_id: contrato.cliente_id,
            contrato_id: contrato.id,
            item_contrato_id: item.id,
            item_fornecedor_id: fornecedor.id,
        };
        let ordem = self
            .ordem_repo
            .create_os(&mut *tx, &numero, vinculo, &item.unidade, &dados)
            .await?;

        tx.commit().await?;

        info!(
            "{} emitida para o contrato {} (margem {}%)",
            ordem.numero_os, contrato.numero_contrato, margem.percentual_margem
        );
        Ok(OrdemServicoDetalhe { ordem, margem })
    }

    pub async fn update_os<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &AtualizaOrdemServico,
    ) -> Result<OrdemServicoDetalhe, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let ordem = self.ordem_repo.get_os_for_update(&mut *tx, id).await?;
        let item = self.item_repo.get_for_update(&mut *tx, ordem.item_contrato_id).await?;
        let fornecedor = self.fornecedor_repo.get(&mut *tx, ordem.item_fornecedor_id).await?;

        let consumo = self
            .item_repo
            .consumo_item(&mut *tx, item.id, TipoOrdem::Servico, Some(ordem.id))
            .await?;
        saldo::validar_quantidade(item.quantidade, consumo, payload.quantidade)?;

        let mut dados = DadosOrdemServico {
            numero_os_cliente: payload.numero_os_cliente.clone(),
            gerente_projetos: payload.gerente_projetos.clone(),
            consultor_tecnico: payload.consultor_tecnico.clone(),
            quantidade: payload.quantidade,
            valor_unitario: ordem.valor_unitario,
            valor_total: Decimal::ZERO,
            custo_previsto: Decimal::ZERO,
            data_inicio: payload.data_inicio,
            hora_inicio: payload.hora_inicio.unwrap_or(ordem.hora_inicio),
            data_termino: None,
            hora_termino: None,
            horas_consultor: payload.horas_consultor,
            horas_gerente: payload.horas_gerente,
            horas_totais: Decimal::ZERO,
            observacoes: payload.observacoes.clone(),
        };
        completar_os(&mut dados, &item, fornecedor.valor_unitario, payload.custo_previsto)?;

        let margem = MargemOrdem::calcular(dados.valor_total, dados.custo_previsto, &self.regras);
        margem.exigir_exequivel(&self.regras)?;

        let atualizada = self.ordem_repo.update_os(&mut *tx, id, &dados).await?;

        tx.commit().await?;
        Ok(OrdemServicoDetalhe { ordem: atualizada, margem })
    }

    pub async fn get_os<'e, E>(&self, executor: E, id: Uuid) -> Result<OrdemServicoDetalhe, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ordem = self.ordem_repo.get_os(executor, id).await?;
        Ok(self.detalhar_os(ordem))
    }

    pub async fn list_os<'e, E>(&self, executor: E, filtro: &OrdemFiltro) -> Result<Vec<OrdemServicoDetalhe>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ordens = self.ordem_repo.list_os(executor, filtro).await?;
        Ok(ordens.into_iter().map(|o| self.detalhar_os(o)).collect())
    }

    pub async fn delete_os<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.ordem_repo.delete_os(executor, id).await
    }

    pub async fn transicionar_os<'e, E>(&self, executor: E, id: Uuid, destino: StatusOrdem) -> Result<OrdemServicoDetalhe, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let ordem = self.ordem_repo.get_os_for_update(&mut *tx, id).await?;
        status::validar_transicao(ordem.status, destino)?;
        if destino == ordem.status {
            tx.commit().await?;
            return Ok(self.detalhar_os(ordem));
        }

        let hoje = Utc::now().date_naive();
        let datas = status::datas_apos_transicao(
            destino,
            DatasOrdem { conclusao: ordem.data_emissao_trd, faturamento: ordem.data_faturamento },
            hoje,
            MarcoConclusao::EmissaoTrd,
        );

        let mut numero_nota_fiscal = ordem.numero_nota_fiscal.clone();
        if destino == StatusOrdem::Faturada {
            numero_nota_fiscal = self
                .faturar(&mut tx, ordem.item_contrato_id, TipoOrdem::Servico, ordem.id, ordem.quantidade, numero_nota_fiscal, hoje)
                .await?;
        }

        let mudanca = MudancaStatus {
            status: destino,
            data_conclusao: datas.conclusao,
            data_faturamento: datas.faturamento,
            numero_nota_fiscal,
        };
        let atualizada = self.ordem_repo.update_status_os(&mut *tx, id, &mudanca).await?;

        if destino == StatusOrdem::Faturada {
            if let Some(feedback) = self.projeto_repo.create_feedback_os(&mut *tx, id).await? {
                info!("Ticket de feedback {} aberto para {}", feedback.id, atualizada.numero_os);
            }
        }

        tx.commit().await?;

        info!("{}: {} -> {}", atualizada.numero_os, ordem.status, destino);
        Ok(self.detalhar_os(atualizada))
    }

    // =========================================================================
    //  AUXILIARES
    // =========================================================================

    /// Revalida o saldo com o item travado e gera o número da NF se faltar.
    #[allow(clippy::too_many_arguments)]
    async fn faturar(
        &self,
        conn: &mut PgConnection,
        item_id: Uuid,
        tipo: TipoOrdem,
        ordem_id: Uuid,
        quantidade: Decimal,
        numero_nota_fiscal: Option<String>,
        hoje: NaiveDate,
    ) -> Result<Option<String>, AppError> {
        let item = self.item_repo.get_for_update(&mut *conn, item_id).await?;
        let consumo = self.item_repo.consumo_item(&mut *conn, item.id, tipo, Some(ordem_id)).await?;
        saldo::validar_quantidade(item.quantidade, consumo, quantidade)?;

        if numero_nota_fiscal.is_some() {
            return Ok(numero_nota_fiscal);
        }
        let numero = self
            .numeracao_repo
            .proximo(&mut *conn, TipoDocumento::NotaFiscal, hoje.year())
            .await?;
        Ok(Some(numero))
    }

    fn detalhar_os(&self, ordem: OrdemServico) -> OrdemServicoDetalhe {
        let margem = MargemOrdem::calcular(ordem.valor_total, ordem.custo_previsto, &self.regras);
        OrdemServicoDetalhe { ordem, margem }
    }
}

fn exigir_item_do_contrato(contrato: &Contrato, item: &ItemContrato) -> Result<(), AppError> {
    if item.contrato_id != contrato.id {
        return Err(AppError::TipoItemIncompativel("ordem.item_outro_contrato"));
    }
    Ok(())
}

/// OF: item de produto, fornecedor de produto e listado no contrato.
fn validar_vinculo_of(contrato: &Contrato, item: &ItemContrato, fornecedor: &ItemFornecedor) -> Result<(), AppError> {
    exigir_item_do_contrato(contrato, item)?;
    if !item.tipo.is_produto() {
        return Err(AppError::TipoItemIncompativel("ordem.of_requer_produto"));
    }
    if fornecedor.tipo != TipoItemFornecedor::Produto {
        return Err(AppError::TipoItemIncompativel("ordem.fornecedor_requer_produto"));
    }
    if !contrato.fornecedores.iter().any(|f| *f == fornecedor.fornecedor) {
        return Err(AppError::FornecedorNaoVinculado(nome_exibicao(fornecedor.nome_fornecedor())));
    }
    Ok(())
}

/// OS: item de serviço/treinamento atendido por fornecedor do mesmo tipo.
fn validar_vinculo_os(contrato: &Contrato, item: &ItemContrato, fornecedor: &ItemFornecedor) -> Result<(), AppError> {
    exigir_item_do_contrato(contrato, item)?;
    if item.tipo.is_produto() {
        return Err(AppError::TipoItemIncompativel("ordem.os_requer_servico"));
    }
    if fornecedor.tipo != item.tipo.tipo_fornecedor() {
        return Err(AppError::TipoItemIncompativel("ordem.fornecedor_tipo_incompativel"));
    }
    Ok(())
}

/// Valores, horas, término e custo da OS derivados do item e do fornecedor.
fn completar_os(
    dados: &mut DadosOrdemServico,
    item: &ItemContrato,
    custo_unitario: Decimal,
    custo_informado: Option<Decimal>,
) -> Result<(), AppError> {
    dados.valor_unitario = item.valor_unitario;
    dados.valor_total = saldo::valor_total_item(dados.quantidade, item.valor_unitario)?;

    dados.horas_totais = if item.tipo == TipoItemContrato::Servico {
        dados.horas_consultor.unwrap_or_default() + dados.horas_gerente.unwrap_or_default()
    } else {
        Decimal::ZERO
    };

    if dados.horas_totais > Decimal::ZERO {
        let (data, hora) = agenda::calcular_termino(dados.data_inicio, dados.hora_inicio, dados.horas_totais)?;
        dados.data_termino = Some(data);
        dados.hora_termino = Some(hora);
    } else {
        dados.data_termino = None;
        dados.hora_termino = None;
    }

    dados.custo_previsto = match custo_informado {
        Some(custo) => custo,
        None => multiplicar_no_limite(dados.quantidade, custo_unitario, DIGITOS_VALOR, "custoPrevisto")?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contratos::{OrigemContrato, RegimeLegal, SituacaoContrato};

    fn data(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn contrato(fornecedores: &[&str]) -> Contrato {
        Contrato {
            id: Uuid::new_v4(),
            cliente_id: Uuid::new_v4(),
            numero_contrato: "CT-1".into(),
            objeto: None,
            ata_registro_preco: None,
            pregao_eletronico: None,
            processo: None,
            termo_referencia: None,
            regime_legal: RegimeLegal::Lei14133,
            origem_contrato: OrigemContrato::Licitacao14133Propria,
            vigencia: 12,
            data_assinatura: data(2025, 1, 1),
            fornecedores: fornecedores.iter().map(|f| f.to_string()).collect(),
            valor_inicial: Decimal::ZERO,
            valor_atual: Decimal::ZERO,
            vigencia_total_meses: 12,
            data_fim_atual: data(2026, 1, 1),
            situacao: SituacaoContrato::Ativo,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item(contrato: &Contrato, tipo: TipoItemContrato) -> ItemContrato {
        ItemContrato {
            id: Uuid::new_v4(),
            contrato_id: contrato.id,
            lote: 1,
            numero_item: "1".into(),
            descricao: "Item".into(),
            tipo,
            unidade: "UN".into(),
            quantidade: Decimal::from(100),
            saldo_quantidade_inicial: Decimal::from(100),
            valor_unitario: Decimal::from(100),
            valor_total: Decimal::from(10_000),
            vigencia_produto: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn fornecedor(nome: &str, tipo: TipoItemFornecedor) -> ItemFornecedor {
        ItemFornecedor {
            id: Uuid::new_v4(),
            fornecedor: nome.into(),
            outro_fornecedor: None,
            tipo,
            sku: "SKU".into(),
            descricao: "Item".into(),
            unidade: "UN".into(),
            valor_unitario: Decimal::from(20),
            observacoes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn dados_os(quantidade: i64, consultor: Option<i64>, gerente: Option<i64>) -> DadosOrdemServico {
        DadosOrdemServico {
            numero_os_cliente: None,
            gerente_projetos: None,
            consultor_tecnico: None,
            quantidade: Decimal::from(quantidade),
            valor_unitario: Decimal::ZERO,
            valor_total: Decimal::ZERO,
            custo_previsto: Decimal::ZERO,
            data_inicio: data(2025, 3, 3),
            hora_inicio: hora_padrao(),
            data_termino: None,
            hora_termino: None,
            horas_consultor: consultor.map(Decimal::from),
            horas_gerente: gerente.map(Decimal::from),
            horas_totais: Decimal::ZERO,
            observacoes: None,
        }
    }

    #[test]
    fn of_exige_produto_e_fornecedor_do_contrato() {
        let c = contrato(&["RED HAT"]);

        let ok = validar_vinculo_of(&c, &item(&c, TipoItemContrato::Software), &fornecedor("RED HAT", TipoItemFornecedor::Produto));
        assert!(ok.is_ok());

        let servico = validar_vinculo_of(&c, &item(&c, TipoItemContrato::Servico), &fornecedor("RED HAT", TipoItemFornecedor::Produto));
        assert!(matches!(servico, Err(AppError::TipoItemIncompativel("ordem.of_requer_produto"))));

        let fora = validar_vinculo_of(&c, &item(&c, TipoItemContrato::Hardware), &fornecedor("FORTINET", TipoItemFornecedor::Produto));
        assert!(matches!(fora, Err(AppError::FornecedorNaoVinculado(nome)) if nome == "Fortinet"));
    }

    #[test]
    fn item_de_outro_contrato_e_rejeitado() {
        let c = contrato(&["RED HAT"]);
        let outro = contrato(&["RED HAT"]);
        let r = validar_vinculo_of(&c, &item(&outro, TipoItemContrato::Software), &fornecedor("RED HAT", TipoItemFornecedor::Produto));
        assert!(matches!(r, Err(AppError::TipoItemIncompativel("ordem.item_outro_contrato"))));
    }

    #[test]
    fn os_exige_fornecedor_do_mesmo_tipo() {
        let c = contrato(&[]);
        let treinamento = item(&c, TipoItemContrato::Treinamento);

        assert!(validar_vinculo_os(&c, &treinamento, &fornecedor("ACME", TipoItemFornecedor::Treinamento)).is_ok());
        assert!(matches!(
            validar_vinculo_os(&c, &treinamento, &fornecedor("ACME", TipoItemFornecedor::Servico)),
            Err(AppError::TipoItemIncompativel("ordem.fornecedor_tipo_incompativel"))
        ));
        assert!(matches!(
            validar_vinculo_os(&c, &item(&c, TipoItemContrato::Hardware), &fornecedor("ACME", TipoItemFornecedor::Produto)),
            Err(AppError::TipoItemIncompativel("ordem.os_requer_servico"))
        ));
    }

    #[test]
    fn os_de_servico_soma_horas_e_calcula_termino() {
        let c = contrato(&[]);
        let mut dados = dados_os(10, Some(6), Some(2));
        completar_os(&mut dados, &item(&c, TipoItemContrato::Servico), Decimal::from(20), None).unwrap();

        assert_eq!(dados.valor_total, Decimal::from(1000));
        assert_eq!(dados.custo_previsto, Decimal::from(200));
        assert_eq!(dados.horas_totais, Decimal::from(8));
        // segunda 09:00 + 8h úteis: 3h de manhã e 5h à tarde
        assert_eq!(dados.data_termino, Some(data(2025, 3, 3)));
        assert_eq!(dados.hora_termino, NaiveTime::from_hms_opt(19, 0, 0));
    }

    #[test]
    fn treinamento_nao_tem_horas_e_custo_informado_prevalece() {
        let c = contrato(&[]);
        let mut dados = dados_os(10, Some(6), Some(2));
        completar_os(&mut dados, &item(&c, TipoItemContrato::Treinamento), Decimal::from(20), Some(Decimal::from(50))).unwrap();

        assert_eq!(dados.horas_totais, Decimal::ZERO);
        assert_eq!(dados.data_termino, None);
        assert_eq!(dados.custo_previsto, Decimal::from(50));
    }

    #[test]
    fn horas_que_nao_cabem_na_coluna_sao_rejeitadas() {
        let c = contrato(&[]);
        let mut dados = dados_os(10, Some(999_999), Some(999_999));
        let r = completar_os(&mut dados, &item(&c, TipoItemContrato::Servico), Decimal::from(20), None);

        assert!(matches!(r, Err(AppError::ValidationError(_))));
    }
}
