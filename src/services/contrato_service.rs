// src/services/contrato_service.rs

use std::collections::HashMap;

use chrono::{Days, NaiveDate, Utc};
use sqlx::{Acquire, Executor, PgConnection, Postgres};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{contratos_repo::DadosContrato, itens_repo::AtivacaoItem, ContratoRepository, ItemContratoRepository},
    domain::{
        fornecedores,
        legal::{self, AditivoProposto, ContextoAditivo, EfeitoAditivo},
        rollup::{self, ContratoRollup},
        saldo::{self, Consumo, SaldoItem, TipoOrdem},
        vigencia, RegrasNegocio,
    },
    models::contratos::{
        AditivoPayload, AtualizacaoSituacoes, Contrato, ContratoDetalhe, ContratoFiltro, ContratoPayload,
        ContratoResumo, ItemContrato, ItemContratoDetalhe, ItemContratoPayload, RegimeLegal, RenovacaoPendente,
        TermoAditivo, TipoTermoAditivo,
    },
};

/// Resultado de um aditivo avaliado sem ser gravado.
#[derive(Debug)]
pub struct SimulacaoAditivo {
    pub contrato: Contrato,
    pub resultado: Result<EfeitoAditivo, AppError>,
}

#[derive(Clone)]
pub struct ContratoService {
    contrato_repo: ContratoRepository,
    item_repo: ItemContratoRepository,
    regras: RegrasNegocio,
}

impl ContratoService {
    pub fn new(contrato_repo: ContratoRepository, item_repo: ItemContratoRepository, regras: RegrasNegocio) -> Self {
        Self { contrato_repo, item_repo, regras }
    }

    // =========================================================================
    //  CONTRATOS
    // =========================================================================

    pub async fn create_contrato<'e, E>(&self, executor: E, payload: &ContratoPayload) -> Result<Contrato, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let dados = preparar_contrato(payload);
        legal::validar_limite_vigencia(dados.regime_legal, payload.vigencia)?;
        let data_fim = rollup::adicionar_meses(payload.data_assinatura, payload.vigencia)?;

        let mut tx = executor.begin().await?;

        let contrato = self.contrato_repo.create(&mut *tx, &dados, data_fim).await?;
        let contrato = self.recalcular_rollup(&mut tx, contrato.id).await?;

        tx.commit().await?;

        info!("Contrato {} criado ({})", contrato.numero_contrato, contrato.regime_legal.descricao());
        Ok(contrato)
    }

    pub async fn update_contrato<'e, E>(&self, executor: E, id: Uuid, payload: &ContratoPayload) -> Result<Contrato, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let dados = preparar_contrato(payload);

        let mut tx = executor.begin().await?;

        let anterior = self.contrato_repo.get_for_update(&mut *tx, id).await?;
        let aditivos = self.contrato_repo.list_aditivos(&mut *tx, id).await?;
        let vigencia_total = payload.vigencia + rollup::meses_prorrogados(&aditivos, None);
        legal::validar_limite_vigencia(dados.regime_legal, vigencia_total)?;

        self.contrato_repo.update(&mut *tx, id, &dados).await?;
        if anterior.cliente_id != payload.cliente_id {
            self.contrato_repo.propagar_cliente(&mut *tx, id, payload.cliente_id).await?;
        }
        let contrato = self.recalcular_rollup(&mut tx, id).await?;

        tx.commit().await?;
        Ok(contrato)
    }

    pub async fn get_contrato<'e, E>(&self, executor: E, id: Uuid) -> Result<ContratoDetalhe, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let contrato = self.contrato_repo.get(&mut *tx, id).await?;
        let aditivos = self.contrato_repo.list_aditivos(&mut *tx, id).await?;
        let itens = self.detalhar_itens_do_contrato(&mut tx, id).await?;

        tx.commit().await?;

        let fornecedores_exibicao = contrato.fornecedores.iter().map(|f| fornecedores::nome_exibicao(f)).collect();
        Ok(ContratoDetalhe { contrato, fornecedores_exibicao, aditivos, itens })
    }

    pub async fn list_contratos<'e, E>(&self, executor: E, filtro: &ContratoFiltro) -> Result<Vec<Contrato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.contrato_repo.list(executor, filtro).await
    }

    pub async fn delete_contrato<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.contrato_repo.delete(executor, id).await
    }

    pub async fn resumo<'e, E>(&self, executor: E, id: Uuid) -> Result<ContratoResumo, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let contrato = self.contrato_repo.get(&mut *tx, id).await?;
        let aditivos = self.contrato_repo.list_aditivos(&mut *tx, id).await?;
        tx.commit().await?;

        let resumo = montar_resumo(contrato, &aditivos, Utc::now().date_naive(), &self.regras);
        if let Some(alerta) = &resumo.alerta_origem {
            warn!("Contrato {}: {}", resumo.numero_contrato, alerta);
        }
        Ok(resumo)
    }

    pub async fn renovacoes_pendentes<'e, E>(&self, executor: E) -> Result<Vec<RenovacaoPendente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let hoje = Utc::now().date_naive();
        let ate = hoje
            .checked_add_days(Days::new(self.regras.dias_alerta_renovacao.max(0) as u64))
            .unwrap_or(NaiveDate::MAX);

        let contratos = self.contrato_repo.list_vencendo(executor, hoje, ate).await?;

        Ok(contratos
            .into_iter()
            .map(|c| RenovacaoPendente {
                contrato_id: c.id,
                numero_contrato: c.numero_contrato,
                cliente_id: c.cliente_id,
                data_fim_atual: c.data_fim_atual,
                dias_para_vencimento: legal::dias_para_vencimento(c.data_fim_atual, hoje),
            })
            .collect())
    }

    pub async fn atualizar_situacoes<'e, E>(&self, executor: E) -> Result<AtualizacaoSituacoes, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contratos_atualizados = self.contrato_repo.atualizar_situacoes(executor, Utc::now().date_naive()).await?;
        info!("Situação atualizada em {} contratos", contratos_atualizados);
        Ok(AtualizacaoSituacoes { contratos_atualizados })
    }

    /// Recalcula valores, vigência e situação a partir de itens e aditivos.
    /// Deve rodar na mesma transação da alteração que o motivou.
    pub async fn recalcular_rollup(&self, conn: &mut PgConnection, contrato_id: Uuid) -> Result<Contrato, AppError> {
        let contrato = self.contrato_repo.get_for_update(&mut *conn, contrato_id).await?;
        let aditivos = self.contrato_repo.list_aditivos(&mut *conn, contrato_id).await?;
        let valor_itens = self.item_repo.soma_valor_total(&mut *conn, contrato_id).await?;

        let calculado = ContratoRollup::calcular(contrato.data_assinatura, contrato.vigencia, valor_itens, &aditivos)?;
        let situacao = calculado.situacao_em(Utc::now().date_naive());

        let atualizado = self
            .contrato_repo
            .update_rollup(&mut *conn, contrato_id, &calculado, situacao)
            .await?;

        info!(
            "Rollup do contrato {}: valor atual {}, {} meses, fim em {}",
            atualizado.numero_contrato, atualizado.valor_atual, atualizado.vigencia_total_meses, atualizado.data_fim_atual
        );
        Ok(atualizado)
    }

    // =========================================================================
    //  TERMOS ADITIVOS
    // =========================================================================

    pub async fn create_aditivo<'e, E>(
        &self,
        executor: E,
        contrato_id: Uuid,
        payload: &AditivoPayload,
    ) -> Result<TermoAditivo, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let contrato = self.contrato_repo.get_for_update(&mut *tx, contrato_id).await?;
        let aditivos = self.contrato_repo.list_aditivos(&mut *tx, contrato_id).await?;
        legal::validar_aditivo(contexto(&contrato, &aditivos), proposto(payload), None)?;

        let aditivo = self.contrato_repo.create_aditivo(&mut *tx, contrato_id, payload).await?;
        self.recalcular_rollup(&mut tx, contrato_id).await?;

        tx.commit().await?;

        info!("Termo aditivo {} registrado no contrato {}", aditivo.numero_termo, contrato.numero_contrato);
        Ok(aditivo)
    }

    pub async fn update_aditivo<'e, E>(
        &self,
        executor: E,
        contrato_id: Uuid,
        aditivo_id: Uuid,
        payload: &AditivoPayload,
    ) -> Result<TermoAditivo, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let contrato = self.contrato_repo.get_for_update(&mut *tx, contrato_id).await?;
        let aditivos = self.contrato_repo.list_aditivos(&mut *tx, contrato_id).await?;
        if !aditivos.iter().any(|a| a.id == aditivo_id) {
            return Err(AppError::ResourceNotFound("Termo aditivo".into()));
        }
        legal::validar_aditivo(contexto(&contrato, &aditivos), proposto(payload), Some(aditivo_id))?;

        let aditivo = self
            .contrato_repo
            .update_aditivo(&mut *tx, contrato_id, aditivo_id, payload)
            .await?;
        self.recalcular_rollup(&mut tx, contrato_id).await?;

        tx.commit().await?;
        Ok(aditivo)
    }

    pub async fn delete_aditivo<'e, E>(&self, executor: E, contrato_id: Uuid, aditivo_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.contrato_repo.get_for_update(&mut *tx, contrato_id).await?;
        self.contrato_repo.delete_aditivo(&mut *tx, contrato_id, aditivo_id).await?;
        self.recalcular_rollup(&mut tx, contrato_id).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_aditivos<'e, E>(&self, executor: E, contrato_id: Uuid) -> Result<Vec<TermoAditivo>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        self.contrato_repo.get(&mut *tx, contrato_id).await?;
        let aditivos = self.contrato_repo.list_aditivos(&mut *tx, contrato_id).await?;
        tx.commit().await?;
        Ok(aditivos)
    }

    /// Aplica as mesmas regras do cadastro sem gravar nada.
    pub async fn simular_aditivo<'e, E>(
        &self,
        executor: E,
        contrato_id: Uuid,
        payload: &AditivoPayload,
    ) -> Result<SimulacaoAditivo, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let contrato = self.contrato_repo.get(&mut *tx, contrato_id).await?;
        let aditivos = self.contrato_repo.list_aditivos(&mut *tx, contrato_id).await?;
        tx.commit().await?;

        let resultado = legal::validar_aditivo(contexto(&contrato, &aditivos), proposto(payload), None);
        Ok(SimulacaoAditivo { contrato, resultado })
    }

    // =========================================================================
    //  ITENS
    // =========================================================================

    pub async fn create_item<'e, E>(
        &self,
        executor: E,
        contrato_id: Uuid,
        payload: &ItemContratoPayload,
    ) -> Result<ItemContrato, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let vigencia_produto = saldo::normalizar_vigencia_produto(payload.tipo, payload.vigencia_produto)?;
        let valor_total = saldo::valor_total_item(payload.quantidade, payload.valor_unitario)?;

        let mut tx = executor.begin().await?;

        self.contrato_repo.get_for_update(&mut *tx, contrato_id).await?;
        let item = self
            .item_repo
            .create(&mut *tx, contrato_id, payload, vigencia_produto, valor_total)
            .await?;
        self.recalcular_rollup(&mut tx, contrato_id).await?;

        tx.commit().await?;
        Ok(item)
    }

    pub async fn update_item<'e, E>(&self, executor: E, item_id: Uuid, payload: &ItemContratoPayload) -> Result<ItemContrato, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let vigencia_produto = saldo::normalizar_vigencia_produto(payload.tipo, payload.vigencia_produto)?;
        let valor_total = saldo::valor_total_item(payload.quantidade, payload.valor_unitario)?;

        let mut tx = executor.begin().await?;

        // contrato antes do item, mesma ordem de travas das ordens
        let atual = self.item_repo.get(&mut *tx, item_id).await?;
        self.contrato_repo.get_for_update(&mut *tx, atual.contrato_id).await?;
        self.item_repo.get_for_update(&mut *tx, item_id).await?;

        let item = self
            .item_repo
            .update(&mut *tx, item_id, payload, vigencia_produto, valor_total)
            .await?;
        self.recalcular_rollup(&mut tx, item.contrato_id).await?;

        tx.commit().await?;
        Ok(item)
    }

    pub async fn delete_item<'e, E>(&self, executor: E, item_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let item = self.item_repo.get(&mut *tx, item_id).await?;
        self.contrato_repo.get_for_update(&mut *tx, item.contrato_id).await?;
        self.item_repo.delete(&mut *tx, item_id).await?;
        self.recalcular_rollup(&mut tx, item.contrato_id).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_item<'e, E>(&self, executor: E, item_id: Uuid) -> Result<ItemContratoDetalhe, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let item = self.item_repo.get(&mut *tx, item_id).await?;
        let consumo = self
            .item_repo
            .consumo_item(&mut *tx, item_id, item.tipo.tipo_ordem(), None)
            .await?;
        let ativacoes = self.item_repo.ativacoes(&mut *tx, item.contrato_id).await?;

        tx.commit().await?;

        let datas = ativacoes_do_item(&ativacoes, item_id);
        Ok(detalhar_item(item, consumo, &datas, Utc::now().date_naive()))
    }

    pub async fn list_itens<'e, E>(&self, executor: E, contrato_id: Uuid) -> Result<Vec<ItemContratoDetalhe>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        self.contrato_repo.get(&mut *tx, contrato_id).await?;
        let itens = self.detalhar_itens_do_contrato(&mut tx, contrato_id).await?;
        tx.commit().await?;
        Ok(itens)
    }

    async fn detalhar_itens_do_contrato(
        &self,
        conn: &mut PgConnection,
        contrato_id: Uuid,
    ) -> Result<Vec<ItemContratoDetalhe>, AppError> {
        let itens = self.item_repo.list_by_contrato(&mut *conn, contrato_id).await?;

        let mut consumos: HashMap<(TipoOrdem, Uuid), Consumo> = HashMap::new();
        for tipo in [TipoOrdem::Fornecimento, TipoOrdem::Servico] {
            for linha in self.item_repo.consumo_por_item(&mut *conn, contrato_id, tipo).await? {
                consumos.insert((tipo, linha.item_contrato_id), linha.consumo());
            }
        }
        let ativacoes = self.item_repo.ativacoes(&mut *conn, contrato_id).await?;

        let hoje = Utc::now().date_naive();
        Ok(itens
            .into_iter()
            .map(|item| {
                let consumo = consumos
                    .get(&(item.tipo.tipo_ordem(), item.id))
                    .copied()
                    .unwrap_or_default();
                let datas = ativacoes_do_item(&ativacoes, item.id);
                detalhar_item(item, consumo, &datas, hoje)
            })
            .collect())
    }
}

fn preparar_contrato(payload: &ContratoPayload) -> DadosContrato<'_> {
    let regime_legal = payload.regime_legal.unwrap_or(RegimeLegal::Lei14133);
    let origem_contrato = payload.origem_contrato.unwrap_or_else(|| regime_legal.origem_padrao());

    if let Some(alerta) = legal::alerta_origem(regime_legal, origem_contrato) {
        warn!("Contrato {}: {}", payload.numero_contrato, alerta);
    }

    DadosContrato {
        payload,
        regime_legal,
        origem_contrato,
        fornecedores: fornecedores::normalizar_lista(&payload.fornecedores),
    }
}

fn contexto<'a>(contrato: &Contrato, aditivos: &'a [TermoAditivo]) -> ContextoAditivo<'a> {
    ContextoAditivo {
        regime: contrato.regime_legal,
        vigencia: contrato.vigencia,
        valor_inicial: contrato.valor_inicial,
        aditivos,
    }
}

fn proposto(payload: &AditivoPayload) -> AditivoProposto {
    AditivoProposto {
        tipo: payload.tipo,
        meses_acrescimo: payload.meses_acrescimo,
        valor_acrescimo: payload.valor_acrescimo,
    }
}

fn ativacoes_do_item(ativacoes: &[AtivacaoItem], item_id: Uuid) -> Vec<NaiveDate> {
    ativacoes
        .iter()
        .filter(|a| a.item_contrato_id == item_id)
        .map(|a| a.data_ativacao)
        .collect()
}

fn detalhar_item(item: ItemContrato, consumo: Consumo, ativacoes: &[NaiveDate], hoje: NaiveDate) -> ItemContratoDetalhe {
    let saldo = SaldoItem::calcular(item.quantidade, item.valor_total, consumo);
    let vigencia_restante = vigencia::vigencia_restante(item.tipo, item.vigencia_produto, ativacoes, hoje);

    ItemContratoDetalhe {
        item,
        quantidade_consumida: saldo.quantidade_consumida,
        saldo_quantidade_atual: saldo.saldo_quantidade_atual,
        valor_consumido: saldo.valor_consumido,
        saldo_disponivel: saldo.saldo_disponivel,
        vigencia_restante,
    }
}

fn montar_resumo(contrato: Contrato, aditivos: &[TermoAditivo], hoje: NaiveDate, regras: &RegrasNegocio) -> ContratoResumo {
    let contar = |tipo: TipoTermoAditivo| aditivos.iter().filter(|a| a.tipo == tipo).count() as i64;

    ContratoResumo {
        contrato_id: contrato.id,
        limite_vigencia_meses: contrato.regime_legal.limite_vigencia_meses(),
        dias_para_vencimento: legal::dias_para_vencimento(contrato.data_fim_atual, hoje),
        renovacao_pendente: legal::renovacao_pendente(contrato.data_fim_atual, hoje, regras.dias_alerta_renovacao),
        total_prorrogacoes: contar(TipoTermoAditivo::Prorrogacao),
        total_aditivos_valor: contar(TipoTermoAditivo::Valor),
        total_reequilibrios: contar(TipoTermoAditivo::Reequilibrio),
        alerta_origem: legal::alerta_origem(contrato.regime_legal, contrato.origem_contrato),
        numero_contrato: contrato.numero_contrato,
        regime_legal: contrato.regime_legal,
        origem_contrato: contrato.origem_contrato,
        valor_inicial: contrato.valor_inicial,
        valor_atual: contrato.valor_atual,
        data_assinatura: contrato.data_assinatura,
        data_fim_atual: contrato.data_fim_atual,
        vigencia_original: contrato.vigencia,
        vigencia_total_meses: contrato.vigencia_total_meses,
        situacao: contrato.situacao,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rollup::tests::{aditivo, data};
    use crate::models::contratos::{OrigemContrato, SituacaoContrato, TipoItemContrato};
    use rust_decimal::Decimal;

    fn contrato(regime: RegimeLegal, origem: OrigemContrato, data_fim: NaiveDate) -> Contrato {
        Contrato {
            id: Uuid::new_v4(),
            cliente_id: Uuid::new_v4(),
            numero_contrato: "CT-001/2024".into(),
            objeto: None,
            ata_registro_preco: None,
            pregao_eletronico: None,
            processo: None,
            termo_referencia: None,
            regime_legal: regime,
            origem_contrato: origem,
            vigencia: 12,
            data_assinatura: data(2024, 1, 1),
            fornecedores: vec!["RED HAT".into()],
            valor_inicial: Decimal::from(100_000),
            valor_atual: Decimal::from(110_000),
            vigencia_total_meses: 18,
            data_fim_atual: data_fim,
            situacao: SituacaoContrato::Ativo,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item(tipo: TipoItemContrato, vigencia_produto: Option<i32>) -> ItemContrato {
        ItemContrato {
            id: Uuid::new_v4(),
            contrato_id: Uuid::new_v4(),
            lote: 1,
            numero_item: "1".into(),
            descricao: "Subscrição".into(),
            tipo,
            unidade: "UN".into(),
            quantidade: Decimal::from(100),
            saldo_quantidade_inicial: Decimal::from(100),
            valor_unitario: Decimal::from(10),
            valor_total: Decimal::from(1000),
            vigencia_produto,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn resumo_conta_aditivos_por_tipo() {
        let aditivos = vec![
            aditivo(TipoTermoAditivo::Prorrogacao, 6, 0),
            aditivo(TipoTermoAditivo::Valor, 0, 10_000),
            aditivo(TipoTermoAditivo::Prorrogacao, 3, 0),
        ];
        let hoje = data(2025, 5, 1);
        let resumo = montar_resumo(
            contrato(RegimeLegal::Lei14133, OrigemContrato::Licitacao14133Propria, data(2025, 7, 1)),
            &aditivos,
            hoje,
            &RegrasNegocio::default(),
        );

        assert_eq!(resumo.total_prorrogacoes, 2);
        assert_eq!(resumo.total_aditivos_valor, 1);
        assert_eq!(resumo.total_reequilibrios, 0);
        assert_eq!(resumo.dias_para_vencimento, 61);
        assert!(resumo.renovacao_pendente);
        assert_eq!(resumo.limite_vigencia_meses, 120);
        assert!(resumo.alerta_origem.is_none());
    }

    #[test]
    fn resumo_avisa_origem_incompativel_sem_bloquear() {
        let resumo = montar_resumo(
            contrato(RegimeLegal::Privado, OrigemContrato::ArpGerenciador, data(2030, 1, 1)),
            &[],
            data(2025, 1, 1),
            &RegrasNegocio::default(),
        );
        assert!(resumo.alerta_origem.is_some());
        assert!(!resumo.renovacao_pendente);
    }

    #[test]
    fn item_detalhado_com_saldo_e_vigencia() {
        let produto = item(TipoItemContrato::Software, Some(12));
        let consumo = Consumo { quantidade: Decimal::from(30), valor: Decimal::from(300) };
        let detalhe = detalhar_item(produto, consumo, &[data(2024, 1, 10)], data(2024, 7, 10));

        assert_eq!(detalhe.saldo_quantidade_atual, Decimal::from(70));
        assert_eq!(detalhe.saldo_disponivel, Decimal::from(700));
        assert_eq!(detalhe.vigencia_restante, Some(6));
    }

    #[test]
    fn ativacoes_filtradas_por_item() {
        let alvo = Uuid::new_v4();
        let ativacoes = vec![
            AtivacaoItem { item_contrato_id: alvo, data_ativacao: data(2024, 1, 1) },
            AtivacaoItem { item_contrato_id: Uuid::new_v4(), data_ativacao: data(2024, 2, 1) },
        ];
        assert_eq!(ativacoes_do_item(&ativacoes, alvo), vec![data(2024, 1, 1)]);
    }

    #[test]
    fn regime_padrao_e_fornecedores_normalizados() {
        let payload = ContratoPayload {
            cliente_id: Uuid::new_v4(),
            numero_contrato: "CT-9".into(),
            objeto: None,
            ata_registro_preco: None,
            pregao_eletronico: None,
            processo: None,
            termo_referencia: None,
            regime_legal: None,
            origem_contrato: None,
            vigencia: 12,
            data_assinatura: data(2024, 1, 1),
            fornecedores: vec!["Red Hat".into(), "red  hat".into(), "Fortinet".into()],
        };

        let dados = preparar_contrato(&payload);
        assert_eq!(dados.regime_legal, RegimeLegal::Lei14133);
        assert_eq!(dados.origem_contrato, RegimeLegal::Lei14133.origem_padrao());
        assert_eq!(dados.fornecedores, vec!["RED HAT", "FORTINET"]);
    }
}
