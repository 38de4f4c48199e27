// src/services/analise_service.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{Acquire, Executor, PgConnection, Postgres};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    common::{db_utils::somente_digitos, error::AppError},
    db::{contratos_repo::DadosContrato, AnaliseRepository, ClienteRepository, ContratoRepository, ItemContratoRepository, ProjetoRepository},
    domain::{
        extracao::{self, ClienteExtraido, ContratoExtraido, DadosExtraidos, ItemExtraido},
        fornecedores, legal, rollup, saldo,
    },
    models::{
        analises::{
            AnaliseContrato, AnaliseDetalhe, AnalisePayload, DecisaoPlanoPayload, DocumentoContrato, DocumentoPayload,
            PlanoTrabalho, PlanoTrabalhoPayload, ResultadoAplicacao, StatusAnalise, StatusDocumento, StatusPlano,
        },
        clientes::{ClientePayload, TipoCliente, TipoPessoa},
        contratos::{Contrato, ContratoPayload, ItemContratoPayload},
    },
    services::contrato_service::ContratoService,
};

const A_DEFINIR: &str = "A definir";

#[derive(Clone)]
pub struct AnaliseService {
    repo: AnaliseRepository,
    cliente_repo: ClienteRepository,
    contrato_repo: ContratoRepository,
    item_repo: ItemContratoRepository,
    projeto_repo: ProjetoRepository,
    contrato_service: ContratoService,
}

impl AnaliseService {
    pub fn new(
        repo: AnaliseRepository,
        cliente_repo: ClienteRepository,
        contrato_repo: ContratoRepository,
        item_repo: ItemContratoRepository,
        projeto_repo: ProjetoRepository,
        contrato_service: ContratoService,
    ) -> Self {
        Self {
            repo,
            cliente_repo,
            contrato_repo,
            item_repo,
            projeto_repo,
            contrato_service,
        }
    }

    // =========================================================================
    //  ANÁLISES E DOCUMENTOS
    // =========================================================================

    pub async fn create_analise<'e, E>(&self, executor: E, payload: &AnalisePayload) -> Result<AnaliseContrato, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.create(executor, payload.titulo.trim()).await
    }

    pub async fn list_analises<'e, E>(&self, executor: E) -> Result<Vec<AnaliseContrato>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor).await
    }

    pub async fn get_analise<'e, E>(&self, executor: E, id: Uuid) -> Result<AnaliseDetalhe, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let analise = self.repo.get(&mut *conn, id).await?;
        let documentos = self.repo.list_documentos(&mut *conn, id).await?;

        Ok(AnaliseDetalhe { analise, documentos })
    }

    pub async fn add_documento<'e, E>(
        &self,
        executor: E,
        analise_id: Uuid,
        payload: &DocumentoPayload,
    ) -> Result<DocumentoContrato, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.repo.get(&mut *tx, analise_id).await?;
        let status = status_documento(payload.texto_extraido.as_deref());
        let documento = self.repo.create_documento(&mut *tx, analise_id, payload, status).await?;

        tx.commit().await?;
        Ok(documento)
    }

    /// Grava a resposta do extrator. Resposta ilegível marca a análise como `erro`
    /// e é devolvida normalmente.
    pub async fn registrar_resultado<'e, E>(&self, executor: E, id: Uuid, resposta: &str) -> Result<AnaliseContrato, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let analise = self.repo.get_for_update(&mut *tx, id).await?;
        if analise.status == StatusAnalise::Aplicado {
            return Err(AppError::EstadoInvalido("analise.ja_aplicada"));
        }

        let atualizada = match extracao::parse_resposta(resposta) {
            Ok((_, bruto)) => {
                let analise = self.repo.registrar_sucesso(&mut *tx, id, &bruto).await?;
                info!("Análise '{}' registrada", analise.titulo);
                analise
            }
            Err(AppError::AnaliseInvalida(motivo)) => {
                warn!("Análise '{}' com resposta inválida: {}", analise.titulo, motivo);
                self.repo.registrar_erro(&mut *tx, id, &motivo).await?
            }
            Err(outro) => return Err(outro),
        };

        tx.commit().await?;
        Ok(atualizada)
    }

    /// Converte uma análise concluída em cliente, contrato e itens.
    pub async fn aplicar<'e, E>(&self, executor: E, id: Uuid) -> Result<ResultadoAplicacao, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let analise = self.repo.get_for_update(&mut *tx, id).await?;
        if analise.status != StatusAnalise::Analisado {
            return Err(AppError::EstadoInvalido("analise.nao_analisada"));
        }

        let dados: DadosExtraidos = serde_json::from_value(analise.dados_extraidos.clone().unwrap_or(Value::Null))
            .map_err(|e| AppError::AnaliseInvalida(e.to_string()))?;
        let contrato_extraido = dados
            .contrato
            .clone()
            .ok_or_else(|| AppError::AnaliseInvalida("dados do contrato ausentes".into()))?;

        let numero = contrato_extraido
            .numero_contrato
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::AnaliseInvalida("contrato sem número".into()))?;
        let existente = self.contrato_repo.find_by_numero(&mut *tx, numero).await?;

        let (cliente_id, cliente_criado) = match &existente {
            Some(contrato) => (contrato.cliente_id, false),
            None => self.obter_cliente(&mut tx, dados.cliente.as_ref()).await?,
        };

        let (contrato, contrato_criado, itens_criados) = match existente {
            Some(contrato) => (contrato, false, 0),
            None => {
                let hoje = Utc::now().date_naive();
                let contrato = self.criar_contrato(&mut tx, &contrato_extraido, cliente_id, hoje).await?;
                let itens_criados = self.criar_itens(&mut tx, contrato.id, &dados.itens).await?;
                let contrato = self.contrato_service.recalcular_rollup(&mut tx, contrato.id).await?;
                (contrato, true, itens_criados)
            }
        };

        let analise = self.repo.marcar_aplicada(&mut *tx, id, cliente_id, contrato.id).await?;

        tx.commit().await?;

        info!(
            "Análise '{}' aplicada no contrato {} ({} itens criados)",
            analise.titulo, contrato.numero_contrato, itens_criados
        );
        Ok(ResultadoAplicacao {
            analise,
            cliente_id,
            contrato_id: contrato.id,
            cliente_criado,
            contrato_criado,
            itens_criados,
        })
    }

    async fn obter_cliente(
        &self,
        conn: &mut PgConnection,
        extraido: Option<&ClienteExtraido>,
    ) -> Result<(Uuid, bool), AppError> {
        let extraido = extraido.ok_or_else(|| AppError::AnaliseInvalida("dados do cliente ausentes".into()))?;
        let payload = cliente_de_extracao(extraido)?;

        if let Some(cliente) = self.cliente_repo.find_by_documento(&mut *conn, &payload.cnpj_cpf).await? {
            return Ok((cliente.id, false));
        }

        let cliente = self.cliente_repo.create(&mut *conn, &payload).await?;
        info!("Cliente '{}' criado a partir de análise", cliente.nome_razao_social);
        Ok((cliente.id, true))
    }

    async fn criar_contrato(
        &self,
        conn: &mut PgConnection,
        extraido: &ContratoExtraido,
        cliente_id: Uuid,
        hoje: NaiveDate,
    ) -> Result<Contrato, AppError> {
        let payload = contrato_de_extracao(extraido, cliente_id, hoje);
        let regime_legal = extracao::regime_de(extraido.regime_legal.as_deref());
        let dados = DadosContrato {
            payload: &payload,
            regime_legal,
            origem_contrato: extracao::origem_de(extraido.origem_contrato.as_deref(), regime_legal),
            fornecedores: fornecedores::normalizar_lista(&payload.fornecedores),
        };

        legal::validar_limite_vigencia(regime_legal, payload.vigencia)?;
        let data_fim = rollup::adicionar_meses(payload.data_assinatura, payload.vigencia)?;

        self.contrato_repo.create(&mut *conn, &dados, data_fim).await
    }

    /// Itens rejeitados pelo banco (ex.: número repetido) são ignorados.
    async fn criar_itens(&self, conn: &mut PgConnection, contrato_id: Uuid, itens: &[ItemExtraido]) -> Result<usize, AppError> {
        let mut criados = 0;

        for (indice, extraido) in itens.iter().enumerate() {
            let payload = item_de_extracao(extraido, indice);
            let valor_total = match saldo::valor_total_item(payload.quantidade, payload.valor_unitario) {
                Ok(valor) => valor,
                Err(e) => {
                    warn!("Item {} ignorado: {}", payload.numero_item, e);
                    continue;
                }
            };

            let mut savepoint = Acquire::begin(&mut *conn).await?;
            match self
                .item_repo
                .create(&mut *savepoint, contrato_id, &payload, None, valor_total)
                .await
            {
                Ok(_) => {
                    savepoint.commit().await?;
                    criados += 1;
                }
                Err(e) => {
                    warn!("Item {} ignorado: {}", payload.numero_item, e);
                    savepoint.rollback().await?;
                }
            }
        }

        Ok(criados)
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
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.projeto_repo.get(&mut *tx, projeto_id).await?;
        let plano = self.repo.create_plano(&mut *tx, projeto_id, payload).await?;

        tx.commit().await?;
        Ok(plano)
    }

    pub async fn list_planos<'e, E>(&self, executor: E, projeto_id: Uuid) -> Result<Vec<PlanoTrabalho>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_planos(executor, projeto_id).await
    }

    pub async fn decidir_plano<'e, E>(&self, executor: E, id: Uuid, decisao: &DecisaoPlanoPayload) -> Result<PlanoTrabalho, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let plano = self.repo.get_plano_for_update(&mut *tx, id).await?;
        if plano.status != StatusPlano::PendenteAprovacao {
            return Err(AppError::EstadoInvalido("plano.ja_decidido"));
        }

        let status = if decisao.aprovado { StatusPlano::Aprovado } else { StatusPlano::Rejeitado };
        let plano = self
            .repo
            .decidir_plano(&mut *tx, id, status, decisao.observacoes.as_deref())
            .await?;

        tx.commit().await?;

        info!("Plano de trabalho {} {:?}", plano.id, plano.status);
        Ok(plano)
    }
}

fn status_documento(texto: Option<&str>) -> StatusDocumento {
    match texto {
        Some(t) if !t.trim().is_empty() => StatusDocumento::Analisado,
        _ => StatusDocumento::Pendente,
    }
}

fn texto_ou(valor: &Option<String>, padrao: &str) -> String {
    valor.clone().unwrap_or_else(|| padrao.to_string())
}

/// Cliente com os campos ausentes preenchidos por valores provisórios.
fn cliente_de_extracao(extraido: &ClienteExtraido) -> Result<ClientePayload, AppError> {
    let nome = extraido
        .nome_razao_social
        .clone()
        .ok_or_else(|| AppError::AnaliseInvalida("cliente sem razão social".into()))?;

    // o cliente é localizado pelo documento, então ele não pode faltar
    let documento = extraido
        .cnpj_cpf
        .as_deref()
        .map(somente_digitos)
        .filter(|d| d.len() == 11 || d.len() == 14)
        .ok_or_else(|| AppError::AnaliseInvalida("cliente sem CNPJ/CPF válido".into()))?;
    let estado: String = extraido
        .estado
        .as_deref()
        .unwrap_or("DF")
        .chars()
        .take(2)
        .collect::<String>()
        .to_uppercase();
    let cep = extraido.cep.as_deref().map(somente_digitos).filter(|c| c.len() == 8);

    Ok(ClientePayload {
        nome_razao_social: nome,
        nome_fantasia: None,
        tipo_cliente: match extraido.tipo_cliente.as_deref().map(str::to_lowercase).as_deref() {
            Some("privado") => TipoCliente::Privado,
            _ => TipoCliente::Publico,
        },
        tipo_pessoa: match extraido.tipo_pessoa.as_deref().map(str::to_lowercase).as_deref() {
            Some("fisica") | Some("física") => TipoPessoa::Fisica,
            _ => TipoPessoa::Juridica,
        },
        cnpj_cpf: documento,
        endereco: texto_ou(&extraido.endereco, A_DEFINIR),
        numero: texto_ou(&extraido.numero, "S/N"),
        complemento: None,
        bairro: texto_ou(&extraido.bairro, "Centro"),
        cidade: texto_ou(&extraido.cidade, A_DEFINIR),
        estado,
        cep: cep.unwrap_or_else(|| "00000000".to_string()),
        nome_responsavel: texto_ou(&extraido.nome_responsavel, A_DEFINIR),
        cargo_responsavel: texto_ou(&extraido.cargo_responsavel, A_DEFINIR),
        telefone_contato: texto_ou(&extraido.telefone_contato, "(00) 0000-0000"),
        email_contato: texto_ou(&extraido.email_contato, "a@definir.com"),
        ativo: true,
    })
}

fn contrato_de_extracao(extraido: &ContratoExtraido, cliente_id: Uuid, hoje: NaiveDate) -> ContratoPayload {
    let regime = extracao::regime_de(extraido.regime_legal.as_deref());
    let vigencia = extraido
        .vigencia_meses
        .and_then(|v| v.round().to_i32())
        .map(extracao::ajustar_vigencia)
        .unwrap_or(12);

    ContratoPayload {
        cliente_id,
        numero_contrato: texto_ou(&extraido.numero_contrato, "A_DEFINIR"),
        objeto: extraido.objeto.clone(),
        ata_registro_preco: None,
        pregao_eletronico: extraido.modalidade_licitacao.clone(),
        processo: extraido.numero_processo.clone(),
        termo_referencia: None,
        regime_legal: Some(regime),
        origem_contrato: Some(extracao::origem_de(extraido.origem_contrato.as_deref(), regime)),
        vigencia,
        data_assinatura: extracao::data_de(extraido.data_assinatura.as_deref()).unwrap_or(hoje),
        fornecedores: extraido.fornecedores.clone(),
    }
}

/// Tipo desconhecido vira serviço; quantidade ausente vira 1.
fn item_de_extracao(extraido: &ItemExtraido, indice: usize) -> ItemContratoPayload {
    ItemContratoPayload {
        lote: extraido
            .lote
            .and_then(|l| l.trunc().to_i32())
            .filter(|l| *l >= 1)
            .unwrap_or(1),
        numero_item: extraido.numero_item.clone().unwrap_or_else(|| (indice + 1).to_string()),
        descricao: texto_ou(&extraido.descricao, "Item sem descrição"),
        tipo: extracao::tipo_item_de(extraido.tipo.as_deref()),
        unidade: texto_ou(&extraido.unidade, "UN"),
        quantidade: extraido.quantidade.filter(|q| *q > Decimal::ZERO).unwrap_or(Decimal::ONE),
        valor_unitario: extraido.valor_unitario.filter(|v| *v >= Decimal::ZERO).unwrap_or(Decimal::ZERO),
        vigencia_produto: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contratos::{OrigemContrato, RegimeLegal, TipoItemContrato};

    #[test]
    fn documento_sem_texto_fica_pendente() {
        assert_eq!(status_documento(Some("Cláusula primeira")), StatusDocumento::Analisado);
        assert_eq!(status_documento(Some("   ")), StatusDocumento::Pendente);
        assert_eq!(status_documento(None), StatusDocumento::Pendente);
    }

    #[test]
    fn cliente_extraido_recebe_valores_provisorios() {
        let extraido = ClienteExtraido {
            nome_razao_social: Some("Prefeitura de Exemplo".into()),
            cnpj_cpf: Some("12.345.678/0001-90".into()),
            estado: Some("sao paulo".into()),
            tipo_cliente: Some("Privado".into()),
            ..Default::default()
        };

        let payload = cliente_de_extracao(&extraido).unwrap();
        assert_eq!(payload.cnpj_cpf, "12345678000190");
        assert_eq!(payload.estado, "SA");
        assert_eq!(payload.tipo_cliente, TipoCliente::Privado);
        assert_eq!(payload.tipo_pessoa, TipoPessoa::Juridica);
        assert_eq!(payload.cep, "00000000");
        assert_eq!(payload.email_contato, "a@definir.com");
        assert_eq!(payload.cidade, "A definir");
    }

    #[test]
    fn cliente_sem_documento_valido_e_rejeitado() {
        let sem_documento = ClienteExtraido {
            nome_razao_social: Some("Órgão Sem Documento".into()),
            ..Default::default()
        };
        assert!(matches!(cliente_de_extracao(&sem_documento), Err(AppError::AnaliseInvalida(_))));

        let curto = ClienteExtraido {
            cnpj_cpf: Some("123.456".into()),
            ..sem_documento
        };
        assert!(matches!(cliente_de_extracao(&curto), Err(AppError::AnaliseInvalida(_))));
    }

    #[test]
    fn cliente_sem_razao_social_e_rejeitado() {
        assert!(matches!(
            cliente_de_extracao(&ClienteExtraido::default()),
            Err(AppError::AnaliseInvalida(_))
        ));
    }

    #[test]
    fn contrato_extraido_ajusta_vigencia_e_origem() {
        let extraido = ContratoExtraido {
            numero_contrato: Some("CT-01/2025".into()),
            regime_legal: Some("lei_13303".into()),
            vigencia_meses: Some(Decimal::from(30)),
            data_assinatura: Some("2025-02-01".into()),
            ..Default::default()
        };
        let hoje = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let payload = contrato_de_extracao(&extraido, Uuid::new_v4(), hoje);
        assert_eq!(payload.vigencia, 24);
        assert_eq!(payload.regime_legal, Some(RegimeLegal::Lei13303));
        assert_eq!(payload.origem_contrato, Some(OrigemContrato::Licitacao13303Propria));
        assert_eq!(payload.data_assinatura, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());

        let vazio = contrato_de_extracao(&ContratoExtraido::default(), Uuid::new_v4(), hoje);
        assert_eq!(vazio.numero_contrato, "A_DEFINIR");
        assert_eq!(vazio.vigencia, 12);
        assert_eq!(vazio.data_assinatura, hoje);
        assert_eq!(vazio.regime_legal, Some(RegimeLegal::Lei14133));
    }

    #[test]
    fn item_extraido_usa_padroes() {
        let item = item_de_extracao(&ItemExtraido::default(), 2);
        assert_eq!(item.numero_item, "3");
        assert_eq!(item.lote, 1);
        assert_eq!(item.tipo, TipoItemContrato::Servico);
        assert_eq!(item.quantidade, Decimal::ONE);
        assert_eq!(item.unidade, "UN");

        let hardware = item_de_extracao(
            &ItemExtraido {
                tipo: Some("Hardware".into()),
                quantidade: Some(Decimal::from(4)),
                lote: Some(Decimal::from(2)),
                ..Default::default()
            },
            0,
        );
        assert_eq!(hardware.tipo, TipoItemContrato::Hardware);
        assert_eq!(hardware.quantidade, Decimal::from(4));
        assert_eq!(hardware.lote, 2);
    }
}
