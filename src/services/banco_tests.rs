// src/services/banco_tests.rs
//
// Fluxos que dependem das transações e travas do Postgres.
// Rodar com: DATABASE_URL=postgres://... cargo test -- --ignored

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        ClienteRepository, ContratoRepository, FornecedorRepository, ItemContratoRepository, NumeracaoRepository,
        OrdemRepository, ProjetoRepository,
    },
    domain::RegrasNegocio,
    models::{
        clientes::{ClientePayload, TipoCliente, TipoPessoa},
        contratos::{
            AditivoPayload, Contrato, ContratoPayload, ItemContrato, ItemContratoPayload, TipoItemContrato,
            TipoTermoAditivo,
        },
        fornecedores::{ItemFornecedor, ItemFornecedorPayload, TipoItemFornecedor},
        ordens::{NovaOrdemFornecimento, NovaOrdemServico, StatusOrdem},
        projetos::{LancamentoHoraPayload, ProjetoPayload, TarefaPayload},
    },
    services::{
        cliente_service::ClienteService, contrato_service::ContratoService, fornecedor_service::FornecedorService,
        ordem_service::OrdemService, projeto_service::ProjetoService,
    },
};

struct Servicos {
    clientes: ClienteService,
    contratos: ContratoService,
    fornecedores: FornecedorService,
    ordens: OrdemService,
    projetos: ProjetoService,
}

fn servicos() -> Servicos {
    let regras = RegrasNegocio::default();
    Servicos {
        clientes: ClienteService::new(ClienteRepository::new()),
        contratos: ContratoService::new(ContratoRepository::new(), ItemContratoRepository::new(), regras.clone()),
        fornecedores: FornecedorService::new(FornecedorRepository::new()),
        ordens: OrdemService::new(
            OrdemRepository::new(),
            ContratoRepository::new(),
            ItemContratoRepository::new(),
            FornecedorRepository::new(),
            NumeracaoRepository::new(),
            ProjetoRepository::new(),
            regras,
        ),
        projetos: ProjetoService::new(ProjetoRepository::new(), OrdemRepository::new()),
    }
}

fn data(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn cliente_payload(nome: &str, cnpj: &str) -> ClientePayload {
    ClientePayload {
        nome_razao_social: nome.into(),
        nome_fantasia: None,
        tipo_cliente: TipoCliente::Publico,
        tipo_pessoa: TipoPessoa::Juridica,
        cnpj_cpf: cnpj.into(),
        endereco: "Rua A".into(),
        numero: "10".into(),
        complemento: None,
        bairro: "Centro".into(),
        cidade: "Brasília".into(),
        estado: "DF".into(),
        cep: "70000000".into(),
        nome_responsavel: "Maria".into(),
        cargo_responsavel: "Gestora".into(),
        telefone_contato: "(61) 3333-0000".into(),
        email_contato: "maria@orgao.gov.br".into(),
        ativo: true,
    }
}

fn contrato_payload(cliente_id: Uuid) -> ContratoPayload {
    ContratoPayload {
        cliente_id,
        numero_contrato: "CT-001/2025".into(),
        objeto: Some("Licenças e serviços".into()),
        ata_registro_preco: None,
        pregao_eletronico: None,
        processo: None,
        termo_referencia: None,
        regime_legal: None,
        origem_contrato: None,
        vigencia: 12,
        data_assinatura: data(2025, 1, 1),
        fornecedores: vec!["Red Hat".into()],
    }
}

fn item_payload(numero: &str, tipo: TipoItemContrato, quantidade: i64) -> ItemContratoPayload {
    ItemContratoPayload {
        lote: 1,
        numero_item: numero.into(),
        descricao: "Item".into(),
        tipo,
        unidade: "UN".into(),
        quantidade: Decimal::from(quantidade),
        valor_unitario: Decimal::from(100),
        vigencia_produto: if tipo.is_produto() { Some(12) } else { None },
    }
}

fn fornecedor_payload(tipo: TipoItemFornecedor) -> ItemFornecedorPayload {
    ItemFornecedorPayload {
        fornecedor: "Red Hat".into(),
        outro_fornecedor: None,
        tipo,
        sku: format!("SKU-{:?}", tipo),
        descricao: "Item do fornecedor".into(),
        unidade: "UN".into(),
        valor_unitario: Decimal::from(20),
        observacoes: None,
    }
}

fn aditivo(numero: &str, tipo: TipoTermoAditivo, meses: i32, valor: i64) -> AditivoPayload {
    AditivoPayload {
        numero_termo: numero.into(),
        tipo,
        meses_acrescimo: meses,
        valor_acrescimo: Decimal::from(valor),
        data_assinatura: data(2025, 6, 1),
        justificativa: None,
    }
}

/// Cliente, contrato com Red Hat e um item do tipo pedido.
async fn cenario(pool: &PgPool, s: &Servicos, tipo: TipoItemContrato) -> (Contrato, ItemContrato) {
    let cliente = s.clientes.create_cliente(pool, &cliente_payload("Órgão A", "12345678000190")).await.unwrap();
    let contrato = s.contratos.create_contrato(pool, &contrato_payload(cliente.id)).await.unwrap();
    let item = s.contratos.create_item(pool, contrato.id, &item_payload("1", tipo, 10)).await.unwrap();
    (contrato, item)
}

fn nova_of(contrato: &Contrato, item: &ItemContrato, fornecedor: &ItemFornecedor, quantidade: i64) -> NovaOrdemFornecimento {
    NovaOrdemFornecimento {
        numero_of_cliente: None,
        contrato_id: contrato.id,
        item_contrato_id: item.id,
        item_fornecedor_id: fornecedor.id,
        quantidade: Decimal::from(quantidade),
        observacoes: None,
    }
}

#[sqlx::test]
#[ignore = "requer DATABASE_URL com Postgres local"]
async fn aditivos_recalculam_o_rollup_do_contrato(pool: PgPool) {
    let s = servicos();
    let (contrato, _) = cenario(&pool, &s, TipoItemContrato::Software).await;

    let atual = s.contratos.get_contrato(&pool, contrato.id).await.unwrap().contrato;
    assert_eq!(atual.valor_inicial, Decimal::from(1000));
    assert_eq!(atual.valor_atual, Decimal::from(1000));

    let valor = s
        .contratos
        .create_aditivo(&pool, contrato.id, &aditivo("1º TA", TipoTermoAditivo::Valor, 0, 200))
        .await
        .unwrap();
    s.contratos
        .create_aditivo(&pool, contrato.id, &aditivo("2º TA", TipoTermoAditivo::Prorrogacao, 12, 0))
        .await
        .unwrap();

    let atual = s.contratos.get_contrato(&pool, contrato.id).await.unwrap().contrato;
    assert_eq!(atual.valor_atual, Decimal::from(1200));
    assert_eq!(atual.vigencia_total_meses, 24);
    assert_eq!(atual.data_fim_atual, data(2027, 1, 1));

    // acima de 25% de 1200
    let excesso = s
        .contratos
        .create_aditivo(&pool, contrato.id, &aditivo("3º TA", TipoTermoAditivo::Valor, 0, 301))
        .await;
    assert!(matches!(excesso, Err(AppError::LimiteAditivoExcedido { .. })));

    s.contratos.delete_aditivo(&pool, contrato.id, valor.id).await.unwrap();

    let atual = s.contratos.get_contrato(&pool, contrato.id).await.unwrap().contrato;
    assert_eq!(atual.valor_atual, Decimal::from(1000));
    assert_eq!(atual.vigencia_total_meses, 24);
}

#[sqlx::test]
#[ignore = "requer DATABASE_URL com Postgres local"]
async fn editar_item_preserva_saldo_inicial(pool: PgPool) {
    let s = servicos();
    let (contrato, item) = cenario(&pool, &s, TipoItemContrato::Software).await;
    assert_eq!(item.saldo_quantidade_inicial, Decimal::from(10));

    let editado = s
        .contratos
        .update_item(&pool, item.id, &item_payload("1", TipoItemContrato::Software, 25))
        .await
        .unwrap();

    assert_eq!(editado.quantidade, Decimal::from(25));
    assert_eq!(editado.saldo_quantidade_inicial, Decimal::from(10));
    assert_eq!(editado.valor_total, Decimal::from(2500));

    let atual = s.contratos.get_contrato(&pool, contrato.id).await.unwrap().contrato;
    assert_eq!(atual.valor_inicial, Decimal::from(2500));
}

#[sqlx::test]
#[ignore = "requer DATABASE_URL com Postgres local"]
async fn faturar_revalida_o_saldo_do_item(pool: PgPool) {
    let s = servicos();
    let (contrato, item) = cenario(&pool, &s, TipoItemContrato::Software).await;
    let fornecedor = s.fornecedores.create_item(&pool, &fornecedor_payload(TipoItemFornecedor::Produto)).await.unwrap();

    // só ordens faturadas consomem saldo, então as duas são emitidas
    let primeira = s.ordens.create_of(&pool, &nova_of(&contrato, &item, &fornecedor, 8)).await.unwrap();
    let segunda = s.ordens.create_of(&pool, &nova_of(&contrato, &item, &fornecedor, 5)).await.unwrap();

    for status in [StatusOrdem::Execucao, StatusOrdem::Finalizada, StatusOrdem::Faturada] {
        s.ordens.transicionar_of(&pool, primeira.id, status).await.unwrap();
    }
    let faturada = s.ordens.get_of(&pool, primeira.id).await.unwrap();
    assert!(faturada.numero_nota_fiscal.as_deref().is_some_and(|nf| nf.starts_with("NF-")));

    s.ordens.transicionar_of(&pool, segunda.id, StatusOrdem::Execucao).await.unwrap();
    s.ordens.transicionar_of(&pool, segunda.id, StatusOrdem::Finalizada).await.unwrap();

    match s.ordens.transicionar_of(&pool, segunda.id, StatusOrdem::Faturada).await {
        Err(AppError::SaldoInsuficiente { solicitado, disponivel }) => {
            assert_eq!(solicitado, Decimal::from(5));
            assert_eq!(disponivel, Decimal::from(2));
        }
        outro => panic!("esperava SaldoInsuficiente, veio {:?}", outro),
    }

    let segunda = s.ordens.get_of(&pool, segunda.id).await.unwrap();
    assert_eq!(segunda.status, StatusOrdem::Finalizada);
    assert!(segunda.numero_nota_fiscal.is_none());
}

#[sqlx::test]
#[ignore = "requer DATABASE_URL com Postgres local"]
async fn trocar_cliente_do_contrato_atualiza_as_ordens(pool: PgPool) {
    let s = servicos();
    let (contrato, item) = cenario(&pool, &s, TipoItemContrato::Software).await;
    let fornecedor = s.fornecedores.create_item(&pool, &fornecedor_payload(TipoItemFornecedor::Produto)).await.unwrap();
    let ordem = s.ordens.create_of(&pool, &nova_of(&contrato, &item, &fornecedor, 2)).await.unwrap();

    let novo = s.clientes.create_cliente(&pool, &cliente_payload("Órgão B", "98765432000110")).await.unwrap();
    let mut payload = contrato_payload(novo.id);
    payload.numero_contrato = contrato.numero_contrato.clone();
    s.contratos.update_contrato(&pool, contrato.id, &payload).await.unwrap();

    let ordem = s.ordens.get_of(&pool, ordem.id).await.unwrap();
    assert_eq!(ordem.cliente_id, novo.id);
}

#[sqlx::test]
#[ignore = "requer DATABASE_URL com Postgres local"]
async fn horas_da_os_acompanham_tarefas_e_exclusao_do_projeto(pool: PgPool) {
    let s = servicos();
    let (contrato, item) = cenario(&pool, &s, TipoItemContrato::Servico).await;
    let fornecedor = s.fornecedores.create_item(&pool, &fornecedor_payload(TipoItemFornecedor::Servico)).await.unwrap();

    let os = s
        .ordens
        .create_os(
            &pool,
            &NovaOrdemServico {
                numero_os_cliente: None,
                contrato_id: contrato.id,
                item_contrato_id: item.id,
                item_fornecedor_id: fornecedor.id,
                gerente_projetos: None,
                consultor_tecnico: None,
                quantidade: Decimal::from(5),
                data_inicio: data(2025, 3, 3),
                hora_inicio: None,
                horas_consultor: Some(Decimal::from(8)),
                horas_gerente: None,
                custo_previsto: None,
                observacoes: None,
            },
        )
        .await
        .unwrap()
        .ordem;

    let projeto = s
        .projetos
        .create_projeto(
            &pool,
            &ProjetoPayload {
                contrato_id: contrato.id,
                ordem_servico_id: Some(os.id),
                nome: "Implantação".into(),
                descricao: None,
                data_inicio: None,
                data_fim_prevista: None,
            },
        )
        .await
        .unwrap();

    let tarefa = s
        .projetos
        .create_tarefa(
            &pool,
            projeto.id,
            &TarefaPayload {
                sprint_id: None,
                titulo: "Instalação".into(),
                descricao: None,
                responsavel: None,
                horas_planejadas: Decimal::from(16),
                status: None,
                ordem_sprint: 0,
            },
        )
        .await
        .unwrap();
    s.projetos
        .create_lancamento(
            &pool,
            tarefa.id,
            &LancamentoHoraPayload {
                colaborador: "João".into(),
                data: data(2025, 3, 3),
                horas: Decimal::from(4),
                descricao: None,
            },
        )
        .await
        .unwrap();

    let atual = s.ordens.get_os(&pool, os.id).await.unwrap().ordem;
    assert_eq!(atual.horas_planejadas, Decimal::from(16));
    assert_eq!(atual.horas_realizadas, Decimal::from(4));

    s.projetos.delete_projeto(&pool, projeto.id).await.unwrap();

    let atual = s.ordens.get_os(&pool, os.id).await.unwrap().ordem;
    assert_eq!(atual.horas_planejadas, Decimal::ZERO);
    assert_eq!(atual.horas_realizadas, Decimal::ZERO);
}
