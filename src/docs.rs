// src/docs.rs

use utoipa::OpenApi;

use crate::domain;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Gestão de Contratos", description = "Contratos, aditivos, itens, ordens e projetos"),
    paths(
        // --- Clientes ---
        handlers::clientes::create_cliente,
        handlers::clientes::list_clientes,
        handlers::clientes::get_cliente,
        handlers::clientes::update_cliente,
        handlers::clientes::delete_cliente,
        handlers::clientes::add_contato,
        handlers::clientes::list_contatos,
        handlers::clientes::delete_contato,

        // --- Contratos ---
        handlers::contratos::create_contrato,
        handlers::contratos::list_contratos,
        handlers::contratos::get_contrato,
        handlers::contratos::update_contrato,
        handlers::contratos::delete_contrato,
        handlers::contratos::resumo_contrato,
        handlers::contratos::renovacoes_pendentes,
        handlers::contratos::atualizar_situacoes,

        // --- Termos aditivos ---
        handlers::contratos::create_aditivo,
        handlers::contratos::list_aditivos,
        handlers::contratos::update_aditivo,
        handlers::contratos::delete_aditivo,
        handlers::contratos::validar_aditivo,

        // --- Itens do contrato ---
        handlers::contratos::create_item,
        handlers::contratos::list_itens,
        handlers::contratos::get_item,
        handlers::contratos::update_item,
        handlers::contratos::delete_item,

        // --- Fornecedores ---
        handlers::fornecedores::create_item_fornecedor,
        handlers::fornecedores::list_itens_fornecedor,
        handlers::fornecedores::get_item_fornecedor,
        handlers::fornecedores::update_item_fornecedor,
        handlers::fornecedores::delete_item_fornecedor,

        // --- Ordens ---
        handlers::ordens::create_ordem_fornecimento,
        handlers::ordens::list_ordens_fornecimento,
        handlers::ordens::get_ordem_fornecimento,
        handlers::ordens::update_ordem_fornecimento,
        handlers::ordens::delete_ordem_fornecimento,
        handlers::ordens::transicionar_ordem_fornecimento,
        handlers::ordens::create_ordem_servico,
        handlers::ordens::list_ordens_servico,
        handlers::ordens::get_ordem_servico,
        handlers::ordens::update_ordem_servico,
        handlers::ordens::delete_ordem_servico,
        handlers::ordens::transicionar_ordem_servico,

        // --- Projetos ---
        handlers::projetos::create_projeto,
        handlers::projetos::list_projetos,
        handlers::projetos::get_projeto,
        handlers::projetos::update_status_projeto,
        handlers::projetos::delete_projeto,
        handlers::projetos::create_sprint,
        handlers::projetos::list_sprints,
        handlers::projetos::update_status_sprint,
        handlers::projetos::delete_sprint,
        handlers::projetos::create_tarefa,
        handlers::projetos::list_tarefas,
        handlers::projetos::update_tarefa,
        handlers::projetos::delete_tarefa,
        handlers::projetos::create_lancamento,
        handlers::projetos::list_lancamentos,
        handlers::projetos::delete_lancamento,
        handlers::projetos::list_feedbacks,
        handlers::projetos::concluir_feedback,

        // --- Análise de contratos ---
        handlers::analises::create_analise,
        handlers::analises::list_analises,
        handlers::analises::get_analise,
        handlers::analises::add_documento,
        handlers::analises::registrar_resultado,
        handlers::analises::aplicar_analise,
        handlers::analises::create_plano,
        handlers::analises::list_planos,
        handlers::analises::decidir_plano,

        // --- Lookup ---
        handlers::lookup::contratos_por_cliente,
        handlers::lookup::itens_contrato,
        handlers::lookup::itens_fornecedor,
    ),
    components(
        schemas(
            // --- Clientes ---
            models::clientes::TipoCliente,
            models::clientes::TipoPessoa,
            models::clientes::Cliente,
            models::clientes::ContatoCliente,
            models::clientes::ClientePayload,
            models::clientes::ContatoPayload,

            // --- Contratos ---
            models::contratos::RegimeLegal,
            models::contratos::OrigemContrato,
            models::contratos::SituacaoContrato,
            models::contratos::TipoTermoAditivo,
            models::contratos::TipoItemContrato,
            models::contratos::Contrato,
            models::contratos::TermoAditivo,
            models::contratos::ItemContrato,
            models::contratos::ItemContratoDetalhe,
            models::contratos::ContratoDetalhe,
            models::contratos::ContratoResumo,
            models::contratos::RenovacaoPendente,
            models::contratos::ValidacaoAditivo,
            models::contratos::AtualizacaoSituacoes,
            models::contratos::ContratoPayload,
            models::contratos::AditivoPayload,
            models::contratos::ItemContratoPayload,

            // --- Fornecedores ---
            models::fornecedores::TipoItemFornecedor,
            models::fornecedores::ItemFornecedor,
            models::fornecedores::ItemFornecedorPayload,

            // --- Ordens ---
            models::ordens::StatusOrdem,
            models::ordens::OrdemFornecimento,
            models::ordens::NovaOrdemFornecimento,
            models::ordens::AtualizaOrdemFornecimento,
            models::ordens::OrdemServico,
            models::ordens::OrdemServicoDetalhe,
            models::ordens::NovaOrdemServico,
            models::ordens::AtualizaOrdemServico,
            models::ordens::TransicaoStatusPayload,
            domain::margem::MargemOrdem,

            // --- Projetos ---
            models::projetos::StatusProjeto,
            models::projetos::StatusSprint,
            models::projetos::StatusTarefa,
            models::projetos::StatusFeedback,
            models::projetos::Projeto,
            models::projetos::Sprint,
            models::projetos::Tarefa,
            models::projetos::LancamentoHora,
            models::projetos::FeedbackContato,
            models::projetos::ProjetoPayload,
            models::projetos::SprintPayload,
            models::projetos::TarefaPayload,
            models::projetos::LancamentoHoraPayload,
            models::projetos::StatusProjetoPayload,
            models::projetos::StatusSprintPayload,

            // --- Análises ---
            models::analises::StatusAnalise,
            models::analises::StatusDocumento,
            models::analises::StatusPlano,
            models::analises::AnaliseContrato,
            models::analises::DocumentoContrato,
            models::analises::PlanoTrabalho,
            models::analises::AnaliseDetalhe,
            models::analises::ResultadoAplicacao,
            models::analises::AnalisePayload,
            models::analises::DocumentoPayload,
            models::analises::ResultadoAnalisePayload,
            models::analises::PlanoTrabalhoPayload,
            models::analises::DecisaoPlanoPayload,

            // --- Lookup ---
            models::lookup::ContratoOpcao,
            models::lookup::ItemContratoOpcao,
            models::lookup::ItemFornecedorOpcao,
        )
    ),
    tags(
        (name = "Clientes", description = "Cadastro de clientes e contatos"),
        (name = "Contratos", description = "Contratos, vigência e situação"),
        (name = "Termos Aditivos", description = "Prorrogações, acréscimos de valor e reequilíbrios"),
        (name = "Itens do Contrato", description = "Itens, saldos e vigência de produtos"),
        (name = "Fornecedores", description = "Catálogo de itens dos fornecedores"),
        (name = "Ordens de Fornecimento", description = "Emissão e faturamento de OFs"),
        (name = "Ordens de Serviço", description = "Emissão, margem e faturamento de OSs"),
        (name = "Projetos", description = "Projetos, sprints, tarefas e horas"),
        (name = "Análise de Contratos", description = "Extração de documentos e planos de trabalho"),
        (name = "Lookup", description = "Opções para selects encadeados")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documento_lista_as_rotas_principais() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/contratos/{id}/aditivos/validar"));
        assert!(paths.contains_key("/api/ordens-servico/{id}/status"));
        assert!(paths.contains_key("/api/lookup/itens-fornecedor"));
    }
}
