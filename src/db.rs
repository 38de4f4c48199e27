pub mod analises_repo;
pub use analises_repo::AnaliseRepository;
pub mod clientes_repo;
pub use clientes_repo::ClienteRepository;
pub mod contratos_repo;
pub use contratos_repo::ContratoRepository;
pub mod fornecedores_repo;
pub use fornecedores_repo::FornecedorRepository;
pub mod itens_repo;
pub use itens_repo::ItemContratoRepository;
pub mod numeracao_repo;
pub use numeracao_repo::NumeracaoRepository;
pub mod ordens_repo;
pub use ordens_repo::OrdemRepository;
pub mod projetos_repo;
pub use projetos_repo::ProjetoRepository;
