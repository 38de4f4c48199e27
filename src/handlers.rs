pub mod analises;
pub mod clientes;
pub mod contratos;
pub mod fornecedores;
pub mod lookup;
pub mod ordens;
pub mod projetos;
