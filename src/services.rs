pub mod analise_service;
pub mod cliente_service;
pub mod contrato_service;
pub mod fornecedor_service;
pub mod lookup_service;
pub mod ordem_service;
pub mod projeto_service;

#[cfg(test)]
mod banco_tests;
