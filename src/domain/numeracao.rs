// src/domain/numeracao.rs

/// Documentos com numeração sequencial reiniciada a cada ano.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoDocumento {
    OrdemFornecimento,
    OrdemServico,
    NotaFiscal,
}

impl TipoDocumento {
    pub fn prefixo(self) -> &'static str {
        match self {
            TipoDocumento::OrdemFornecimento => "OF",
            TipoDocumento::OrdemServico => "OS",
            TipoDocumento::NotaFiscal => "NF",
        }
    }
}

pub fn formatar_numero(tipo: TipoDocumento, ano: i32, sequencia: i32) -> String {
    format!("{}-{}-{:04}", tipo.prefixo(), ano, sequencia)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formato_com_quatro_digitos() {
        assert_eq!(formatar_numero(TipoDocumento::OrdemFornecimento, 2025, 1), "OF-2025-0001");
        assert_eq!(formatar_numero(TipoDocumento::OrdemServico, 2025, 42), "OS-2025-0042");
        assert_eq!(formatar_numero(TipoDocumento::NotaFiscal, 2026, 12345), "NF-2026-12345");
    }
}
