//! Regras de negócio puras, sem acesso ao banco.

pub mod agenda;
pub mod extracao;
pub mod fornecedores;
pub mod legal;
pub mod margem;
pub mod numeracao;
pub mod rollup;
pub mod saldo;
pub mod status;
pub mod vigencia;

use rust_decimal::Decimal;

use crate::common::error::AppError;

// Dígitos inteiros das colunas NUMERIC(p, 2) do esquema
pub const DIGITOS_QUANTIDADE: u32 = 10;
pub const DIGITOS_VALOR_UNITARIO: u32 = 12;
pub const DIGITOS_VALOR: u32 = 14;
pub const DIGITOS_HORAS: u32 = 6;

/// Maior valor que cabe em NUMERIC(digitos + 2, 2).
pub fn limite_numeric(digitos_inteiros: u32) -> Decimal {
    Decimal::from_i128_with_scale(10i128.pow(digitos_inteiros + 2) - 1, 2)
}

/// Produto arredondado a centavos, rejeitando o que não cabe na coluna de destino.
pub fn multiplicar_no_limite(
    a: Decimal,
    b: Decimal,
    digitos_inteiros: u32,
    campo: &'static str,
) -> Result<Decimal, AppError> {
    a.checked_mul(b)
        .map(|v| v.round_dp(2))
        .filter(|v| v.abs() <= limite_numeric(digitos_inteiros))
        .ok_or_else(|| AppError::fora_do_intervalo(campo))
}

/// Parâmetros de negócio configuráveis por ambiente.
#[derive(Debug, Clone)]
pub struct RegrasNegocio {
    pub imposto_percentual: Decimal,
    pub royalties_percentual: Decimal,
    pub margem_minima_percentual: Decimal,
    pub dias_alerta_renovacao: i64,
}

impl Default for RegrasNegocio {
    fn default() -> Self {
        Self {
            imposto_percentual: Decimal::from(15),
            royalties_percentual: Decimal::from(12),
            margem_minima_percentual: Decimal::from(20),
            dias_alerta_renovacao: 90,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limites_das_colunas() {
        assert_eq!(limite_numeric(DIGITOS_HORAS), Decimal::new(99_999_999, 2));
        assert_eq!(limite_numeric(DIGITOS_QUANTIDADE), Decimal::new(999_999_999_999, 2));
    }

    #[test]
    fn produto_fora_da_coluna_e_erro_de_validacao() {
        let grande = Decimal::from_i128_with_scale(10i128.pow(20), 0);
        let r = multiplicar_no_limite(grande, Decimal::from(10_000_000_000i64), DIGITOS_VALOR, "valorTotal");
        assert!(matches!(r, Err(AppError::ValidationError(_))));

        // estoura o próprio Decimal
        let r = multiplicar_no_limite(Decimal::MAX, Decimal::from(2), DIGITOS_VALOR, "valorTotal");
        assert!(matches!(r, Err(AppError::ValidationError(_))));

        let ok = multiplicar_no_limite(Decimal::new(15, 1), Decimal::new(334, 2), DIGITOS_VALOR, "valorTotal");
        assert_eq!(ok.unwrap(), Decimal::new(501, 2));
    }
}
