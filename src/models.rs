pub mod analises;
pub mod clientes;
pub mod contratos;
pub mod fornecedores;
pub mod lookup;
pub mod ordens;
pub mod projetos;

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::domain::{limite_numeric, DIGITOS_HORAS, DIGITOS_QUANTIDADE, DIGITOS_VALOR, DIGITOS_VALOR_UNITARIO};

// Validadores compartilhados pelos payloads
pub(crate) fn valor_positivo(valor: &Decimal) -> Result<(), ValidationError> {
    if *valor > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("positive"))
    }
}

pub(crate) fn valor_nao_negativo(valor: &Decimal) -> Result<(), ValidationError> {
    if *valor >= Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("non_negative"))
    }
}

fn no_limite(valor: &Decimal, digitos_inteiros: u32) -> Result<(), ValidationError> {
    if *valor > limite_numeric(digitos_inteiros) {
        return Err(ValidationError::new("range"));
    }
    Ok(())
}

pub(crate) fn quantidade_valida(valor: &Decimal) -> Result<(), ValidationError> {
    valor_positivo(valor)?;
    no_limite(valor, DIGITOS_QUANTIDADE)
}

pub(crate) fn valor_unitario_valido(valor: &Decimal) -> Result<(), ValidationError> {
    valor_nao_negativo(valor)?;
    no_limite(valor, DIGITOS_VALOR_UNITARIO)
}

pub(crate) fn valor_monetario_valido(valor: &Decimal) -> Result<(), ValidationError> {
    valor_nao_negativo(valor)?;
    no_limite(valor, DIGITOS_VALOR)
}

pub(crate) fn horas_validas(valor: &Decimal) -> Result<(), ValidationError> {
    valor_nao_negativo(valor)?;
    no_limite(valor, DIGITOS_HORAS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantidade_acima_da_coluna_e_rejeitada() {
        assert!(quantidade_valida(&Decimal::new(999_999_999_999, 2)).is_ok());
        let erro = quantidade_valida(&Decimal::from(10_000_000_000i64)).unwrap_err();
        assert_eq!(erro.code, "range");
        assert_eq!(quantidade_valida(&Decimal::ZERO).unwrap_err().code, "positive");
    }

    #[test]
    fn horas_e_valores_respeitam_a_precisao() {
        assert!(horas_validas(&Decimal::new(99_999_999, 2)).is_ok());
        assert!(horas_validas(&Decimal::from(1_000_000)).is_err());
        assert!(valor_unitario_valido(&Decimal::from(1_000_000_000_000i64)).is_err());
        assert!(valor_monetario_valido(&Decimal::from(99_999_999_999_999i64)).is_ok());
        assert_eq!(valor_monetario_valido(&Decimal::NEGATIVE_ONE).unwrap_err().code, "non_negative");
    }
}
