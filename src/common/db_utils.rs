// src/common/db_utils.rs

use crate::common::error::AppError;

/// Converte violação de UNIQUE em `UniqueConstraintViolation`; demais erros seguem como erro de banco.
pub(crate) fn map_unique_violation(e: sqlx::Error, campo: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(campo.to_string());
        }
    }
    e.into()
}

/// Exclusão bloqueada por registros dependentes (FK com RESTRICT).
pub(crate) fn map_foreign_key_violation(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return AppError::EstadoInvalido("resource.in_use");
        }
    }
    e.into()
}

/// Mantém apenas os dígitos (CNPJ/CPF, CEP).
pub(crate) fn somente_digitos(valor: &str) -> String {
    valor.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_pontuacao_de_cnpj() {
        assert_eq!(somente_digitos("12.345.678/0001-90"), "12345678000190");
    }

    #[test]
    fn erro_que_nao_e_de_unicidade_passa_adiante() {
        let err = map_unique_violation(sqlx::Error::RowNotFound, "cnpjCpf");
        assert!(matches!(err, AppError::DatabaseError(sqlx::Error::RowNotFound)));
    }
}
