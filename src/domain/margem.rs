// src/domain/margem.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::error::AppError;
use crate::domain::RegrasNegocio;

/// Viabilidade financeira de uma OS.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MargemOrdem {
    #[schema(example = "1000.00")]
    pub receita_prevista: Decimal,
    #[schema(example = "150.00")]
    pub impostos: Decimal,
    #[schema(example = "120.00")]
    pub royalties: Decimal,
    #[schema(example = "530.00")]
    pub margem: Decimal,
    #[schema(example = "53.00")]
    pub percentual_margem: Decimal,
    pub is_exequivel: bool,
}

impl MargemOrdem {
    pub fn calcular(receita: Decimal, custo: Decimal, regras: &RegrasNegocio) -> Self {
        let impostos = (receita * regras.imposto_percentual / Decimal::ONE_HUNDRED).round_dp(2);
        let royalties = (receita * regras.royalties_percentual / Decimal::ONE_HUNDRED).round_dp(2);
        let margem = receita - impostos - royalties - custo;

        let percentual_margem = if receita.is_zero() {
            Decimal::ZERO
        } else {
            (margem / receita * Decimal::ONE_HUNDRED).round_dp(2)
        };

        Self {
            receita_prevista: receita,
            impostos,
            royalties,
            margem,
            percentual_margem,
            is_exequivel: percentual_margem >= regras.margem_minima_percentual,
        }
    }

    pub fn exigir_exequivel(&self, regras: &RegrasNegocio) -> Result<(), AppError> {
        if !self.is_exequivel {
            return Err(AppError::MargemInsuficiente {
                percentual: self.percentual_margem,
                minimo: regras.margem_minima_percentual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_com_margem_de_53_por_cento() {
        let regras = RegrasNegocio::default();
        let m = MargemOrdem::calcular(Decimal::from(1000), Decimal::from(200), &regras);

        assert_eq!(m.impostos, Decimal::from(150));
        assert_eq!(m.royalties, Decimal::from(120));
        assert_eq!(m.margem, Decimal::from(530));
        assert_eq!(m.percentual_margem, Decimal::from(53));
        assert!(m.is_exequivel);
        assert!(m.exigir_exequivel(&regras).is_ok());
    }

    #[test]
    fn custo_alto_torna_a_os_inexequivel() {
        let regras = RegrasNegocio::default();
        // 1000 - 150 - 120 - 531 = 199 -> 19.9%
        let m = MargemOrdem::calcular(Decimal::from(1000), Decimal::from(531), &regras);

        assert_eq!(m.percentual_margem, Decimal::new(199, 1));
        assert!(!m.is_exequivel);
        assert!(matches!(
            m.exigir_exequivel(&regras),
            Err(AppError::MargemInsuficiente { .. })
        ));
    }

    #[test]
    fn exatamente_no_minimo_e_exequivel() {
        let regras = RegrasNegocio::default();
        let m = MargemOrdem::calcular(Decimal::from(1000), Decimal::from(530), &regras);

        assert_eq!(m.percentual_margem, Decimal::from(20));
        assert!(m.is_exequivel);
    }

    #[test]
    fn receita_zero_nao_divide() {
        let m = MargemOrdem::calcular(Decimal::ZERO, Decimal::from(10), &RegrasNegocio::default());

        assert_eq!(m.percentual_margem, Decimal::ZERO);
        assert!(!m.is_exequivel);
    }

    #[test]
    fn valores_no_limite_da_coluna_nao_estouram() {
        let regras = RegrasNegocio {
            imposto_percentual: Decimal::ONE_HUNDRED,
            royalties_percentual: Decimal::ONE_HUNDRED,
            ..RegrasNegocio::default()
        };
        let maximo = crate::domain::limite_numeric(crate::domain::DIGITOS_VALOR);
        let m = MargemOrdem::calcular(maximo, maximo, &regras);

        assert_eq!(m.impostos, maximo);
        assert!(!m.is_exequivel);
    }
}
