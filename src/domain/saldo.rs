// src/domain/saldo.rs

use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::common::error::AppError;
use crate::domain::{multiplicar_no_limite, DIGITOS_VALOR};
use crate::models::contratos::TipoItemContrato;
use crate::models::fornecedores::TipoItemFornecedor;

pub const VIGENCIAS_PRODUTO: [i32; 3] = [12, 24, 36];

/// Qual tipo de ordem consome o saldo de um item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TipoOrdem {
    Fornecimento,
    Servico,
}

impl TipoItemContrato {
    pub fn is_produto(self) -> bool {
        matches!(
            self,
            TipoItemContrato::Hardware | TipoItemContrato::Software | TipoItemContrato::Solucao
        )
    }

    pub fn tipo_ordem(self) -> TipoOrdem {
        if self.is_produto() {
            TipoOrdem::Fornecimento
        } else {
            TipoOrdem::Servico
        }
    }

    /// Tipo de item de fornecedor que pode atender este item de contrato.
    pub fn tipo_fornecedor(self) -> TipoItemFornecedor {
        match self {
            TipoItemContrato::Hardware | TipoItemContrato::Software | TipoItemContrato::Solucao => {
                TipoItemFornecedor::Produto
            }
            TipoItemContrato::Servico => TipoItemFornecedor::Servico,
            TipoItemContrato::Treinamento => TipoItemFornecedor::Treinamento,
        }
    }
}

/// Soma das ordens faturadas de um item.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromRow)]
pub struct Consumo {
    pub quantidade: Decimal,
    pub valor: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaldoItem {
    pub quantidade_consumida: Decimal,
    pub saldo_quantidade_atual: Decimal,
    pub valor_consumido: Decimal,
    pub saldo_disponivel: Decimal,
}

impl SaldoItem {
    pub fn calcular(quantidade: Decimal, valor_total: Decimal, consumo: Consumo) -> Self {
        Self {
            quantidade_consumida: consumo.quantidade,
            saldo_quantidade_atual: quantidade - consumo.quantidade,
            valor_consumido: consumo.valor,
            saldo_disponivel: valor_total - consumo.valor,
        }
    }
}

/// `consumo` já deve desconsiderar a ordem em edição.
pub fn validar_quantidade(quantidade_item: Decimal, consumo: Consumo, solicitado: Decimal) -> Result<(), AppError> {
    let disponivel = quantidade_item - consumo.quantidade;
    if solicitado > disponivel {
        return Err(AppError::SaldoInsuficiente { solicitado, disponivel });
    }
    Ok(())
}

pub fn valor_total_item(quantidade: Decimal, valor_unitario: Decimal) -> Result<Decimal, AppError> {
    multiplicar_no_limite(quantidade, valor_unitario, DIGITOS_VALOR, "valorTotal")
}

/// Produtos exigem vigência de 12, 24 ou 36 meses; serviços não têm vigência.
pub fn normalizar_vigencia_produto(tipo: TipoItemContrato, vigencia: Option<i32>) -> Result<Option<i32>, AppError> {
    if !tipo.is_produto() {
        return Ok(None);
    }
    match vigencia {
        Some(meses) if VIGENCIAS_PRODUTO.contains(&meses) => Ok(Some(meses)),
        Some(_) => Err(AppError::TipoItemIncompativel("item.vigencia_produto_invalida")),
        None => Err(AppError::TipoItemIncompativel("item.vigencia_produto_obrigatoria")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consumo(quantidade: i64, valor: i64) -> Consumo {
        Consumo {
            quantidade: Decimal::from(quantidade),
            valor: Decimal::from(valor),
        }
    }

    #[test]
    fn os_faturada_de_30_deixa_saldo_70() {
        let saldo = SaldoItem::calcular(Decimal::from(100), Decimal::from(10_000), consumo(30, 3_000));

        assert_eq!(saldo.quantidade_consumida, Decimal::from(30));
        assert_eq!(saldo.saldo_quantidade_atual, Decimal::from(70));
        assert_eq!(saldo.saldo_disponivel, Decimal::from(7_000));
    }

    #[test]
    fn ordem_acima_do_saldo_e_rejeitada() {
        let quantidade = Decimal::from(100);

        assert!(validar_quantidade(quantidade, consumo(30, 0), Decimal::from(70)).is_ok());

        match validar_quantidade(quantidade, consumo(30, 0), Decimal::from(71)) {
            Err(AppError::SaldoInsuficiente { solicitado, disponivel }) => {
                assert_eq!(solicitado, Decimal::from(71));
                assert_eq!(disponivel, Decimal::from(70));
            }
            outro => panic!("esperava SaldoInsuficiente, veio {:?}", outro),
        }
    }

    #[test]
    fn valor_total_que_nao_cabe_e_rejeitado_sem_panico() {
        assert_eq!(
            valor_total_item(Decimal::from(3), Decimal::new(3333, 2)).unwrap(),
            Decimal::new(9999, 2)
        );

        let quantidade = Decimal::from_i128_with_scale(10i128.pow(20), 0);
        let r = valor_total_item(quantidade, Decimal::from(10_000_000_000i64));
        assert!(matches!(r, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn tipo_do_item_define_a_ordem_e_o_fornecedor() {
        assert_eq!(TipoItemContrato::Software.tipo_ordem(), TipoOrdem::Fornecimento);
        assert_eq!(TipoItemContrato::Treinamento.tipo_ordem(), TipoOrdem::Servico);
        assert_eq!(TipoItemContrato::Solucao.tipo_fornecedor(), TipoItemFornecedor::Produto);
        assert_eq!(TipoItemContrato::Treinamento.tipo_fornecedor(), TipoItemFornecedor::Treinamento);
    }

    #[test]
    fn vigencia_de_produto() {
        assert_eq!(normalizar_vigencia_produto(TipoItemContrato::Hardware, Some(24)).unwrap(), Some(24));
        assert_eq!(normalizar_vigencia_produto(TipoItemContrato::Servico, Some(24)).unwrap(), None);
        assert!(normalizar_vigencia_produto(TipoItemContrato::Software, Some(18)).is_err());
        assert!(normalizar_vigencia_produto(TipoItemContrato::Software, None).is_err());
    }
}
