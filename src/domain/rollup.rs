// src/domain/rollup.rs

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::contratos::{SituacaoContrato, TermoAditivo, TipoTermoAditivo};

/// Valores derivados de um contrato, sempre recalculados a partir de itens e aditivos.
#[derive(Debug, Clone, PartialEq)]
pub struct ContratoRollup {
    pub valor_inicial: Decimal,
    pub valor_atual: Decimal,
    pub vigencia_total_meses: i32,
    pub data_fim_atual: NaiveDate,
}

impl ContratoRollup {
    pub fn calcular(
        data_assinatura: NaiveDate,
        vigencia: i32,
        valor_inicial: Decimal,
        aditivos: &[TermoAditivo],
    ) -> Result<Self, AppError> {
        let vigencia_total_meses = vigencia + meses_prorrogados(aditivos, None);
        let valor_atual = valor_inicial + valor_acrescido(aditivos, None);
        let data_fim_atual = adicionar_meses(data_assinatura, vigencia_total_meses)?;

        Ok(Self {
            valor_inicial,
            valor_atual,
            vigencia_total_meses,
            data_fim_atual,
        })
    }

    pub fn situacao_em(&self, hoje: NaiveDate) -> SituacaoContrato {
        situacao_em(self.data_fim_atual, hoje)
    }
}

pub fn situacao_em(data_fim_atual: NaiveDate, hoje: NaiveDate) -> SituacaoContrato {
    if data_fim_atual >= hoje {
        SituacaoContrato::Ativo
    } else {
        SituacaoContrato::Inativo
    }
}

/// Soma dos meses de prorrogação, ignorando opcionalmente o aditivo em edição.
pub fn meses_prorrogados(aditivos: &[TermoAditivo], excluindo: Option<Uuid>) -> i32 {
    aditivos
        .iter()
        .filter(|a| Some(a.id) != excluindo && a.tipo == TipoTermoAditivo::Prorrogacao)
        .map(|a| a.meses_acrescimo)
        .sum()
}

/// Soma dos acréscimos de valor (VALOR e REEQUILIBRIO).
pub fn valor_acrescido(aditivos: &[TermoAditivo], excluindo: Option<Uuid>) -> Decimal {
    aditivos
        .iter()
        .filter(|a| Some(a.id) != excluindo)
        .filter(|a| matches!(a.tipo, TipoTermoAditivo::Valor | TipoTermoAditivo::Reequilibrio))
        .map(|a| a.valor_acrescimo)
        .sum()
}

/// Soma meses de calendário; dias inexistentes no mês de destino caem no último dia.
pub fn adicionar_meses(data: NaiveDate, meses: i32) -> Result<NaiveDate, AppError> {
    u32::try_from(meses)
        .ok()
        .and_then(|m| data.checked_add_months(Months::new(m)))
        .ok_or_else(|| {
            AppError::InternalServerError(anyhow::anyhow!(
                "Data fora do intervalo: {} + {} meses",
                data,
                meses
            ))
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;

    pub(crate) fn data(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn aditivo(tipo: TipoTermoAditivo, meses: i32, valor: i64) -> TermoAditivo {
        TermoAditivo {
            id: Uuid::new_v4(),
            contrato_id: Uuid::nil(),
            numero_termo: "TA".into(),
            tipo,
            meses_acrescimo: meses,
            valor_acrescimo: Decimal::from(valor),
            data_assinatura: data(2024, 6, 1),
            justificativa: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn prorrogacao_estende_data_fim() {
        let aditivos = vec![aditivo(TipoTermoAditivo::Prorrogacao, 6, 0)];
        let rollup = ContratoRollup::calcular(data(2024, 1, 1), 12, Decimal::ZERO, &aditivos).unwrap();

        assert_eq!(rollup.vigencia_total_meses, 18);
        assert_eq!(rollup.data_fim_atual, data(2025, 7, 1));
    }

    #[test]
    fn valor_atual_soma_valor_e_reequilibrio() {
        let aditivos = vec![
            aditivo(TipoTermoAditivo::Valor, 0, 10_000),
            aditivo(TipoTermoAditivo::Reequilibrio, 0, 5_000),
            aditivo(TipoTermoAditivo::Prorrogacao, 12, 0),
        ];
        let rollup =
            ContratoRollup::calcular(data(2024, 1, 1), 12, Decimal::from(100_000), &aditivos).unwrap();

        assert_eq!(rollup.valor_inicial, Decimal::from(100_000));
        assert_eq!(rollup.valor_atual, Decimal::from(115_000));
        assert_eq!(rollup.vigencia_total_meses, 24);
    }

    #[test]
    fn recalculo_sem_aditivos_volta_ao_original() {
        let com = vec![aditivo(TipoTermoAditivo::Prorrogacao, 6, 0)];
        let antes = ContratoRollup::calcular(data(2024, 1, 1), 12, Decimal::ZERO, &com).unwrap();
        let depois = ContratoRollup::calcular(data(2024, 1, 1), 12, Decimal::ZERO, &[]).unwrap();

        assert_ne!(antes, depois);
        assert_eq!(depois.data_fim_atual, data(2025, 1, 1));
    }

    #[test]
    fn fim_de_mes_e_ajustado() {
        assert_eq!(adicionar_meses(data(2024, 1, 31), 1).unwrap(), data(2024, 2, 29));
    }

    #[test]
    fn aditivo_em_edicao_e_excluido_das_somas() {
        let editado = aditivo(TipoTermoAditivo::Prorrogacao, 6, 0);
        let id = editado.id;
        let aditivos = vec![editado, aditivo(TipoTermoAditivo::Prorrogacao, 3, 0)];

        assert_eq!(meses_prorrogados(&aditivos, None), 9);
        assert_eq!(meses_prorrogados(&aditivos, Some(id)), 3);
    }

    #[test]
    fn situacao_ativa_ate_o_ultimo_dia() {
        let fim = data(2025, 7, 1);
        assert_eq!(situacao_em(fim, data(2025, 7, 1)), SituacaoContrato::Ativo);
        assert_eq!(situacao_em(fim, data(2025, 7, 2)), SituacaoContrato::Inativo);
    }
}
