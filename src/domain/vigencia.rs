// src/domain/vigencia.rs

use chrono::{Datelike, NaiveDate};

use crate::models::contratos::TipoItemContrato;

/// Meses completos entre duas datas.
pub fn meses_completos(desde: NaiveDate, ate: NaiveDate) -> i32 {
    let mut meses = (ate.year() - desde.year()) * 12 + ate.month() as i32 - desde.month() as i32;
    if ate.day() < desde.day() {
        meses -= 1;
    }
    meses.max(0)
}

/// Menor vigência restante entre as ativações faturadas do item.
/// Sem ativação devolve a vigência cheia; serviços não têm vigência.
pub fn vigencia_restante(
    tipo: TipoItemContrato,
    vigencia_produto: Option<i32>,
    ativacoes: &[NaiveDate],
    hoje: NaiveDate,
) -> Option<i32> {
    if !tipo.is_produto() {
        return None;
    }
    let vigencia = vigencia_produto?;

    ativacoes
        .iter()
        .map(|ativacao| (vigencia - meses_completos(*ativacao, hoje)).max(0))
        .min()
        .or(Some(vigencia))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, dia).unwrap()
    }

    #[test]
    fn conta_apenas_meses_completos() {
        assert_eq!(meses_completos(d(2024, 1, 15), d(2024, 3, 14)), 1);
        assert_eq!(meses_completos(d(2024, 1, 15), d(2024, 3, 15)), 2);
        assert_eq!(meses_completos(d(2024, 3, 15), d(2024, 1, 15)), 0);
    }

    #[test]
    fn usa_a_ativacao_mais_antiga() {
        let hoje = d(2025, 1, 1);
        let ativacoes = [d(2024, 7, 1), d(2024, 1, 1)];

        assert_eq!(vigencia_restante(TipoItemContrato::Software, Some(36), &ativacoes, hoje), Some(24));
    }

    #[test]
    fn nunca_fica_negativa() {
        let hoje = d(2030, 1, 1);
        assert_eq!(
            vigencia_restante(TipoItemContrato::Hardware, Some(12), &[d(2024, 1, 1)], hoje),
            Some(0)
        );
    }

    #[test]
    fn sem_ativacao_retorna_vigencia_cheia() {
        let hoje = d(2025, 1, 1);
        assert_eq!(vigencia_restante(TipoItemContrato::Solucao, Some(24), &[], hoje), Some(24));
        assert_eq!(vigencia_restante(TipoItemContrato::Servico, Some(24), &[], hoje), None);
    }
}
