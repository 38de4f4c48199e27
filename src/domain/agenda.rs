// src/domain/agenda.rs

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::common::error::AppError;
use crate::domain::{limite_numeric, DIGITOS_HORAS};

// Expediente: 09:00-12:00 e 14:00-19:00, de segunda a sexta
const MANHA: (u32, u32) = (9, 12);
const TARDE: (u32, u32) = (14, 19);

fn hora(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn dia_util(data: NaiveDate) -> bool {
    !matches!(data.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Período de trabalho que contém (ou sucede) `agora`, ou None se o expediente acabou.
fn periodo_do_dia(agora: NaiveTime) -> Option<(NaiveTime, NaiveTime)> {
    if agora < hora(MANHA.1) {
        Some((agora.max(hora(MANHA.0)), hora(MANHA.1)))
    } else if agora < hora(TARDE.1) {
        Some((agora.max(hora(TARDE.0)), hora(TARDE.1)))
    } else {
        None
    }
}

fn proximo_dia(data: NaiveDate) -> NaiveDate {
    data.succ_opt().unwrap_or(data)
}

/// Término de uma OS consumindo `horas` de expediente a partir do início.
///
/// `horas` acima do que cabe em `horas_totais` é erro de validação.
pub fn calcular_termino(
    data_inicio: NaiveDate,
    hora_inicio: NaiveTime,
    horas: Decimal,
) -> Result<(NaiveDate, NaiveTime), AppError> {
    if horas > limite_numeric(DIGITOS_HORAS) {
        return Err(AppError::fora_do_intervalo("horasTotais"));
    }
    let mut restante = (horas * Decimal::from(60))
        .round()
        .to_i64()
        .ok_or_else(|| AppError::fora_do_intervalo("horasTotais"))?;
    let mut data = data_inicio;
    let mut agora = hora_inicio;

    while restante > 0 {
        if !dia_util(data) {
            data = proximo_dia(data);
            agora = hora(MANHA.0);
            continue;
        }

        let Some((inicio, fim)) = periodo_do_dia(agora) else {
            data = proximo_dia(data);
            agora = hora(MANHA.0);
            continue;
        };

        let disponivel = (fim - inicio).num_minutes();
        let trabalhado = restante.min(disponivel);
        agora = inicio + Duration::minutes(trabalhado);
        restante -= trabalhado;
    }

    Ok((data, agora))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, dia).unwrap()
    }

    fn t(h: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, min, 0).unwrap()
    }

    // 2024-01-01 é uma segunda-feira
    #[test]
    fn jornada_completa_termina_as_19h() {
        assert_eq!(calcular_termino(d(2024, 1, 1), t(9, 0), Decimal::from(8)).unwrap(), (d(2024, 1, 1), t(19, 0)));
    }

    #[test]
    fn horas_excedentes_passam_para_o_dia_seguinte() {
        assert_eq!(calcular_termino(d(2024, 1, 1), t(9, 0), Decimal::from(10)).unwrap(), (d(2024, 1, 2), t(11, 0)));
    }

    #[test]
    fn fim_de_semana_e_pulado() {
        // sexta-feira
        assert_eq!(calcular_termino(d(2024, 1, 5), t(9, 0), Decimal::from(10)).unwrap(), (d(2024, 1, 8), t(11, 0)));
    }

    #[test]
    fn inicio_no_almoco_comeca_as_14h() {
        assert_eq!(calcular_termino(d(2024, 1, 1), t(13, 0), Decimal::from(2)).unwrap(), (d(2024, 1, 1), t(16, 0)));
    }

    #[test]
    fn manha_termina_ao_meio_dia() {
        assert_eq!(calcular_termino(d(2024, 1, 1), t(10, 0), Decimal::from(2)).unwrap(), (d(2024, 1, 1), t(12, 0)));
        assert_eq!(calcular_termino(d(2024, 1, 1), t(10, 0), Decimal::new(25, 1)).unwrap(), (d(2024, 1, 1), t(14, 30)));
    }

    #[test]
    fn inicio_apos_expediente_vai_para_o_proximo_dia() {
        assert_eq!(calcular_termino(d(2024, 1, 1), t(20, 0), Decimal::from(1)).unwrap(), (d(2024, 1, 2), t(10, 0)));
    }

    #[test]
    fn sem_horas_nao_anda() {
        assert_eq!(calcular_termino(d(2024, 1, 6), t(9, 0), Decimal::ZERO).unwrap(), (d(2024, 1, 6), t(9, 0)));
    }

    #[test]
    fn horas_acima_da_coluna_sao_erro_e_nao_zero() {
        let r = calcular_termino(d(2024, 1, 1), t(9, 0), Decimal::from_i128_with_scale(10i128.pow(27), 0));
        assert!(matches!(r, Err(AppError::ValidationError(_))));

        assert!(calcular_termino(d(2024, 1, 1), t(9, 0), Decimal::from(1_000_000)).is_err());
    }
}
