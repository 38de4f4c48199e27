// src/domain/legal.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::domain::rollup::{meses_prorrogados, valor_acrescido};
use crate::models::contratos::{OrigemContrato, RegimeLegal, TermoAditivo, TipoTermoAditivo};

pub const LIMITE_VIGENCIA_LEI_14133: i32 = 120;
pub const LIMITE_VIGENCIA_LEI_13303: i32 = 60;
pub const LIMITE_VIGENCIA_PRIVADO: i32 = 240;

/// Art. 125 da Lei 14.133/2021
pub const LIMITE_ADITIVO_VALOR_PERCENTUAL: i64 = 25;

impl OrigemContrato {
    pub fn codigo(self) -> &'static str {
        use OrigemContrato::*;
        match self {
            Licitacao14133Propria => "LIC_14133_PROPRIA",
            ArpGerenciador => "ARP_GERENCIADOR",
            ArpParticipante => "ARP_PARTICIPANTE",
            ArpAdesaoCarona => "ARP_ADESAO_CARONA",
            Dispensa14133 => "DISPENSA_14133",
            Inexigibilidade14133 => "INEXIGIBILIDADE_14133",
            Licitacao13303Propria => "LIC_13303_PROPRIA",
            ContratacaoEstatalDireta => "CONTR_ESTATAL_DIRETA",
            RfpPrivada => "RFP_PRIVADA",
            RfqPrivada => "RFQ_PRIVADA",
            NegociacaoDiretaPrivada => "NEGOCIACAO_DIRETA_PRIVADA",
            FrameworkPrivado => "FRAMEWORK_PRIVADO",
            Outro => "OUTRO",
        }
    }
}

impl RegimeLegal {
    pub fn limite_vigencia_meses(self) -> i32 {
        match self {
            RegimeLegal::Lei14133 => LIMITE_VIGENCIA_LEI_14133,
            RegimeLegal::Lei13303 => LIMITE_VIGENCIA_LEI_13303,
            RegimeLegal::Privado => LIMITE_VIGENCIA_PRIVADO,
        }
    }

    pub fn descricao(self) -> &'static str {
        match self {
            RegimeLegal::Lei14133 => "Lei 14.133/2021",
            RegimeLegal::Lei13303 => "Lei 13.303/2016",
            RegimeLegal::Privado => "Contrato privado",
        }
    }

    /// Origem assumida quando nenhuma é informada.
    pub fn origem_padrao(self) -> OrigemContrato {
        match self {
            RegimeLegal::Lei14133 => OrigemContrato::Licitacao14133Propria,
            RegimeLegal::Lei13303 => OrigemContrato::Licitacao13303Propria,
            RegimeLegal::Privado => OrigemContrato::RfpPrivada,
        }
    }

    pub fn aceita_origem(self, origem: OrigemContrato) -> bool {
        use OrigemContrato::*;
        match self {
            RegimeLegal::Lei14133 => matches!(
                origem,
                Licitacao14133Propria
                    | ArpGerenciador
                    | ArpParticipante
                    | ArpAdesaoCarona
                    | Dispensa14133
                    | Inexigibilidade14133
                    | Outro
            ),
            RegimeLegal::Lei13303 => matches!(origem, Licitacao13303Propria | ContratacaoEstatalDireta | Outro),
            RegimeLegal::Privado => true,
        }
    }
}

pub fn validar_limite_vigencia(regime: RegimeLegal, vigencia_total: i32) -> Result<(), AppError> {
    let limite = regime.limite_vigencia_meses();
    if vigencia_total > limite {
        return Err(AppError::LimiteVigenciaExcedido {
            total: vigencia_total,
            limite,
            regime: regime.descricao(),
        });
    }
    Ok(())
}

/// Acréscimo de valor limitado a 25% do valor atual (só Lei 14.133).
pub fn validar_limite_aditivo_valor(
    regime: RegimeLegal,
    valor_atual: Decimal,
    acrescimo: Decimal,
) -> Result<(), AppError> {
    if regime != RegimeLegal::Lei14133 {
        return Ok(());
    }

    let limite = valor_atual * Decimal::from(LIMITE_ADITIVO_VALOR_PERCENTUAL) / Decimal::ONE_HUNDRED;
    if acrescimo > limite {
        return Err(AppError::LimiteAditivoExcedido { acrescimo, limite, valor_atual });
    }
    Ok(())
}

/// Estado do contrato contra o qual um aditivo é avaliado.
#[derive(Debug, Clone, Copy)]
pub struct ContextoAditivo<'a> {
    pub regime: RegimeLegal,
    pub vigencia: i32,
    pub valor_inicial: Decimal,
    pub aditivos: &'a [TermoAditivo],
}

#[derive(Debug, Clone, Copy)]
pub struct AditivoProposto {
    pub tipo: TipoTermoAditivo,
    pub meses_acrescimo: i32,
    pub valor_acrescimo: Decimal,
}

/// Resultado do contrato caso o aditivo seja aceito.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EfeitoAditivo {
    pub vigencia_total_meses: i32,
    pub valor_atual: Decimal,
}

/// Valida um aditivo novo ou em edição (`excluindo` = id do aditivo editado).
pub fn validar_aditivo(
    contexto: ContextoAditivo<'_>,
    proposto: AditivoProposto,
    excluindo: Option<Uuid>,
) -> Result<EfeitoAditivo, AppError> {
    let vigencia_base = contexto.vigencia + meses_prorrogados(contexto.aditivos, excluindo);
    let valor_base = contexto.valor_inicial + valor_acrescido(contexto.aditivos, excluindo);

    match proposto.tipo {
        TipoTermoAditivo::Prorrogacao => {
            if proposto.meses_acrescimo <= 0 {
                return Err(AppError::AditivoInvalido("aditivo.prorrogacao_sem_meses"));
            }
            if proposto.valor_acrescimo != Decimal::ZERO {
                return Err(AppError::AditivoInvalido("aditivo.prorrogacao_com_valor"));
            }

            let vigencia_total_meses = vigencia_base + proposto.meses_acrescimo;
            validar_limite_vigencia(contexto.regime, vigencia_total_meses)?;

            Ok(EfeitoAditivo { vigencia_total_meses, valor_atual: valor_base })
        }
        TipoTermoAditivo::Valor | TipoTermoAditivo::Reequilibrio => {
            if proposto.valor_acrescimo <= Decimal::ZERO {
                return Err(AppError::AditivoInvalido("aditivo.valor_sem_acrescimo"));
            }
            if proposto.meses_acrescimo != 0 {
                return Err(AppError::AditivoInvalido("aditivo.valor_com_meses"));
            }

            validar_limite_aditivo_valor(contexto.regime, valor_base, proposto.valor_acrescimo)?;

            Ok(EfeitoAditivo {
                vigencia_total_meses: vigencia_base,
                valor_atual: valor_base + proposto.valor_acrescimo,
            })
        }
    }
}

pub fn dias_para_vencimento(data_fim_atual: NaiveDate, hoje: NaiveDate) -> i64 {
    (data_fim_atual - hoje).num_days()
}

pub fn renovacao_pendente(data_fim_atual: NaiveDate, hoje: NaiveDate, dias_alerta: i64) -> bool {
    let dias = dias_para_vencimento(data_fim_atual, hoje);
    dias > 0 && dias <= dias_alerta
}

/// Aviso (não bloqueante) quando a origem não é típica do regime.
pub fn alerta_origem(regime: RegimeLegal, origem: OrigemContrato) -> Option<String> {
    if regime.aceita_origem(origem) {
        return None;
    }
    Some(format!(
        "Origem {} não é usual para contratos regidos pela {}",
        origem.codigo(),
        regime.descricao()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rollup::tests::{aditivo, data};

    fn contexto(regime: RegimeLegal, vigencia: i32, valor: i64, aditivos: &[TermoAditivo]) -> ContextoAditivo<'_> {
        ContextoAditivo {
            regime,
            vigencia,
            valor_inicial: Decimal::from(valor),
            aditivos,
        }
    }

    fn prorrogacao(meses: i32) -> AditivoProposto {
        AditivoProposto {
            tipo: TipoTermoAditivo::Prorrogacao,
            meses_acrescimo: meses,
            valor_acrescimo: Decimal::ZERO,
        }
    }

    fn acrescimo(valor: i64) -> AditivoProposto {
        AditivoProposto {
            tipo: TipoTermoAditivo::Valor,
            meses_acrescimo: 0,
            valor_acrescimo: Decimal::from(valor),
        }
    }

    #[test]
    fn prorrogacao_ate_o_limite_de_120_meses() {
        let ctx = contexto(RegimeLegal::Lei14133, 24, 0, &[]);

        let efeito = validar_aditivo(ctx, prorrogacao(96), None).unwrap();
        assert_eq!(efeito.vigencia_total_meses, 120);

        let err = validar_aditivo(ctx, prorrogacao(97), None).unwrap_err();
        assert!(matches!(err, AppError::LimiteVigenciaExcedido { total: 121, limite: 120, .. }));
    }

    #[test]
    fn lei_13303_limita_a_60_meses() {
        let existentes = vec![aditivo(TipoTermoAditivo::Prorrogacao, 24, 0)];
        let ctx = contexto(RegimeLegal::Lei13303, 36, 0, &existentes);

        assert!(validar_aditivo(ctx, prorrogacao(1), None).is_err());
    }

    #[test]
    fn acrescimo_de_valor_limitado_a_25_por_cento() {
        let ctx = contexto(RegimeLegal::Lei14133, 12, 500_000, &[]);

        let efeito = validar_aditivo(ctx, acrescimo(100_000), None).unwrap();
        assert_eq!(efeito.valor_atual, Decimal::from(600_000));

        let err = validar_aditivo(ctx, acrescimo(150_000), None).unwrap_err();
        match err {
            AppError::LimiteAditivoExcedido { limite, valor_atual, .. } => {
                assert_eq!(limite, Decimal::from(125_000));
                assert_eq!(valor_atual, Decimal::from(500_000));
            }
            outro => panic!("erro inesperado: {:?}", outro),
        }
    }

    #[test]
    fn limite_de_valor_considera_aditivos_anteriores() {
        let existentes = vec![aditivo(TipoTermoAditivo::Reequilibrio, 0, 100_000)];
        let ctx = contexto(RegimeLegal::Lei14133, 12, 400_000, &existentes);

        // 25% de 500 mil
        assert!(validar_aditivo(ctx, acrescimo(125_000), None).is_ok());
        assert!(validar_aditivo(ctx, acrescimo(125_001), None).is_err());
    }

    #[test]
    fn edicao_nao_conta_o_proprio_aditivo() {
        let editado = aditivo(TipoTermoAditivo::Valor, 0, 120_000);
        let id = editado.id;
        let existentes = vec![editado];
        let ctx = contexto(RegimeLegal::Lei14133, 12, 500_000, &existentes);

        assert!(validar_aditivo(ctx, acrescimo(125_000), Some(id)).is_ok());
    }

    #[test]
    fn regime_privado_nao_tem_teto_de_valor() {
        let ctx = contexto(RegimeLegal::Privado, 12, 100, &[]);
        assert!(validar_aditivo(ctx, acrescimo(1_000), None).is_ok());
    }

    #[test]
    fn aditivos_sem_acrescimo_sao_rejeitados() {
        let ctx = contexto(RegimeLegal::Lei14133, 12, 1_000, &[]);

        assert!(matches!(
            validar_aditivo(ctx, prorrogacao(0), None),
            Err(AppError::AditivoInvalido("aditivo.prorrogacao_sem_meses"))
        ));
        assert!(matches!(
            validar_aditivo(ctx, acrescimo(0), None),
            Err(AppError::AditivoInvalido("aditivo.valor_sem_acrescimo"))
        ));
    }

    #[test]
    fn janela_de_renovacao() {
        let hoje = data(2025, 1, 1);

        assert!(renovacao_pendente(data(2025, 3, 1), hoje, 90));
        assert!(renovacao_pendente(data(2025, 4, 1), hoje, 90));
        assert!(!renovacao_pendente(data(2025, 4, 2), hoje, 90));
        assert!(!renovacao_pendente(hoje, hoje, 90));
    }

    #[test]
    fn origem_incompativel_gera_alerta() {
        assert!(alerta_origem(RegimeLegal::Lei14133, OrigemContrato::ArpAdesaoCarona).is_none());
        assert!(alerta_origem(RegimeLegal::Lei13303, OrigemContrato::ArpAdesaoCarona).is_some());
        assert!(alerta_origem(RegimeLegal::Privado, OrigemContrato::Dispensa14133).is_none());
        assert!(alerta_origem(RegimeLegal::Lei14133, OrigemContrato::Outro).is_none());
    }
}
