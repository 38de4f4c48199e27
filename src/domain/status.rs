// src/domain/status.rs

use chrono::NaiveDate;

use crate::common::error::AppError;
use crate::models::ordens::StatusOrdem;

impl StatusOrdem {
    pub fn proximo(self) -> Option<StatusOrdem> {
        match self {
            StatusOrdem::Aberta => Some(StatusOrdem::Execucao),
            StatusOrdem::Execucao => Some(StatusOrdem::Finalizada),
            StatusOrdem::Finalizada => Some(StatusOrdem::Faturada),
            StatusOrdem::Faturada => None,
        }
    }
}

/// Só avança um passo por vez; permanecer no mesmo status é permitido.
pub fn validar_transicao(atual: StatusOrdem, destino: StatusOrdem) -> Result<(), AppError> {
    if destino == atual || atual.proximo() == Some(destino) {
        return Ok(());
    }
    Err(AppError::TransicaoInvalida { de: atual, para: destino })
}

/// Data registrada quando a ordem é finalizada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarcoConclusao {
    /// OF: data de ativação do produto, também exigida no faturamento
    Ativacao,
    /// OS: emissão do Termo de Recebimento Definitivo
    EmissaoTrd,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasOrdem {
    pub conclusao: Option<NaiveDate>,
    pub faturamento: Option<NaiveDate>,
}

/// Preenche as datas ausentes ao entrar em `destino`; datas já informadas são mantidas.
pub fn datas_apos_transicao(
    destino: StatusOrdem,
    datas: DatasOrdem,
    hoje: NaiveDate,
    marco: MarcoConclusao,
) -> DatasOrdem {
    let mut novas = datas;
    match destino {
        StatusOrdem::Finalizada => {
            novas.conclusao.get_or_insert(hoje);
        }
        StatusOrdem::Faturada => {
            novas.faturamento.get_or_insert(hoje);
            if marco == MarcoConclusao::Ativacao {
                novas.conclusao.get_or_insert(hoje);
            }
        }
        StatusOrdem::Aberta | StatusOrdem::Execucao => {}
    }
    novas
}

#[cfg(test)]
mod tests {
    use super::*;
    use StatusOrdem::*;

    const TODOS: [StatusOrdem; 4] = [Aberta, Execucao, Finalizada, Faturada];

    #[test]
    fn so_avanca_um_passo() {
        for de in TODOS {
            for para in TODOS {
                let permitido = validar_transicao(de, para).is_ok();
                let esperado = para == de || (para as u8) == (de as u8) + 1;
                assert_eq!(permitido, esperado, "{} -> {}", de, para);
            }
        }
    }

    #[test]
    fn nunca_retrocede() {
        assert!(matches!(
            validar_transicao(Faturada, Execucao),
            Err(AppError::TransicaoInvalida { de: Faturada, para: Execucao })
        ));
        assert!(validar_transicao(Aberta, Faturada).is_err());
    }

    #[test]
    fn finalizar_preenche_data_de_conclusao() {
        let hoje = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        let datas = datas_apos_transicao(Finalizada, DatasOrdem::default(), hoje, MarcoConclusao::EmissaoTrd);

        assert_eq!(datas.conclusao, Some(hoje));
        assert_eq!(datas.faturamento, None);
    }

    #[test]
    fn faturar_of_garante_data_de_ativacao() {
        let hoje = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        let of = datas_apos_transicao(Faturada, DatasOrdem::default(), hoje, MarcoConclusao::Ativacao);
        let os = datas_apos_transicao(Faturada, DatasOrdem::default(), hoje, MarcoConclusao::EmissaoTrd);

        assert_eq!(of.conclusao, Some(hoje));
        assert_eq!(of.faturamento, Some(hoje));
        assert_eq!(os.conclusao, None);
    }

    #[test]
    fn datas_informadas_nao_sao_sobrescritas() {
        let antes = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let hoje = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        let datas = DatasOrdem { conclusao: Some(antes), faturamento: None };

        let novas = datas_apos_transicao(Faturada, datas, hoje, MarcoConclusao::Ativacao);
        assert_eq!(novas.conclusao, Some(antes));
    }
}
