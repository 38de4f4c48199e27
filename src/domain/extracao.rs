// src/domain/extracao.rs
//
// Formato do JSON produzido pelo extrator externo de contratos e as regras
// para convertê-lo em cadastros.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::common::error::AppError;
use crate::models::contratos::{OrigemContrato, RegimeLegal, TipoItemContrato};

pub const VIGENCIAS_CONTRATO: [i32; 6] = [12, 24, 36, 48, 60, 120];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DadosExtraidos {
    #[serde(default)]
    pub cliente: Option<ClienteExtraido>,
    #[serde(default)]
    pub contrato: Option<ContratoExtraido>,
    #[serde(default)]
    pub itens: Vec<ItemExtraido>,
    #[serde(default)]
    pub slas: Vec<SlaExtraido>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub confianca: Option<Confianca>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClienteExtraido {
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub nome_razao_social: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub cnpj_cpf: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub tipo_cliente: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub tipo_pessoa: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub endereco: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub numero: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub bairro: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub cidade: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub estado: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub cep: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub nome_responsavel: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub cargo_responsavel: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub email_contato: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub telefone_contato: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContratoExtraido {
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub numero_contrato: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub objeto: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub regime_legal: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub modalidade_licitacao: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub numero_processo: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub data_assinatura: Option<String>,
    #[serde(default, deserialize_with = "numero_flexivel")]
    pub vigencia_meses: Option<Decimal>,
    #[serde(default, deserialize_with = "numero_flexivel")]
    pub valor_inicial: Option<Decimal>,
    #[serde(default, deserialize_with = "lista_flexivel")]
    pub fornecedores: Vec<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub origem_contrato: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub origem_contrato_justificativa: Option<String>,
    #[serde(default, deserialize_with = "numero_flexivel")]
    pub origem_contrato_confianca: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemExtraido {
    #[serde(default, deserialize_with = "numero_flexivel")]
    pub lote: Option<Decimal>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub numero_item: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub descricao: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub tipo: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub unidade: Option<String>,
    #[serde(default, deserialize_with = "numero_flexivel")]
    pub quantidade: Option<Decimal>,
    #[serde(default, deserialize_with = "numero_flexivel")]
    pub valor_unitario: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlaExtraido {
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub nome: Option<String>,
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub descricao: Option<String>,
    #[serde(default, deserialize_with = "numero_flexivel")]
    pub tempo_resposta_horas: Option<Decimal>,
    #[serde(default, deserialize_with = "numero_flexivel")]
    pub tempo_solucao_horas: Option<Decimal>,
    #[serde(default, deserialize_with = "numero_flexivel")]
    pub penalidade_percentual: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Confianca {
    #[serde(default, deserialize_with = "texto_flexivel")]
    pub geral: Option<String>,
    #[serde(default, deserialize_with = "lista_flexivel")]
    pub campos_incertos: Vec<String>,
}

// --- Desserialização tolerante (o extrator alterna entre texto, número e null) ---

fn texto_de(valor: Value) -> Option<String> {
    match valor {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn texto_flexivel<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(texto_de))
}

fn numero_flexivel<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(&s),
        _ => None,
    })
}

fn lista_flexivel<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(itens)) => itens.into_iter().filter_map(texto_de).collect(),
        Some(outro) => texto_de(outro)
            .map(|s| s.split([',', ';']).map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect())
            .unwrap_or_default(),
        None => Vec::new(),
    })
}

/// Aceita "150000.00", "150.000,00", "R$ 1.500,50" e notação científica.
pub fn parse_decimal(texto: &str) -> Option<Decimal> {
    let limpo: String = texto
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if limpo.is_empty() {
        return None;
    }

    let normalizado = match (limpo.contains(','), limpo.contains('.')) {
        (true, true) => limpo.replace('.', "").replace(',', "."),
        (true, false) => limpo.replace(',', "."),
        _ => limpo,
    };

    Decimal::from_str(&normalizado)
        .or_else(|_| Decimal::from_scientific(&normalizado))
        .ok()
}

/// Extrai o objeto JSON da resposta, tolerando cercas de markdown e texto ao redor.
pub fn parse_resposta(resposta: &str) -> Result<(DadosExtraidos, Value), AppError> {
    let inicio = resposta.find('{');
    let fim = resposta.rfind('}');
    let corpo = match (inicio, fim) {
        (Some(i), Some(f)) if f > i => &resposta[i..=f],
        _ => return Err(AppError::AnaliseInvalida("nenhum objeto JSON encontrado".into())),
    };

    let bruto: Value = serde_json::from_str(corpo).map_err(|e| AppError::AnaliseInvalida(e.to_string()))?;
    let dados: DadosExtraidos =
        serde_json::from_value(bruto.clone()).map_err(|e| AppError::AnaliseInvalida(e.to_string()))?;

    if dados.cliente.is_none() && dados.contrato.is_none() && dados.itens.is_empty() {
        return Err(AppError::AnaliseInvalida("nenhum dado de cliente, contrato ou itens".into()));
    }

    Ok((dados, bruto))
}

// --- Regras de conversão ---

/// Vigência válida mais próxima; empates ficam com a menor.
pub fn ajustar_vigencia(meses: i32) -> i32 {
    VIGENCIAS_CONTRATO
        .iter()
        .copied()
        .min_by_key(|v| (v - meses).abs())
        .unwrap_or(12)
}

pub fn regime_de(texto: Option<&str>) -> RegimeLegal {
    match texto.map(|t| t.trim().to_uppercase()).as_deref() {
        Some("LEI_13303") => RegimeLegal::Lei13303,
        Some("PRIVADO") => RegimeLegal::Privado,
        _ => RegimeLegal::Lei14133,
    }
}

pub fn origem_de(texto: Option<&str>, regime: RegimeLegal) -> OrigemContrato {
    texto
        .and_then(|t| serde_json::from_value(Value::String(t.trim().to_uppercase())).ok())
        .unwrap_or_else(|| regime.origem_padrao())
}

/// Tipos desconhecidos viram serviço.
pub fn tipo_item_de(texto: Option<&str>) -> TipoItemContrato {
    match texto.map(|t| t.trim().to_lowercase()).as_deref() {
        Some("hardware") => TipoItemContrato::Hardware,
        Some("software") => TipoItemContrato::Software,
        Some("solucao") | Some("solução") => TipoItemContrato::Solucao,
        Some("treinamento") => TipoItemContrato::Treinamento,
        _ => TipoItemContrato::Servico,
    }
}

pub fn data_de(texto: Option<&str>) -> Option<NaiveDate> {
    texto.and_then(|t| NaiveDate::parse_from_str(t.trim(), "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPOSTA: &str = r#"```json
    {
        "cliente": {"nome_razao_social": "Prefeitura de Exemplo", "cnpj_cpf": "12.345.678/0001-90", "estado": "SP"},
        "contrato": {
            "numero_contrato": "CT-01/2025",
            "regime_legal": "lei_13303",
            "data_assinatura": "2025-02-01",
            "vigencia_meses": "30",
            "valor_inicial": 150000.5,
            "fornecedores": ["Red Hat", "Fortinet"],
            "origem_contrato": null
        },
        "itens": [
            {"numero_item": 1, "descricao": "Suporte", "tipo": "consultoria", "quantidade": null, "valor_unitario": "1.500,00"}
        ],
        "slas": [],
        "observacoes": null,
        "confianca": {"geral": "alta", "campos_incertos": []}
    }
    ```"#;

    #[test]
    fn le_resposta_entre_cercas_de_markdown() {
        let (dados, bruto) = parse_resposta(RESPOSTA).unwrap();

        let contrato = dados.contrato.unwrap();
        assert_eq!(contrato.numero_contrato.as_deref(), Some("CT-01/2025"));
        assert_eq!(contrato.vigencia_meses, Some(Decimal::from(30)));
        assert_eq!(contrato.valor_inicial, Some(Decimal::new(1500005, 1)));
        assert_eq!(contrato.fornecedores, vec!["Red Hat", "Fortinet"]);

        let item = &dados.itens[0];
        assert_eq!(item.numero_item.as_deref(), Some("1"));
        assert_eq!(item.quantidade, None);
        assert_eq!(item.valor_unitario, Some(Decimal::from(1500)));

        assert!(bruto.get("cliente").is_some());
    }

    #[test]
    fn resposta_sem_json_e_invalida() {
        assert!(matches!(parse_resposta("não consegui ler o PDF"), Err(AppError::AnaliseInvalida(_))));
        assert!(matches!(parse_resposta("{\"cliente\": "), Err(AppError::AnaliseInvalida(_))));
        assert!(matches!(parse_resposta("{}"), Err(AppError::AnaliseInvalida(_))));
    }

    #[test]
    fn formatos_de_valor() {
        assert_eq!(parse_decimal("150000.00"), Some(Decimal::from(150_000)));
        assert_eq!(parse_decimal("R$ 1.500,50"), Some(Decimal::new(150_050, 2)));
        assert_eq!(parse_decimal("12,5"), Some(Decimal::new(125, 1)));
        assert_eq!(parse_decimal("1e3"), Some(Decimal::from(1000)));
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn vigencia_arredondada_para_a_mais_proxima() {
        assert_eq!(ajustar_vigencia(30), 24);
        assert_eq!(ajustar_vigencia(13), 12);
        assert_eq!(ajustar_vigencia(100), 120);
        assert_eq!(ajustar_vigencia(48), 48);
    }

    #[test]
    fn padroes_de_regime_origem_e_tipo() {
        assert_eq!(regime_de(Some("lei_13303")), RegimeLegal::Lei13303);
        assert_eq!(regime_de(None), RegimeLegal::Lei14133);

        assert_eq!(origem_de(None, RegimeLegal::Lei13303), OrigemContrato::Licitacao13303Propria);
        assert_eq!(origem_de(Some("arp_adesao_carona"), RegimeLegal::Lei14133), OrigemContrato::ArpAdesaoCarona);
        assert_eq!(origem_de(Some("desconhecida"), RegimeLegal::Privado), OrigemContrato::RfpPrivada);

        assert_eq!(tipo_item_de(Some("Software")), TipoItemContrato::Software);
        assert_eq!(tipo_item_de(Some("consultoria")), TipoItemContrato::Servico);
    }
}
