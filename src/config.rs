// src/config.rs

use std::{env, str::FromStr, time::Duration};

use anyhow::Context;
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        AnaliseRepository, ClienteRepository, ContratoRepository, FornecedorRepository, ItemContratoRepository,
        NumeracaoRepository, OrdemRepository, ProjetoRepository,
    },
    domain::RegrasNegocio,
    services::{
        analise_service::AnaliseService, cliente_service::ClienteService, contrato_service::ContratoService,
        fornecedor_service::FornecedorService, lookup_service::LookupService, ordem_service::OrdemService,
        projeto_service::ProjetoService,
    },
};

/// Parâmetros lidos do ambiente (ou do `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub server_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub regras: RegrasNegocio,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Valores opcionais ausentes ou inválidos caem no padrão; só `DATABASE_URL` é obrigatória.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .context("DATABASE_URL deve ser definida")?;

        let padrao = RegrasNegocio::default();
        let regras = RegrasNegocio {
            imposto_percentual: percentual_or(&lookup, "IMPOSTO_PERCENTUAL", padrao.imposto_percentual),
            royalties_percentual: percentual_or(&lookup, "ROYALTIES_PERCENTUAL", padrao.royalties_percentual),
            margem_minima_percentual: percentual_or(&lookup, "MARGEM_MINIMA_PERCENTUAL", padrao.margem_minima_percentual),
            dias_alerta_renovacao: parse_or(&lookup, "DIAS_ALERTA_RENOVACAO", padrao.dias_alerta_renovacao),
        };

        Ok(Self {
            database_url,
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5),
            db_acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 3)),
            regras,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, padrao: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Valor inválido em {}: '{}', usando o padrão", key, raw);
            padrao
        }),
        None => padrao,
    }
}

/// Percentuais fora de 0..=100 caem no padrão.
fn percentual_or<F>(lookup: &F, key: &str, padrao: Decimal) -> Decimal
where
    F: Fn(&str) -> Option<String>,
{
    let valor = parse_or(lookup, key, padrao);
    if valor < Decimal::ZERO || valor > Decimal::ONE_HUNDRED {
        tracing::warn!("Percentual fora do intervalo em {}: {}, usando o padrão", key, valor);
        return padrao;
    }
    valor
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: I18nStore,
    pub settings: Settings,
    pub cliente_service: ClienteService,
    pub contrato_service: ContratoService,
    pub fornecedor_service: FornecedorService,
    pub ordem_service: OrdemService,
    pub projeto_service: ProjetoService,
    pub analise_service: AnaliseService,
    pub lookup_service: LookupService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let settings = Settings::from_env()?;

        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(settings.db_acquire_timeout)
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let i18n_store = I18nStore::load()?;
        let regras = settings.regras.clone();

        // --- Monta o gráfico de dependências ---
        let contrato_service = ContratoService::new(ContratoRepository::new(), ItemContratoRepository::new(), regras.clone());

        let ordem_service = OrdemService::new(
            OrdemRepository::new(),
            ContratoRepository::new(),
            ItemContratoRepository::new(),
            FornecedorRepository::new(),
            NumeracaoRepository::new(),
            ProjetoRepository::new(),
            regras,
        );

        let analise_service = AnaliseService::new(
            AnaliseRepository::new(),
            ClienteRepository::new(),
            ContratoRepository::new(),
            ItemContratoRepository::new(),
            ProjetoRepository::new(),
            contrato_service.clone(),
        );

        Ok(Self {
            db_pool,
            i18n_store,
            cliente_service: ClienteService::new(ClienteRepository::new()),
            fornecedor_service: FornecedorService::new(FornecedorRepository::new()),
            projeto_service: ProjetoService::new(ProjetoRepository::new(), OrdemRepository::new()),
            lookup_service: LookupService::new(
                ContratoRepository::new(),
                ItemContratoRepository::new(),
                FornecedorRepository::new(),
            ),
            contrato_service,
            ordem_service,
            analise_service,
            settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_de(pares: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let mapa: HashMap<String, String> = pares.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| mapa.get(key).cloned()
    }

    #[test]
    fn sem_database_url_falha() {
        assert!(Settings::from_lookup(lookup_de(&[])).is_err());
        assert!(Settings::from_lookup(lookup_de(&[("DATABASE_URL", "  ")])).is_err());
    }

    #[test]
    fn valores_padrao() {
        let settings = Settings::from_lookup(lookup_de(&[("DATABASE_URL", "postgres://localhost/contratos")])).unwrap();

        assert_eq!(settings.server_addr, "0.0.0.0:3000");
        assert_eq!(settings.db_max_connections, 5);
        assert_eq!(settings.db_acquire_timeout, Duration::from_secs(3));
        assert_eq!(settings.regras.imposto_percentual, Decimal::from(15));
        assert_eq!(settings.regras.royalties_percentual, Decimal::from(12));
        assert_eq!(settings.regras.margem_minima_percentual, Decimal::from(20));
        assert_eq!(settings.regras.dias_alerta_renovacao, 90);
    }

    #[test]
    fn regras_vem_do_ambiente_e_invalidos_caem_no_padrao() {
        let settings = Settings::from_lookup(lookup_de(&[
            ("DATABASE_URL", "postgres://localhost/contratos"),
            ("IMPOSTO_PERCENTUAL", "16.5"),
            ("ROYALTIES_PERCENTUAL", "1e30"),
            ("MARGEM_MINIMA_PERCENTUAL", "vinte"),
            ("DIAS_ALERTA_RENOVACAO", "60"),
            ("DB_MAX_CONNECTIONS", "-1"),
        ]))
        .unwrap();

        assert_eq!(settings.regras.imposto_percentual, Decimal::new(165, 1));
        assert_eq!(settings.regras.royalties_percentual, Decimal::from(12));
        assert_eq!(settings.regras.margem_minima_percentual, Decimal::from(20));
        assert_eq!(settings.regras.dias_alerta_renovacao, 60);
        assert_eq!(settings.db_max_connections, 5);
    }
}
