// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

use anyhow::Context;

const DEFAULT_LANG: &str = "pt";

/// Catálogo de mensagens por idioma, embutido no binário.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: Arc<HashMap<String, HashMap<String, String>>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut messages = HashMap::new();

        for (lang, raw) in [
            ("pt", include_str!("../../locales/pt.json")),
            ("en", include_str!("../../locales/en.json")),
        ] {
            let catalog: HashMap<String, String> = serde_json::from_str(raw)
                .with_context(|| format!("Catálogo de mensagens '{}' inválido", lang))?;
            messages.insert(lang.to_string(), catalog);
        }

        Ok(Self { messages: Arc::new(messages) })
    }

    pub fn lookup(&self, lang: &str, code: &str) -> Option<&str> {
        self.messages
            .get(lang)
            .and_then(|catalog| catalog.get(code))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|catalog| catalog.get(code)))
            .map(String::as_str)
    }

    /// Traduz `code` e substitui os marcadores `{nome}` pelos parâmetros.
    /// Sem tradução no idioma pedido usa o português; sem nenhuma, devolve o próprio código.
    pub fn translate(&self, lang: &str, code: &str, params: &[(&str, String)]) -> String {
        let template = self.lookup(lang, code).unwrap_or(code);

        params.iter().fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{}}}", name), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpola_parametros() {
        let store = I18nStore::load().unwrap();
        let msg = store.translate("en", "resource.not_found", &[("recurso", "Contrato".to_string())]);

        assert!(msg.contains("Contrato"));
        assert!(!msg.contains("{recurso}"));
    }

    #[test]
    fn codigo_desconhecido_retorna_o_codigo() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("pt", "nao.existe", &[]), "nao.existe");
    }

    #[test]
    fn catalogos_tem_as_mesmas_chaves() {
        let store = I18nStore::load().unwrap();
        let pt = &store.messages["pt"];
        let en = &store.messages["en"];

        let mut faltando: Vec<_> = pt.keys().filter(|k| !en.contains_key(*k)).collect();
        faltando.extend(en.keys().filter(|k| !pt.contains_key(*k)));
        assert!(faltando.is_empty(), "chaves sem tradução: {:?}", faltando);
    }
}
