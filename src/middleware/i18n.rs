// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

/// Idioma primário do cabeçalho `Accept-Language` ("pt-BR" -> "pt").
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale("pt".to_string())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str).first().map(|tag| {
                    tag.split('-').next().unwrap_or(tag).to_lowercase()
                })
            })
            .map(Locale)
            .unwrap_or_default();

        Ok(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extrair(header: Option<&str>) -> String {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(header::ACCEPT_LANGUAGE, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        let Locale(lang) = Locale::from_request_parts(&mut parts, &()).await.unwrap();
        lang
    }

    #[tokio::test]
    async fn usa_o_idioma_de_maior_peso() {
        assert_eq!(extrair(Some("en-US,pt-BR;q=0.8")).await, "en");
        assert_eq!(extrair(Some("pt-BR;q=0.5,en;q=0.9")).await, "en");
    }

    #[tokio::test]
    async fn sem_cabecalho_usa_portugues() {
        assert_eq!(extrair(None).await, "pt");
    }
}
