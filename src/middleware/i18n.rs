// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::models::language::Language;

// Extrator de idioma: `?lang=` tem prioridade, depois Accept-Language.
#[derive(Debug, Clone, Copy)]
pub struct Locale(pub Language);

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let from_query = parts
            .uri
            .query()
            .and_then(lang_from_query);

        let lang = from_query
            .or_else(|| {
                parts
                    .headers
                    .get(header::ACCEPT_LANGUAGE)
                    .and_then(|header_value| header_value.to_str().ok())
                    .and_then(lang_from_accept_language)
            })
            .unwrap_or_default();

        Ok(Locale(lang))
    }
}

fn lang_from_query(query: &str) -> Option<Language> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "lang")
        .and_then(|(_, value)| Language::from_tag(value))
}

// Primeiro idioma suportado na lista ordenada por qualidade ("pt-BR, en;q=0.8" -> en)
fn lang_from_accept_language(header_str: &str) -> Option<Language> {
    accept_language::parse(header_str)
        .iter()
        .find_map(|tag| Language::from_tag(tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(uri: &str, accept: Option<&str>) -> Language {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = accept {
            builder = builder.header(header::ACCEPT_LANGUAGE, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        let Locale(lang) = Locale::from_request_parts(&mut parts, &()).await.unwrap();
        lang
    }

    #[tokio::test]
    async fn query_param_wins_over_header() {
        assert_eq!(extract("/api/tours?lang=en", Some("es-EC")).await, Language::En);
    }

    #[tokio::test]
    async fn skips_unsupported_languages_in_header() {
        assert_eq!(extract("/api/tours", Some("pt-BR, en;q=0.8")).await, Language::En);
    }

    #[tokio::test]
    async fn defaults_to_spanish() {
        assert_eq!(extract("/api/tours", None).await, Language::Es);
        assert_eq!(extract("/api/tours?lang=fr", Some("de")).await, Language::Es);
    }
}
