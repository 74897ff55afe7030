use std::collections::BTreeMap;

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::{common::i18n::I18nStore, middleware::i18n::Locale, models::language::Language};

// Nosso tipo de erro interno. Os handlers convertem em `ApiError` já traduzido.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Tour não encontrado")]
    TourNotFound,

    #[error("Post não encontrado")]
    PostNotFound,

    #[error("Destino não encontrado")]
    DestinationNotFound,

    #[error("Tag não encontrada")]
    TagNotFound,

    #[error("Categoria de tag não encontrada")]
    TagCategoryNotFound,

    #[error("Lead não encontrado")]
    LeadNotFound,

    #[error("Query string inválida: {0}")]
    InvalidQuery(#[from] QueryRejection),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Registro em uso: {0}")]
    ResourceInUse(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Erro de validação de um único campo, com o código usado como chave de tradução.
    pub fn invalid_field(field: &'static str, code: &'static str) -> Self {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new(code);
        err.message = Some(code.into());
        errors.add(field, err);
        AppError::ValidationError(errors)
    }

    /// Falhas passageiras do banco (pool esgotado, conexão caída).
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::DatabaseError(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::WorkerCrashed
            ),
            _ => false,
        }
    }

    /// Traduz o erro para o idioma da requisição.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0;
        let simple = |status: StatusCode, key: &str| ApiError {
            status,
            error: store.translate(lang, key),
            details: None,
        };

        match self {
            AppError::ValidationError(errors) => {
                let mut details = BTreeMap::new();
                flatten_validation_errors("", &errors, lang, store, &mut details);
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: store.translate(lang, "validation_failed"),
                    details: Some(json!(details)),
                }
            }
            AppError::InvalidQuery(rejection) => ApiError {
                status: StatusCode::BAD_REQUEST,
                error: store.translate(lang, "invalid_query"),
                details: Some(json!(rejection.body_text())),
            },
            AppError::InvalidCredentials => simple(StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::InvalidToken => simple(StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::UserNotFound => simple(StatusCode::NOT_FOUND, "user_not_found"),
            AppError::TourNotFound => simple(StatusCode::NOT_FOUND, "tour_not_found"),
            AppError::PostNotFound => simple(StatusCode::NOT_FOUND, "post_not_found"),
            AppError::DestinationNotFound => simple(StatusCode::NOT_FOUND, "destination_not_found"),
            AppError::TagNotFound => simple(StatusCode::NOT_FOUND, "tag_not_found"),
            AppError::TagCategoryNotFound => simple(StatusCode::NOT_FOUND, "tag_category_not_found"),
            AppError::LeadNotFound => simple(StatusCode::NOT_FOUND, "lead_not_found"),
            AppError::UniqueConstraintViolation(detail) => ApiError {
                status: StatusCode::CONFLICT,
                error: store.translate(lang, "conflict"),
                details: Some(json!(detail)),
            },
            AppError::ResourceInUse(detail) => ApiError {
                status: StatusCode::CONFLICT,
                error: store.translate(lang, "in_use"),
                details: Some(json!(detail)),
            },
            ref e if e.is_transient() => {
                tracing::warn!("Banco indisponível: {}", e);
                simple(StatusCode::SERVICE_UNAVAILABLE, "database_unavailable")
            }
            // Todos os outros erros viram 500. O detalhe fica só no log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                simple(StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

// Achata erros aninhados ("departures[0].capacity") num mapa campo -> mensagens.
fn flatten_validation_errors(
    prefix: &str,
    errors: &ValidationErrors,
    lang: Language,
    store: &I18nStore,
    out: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors
                    .iter()
                    .map(|e| {
                        let key = e.message.as_deref().unwrap_or_else(|| e.code.as_ref());
                        store.translate(lang, key)
                    })
                    .collect();
                out.insert(path, messages);
            }
            ValidationErrorsKind::Struct(inner) => {
                flatten_validation_errors(&path, inner, lang, store, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_validation_errors(&format!("{}[{}]", path, index), inner, lang, store, out);
                }
            }
        }
    }
}

// Erro já traduzido, pronto para virar resposta HTTP
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(lang: Language) -> Locale {
        Locale(lang)
    }

    #[test]
    fn validation_error_is_translated_per_field() {
        let store = I18nStore::new();
        let api = AppError::invalid_field("name", "required").to_api_error(&locale(Language::En), &store);

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "One or more fields are invalid.");
        let details = api.details.expect("details");
        assert_eq!(details["name"][0], "This field is required.");
    }

    #[test]
    fn not_found_uses_locale() {
        let store = I18nStore::new();
        let api = AppError::TourNotFound.to_api_error(&locale(Language::Es), &store);
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Tour no encontrado.");
        assert!(api.details.is_none());
    }

    #[test]
    fn malformed_query_string_is_a_translated_400() {
        use crate::models::tour::TourFilter;
        use axum::{extract::Query, http::Uri};

        let rejection = Query::<TourFilter>::try_from_uri(&Uri::from_static("/api/tours?maxPrice=barato"))
            .unwrap_err();
        let api = AppError::from(rejection).to_api_error(&locale(Language::Es), &I18nStore::new());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "Los parámetros de la consulta no son válidos.");
        assert!(api.details.is_some());
    }

    #[test]
    fn pool_timeout_is_transient_and_maps_to_503() {
        let err = AppError::DatabaseError(sqlx::Error::PoolTimedOut);
        assert!(err.is_transient());

        let api = err.to_api_error(&locale(Language::En), &I18nStore::new());
        assert_eq!(api.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn row_not_found_is_not_transient() {
        let err = AppError::DatabaseError(sqlx::Error::RowNotFound);
        assert!(!err.is_transient());
        assert!(!AppError::InvalidToken.is_transient());

        let api = err.to_api_error(&locale(Language::En), &I18nStore::new());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
