use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    common::{
        error::{ApiError, AppError},
        i18n::I18nStore,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::auth::User,
};

// Guarda das rotas /api/admin: valida o Bearer e injeta o usuário nos extensions
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store));
    };

    let user = app_state
        .auth_service
        .validate_token(bearer.token())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub User);

// Sem usuário nos extensions a rota não passou pelo guard: 401 traduzido
fn user_from_parts(parts: &Parts, locale: &Locale, store: &I18nStore) -> Result<User, ApiError> {
    parts
        .extensions
        .get::<User>()
        .cloned()
        .ok_or_else(|| AppError::InvalidToken.to_api_error(locale, store))
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});
        user_from_parts(parts, &locale, &state.i18n_store).map(AuthenticatedUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::language::Language;
    use axum::http::{header, Request, StatusCode};
    use chrono::Utc;
    use uuid::Uuid;

    fn parts(accept: &str) -> Parts {
        let (parts, _) = Request::builder()
            .uri("/api/users/me")
            .header(header::ACCEPT_LANGUAGE, accept)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn missing_user_is_a_translated_401() {
        let store = I18nStore::new();

        let err = user_from_parts(&parts("en"), &Locale(Language::En), &store).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.error, store.translate(Language::En, "invalid_token"));

        let err = user_from_parts(&parts("es"), &Locale(Language::Es), &store).unwrap_err();
        assert_eq!(err.error, "Token de autenticación inválido o ausente.");
    }

    #[test]
    fn user_inserted_by_the_guard_is_returned() {
        let mut parts = parts("es");
        let user = User {
            id: Uuid::new_v4(),
            email: "admin@agencia.com".to_string(),
            password_hash: "x".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        parts.extensions.insert(user.clone());

        let found = user_from_parts(&parts, &Locale(Language::Es), &I18nStore::new()).unwrap();
        assert_eq!(found.id, user.id);
    }
}
