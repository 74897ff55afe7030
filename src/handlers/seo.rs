// src/handlers/seo.rs

use axum::{extract::State, http::header, response::IntoResponse};

use crate::{common::error::ApiError, config::AppState, middleware::i18n::Locale};

#[utoipa::path(
    get,
    path = "/sitemap.xml",
    tag = "SEO",
    responses((status = 200, description = "Sitemap XML", content_type = "application/xml", body = String))
)]
pub async fn sitemap(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let xml = app_state
        .seo_service
        .sitemap()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}

#[utoipa::path(
    get,
    path = "/robots.txt",
    tag = "SEO",
    responses((status = 200, description = "robots.txt", content_type = "text/plain", body = String))
)]
pub async fn robots(State(app_state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        app_state.seo_service.robots(),
    )
}
