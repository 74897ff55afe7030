// src/handlers/destinations.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::destination::{Destination, DestinationPayload},
};

#[utoipa::path(
    get,
    path = "/api/destinations",
    tag = "Destinations",
    responses((status = 200, description = "Destinos por país e cidade", body = Vec<Destination>))
)]
pub async fn list_destinations(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    // CRUD simples: sem serviço no meio
    let destinations = app_state
        .destination_repo
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(destinations))
}

#[utoipa::path(
    post,
    path = "/api/admin/destinations",
    tag = "Admin Destinations",
    request_body = DestinationPayload,
    responses(
        (status = 201, description = "Destino criado", body = Destination),
        (status = 409, description = "Destino já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_destination(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<DestinationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let destination = app_state
        .destination_repo
        .create(payload.country.trim(), payload.city.trim())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(destination)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/destinations/{id}",
    tag = "Admin Destinations",
    params(("id" = Uuid, Path, description = "ID do destino")),
    responses(
        (status = 204, description = "Destino removido"),
        (status = 404, description = "Destino não encontrado"),
        (status = 409, description = "Destino usado por algum tour")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_destination(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .destination_repo
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
