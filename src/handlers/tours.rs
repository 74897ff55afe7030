// src/handlers/tours.rs

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
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
    models::tour::{ReorderDestinationsPayload, TourDetail, TourFilter, TourPayload},
};

// ---
// Público
// ---

#[utoipa::path(
    get,
    path = "/api/tours",
    tag = "Tours",
    params(TourFilter),
    responses(
        (status = 200, description = "Tours publicados, já filtrados", body = Vec<TourDetail>),
        (status = 400, description = "Intervalo de datas ou parâmetros inválidos")
    )
)]
pub async fn list_tours(
    State(app_state): State<AppState>,
    locale: Locale,
    query: Result<Query<TourFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(filter) = query.map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;
    let tours = app_state
        .tour_service
        .list_public(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tours))
}

#[utoipa::path(
    get,
    path = "/api/tours/{slug}",
    tag = "Tours",
    params(("slug" = String, Path, description = "Slug do tour")),
    responses(
        (status = 200, description = "Detalhe do tour com canonicalUrl", body = TourDetail),
        (status = 404, description = "Tour não encontrado")
    )
)]
pub async fn get_tour(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let tour = app_state
        .tour_service
        .get_public(&slug, locale.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tour))
}

// ---
// Admin
// ---

#[utoipa::path(
    get,
    path = "/api/admin/tours",
    tag = "Admin Tours",
    responses((status = 200, description = "Todos os tours, inclusive rascunhos", body = Vec<TourDetail>)),
    security(("api_jwt" = []))
)]
pub async fn admin_list_tours(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let tours = app_state
        .tour_service
        .list_all()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tours))
}

#[utoipa::path(
    get,
    path = "/api/admin/tours/{id}",
    tag = "Admin Tours",
    params(("id" = Uuid, Path, description = "ID do tour")),
    responses(
        (status = 200, description = "Tour", body = TourDetail),
        (status = 404, description = "Tour não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_get_tour(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let tour = app_state
        .tour_service
        .get_by_id(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tour))
}

#[utoipa::path(
    post,
    path = "/api/admin/tours",
    tag = "Admin Tours",
    request_body = TourPayload,
    responses(
        (status = 201, description = "Tour criado", body = TourDetail),
        (status = 400, description = "Formulário inválido"),
        (status = 409, description = "Slug já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tour(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<TourPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let tour = app_state
        .tour_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(tour)))
}

#[utoipa::path(
    put,
    path = "/api/admin/tours/{id}",
    tag = "Admin Tours",
    request_body = TourPayload,
    params(("id" = Uuid, Path, description = "ID do tour")),
    responses(
        (status = 200, description = "Tour atualizado", body = TourDetail),
        (status = 400, description = "Formulário inválido"),
        (status = 404, description = "Tour não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_tour(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<TourPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let tour = app_state
        .tour_service
        .update(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tour))
}

#[utoipa::path(
    delete,
    path = "/api/admin/tours/{id}",
    tag = "Admin Tours",
    params(("id" = Uuid, Path, description = "ID do tour")),
    responses(
        (status = 204, description = "Tour removido"),
        (status = 404, description = "Tour não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_tour(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .tour_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/admin/tours/{id}/destinations/{destination_id}",
    tag = "Admin Tours",
    params(
        ("id" = Uuid, Path, description = "ID do tour"),
        ("destination_id" = Uuid, Path, description = "Destino a remover do roteiro")
    ),
    responses(
        (status = 200, description = "Roteiro renumerado", body = TourDetail),
        (status = 404, description = "Destino não faz parte do tour")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_tour_destination(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((id, destination_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let tour = app_state
        .tour_service
        .remove_destination(id, destination_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tour))
}

#[utoipa::path(
    put,
    path = "/api/admin/tours/{id}/destinations",
    tag = "Admin Tours",
    request_body = ReorderDestinationsPayload,
    params(("id" = Uuid, Path, description = "ID do tour")),
    responses(
        (status = 200, description = "Nova ordem aplicada", body = TourDetail),
        (status = 400, description = "A lista não corresponde aos destinos do tour")
    ),
    security(("api_jwt" = []))
)]
pub async fn reorder_tour_destinations(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReorderDestinationsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let tour = app_state
        .tour_service
        .reorder_destinations(id, &payload.destination_ids)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tour))
}
