// src/handlers/contact.rs

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::lead::{ContactPayload, Lead, LeadFilter, UpdateLeadStatusPayload},
};

#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "Contact",
    request_body = ContactPayload,
    responses(
        (status = 201, description = "Lead registrado", body = Lead),
        (status = 400, description = "Campos obrigatórios ausentes ou inválidos")
    )
)]
pub async fn submit_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ContactPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // A validação acontece no serviço, antes de qualquer acesso ao banco
    let lead = app_state
        .lead_service
        .submit(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(lead)))
}

#[utoipa::path(
    get,
    path = "/api/admin/leads",
    tag = "Admin Leads",
    params(LeadFilter),
    responses((status = 200, description = "Leads, mais recentes primeiro", body = Vec<Lead>)),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    locale: Locale,
    query: Result<Query<LeadFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(filter) = query.map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;
    let leads = app_state
        .lead_service
        .list(filter.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(leads))
}

#[utoipa::path(
    put,
    path = "/api/admin/leads/{id}/status",
    tag = "Admin Leads",
    request_body = UpdateLeadStatusPayload,
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Status atualizado", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead_status(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let lead = app_state
        .lead_service
        .update_status(id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(lead))
}
