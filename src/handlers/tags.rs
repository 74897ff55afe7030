// src/handlers/tags.rs

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
    models::tag::{Tag, TagCategory, TagCategoryPayload, TagPayload},
};

#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "Tags",
    responses(
        (status = 200, description = "Lista de tags", body = Vec<Tag>),
        (status = 503, description = "Banco indisponível após as tentativas")
    )
)]
pub async fn list_tags(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let tags = app_state
        .tag_service
        .list_tags()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tags))
}

#[utoipa::path(
    get,
    path = "/api/tag-categories",
    tag = "Tags",
    responses((status = 200, description = "Categorias de tags", body = Vec<TagCategory>))
)]
pub async fn list_tag_categories(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let categories = app_state
        .tag_service
        .list_categories()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(categories))
}

#[utoipa::path(
    post,
    path = "/api/admin/tags",
    tag = "Admin Tags",
    request_body = TagPayload,
    responses(
        (status = 201, description = "Tag criada", body = Tag),
        (status = 409, description = "Slug já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tag(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<TagPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let tag = app_state
        .tag_service
        .create_tag(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(tag)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/tags/{id}",
    tag = "Admin Tags",
    params(("id" = Uuid, Path, description = "ID da tag")),
    responses(
        (status = 204, description = "Tag removida"),
        (status = 404, description = "Tag não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_tag(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .tag_service
        .delete_tag(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/tag-categories",
    tag = "Admin Tags",
    request_body = TagCategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = TagCategory),
        (status = 409, description = "Nome já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tag_category(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<TagCategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .tag_service
        .create_category(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/tag-categories/{id}",
    tag = "Admin Tags",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 204, description = "Categoria removida (as tags ficam sem categoria)"),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_tag_category(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .tag_service
        .delete_category(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
