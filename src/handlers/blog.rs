// src/handlers/blog.rs

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
    models::blog::{BlogFilter, BlogPostPayload, BlogPostView},
};

#[utoipa::path(
    get,
    path = "/api/blog",
    tag = "Blog",
    params(
        BlogFilter,
        ("lang" = Option<String>, Query, description = "es | en (senão Accept-Language)")
    ),
    responses((status = 200, description = "Posts publicados no idioma, mais recentes primeiro", body = Vec<BlogPostView>))
)]
pub async fn list_posts(
    State(app_state): State<AppState>,
    locale: Locale,
    query: Result<Query<BlogFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(filter) = query.map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;
    let posts = app_state
        .blog_service
        .list_public(locale.0, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(posts))
}

#[utoipa::path(
    get,
    path = "/api/blog/{slug}",
    tag = "Blog",
    params(("slug" = String, Path, description = "Slug do post")),
    responses(
        (status = 200, description = "Post", body = BlogPostView),
        (status = 404, description = "Post não encontrado")
    )
)]
pub async fn get_post(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = app_state
        .blog_service
        .get_public(locale.0, &slug)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(post))
}

// ---
// Admin
// ---

#[utoipa::path(
    get,
    path = "/api/admin/blog",
    tag = "Admin Blog",
    responses((status = 200, description = "Todos os posts do esquema atual", body = Vec<BlogPostView>)),
    security(("api_jwt" = []))
)]
pub async fn admin_list_posts(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let posts = app_state
        .blog_service
        .list_all()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(posts))
}

#[utoipa::path(
    get,
    path = "/api/admin/blog/{id}",
    tag = "Admin Blog",
    params(("id" = Uuid, Path, description = "ID do post")),
    responses(
        (status = 200, description = "Post", body = BlogPostView),
        (status = 404, description = "Post não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_get_post(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let post = app_state
        .blog_service
        .get_by_id(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(post))
}

#[utoipa::path(
    post,
    path = "/api/admin/blog",
    tag = "Admin Blog",
    request_body = BlogPostPayload,
    responses(
        (status = 201, description = "Post criado", body = BlogPostView),
        (status = 400, description = "Formulário inválido"),
        (status = 409, description = "Slug já usado nesse idioma")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_post(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<BlogPostPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let post = app_state
        .blog_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(post)))
}

#[utoipa::path(
    put,
    path = "/api/admin/blog/{id}",
    tag = "Admin Blog",
    request_body = BlogPostPayload,
    params(("id" = Uuid, Path, description = "ID do post")),
    responses(
        (status = 200, description = "Post atualizado", body = BlogPostView),
        (status = 404, description = "Post não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_post(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<BlogPostPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let post = app_state
        .blog_service
        .update(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(post))
}

#[utoipa::path(
    delete,
    path = "/api/admin/blog/{id}",
    tag = "Admin Blog",
    params(("id" = Uuid, Path, description = "ID do post")),
    responses(
        (status = 204, description = "Post removido"),
        (status = 404, description = "Post não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_post(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .blog_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
