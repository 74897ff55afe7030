//src/main.rs

use axum::{
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Settings};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar
    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if let Some((email, password)) = &settings.admin_credentials {
        app_state.auth_service.ensure_admin(email, password).await?;
    }

    let cors = cors_layer(settings.cors_origin.as_deref())?;
    let app = router(app_state.clone()).layer(cors).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&settings.server_addr).await?;
    tracing::info!(
        "🚀 Servidor escutando em {} (links canônicos em {})",
        listener.local_addr()?,
        app_state.base_url
    );
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let allow_origin = match origin {
        Some(origin) => AllowOrigin::exact(HeaderValue::from_str(origin)?),
        None => AllowOrigin::any(),
    };
    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

fn router(app_state: AppState) -> Router {
    // Rotas públicas do site
    let tour_routes = Router::new()
        .route("/", get(handlers::tours::list_tours))
        .route("/{slug}", get(handlers::tours::get_tour));

    let blog_routes = Router::new()
        .route("/", get(handlers::blog::list_posts))
        .route("/{slug}", get(handlers::blog::get_post));

    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Painel administrativo: tudo atrás do Bearer
    let admin_routes = Router::new()
        .route("/tours"
               ,get(handlers::tours::admin_list_tours)
               .post(handlers::tours::create_tour)
        )
        .route("/tours/{id}"
               ,get(handlers::tours::admin_get_tour)
               .put(handlers::tours::update_tour)
               .delete(handlers::tours::delete_tour)
        )
        .route("/tours/{id}/destinations"
               ,put(handlers::tours::reorder_tour_destinations)
        )
        .route("/tours/{id}/destinations/{destination_id}"
               ,delete(handlers::tours::remove_tour_destination)
        )
        .route("/blog"
               ,get(handlers::blog::admin_list_posts)
               .post(handlers::blog::create_post)
        )
        .route("/blog/{id}"
               ,get(handlers::blog::admin_get_post)
               .put(handlers::blog::update_post)
               .delete(handlers::blog::delete_post)
        )
        .route("/tags", post(handlers::tags::create_tag))
        .route("/tags/{id}", delete(handlers::tags::delete_tag))
        .route("/tag-categories", post(handlers::tags::create_tag_category))
        .route("/tag-categories/{id}", delete(handlers::tags::delete_tag_category))
        .route("/destinations", post(handlers::destinations::create_destination))
        .route("/destinations/{id}", delete(handlers::destinations::delete_destination))
        .route("/leads", get(handlers::contact::list_leads))
        .route("/leads/{id}/status", put(handlers::contact::update_lead_status))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/tags", get(handlers::tags::list_tags))
        .route("/api/tag-categories", get(handlers::tags::list_tag_categories))
        .route("/api/destinations", get(handlers::destinations::list_destinations))
        .route("/api/contact", post(handlers::contact::submit_contact))
        .route("/sitemap.xml", get(handlers::seo::sitemap))
        .route("/robots.txt", get(handlers::seo::robots))
        .nest("/api/tours", tour_routes)
        .nest("/api/blog", blog_routes)
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/admin", admin_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
