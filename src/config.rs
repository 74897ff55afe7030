// src/config.rs

use crate::{
    common::i18n::I18nStore,
    db::{BlogRepository, DestinationRepository, LeadRepository, TagRepository, TourRepository, UserRepository},
    services::{
        auth::AuthService, blog_service::BlogService, lead_service::LeadService, seo_service::SeoService,
        tag_service::TagService, tour_service::TourService,
    },
};
use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

/// Variáveis de ambiente lidas na subida.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub base_url: String,
    pub server_addr: String,
    pub cors_origin: Option<String>,
    // Conta admin criada no boot se ainda não existir
    pub admin_credentials: Option<(String, String)>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let base_url = env::var("BASE_URL").context("BASE_URL deve ser definida")?;

        let server_addr = non_empty_var("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let cors_origin = non_empty_var("CORS_ORIGIN");
        let admin_credentials = non_empty_var("ADMIN_EMAIL").zip(non_empty_var("ADMIN_PASSWORD"));

        Ok(Self {
            database_url,
            jwt_secret,
            base_url: base_url.trim_end_matches('/').to_string(),
            server_addr,
            cors_origin,
            admin_credentials,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: I18nStore,
    pub base_url: String,

    pub auth_service: AuthService,
    pub tour_service: TourService,
    pub blog_service: BlogService,
    pub tag_service: TagService,
    pub lead_service: LeadService,
    pub seo_service: SeoService,

    pub destination_repo: DestinationRepository,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let tour_repo = TourRepository::new(db_pool.clone());
        let blog_repo = BlogRepository::new(db_pool.clone());
        let tag_repo = TagRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let destination_repo = DestinationRepository::new(db_pool.clone());

        let base_url = settings.base_url.clone();

        let auth_service = AuthService::new(user_repo, settings.jwt_secret.clone());
        let tour_service = TourService::new(tour_repo.clone(), db_pool.clone(), base_url.clone());
        let blog_service = BlogService::new(blog_repo.clone(), db_pool.clone());
        let tag_service = TagService::new(tag_repo);
        let lead_service = LeadService::new(lead_repo);
        let seo_service = SeoService::new(tour_repo, blog_repo, base_url.clone());

        Ok(Self {
            db_pool,
            i18n_store: I18nStore::new(),
            base_url,
            auth_service,
            tour_service,
            blog_service,
            tag_service,
            lead_service,
            seo_service,
            destination_repo,
        })
    }
}
