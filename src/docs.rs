// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Tours ---
        handlers::tours::list_tours,
        handlers::tours::get_tour,
        handlers::tours::admin_list_tours,
        handlers::tours::admin_get_tour,
        handlers::tours::create_tour,
        handlers::tours::update_tour,
        handlers::tours::delete_tour,
        handlers::tours::remove_tour_destination,
        handlers::tours::reorder_tour_destinations,

        // --- Blog ---
        handlers::blog::list_posts,
        handlers::blog::get_post,
        handlers::blog::admin_list_posts,
        handlers::blog::admin_get_post,
        handlers::blog::create_post,
        handlers::blog::update_post,
        handlers::blog::delete_post,

        // --- Tags ---
        handlers::tags::list_tags,
        handlers::tags::list_tag_categories,
        handlers::tags::create_tag,
        handlers::tags::delete_tag,
        handlers::tags::create_tag_category,
        handlers::tags::delete_tag_category,

        // --- Destinations ---
        handlers::destinations::list_destinations,
        handlers::destinations::create_destination,
        handlers::destinations::delete_destination,

        // --- Contact ---
        handlers::contact::submit_contact,
        handlers::contact::list_leads,
        handlers::contact::update_lead_status,

        // --- SEO ---
        handlers::seo::sitemap,
        handlers::seo::robots,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Tours ---
            models::tour::RoomType,
            models::tour::PaymentMethod,
            models::tour::Tour,
            models::tour::TourDestination,
            models::tour::Departure,
            models::tour::TourPrice,
            models::tour::TourPhoto,
            models::tour::TourGift,
            models::tour::TourActivity,
            models::tour::TourAttachment,
            models::tour::TourDetail,
            models::tour::DepartureInput,
            models::tour::PriceInput,
            models::tour::AttachmentInput,
            models::tour::TourPayload,
            models::tour::ReorderDestinationsPayload,

            // --- Blog ---
            models::language::Language,
            models::blog::BlogPost,
            models::blog::PostSource,
            models::blog::BlogPostView,
            models::blog::BlogPostPayload,

            // --- Tags ---
            models::tag::Tag,
            models::tag::TagCategory,
            models::tag::TagPayload,
            models::tag::TagCategoryPayload,

            // --- Destinations ---
            models::destination::Destination,
            models::destination::DestinationPayload,

            // --- Contact ---
            models::lead::LeadStatus,
            models::lead::Lead,
            models::lead::ContactPayload,
            models::lead::UpdateLeadStatusPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login do painel"),
        (name = "Users", description = "Dados do usuário logado"),
        (name = "Tours", description = "Catálogo público de tours"),
        (name = "Blog", description = "Posts públicos (esquema atual + antigo)"),
        (name = "Tags", description = "Tags e categorias"),
        (name = "Destinations", description = "Destinos"),
        (name = "Contact", description = "Formulário de contato"),
        (name = "SEO", description = "Sitemap e robots"),
        (name = "Admin Tours", description = "Gestão de tours"),
        (name = "Admin Blog", description = "Gestão de posts"),
        (name = "Admin Tags", description = "Gestão de tags"),
        (name = "Admin Destinations", description = "Gestão de destinos"),
        (name = "Admin Leads", description = "Leads recebidos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
