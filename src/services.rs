pub mod auth;
pub mod blog_service;
pub mod destination_order;
pub mod lead_service;
pub mod seo_service;
pub mod tag_service;
pub mod tour_aggregation;
pub mod tour_service;
