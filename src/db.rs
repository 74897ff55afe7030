pub mod user_repo;
pub use user_repo::UserRepository;
pub mod tour_repo;
pub use tour_repo::TourRepository;
pub mod destination_repo;
pub use destination_repo::DestinationRepository;
pub mod blog_repo;
pub use blog_repo::BlogRepository;
pub mod tag_repo;
pub use tag_repo::TagRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
