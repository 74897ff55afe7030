pub mod auth;
pub mod blog;
pub mod contact;
pub mod destinations;
pub mod seo;
pub mod tags;
pub mod tours;
