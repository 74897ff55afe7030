pub mod auth;
pub mod blog;
pub mod destination;
pub mod language;
pub mod lead;
pub mod tag;
pub mod tour;
