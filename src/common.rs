pub mod error;
pub mod i18n;
pub mod query;
pub mod retry;
pub mod validation;
