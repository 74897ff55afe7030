// src/services/tag_service.rs

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        retry::{retry_with_backoff, RetryPolicy},
    },
    db::TagRepository,
    models::tag::{Tag, TagCategory, TagCategoryPayload, TagPayload},
};

#[derive(Clone)]
pub struct TagService {
    repo: TagRepository,
    retry: RetryPolicy,
}

impl TagService {
    pub fn new(repo: TagRepository) -> Self {
        Self { repo, retry: RetryPolicy::default() }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Leitura das tags com retry (3 tentativas, 1s..5s) só para falhas passageiras.
    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        retry_with_backoff(self.retry, "Busca de tags", AppError::is_transient, || self.repo.list_tags()).await
    }

    pub async fn list_categories(&self) -> Result<Vec<TagCategory>, AppError> {
        self.repo.list_categories().await
    }

    pub async fn create_tag(&self, input: &TagPayload) -> Result<Tag, AppError> {
        self.repo.create_tag(input).await
    }

    pub async fn delete_tag(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_tag(id).await? {
            return Err(AppError::TagNotFound);
        }
        Ok(())
    }

    pub async fn create_category(&self, input: &TagCategoryPayload) -> Result<TagCategory, AppError> {
        self.repo.create_category(input).await
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_category(id).await? {
            return Err(AppError::TagCategoryNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;
    use std::time::{Duration, Instant};

    // Ninguém escuta na porta 1: cada tentativa falha rápido com erro passageiro
    fn unreachable_service(retry: RetryPolicy) -> TagService {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://localhost:1/unused")
            .unwrap();
        TagService::new(TagRepository::new(pool)).with_retry(retry)
    }

    #[tokio::test]
    async fn default_policy_is_three_attempts_from_one_to_five_seconds() {
        let pool = PgPoolOptions::new().connect_lazy("postgres://localhost:1/unused").unwrap();
        let service = TagService::new(TagRepository::new(pool));
        assert_eq!(service.retry.max_attempts, 3);
        assert_eq!(service.retry.initial_delay, Duration::from_secs(1));
        assert_eq!(service.retry.max_delay, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn list_tags_gives_up_with_a_transient_error_after_backing_off() {
        let retry = RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(30),
            max_delay: Duration::from_millis(50),
        };
        let started = Instant::now();

        let result = unreachable_service(retry).list_tags().await;

        let err = result.unwrap_err();
        assert!(err.is_transient(), "esperava erro passageiro, veio {}", err);
        // Duas esperas entre as três tentativas: 30ms + 50ms
        assert!(started.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn list_tags_with_single_attempt_does_not_wait() {
        let retry = RetryPolicy {
            max_attempts: 1,
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(5),
        };
        let started = Instant::now();

        let result = unreachable_service(retry).list_tags().await;

        assert!(result.unwrap_err().is_transient());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
