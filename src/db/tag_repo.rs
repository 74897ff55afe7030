// src/db/tag_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tag::{Tag, TagCategory, TagCategoryPayload, TagPayload},
};

#[derive(Clone)]
pub struct TagRepository {
    pool: PgPool,
}

fn unique_as_conflict(e: sqlx::Error, what: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(format!("'{}' já existe.", what));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::TagCategoryNotFound;
        }
    }
    e.into()
}

impl TagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        let tags = sqlx::query_as::<_, Tag>("SELECT * FROM tags ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }

    pub async fn list_categories(&self) -> Result<Vec<TagCategory>, AppError> {
        let categories = sqlx::query_as::<_, TagCategory>("SELECT * FROM tag_categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    pub async fn create_tag(&self, input: &TagPayload) -> Result<Tag, AppError> {
        sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (name, slug, color, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.slug)
        .bind(input.color.as_deref())
        .bind(input.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_as_conflict(e, &input.slug))
    }

    pub async fn delete_tag(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn create_category(&self, input: &TagCategoryPayload) -> Result<TagCategory, AppError> {
        sqlx::query_as::<_, TagCategory>(
            "INSERT INTO tag_categories (name, color) VALUES ($1, $2) RETURNING *",
        )
        .bind(input.name.trim())
        .bind(input.color.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_as_conflict(e, &input.name))
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<bool, AppError> {
        // As tags da categoria ficam sem categoria (ON DELETE SET NULL)
        let result = sqlx::query("DELETE FROM tag_categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
